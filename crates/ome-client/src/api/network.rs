//! Appliance network settings: proxy, time and session limits

use crate::client::OmeClient;
use crate::error::OmeError;
use crate::models::*;
use tracing::debug;

const PROXY_PATH: &str = "/api/ApplicationService/Network/ProxyConfiguration";
const TIME_PATH: &str = "/api/ApplicationService/Network/TimeConfiguration";
const SESSION_CONFIG_PATH: &str = "/api/SessionService/SessionConfiguration";

impl OmeClient {
    pub async fn get_proxy_configuration(&self) -> Result<ProxyConfiguration, OmeError> {
        self.http.get(PROXY_PATH).await
    }

    pub async fn update_proxy_configuration(&self, config: &ProxyConfiguration) -> Result<ProxyConfiguration, OmeError> {
        debug!("Updating proxy configuration (enabled: {})", config.enable_proxy);
        self.http.put(PROXY_PATH, config).await
    }

    pub async fn get_time_configuration(&self) -> Result<TimeConfiguration, OmeError> {
        self.http.get(TIME_PATH).await
    }

    pub async fn update_time_configuration(&self, config: &TimeConfiguration) -> Result<TimeConfiguration, OmeError> {
        debug!("Updating time configuration (zone: {})", config.time_zone);
        self.http.put(TIME_PATH, config).await
    }

    /// Session limits per session type (GUI, API, SSH, ...)
    pub async fn list_session_configurations(&self) -> Result<Vec<SessionConfiguration>, OmeError> {
        self.http.get_collection(SESSION_CONFIG_PATH).await
    }

    pub async fn update_session_configurations(&self, configs: &[SessionConfiguration]) -> Result<(), OmeError> {
        debug!("Updating {} session configurations", configs.len());
        self.http
            .post_no_content(
                "/api/SessionService/Actions/SessionService.SessionConfigurationUpdate",
                configs,
            )
            .await
    }
}
