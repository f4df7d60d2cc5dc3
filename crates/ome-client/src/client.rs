//! OME API client
//!
//! Owns one authenticated OME session. The per-service operations live in `crate::api`
//! as inherent methods on `OmeClient`; this module holds construction, the session
//! lifecycle and the `OmeApi` implementation.

use crate::common::HttpClient;
use crate::common::retry::RetryPolicy;
use crate::error::OmeError;
use crate::models::*;
use crate::ome_trait::OmeApi;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const SESSIONS_PATH: &str = "/api/SessionService/Sessions";

/// Connection options for an OME appliance
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL, e.g. `https://ome.example.com:443`
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Accept self-signed or otherwise invalid certificates
    pub skip_ssl: bool,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry policy for transport failures
    pub retry: RetryPolicy,
}

impl ClientOptions {
    /// Options with the default timeout (30s) and retry policy (3 attempts)
    pub fn new(base_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            skip_ssl: false,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SessionRequest<'a> {
    user_name: &'a str,
    password: &'a str,
    session_type: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SessionResponse {
    id: String,
}

/// OME API client bound to one session
#[derive(Debug)]
pub struct OmeClient {
    pub(crate) http: HttpClient,
    session_id: String,
}

impl OmeClient {
    /// Open a session and return a client that authenticates with its token
    ///
    /// # Arguments
    /// * `options` - Appliance URL, credentials, TLS and retry settings
    ///
    /// # Returns
    /// * `Ok(OmeClient)` - Authenticated client
    /// * `Err(OmeError::Unauthorized)` - Credentials were rejected
    /// * `Err(OmeError)` - Any other failure to reach OME
    pub async fn connect(options: &ClientOptions) -> Result<Self, OmeError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.skip_ssl)
            .build()
            .map_err(|e| OmeError::Transport(e.to_string()))?;
        let http = HttpClient::new(client, options.base_url.clone(), options.retry);

        debug!("Creating OME session at {} for user {}", http.base_url(), options.username);
        let request = SessionRequest {
            user_name: &options.username,
            password: &options.password,
            session_type: "API",
        };
        let response = http.post_response(SESSIONS_PATH, &request).await?;
        let token = response
            .headers()
            .get(crate::common::AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
            .ok_or_else(|| OmeError::Api {
                status: response.status().as_u16(),
                message: "session response did not carry an X-Auth-Token header".to_string(),
            })?;
        let session: SessionResponse = response.json().await?;

        info!("Opened OME session {} at {}", session.id, http.base_url());
        Ok(Self {
            http: http.with_token(token),
            session_id: session.id,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Id of the session this client authenticates with
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Remove the session on OME
    ///
    /// A session that is already gone (404) counts as closed.
    pub async fn close_session(&self) -> Result<(), OmeError> {
        let path = format!("{}('{}')", SESSIONS_PATH, self.session_id);
        match self.http.delete(&path).await {
            Ok(()) => {
                debug!("Closed OME session {}", self.session_id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!("OME session {} was already removed", self.session_id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl OmeApi for OmeClient {
    fn base_url(&self) -> &str {
        self.base_url()
    }

    async fn close_session(&self) -> Result<(), OmeError> {
        self.close_session().await
    }

    // Jobs
    async fn get_job(&self, id: i64) -> Result<Job, OmeError> {
        self.get_job(id).await
    }

    async fn get_job_execution_histories(&self, job_id: i64) -> Result<Vec<JobExecutionHistory>, OmeError> {
        self.get_job_execution_histories(job_id).await
    }

    async fn get_job_execution_details(&self, job_id: i64, history_id: i64) -> Result<Vec<JobExecutionDetail>, OmeError> {
        self.get_job_execution_details(job_id, history_id).await
    }

    async fn delete_job(&self, id: i64) -> Result<(), OmeError> {
        self.delete_job(id).await
    }

    // Templates
    async fn create_template(&self, request: &CreateTemplateRequest) -> Result<i64, OmeError> {
        self.create_template(request).await
    }

    async fn import_template(&self, request: &ImportTemplateRequest) -> Result<i64, OmeError> {
        self.import_template(request).await
    }

    async fn clone_template(&self, request: &CloneTemplateRequest) -> Result<i64, OmeError> {
        self.clone_template(request).await
    }

    async fn get_template(&self, id: i64) -> Result<Template, OmeError> {
        self.get_template(id).await
    }

    async fn get_template_by_name(&self, name: &str) -> Result<Option<Template>, OmeError> {
        self.get_template_by_name(name).await
    }

    async fn list_templates(&self) -> Result<Vec<Template>, OmeError> {
        self.list_templates().await
    }

    async fn update_template(&self, request: &UpdateTemplateRequest) -> Result<(), OmeError> {
        self.update_template(request).await
    }

    async fn delete_template(&self, id: i64) -> Result<(), OmeError> {
        self.delete_template(id).await
    }

    async fn get_template_attributes(&self, id: i64) -> Result<AttributeDetails, OmeError> {
        self.get_template_attributes(id).await
    }

    async fn get_template_network(&self, id: i64) -> Result<TemplateNetwork, OmeError> {
        self.get_template_network(id).await
    }

    async fn update_template_network(&self, request: &UpdateNetworkConfigRequest) -> Result<(), OmeError> {
        self.update_template_network(request).await
    }

    async fn export_template(&self, id: i64) -> Result<String, OmeError> {
        self.export_template(id).await
    }

    async fn list_identity_pools(&self) -> Result<Vec<IdentityPool>, OmeError> {
        self.list_identity_pools().await
    }

    async fn list_vlan_networks(&self) -> Result<Vec<VlanNetwork>, OmeError> {
        self.list_vlan_networks().await
    }

    // Deployment / server profiles
    async fn deploy_template(&self, request: &DeployTemplateRequest) -> Result<i64, OmeError> {
        self.deploy_template(request).await
    }

    async fn list_profiles_by_template(&self, template_id: i64) -> Result<Vec<Profile>, OmeError> {
        self.list_profiles_by_template(template_id).await
    }

    async fn delete_profiles(&self, profile_ids: &[i64]) -> Result<(), OmeError> {
        self.delete_profiles(profile_ids).await
    }

    // Configuration baselines
    async fn create_config_baseline(&self, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError> {
        self.create_config_baseline(request).await
    }

    async fn update_config_baseline(&self, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError> {
        self.update_config_baseline(request).await
    }

    async fn delete_config_baselines(&self, ids: &[i64]) -> Result<(), OmeError> {
        self.delete_config_baselines(ids).await
    }

    async fn get_config_baseline(&self, id: i64) -> Result<ConfigBaseline, OmeError> {
        self.get_config_baseline(id).await
    }

    async fn get_config_baseline_by_name(&self, name: &str) -> Result<Option<ConfigBaseline>, OmeError> {
        self.get_config_baseline_by_name(name).await
    }

    async fn get_config_compliance_reports(&self, baseline_id: i64) -> Result<Vec<DeviceComplianceReport>, OmeError> {
        self.get_config_compliance_reports(baseline_id).await
    }

    async fn get_device_compliance_details(&self, baseline_id: i64, device_id: i64) -> Result<DeviceComplianceDetails, OmeError> {
        self.get_device_compliance_details(baseline_id, device_id).await
    }

    async fn remediate_baseline(&self, request: &RemediationRequest) -> Result<i64, OmeError> {
        self.remediate_baseline(request).await
    }

    // Groups
    async fn create_group(&self, model: &GroupModel) -> Result<i64, OmeError> {
        self.create_group(model).await
    }

    async fn update_group(&self, model: &GroupModel) -> Result<(), OmeError> {
        self.update_group(model).await
    }

    async fn delete_group(&self, id: i64) -> Result<(), OmeError> {
        self.delete_group(id).await
    }

    async fn get_group(&self, id: i64) -> Result<Group, OmeError> {
        self.get_group(id).await
    }

    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>, OmeError> {
        self.get_group_by_name(name).await
    }

    async fn get_group_devices(&self, group_id: i64) -> Result<Vec<Device>, OmeError> {
        self.get_group_devices(group_id).await
    }

    async fn add_group_members(&self, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError> {
        self.add_group_members(group_id, device_ids).await
    }

    async fn remove_group_members(&self, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError> {
        self.remove_group_members(group_id, device_ids).await
    }

    // Devices
    async fn list_devices(&self, filter: Option<&str>) -> Result<Vec<Device>, OmeError> {
        self.list_devices(filter).await
    }

    async fn get_device(&self, id: i64) -> Result<Device, OmeError> {
        self.get_device(id).await
    }

    async fn get_device_by_service_tag(&self, service_tag: &str) -> Result<Option<Device>, OmeError> {
        self.get_device_by_service_tag(service_tag).await
    }

    async fn get_device_inventory(&self, id: i64) -> Result<Vec<InventoryDetail>, OmeError> {
        self.get_device_inventory(id).await
    }

    async fn refresh_device_inventory(&self, device_ids: &[i64]) -> Result<i64, OmeError> {
        self.refresh_device_inventory(device_ids).await
    }

    async fn remove_devices(&self, device_ids: &[i64]) -> Result<(), OmeError> {
        self.remove_devices(device_ids).await
    }

    // Firmware catalogs and baselines
    async fn create_catalog(&self, request: &CatalogRequest) -> Result<Catalog, OmeError> {
        self.create_catalog(request).await
    }

    async fn update_catalog(&self, request: &CatalogRequest) -> Result<Catalog, OmeError> {
        self.update_catalog(request).await
    }

    async fn delete_catalogs(&self, ids: &[i64]) -> Result<(), OmeError> {
        self.delete_catalogs(ids).await
    }

    async fn get_catalog(&self, id: i64) -> Result<Catalog, OmeError> {
        self.get_catalog(id).await
    }

    async fn list_catalogs(&self) -> Result<Vec<Catalog>, OmeError> {
        self.list_catalogs().await
    }

    async fn create_firmware_baseline(&self, request: &FirmwareBaselineRequest) -> Result<i64, OmeError> {
        self.create_firmware_baseline(request).await
    }

    async fn update_firmware_baseline(&self, request: &FirmwareBaselineRequest) -> Result<i64, OmeError> {
        self.update_firmware_baseline(request).await
    }

    async fn delete_firmware_baselines(&self, ids: &[i64]) -> Result<(), OmeError> {
        self.delete_firmware_baselines(ids).await
    }

    async fn get_firmware_baseline(&self, id: i64) -> Result<FirmwareBaseline, OmeError> {
        self.get_firmware_baseline(id).await
    }

    async fn get_firmware_baseline_by_name(&self, name: &str) -> Result<Option<FirmwareBaseline>, OmeError> {
        self.get_firmware_baseline_by_name(name).await
    }

    async fn get_firmware_compliance_reports(&self, baseline_id: i64) -> Result<Vec<FirmwareComplianceReport>, OmeError> {
        self.get_firmware_compliance_reports(baseline_id).await
    }

    // Accounts
    async fn create_account(&self, request: &AccountRequest) -> Result<Account, OmeError> {
        self.create_account(request).await
    }

    async fn update_account(&self, request: &AccountRequest) -> Result<Account, OmeError> {
        self.update_account(request).await
    }

    async fn delete_account(&self, id: &str) -> Result<(), OmeError> {
        self.delete_account(id).await
    }

    async fn get_account(&self, id: &str) -> Result<Account, OmeError> {
        self.get_account(id).await
    }

    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, OmeError> {
        self.get_account_by_username(username).await
    }

    // Appliance certificates
    async fn upload_certificate(&self, certificate: Vec<u8>) -> Result<(), OmeError> {
        self.upload_certificate(certificate).await
    }

    async fn get_certificate(&self) -> Result<CertificateInfo, OmeError> {
        self.get_certificate().await
    }

    async fn generate_csr(&self, request: &CsrRequest) -> Result<CsrResponse, OmeError> {
        self.generate_csr(request).await
    }

    // Discovery
    async fn create_discovery(&self, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError> {
        self.create_discovery(group).await
    }

    async fn update_discovery(&self, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError> {
        self.update_discovery(group).await
    }

    async fn get_discovery(&self, id: i64) -> Result<DiscoveryConfigGroup, OmeError> {
        self.get_discovery(id).await
    }

    async fn delete_discoveries(&self, ids: &[i64]) -> Result<(), OmeError> {
        self.delete_discoveries(ids).await
    }

    // Appliance network settings
    async fn get_proxy_configuration(&self) -> Result<ProxyConfiguration, OmeError> {
        self.get_proxy_configuration().await
    }

    async fn update_proxy_configuration(&self, config: &ProxyConfiguration) -> Result<ProxyConfiguration, OmeError> {
        self.update_proxy_configuration(config).await
    }

    async fn get_time_configuration(&self) -> Result<TimeConfiguration, OmeError> {
        self.get_time_configuration().await
    }

    async fn update_time_configuration(&self, config: &TimeConfiguration) -> Result<TimeConfiguration, OmeError> {
        self.update_time_configuration(config).await
    }

    async fn list_session_configurations(&self) -> Result<Vec<SessionConfiguration>, OmeError> {
        self.list_session_configurations().await
    }

    async fn update_session_configurations(&self, configs: &[SessionConfiguration]) -> Result<(), OmeError> {
        self.update_session_configurations(configs).await
    }
}
