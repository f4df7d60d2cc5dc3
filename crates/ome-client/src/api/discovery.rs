//! DiscoveryConfigService operations

use crate::client::OmeClient;
use crate::error::OmeError;
use crate::models::*;
use tracing::debug;

const GROUPS_PATH: &str = "/api/DiscoveryConfigService/DiscoveryConfigGroups";

impl OmeClient {
    /// Create a discovery job group
    ///
    /// The returned group carries the discovery task in `discovery_config_task_param`.
    pub async fn create_discovery(&self, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError> {
        debug!("Creating discovery {}", group.discovery_config_group_name);
        self.http.post(GROUPS_PATH, group).await
    }

    /// Update a discovery job group
    pub async fn update_discovery(&self, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError> {
        debug!("Updating discovery {}", group.discovery_config_group_id);
        self.http
            .put(&format!("{}({})", GROUPS_PATH, group.discovery_config_group_id), group)
            .await
    }

    /// Get a discovery job group by ID
    pub async fn get_discovery(&self, id: i64) -> Result<DiscoveryConfigGroup, OmeError> {
        self.http.get(&format!("{}({})", GROUPS_PATH, id)).await
    }

    /// Delete discovery job groups
    pub async fn delete_discoveries(&self, ids: &[i64]) -> Result<(), OmeError> {
        debug!("Deleting discoveries {:?}", ids);
        let request = RemoveDiscoveryGroupsRequest {
            discovery_group_ids: ids.to_vec(),
        };
        self.http
            .post_no_content(
                "/api/DiscoveryConfigService/Actions/DiscoveryConfigService.RemoveDiscoveryGroup",
                &request,
            )
            .await
    }
}
