//! Discovery job group models (DiscoveryConfigService)

use super::Schedule;
use serde::{Deserialize, Serialize};

/// One address expression to probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DiscoveryTarget {
    pub network_address_detail: String,
}

/// Targets, device types and credentials of a discovery group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DiscoveryConfigModel {
    pub discovery_config_targets: Vec<DiscoveryTarget>,
    /// Credential profile, JSON-encoded as a string the way OME expects it
    pub connection_profile: String,
    pub device_type: Vec<i64>,
}

/// Task bound to a discovery group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DiscoveryTaskParam {
    pub task_id: i64,
    pub task_type_id: i64,
    pub execution_sequence: i64,
}

/// Discovery job group (`/api/DiscoveryConfigService/DiscoveryConfigGroups({id})`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DiscoveryConfigGroup {
    pub discovery_config_group_id: i64,
    pub discovery_config_group_name: String,
    pub discovery_config_group_description: Option<String>,
    pub discovery_status_email_recipient: Option<String>,
    pub discovery_config_models: Vec<DiscoveryConfigModel>,
    pub discovery_config_task_param: Vec<DiscoveryTaskParam>,
    pub schedule: Schedule,
    pub trap_destination: bool,
    pub community_string: bool,
    pub create_group: bool,
    pub use_all_profiles: bool,
}

impl DiscoveryConfigGroup {
    /// Job id of the discovery task, 0 when OME has not scheduled one
    pub fn job_id(&self) -> i64 {
        self.discovery_config_task_param
            .first()
            .map(|t| t.task_id)
            .unwrap_or_default()
    }
}

/// Request body for `DiscoveryConfigService.RemoveDiscoveryGroup`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveDiscoveryGroupsRequest {
    pub discovery_group_ids: Vec<i64>,
}
