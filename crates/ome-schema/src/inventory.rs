//! Device inventory state
//!
//! Resources: `ome_static_group`, `ome_devices`, `ome_device_action`, `ome_discovery`.
//! Data sources: `ome_device`, `ome_groupdevices_info`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `ome_static_group` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StaticGroupState {
    /// Group ID (computed)
    pub id: i64,
    /// Unique among the groups under the same parent
    pub name: String,
    pub description: String,
    /// ID of the parent group
    pub parent_id: i64,
    /// Member device IDs, ascending
    pub device_ids: Vec<i64>,
}

/// One inventory subtree of a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InventoryState {
    /// e.g. `serverProcessors`, `serverNetworkInterfaces`
    pub inventory_type: String,
    /// Inventory entries as OME returns them, one JSON document per entry
    pub inventory_info: Vec<String>,
}

/// A managed device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeviceInfoState {
    pub id: i64,
    pub device_service_tag: String,
    pub device_name: String,
    pub model: String,
    #[serde(rename = "type")]
    pub device_type: i64,
    pub management_ips: Vec<String>,
    pub power_state: i64,
    pub status: i64,
    pub last_inventory_time: String,
    pub device_capabilities: Vec<i64>,
    /// Filled only for the inventory types requested
    pub inventory: Vec<InventoryState>,
}

/// `ome_devices` resource
///
/// Tracks devices already known to OME. Deleting the resource (or dropping a device
/// from it) removes the device from OME.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DevicesState {
    pub id: String,
    /// Device IDs (exclusive with `device_service_tags`)
    pub device_ids: Vec<i64>,
    pub device_service_tags: Vec<String>,
    /// Resolved devices (computed)
    pub devices: Vec<DeviceInfoState>,
}

/// `ome_device_action` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeviceActionState {
    /// ID of the job the action started (computed)
    pub id: i64,
    pub device_ids: Vec<i64>,
    pub device_service_tags: Vec<String>,
    /// Only `inventory_refresh` is supported
    pub action: String,
    /// Last observed job status (computed)
    pub current_status: String,
}

/// Credentials used to discover one target range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiscoveryCredentialsState {
    pub username: String,
    pub password: String,
    /// Default 443
    pub port: Option<i64>,
    /// Default 3
    pub retries: Option<i64>,
    /// Seconds, default 60
    pub timeout: Option<i64>,
    pub ca_check: bool,
    pub cn_check: bool,
}

/// One range of addresses to discover
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiscoveryTargetState {
    /// IP addresses, ranges, CIDRs or hostnames
    pub network_address_detail: Vec<String>,
    /// `SERVER`, `CHASSIS`, `NETWORK SWITCH` or `STORAGE`
    pub device_type: Vec<String>,
    pub redfish: Option<DiscoveryCredentialsState>,
    pub wsman: Option<DiscoveryCredentialsState>,
}

/// `ome_discovery` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiscoveryState {
    /// Discovery group ID (computed)
    pub id: i64,
    pub name: String,
    pub email_recipient: String,
    pub discovery_config_targets: Vec<DiscoveryTargetState>,
    pub run_later: bool,
    pub cron: String,
    pub trap_destination: bool,
    pub community_string: bool,
    /// ID of the discovery job (computed)
    pub job_id: i64,
    /// Job status checks before giving up (default 10)
    pub job_retry_count: Option<i64>,
    /// Seconds between job status checks (default 30)
    pub sleep_interval: Option<i64>,
}

/// `ome_device` data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeviceDataSourceState {
    pub id: String,
    pub device_ids: Vec<i64>,
    pub device_service_tags: Vec<String>,
    /// IP addresses, CIDRs, wildcards (`10.0.*.*`) or dashed ranges
    pub ip_expressions: Vec<String>,
    /// Raw OData `$filter` expression
    pub filter_expression: String,
    pub device_group_names: Vec<String>,
    /// Inventory types to read for every device
    pub inventory_types: Vec<String>,
    pub devices: Vec<DeviceInfoState>,
}

/// `ome_groupdevices_info` data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GroupDevicesInfoState {
    pub id: String,
    pub device_group_names: Vec<String>,
    pub device_ids: Vec<i64>,
    pub device_servicetags: Vec<String>,
}
