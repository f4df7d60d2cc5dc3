//! Template and template deployment state
//!
//! Resources: `ome_template`, `ome_deployment`.
//! Data sources: `ome_template_info`, `ome_vlannetworks_info`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One template attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TemplateAttributeState {
    /// Attribute ID assigned by OME
    pub attribute_id: i64,
    /// Comma separated path of group names and the attribute name
    pub display_name: String,
    pub value: String,
    pub is_ignored: bool,
}

/// VLAN settings of one NIC port
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VlanAttributeState {
    /// VLAN network ID applied untagged (0 for none)
    pub untagged_network: i64,
    /// VLAN network IDs applied tagged
    pub tagged_networks: Vec<i64>,
    pub is_nic_bonded: bool,
    /// Port number on the NIC
    pub port: i64,
    /// NIC name as OME shows it, e.g. `NIC in Mezzanine 1A`
    pub nic_identifier: String,
}

/// Template NIC/VLAN configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TemplateVlanState {
    pub propagate_vlan: bool,
    /// `NoTeaming`, `LACP` or `Other`
    pub bonding_technology: String,
    pub vlan_attributes: Vec<VlanAttributeState>,
}

/// `ome_template` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TemplateState {
    /// Template ID (computed)
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Components captured from the reference device, comma separated (default `All`)
    pub fqdds: String,
    /// `Deployment` (default) or `Compliance`
    pub view_type: String,
    /// OME view type ID (computed)
    pub view_type_id: i64,
    /// Only `Server` is supported
    pub device_type: String,
    /// Reference device ID (exclusive with the other sources)
    pub refdevice_id: i64,
    /// Reference device service tag
    pub refdevice_servicetag: String,
    /// Source template ID to clone
    pub reftemplate_id: i64,
    /// Source template name to clone
    pub reftemplate_name: String,
    /// Template XML to import
    pub content: String,
    /// Template attributes. On read every attribute OME reports is listed.
    pub attributes: Option<Vec<TemplateAttributeState>>,
    /// Identity pool used for deployment
    pub identity_pool_name: Option<String>,
    pub vlan: Option<TemplateVlanState>,
    /// Job status checks before giving up (default 30)
    pub job_retry_count: Option<i64>,
    /// Seconds between job status checks (default 20)
    pub sleep_interval: Option<i64>,
}

/// File share details of a boot-to-ISO request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ShareDetailState {
    pub ip_address: String,
    pub share_name: String,
    pub work_group: String,
    pub user: String,
    pub password: String,
}

/// Boot the targets to a network ISO after deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BootToNetworkIsoState {
    pub boot_to_network: bool,
    /// `CIFS` or `NFS`
    pub share_type: String,
    pub iso_path: String,
    /// Minutes, one of 1, 2, 4, 8, 16
    pub iso_timeout: i64,
    pub share_detail: Option<ShareDetailState>,
}

/// Attribute values applied to specific targets only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeviceAttributeOverride {
    pub device_servicetags: Vec<String>,
    pub attributes: Vec<TemplateAttributeState>,
}

/// `ome_deployment` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeploymentState {
    /// ID of the last deployment job (computed)
    pub id: i64,
    pub template_id: i64,
    pub template_name: String,
    /// Target device IDs (exclusive with `device_servicetags`)
    pub device_ids: Vec<i64>,
    pub device_servicetags: Vec<String>,
    pub boot_to_network_iso: Option<BootToNetworkIsoState>,
    /// Force a shutdown instead of a graceful one
    pub forced_shutdown: bool,
    /// Seconds to wait for a graceful shutdown (default 300)
    pub options_time_to_wait_before_shutdown: Option<i64>,
    /// Leave the targets powered off after deployment
    pub power_state_off: bool,
    pub options_strict_checking_vlan: bool,
    pub device_attributes: Vec<DeviceAttributeOverride>,
    pub run_later: bool,
    pub cron: String,
    /// Job status checks before giving up (default 20)
    pub job_retry_count: Option<i64>,
    /// Seconds between job status checks (default 60)
    pub sleep_interval: Option<i64>,
}

/// `ome_template_info` data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TemplateInfoState {
    /// Template to look up
    pub name: String,
    pub id: i64,
    pub description: Option<String>,
    pub view_type_id: i64,
    pub view_type: String,
    pub refdevice_id: i64,
    pub status: i64,
    pub identity_pool_id: i64,
    pub attributes: Vec<TemplateAttributeState>,
    pub vlan: Option<TemplateVlanState>,
}

/// One VLAN network defined in OME
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VlanNetworkState {
    pub vlan_id: i64,
    pub name: String,
    pub description: String,
    pub vlan_maximum: i64,
    pub vlan_minimum: i64,
    pub network_type: i64,
}

/// `ome_vlannetworks_info` data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VlanNetworksInfoState {
    pub id: String,
    pub vlan_networks: Vec<VlanNetworkState>,
}
