//! Template, deployment and server profile models (TemplateService, ProfileService)

use super::Schedule;
use serde::{Deserialize, Serialize};

/// OME template type id for servers
pub const TEMPLATE_TYPE_SERVER: i64 = 2;
/// View id of the network (VLAN) attribute view
pub const NETWORK_VIEW_ID: i64 = 4;

/// Template view type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewType {
    Compliance,
    Deployment,
    Sample,
}

impl ViewType {
    /// OME `ViewTypeId`
    pub fn id(&self) -> i64 {
        match self {
            ViewType::Compliance => 1,
            ViewType::Deployment => 2,
            ViewType::Sample => 4,
        }
    }

    /// Decode an OME `ViewTypeId`
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(ViewType::Compliance),
            2 => Some(ViewType::Deployment),
            4 => Some(ViewType::Sample),
            _ => None,
        }
    }

    /// Parse a user-facing view type name
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Compliance" => Some(ViewType::Compliance),
            "Deployment" => Some(ViewType::Deployment),
            "Sample" => Some(ViewType::Sample),
            _ => None,
        }
    }

    /// User-facing name
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Compliance => "Compliance",
            ViewType::Deployment => "Deployment",
            ViewType::Sample => "Sample",
        }
    }
}

/// Template model (`/api/TemplateService/Templates({id})`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub source_device_id: i64,
    pub type_id: i64,
    pub view_type_id: i64,
    pub task_id: i64,
    pub has_identity_attributes: bool,
    pub status: i64,
    pub identity_pool_id: i64,
    pub is_built_in: bool,
    pub created_by: String,
    pub creation_time: String,
    pub last_updated_by: String,
    pub last_updated_time: String,
}

impl Template {
    /// Decoded view type
    pub fn view_type(&self) -> Option<ViewType> {
        ViewType::from_id(self.view_type_id)
    }
}

/// Request body to create a template from a reference device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub type_id: i64,
    pub view_type_id: i64,
    pub source_device_id: i64,
    pub fqdds: String,
}

/// Request body to create a template from inline XML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportTemplateRequest {
    pub name: String,
    #[serde(rename = "Type")]
    pub type_id: i64,
    pub view_type_id: i64,
    pub content: String,
}

/// Request body to clone an existing template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloneTemplateRequest {
    pub source_template_id: i64,
    pub new_template_name: String,
    pub view_type_id: i64,
}

/// One attribute value written back to a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeUpdate {
    pub id: i64,
    pub value: String,
    pub is_ignored: bool,
}

/// Request body to update a template's name, description and attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateTemplateRequest {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeUpdate>,
}

/// Single leaf attribute in a template attribute tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Attribute {
    pub attribute_id: i64,
    pub custom_id: i64,
    pub display_name: String,
    pub value: Option<String>,
    pub is_ignored: bool,
}

/// Node of a template attribute tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttributeGroup {
    pub group_name_id: i64,
    pub display_name: String,
    pub sub_attribute_groups: Vec<AttributeGroup>,
    pub attributes: Vec<Attribute>,
}

/// Attribute tree document (`AttributeDetails` and `Views({id})/AttributeViewDetails`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttributeDetails {
    pub id: i64,
    pub name: String,
    pub attribute_groups: Vec<AttributeGroup>,
}

/// Flattened template attribute: display name is the comma-joined group path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateAttribute {
    pub attribute_id: i64,
    pub display_name: String,
    pub value: String,
    pub is_ignored: bool,
}

impl AttributeDetails {
    /// Flatten the attribute tree, depth first, keeping OME's ordering
    pub fn flatten(&self) -> Vec<TemplateAttribute> {
        fn walk(group: &AttributeGroup, path: &mut Vec<String>, out: &mut Vec<TemplateAttribute>) {
            path.push(group.display_name.clone());
            for attribute in &group.attributes {
                let mut full = path.clone();
                full.push(attribute.display_name.clone());
                out.push(TemplateAttribute {
                    attribute_id: attribute.attribute_id,
                    display_name: full.join(","),
                    value: attribute.value.clone().unwrap_or_default(),
                    is_ignored: attribute.is_ignored,
                });
            }
            for sub in &group.sub_attribute_groups {
                walk(sub, path, out);
            }
            path.pop();
        }

        let mut out = Vec::new();
        for group in &self.attribute_groups {
            walk(group, &mut Vec::new(), &mut out);
        }
        out
    }
}

/// VLAN configuration of one NIC port in a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicPortVlan {
    pub component_id: i64,
    pub nic_identifier: String,
    pub port: i64,
    pub untagged_network: i64,
    pub tagged_networks: Vec<i64>,
    pub is_nic_bonded: bool,
}

/// Network configuration of a template, parsed from the network attribute view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateNetwork {
    pub bonding_technology: String,
    pub propagate_vlan: bool,
    pub ports: Vec<NicPortVlan>,
}

impl TemplateNetwork {
    /// Parse the `Views(4)/AttributeViewDetails` document
    ///
    /// NIC ports live under `NICModel > <nic identifier> > <port (GroupNameId = port number)>`,
    /// possibly nested one level deeper in partitions. The component id is the `CustomId`
    /// of the VLAN attributes.
    pub fn from_view(view: &AttributeDetails) -> Self {
        let mut network = TemplateNetwork {
            propagate_vlan: true,
            ..Default::default()
        };

        for group in &view.attribute_groups {
            match group.display_name.as_str() {
                "NicBondingTechnology" => {
                    if let Some(value) = group
                        .attributes
                        .iter()
                        .find(|a| a.display_name == "Nic Bonding Technology")
                        .and_then(|a| a.value.clone())
                    {
                        network.bonding_technology = value;
                    }
                }
                "PropagateVlan" => {
                    if let Some(value) = group.attributes.first().and_then(|a| a.value.as_deref()) {
                        network.propagate_vlan = value.eq_ignore_ascii_case("true");
                    }
                }
                "NICModel" => {
                    for nic in &group.sub_attribute_groups {
                        for port in &nic.sub_attribute_groups {
                            let mut attributes: Vec<&Attribute> = port.attributes.iter().collect();
                            for partition in &port.sub_attribute_groups {
                                attributes.extend(partition.attributes.iter());
                            }
                            if let Some(vlan) = parse_port(&nic.display_name, port.group_name_id, &attributes) {
                                network.ports.push(vlan);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        network
    }
}

fn parse_port(nic_identifier: &str, port: i64, attributes: &[&Attribute]) -> Option<NicPortVlan> {
    let mut vlan = NicPortVlan {
        nic_identifier: nic_identifier.to_string(),
        port,
        ..Default::default()
    };
    let mut found = false;
    for attribute in attributes {
        let value = attribute.value.clone().unwrap_or_default();
        match attribute.display_name.as_str() {
            "Vlan Tagged" => {
                found = true;
                vlan.component_id = attribute.custom_id;
                vlan.tagged_networks = value
                    .split(',')
                    .filter_map(|v| v.trim().parse::<i64>().ok())
                    .collect();
            }
            "Vlan UnTagged" => {
                found = true;
                vlan.component_id = attribute.custom_id;
                vlan.untagged_network = value.trim().parse::<i64>().unwrap_or_default();
            }
            "NIC Bonding Enabled" => {
                vlan.is_nic_bonded = value.eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }
    found.then_some(vlan)
}

/// VLAN attribute entry of an `UpdateNetworkConfig` request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VlanAttributePayload {
    pub component_id: i64,
    pub untagged: i64,
    pub tagged: Vec<i64>,
    pub is_nic_bonded: bool,
}

/// Request body for `TemplateService.UpdateNetworkConfig`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateNetworkConfigRequest {
    pub template_id: i64,
    pub identity_pool_id: i64,
    pub bonding_technology: String,
    pub propagate_vlan: bool,
    pub vlan_attributes: Vec<VlanAttributePayload>,
}

/// Identity pool (`/api/IdentityPoolService/IdentityPools`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IdentityPool {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// VLAN network definition (`/api/NetworkConfigurationService/Networks`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VlanNetwork {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub vlan_maximum: i64,
    pub vlan_minimum: i64,
    #[serde(rename = "Type")]
    pub network_type: i64,
    #[serde(rename = "InternalRefNWUUId")]
    pub internal_ref_nw_uuid: String,
    pub created_by: String,
    pub creation_time: String,
    pub updated_by: Option<String>,
    pub updated_time: String,
}

/// Request body for `TemplateService.Export`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportTemplateRequest {
    pub template_id: i64,
    pub format: String,
}

/// Response body of `TemplateService.Export`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExportTemplateResponse {
    pub template_id: i64,
    pub content: String,
}

/// Share details used for boot-to-network ISO
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShareDetail {
    pub ip_address: String,
    pub share_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Boot-to-network ISO block of a deploy request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkBootIsoModel {
    pub boot_to_network: bool,
    pub share_type: String,
    pub iso_timeout: i64,
    pub iso_path: String,
    pub share_detail: ShareDetail,
}

/// Power and shutdown options of a deploy request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeployOptions {
    pub shutdown_type: i64,
    pub time_to_wait_before_shutdown: i64,
    pub end_host_power_state: i64,
    pub strict_checking_vlan: bool,
}

/// Per-device attribute overrides of a deploy request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceAttributes {
    pub device_id: i64,
    pub attributes: Vec<AttributeUpdate>,
}

/// Request body for `TemplateService.Deploy`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeployTemplateRequest {
    pub id: i64,
    pub target_ids: Vec<i64>,
    pub schedule: Schedule,
    pub options: DeployOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_boot_iso_model: Option<NetworkBootIsoModel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<DeviceAttributes>,
}

/// Server profile binding a template to a target device (`/api/ProfileService/Profiles`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Profile {
    pub id: i64,
    pub profile_name: String,
    pub template_id: i64,
    pub template_name: String,
    pub target_id: i64,
    pub target_name: String,
    pub profile_state: i64,
}
