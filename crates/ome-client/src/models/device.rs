//! Device models (DeviceService)

use serde::{Deserialize, Serialize};

/// Capability id: device firmware can be updated through OME
pub const CAPABILITY_FIRMWARE_UPDATE: i64 = 1009;
/// Capability id: device accepts template deployment
pub const CAPABILITY_DEPLOYMENT: i64 = 1041;

/// Management endpoint of a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceManagement {
    pub management_id: i64,
    pub network_address: String,
    pub mac_address: String,
    pub management_type: i64,
    pub instrumentation_name: String,
    pub dns_name: String,
}

/// Device model (`/api/DeviceService/Devices({id})`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Device {
    pub id: i64,
    #[serde(rename = "Type")]
    pub device_type: i64,
    pub identifier: String,
    pub device_service_tag: String,
    pub chassis_service_tag: Option<String>,
    pub model: String,
    pub power_state: i64,
    pub managed_state: i64,
    pub status: i64,
    pub connection_state: bool,
    pub asset_tag: Option<String>,
    pub system_id: i64,
    pub device_name: String,
    pub last_inventory_time: Option<String>,
    pub last_status_time: Option<String>,
    pub device_subscription: Option<String>,
    pub device_capabilities: Vec<i64>,
    pub device_management: Vec<DeviceManagement>,
    pub enabled: bool,
}

impl Device {
    /// True if OME can update this device's firmware
    pub fn is_firmware_update_capable(&self) -> bool {
        self.device_capabilities.contains(&CAPABILITY_FIRMWARE_UPDATE)
    }

    /// True if a template can be deployed to this device
    pub fn is_deployment_capable(&self) -> bool {
        self.device_capabilities.contains(&CAPABILITY_DEPLOYMENT)
    }

    /// Management IP addresses of the device
    pub fn management_ips(&self) -> Vec<&str> {
        self.device_management
            .iter()
            .map(|m| m.network_address.as_str())
            .filter(|a| !a.is_empty())
            .collect()
    }
}

/// One inventory subtree (`/InventoryDetails`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InventoryDetail {
    pub inventory_type: String,
    pub inventory_info: Vec<serde_json::Value>,
}

/// Request body carrying a list of device ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceIdsRequest {
    pub device_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        let device = Device {
            id: 1,
            device_capabilities: vec![1009, 33],
            ..Default::default()
        };
        assert!(device.is_firmware_update_capable());
        assert!(!device.is_deployment_capable());
    }

    #[test]
    fn test_management_ips_skip_blank() {
        let device: Device = serde_json::from_value(serde_json::json!({
            "Id": 25014,
            "DeviceServiceTag": "SVCTAG1",
            "DeviceManagement": [
                {"ManagementId": 1, "NetworkAddress": "10.0.0.5"},
                {"ManagementId": 2, "NetworkAddress": ""}
            ]
        }))
        .unwrap();
        assert_eq!(device.management_ips(), vec!["10.0.0.5"]);
    }
}
