//! DeviceService operations

use super::job_id_from;
use crate::client::OmeClient;
use crate::common::odata::{eq_filter, filter_query};
use crate::error::OmeError;
use crate::models::*;
use tracing::debug;

const DEVICES_PATH: &str = "/api/DeviceService/Devices";

impl OmeClient {
    /// List devices, optionally narrowed by an OData filter expression
    ///
    /// # Arguments
    /// * `filter` - Raw `$filter` expression, e.g. `Type eq 1000`
    pub async fn list_devices(&self, filter: Option<&str>) -> Result<Vec<Device>, OmeError> {
        let path = match filter {
            Some(expression) => format!("{}{}", DEVICES_PATH, filter_query(expression)),
            None => DEVICES_PATH.to_string(),
        };
        self.http.get_collection(&path).await
    }

    /// Get a device by ID
    ///
    /// # Returns
    /// * `Ok(Device)` - The device
    /// * `Err(OmeError::NotFound)` - If no device has this ID
    pub async fn get_device(&self, id: i64) -> Result<Device, OmeError> {
        self.http.get(&format!("{}({})", DEVICES_PATH, id)).await
    }

    /// Look a device up by service tag
    pub async fn get_device_by_service_tag(&self, service_tag: &str) -> Result<Option<Device>, OmeError> {
        let path = format!("{}{}", DEVICES_PATH, eq_filter("DeviceServiceTag", service_tag));
        let devices: Vec<Device> = self.http.get_collection(&path).await?;
        Ok(devices
            .into_iter()
            .find(|d| d.device_service_tag.eq_ignore_ascii_case(service_tag)))
    }

    /// Inventory subtrees (CPUs, NICs, disks, ...) of a device
    pub async fn get_device_inventory(&self, id: i64) -> Result<Vec<InventoryDetail>, OmeError> {
        self.http
            .get_collection(&format!("{}({})/InventoryDetails", DEVICES_PATH, id))
            .await
    }

    /// Start an inventory refresh of devices
    ///
    /// The returned job is not awaited by callers; only its id is recorded.
    pub async fn refresh_device_inventory(&self, device_ids: &[i64]) -> Result<i64, OmeError> {
        debug!("Refreshing inventory of devices {:?}", device_ids);
        let request = DeviceIdsRequest {
            device_ids: device_ids.to_vec(),
        };
        let response: serde_json::Value = self
            .http
            .post("/api/DeviceService/Actions/DeviceService.RefreshDeviceInventory", &request)
            .await?;
        job_id_from(&response).ok_or_else(|| OmeError::Api {
            status: 200,
            message: format!("inventory refresh response did not contain a job id: {}", response),
        })
    }

    /// Remove devices from OME management
    pub async fn remove_devices(&self, device_ids: &[i64]) -> Result<(), OmeError> {
        debug!("Removing devices {:?}", device_ids);
        let request = DeviceIdsRequest {
            device_ids: device_ids.to_vec(),
        };
        self.http
            .post_no_content("/api/DeviceService/Actions/DeviceService.RemoveDevices", &request)
            .await
    }
}
