//! Device operations for MockOmeClient
//!
//! OData filter expressions are not evaluated; tests register the ids a given
//! expression matches with `set_filter_result`. Unregistered expressions match nothing.

use super::{MockOmeClient, not_found};
use crate::error::OmeError;
use crate::models::*;

impl MockOmeClient {
    /// Add a device to the mock store (for test setup)
    pub fn add_device(&self, device: Device) {
        self.devices.lock().unwrap().insert(device.id, device);
    }

    /// Ids returned by `list_devices(Some(expression))`
    pub fn set_filter_result(&self, expression: &str, device_ids: Vec<i64>) {
        self.filter_results
            .lock()
            .unwrap()
            .insert(expression.to_string(), device_ids);
    }

    /// Inventory returned for a device
    pub fn set_inventory(&self, device_id: i64, inventory: Vec<InventoryDetail>) {
        self.inventories.lock().unwrap().insert(device_id, inventory);
    }

    /// True while the device is still managed
    pub fn has_device(&self, device_id: i64) -> bool {
        self.devices.lock().unwrap().contains_key(&device_id)
    }
}

pub async fn list_devices(client: &MockOmeClient, filter: Option<&str>) -> Result<Vec<Device>, OmeError> {
    client.enter("list_devices")?;
    let devices = client.devices.lock().unwrap();
    let mut result: Vec<Device> = match filter {
        None => devices.values().cloned().collect(),
        Some(expression) => client
            .filter_results
            .lock()
            .unwrap()
            .get(expression)
            .map(|ids| ids.iter().filter_map(|id| devices.get(id).cloned()).collect())
            .unwrap_or_default(),
    };
    result.sort_by_key(|d| d.id);
    Ok(result)
}

pub async fn get_device(client: &MockOmeClient, id: i64) -> Result<Device, OmeError> {
    client.enter("get_device")?;
    client
        .devices
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found("Device", id))
}

pub async fn get_device_by_service_tag(client: &MockOmeClient, service_tag: &str) -> Result<Option<Device>, OmeError> {
    client.enter("get_device_by_service_tag")?;
    Ok(client
        .devices
        .lock()
        .unwrap()
        .values()
        .find(|d| d.device_service_tag.eq_ignore_ascii_case(service_tag))
        .cloned())
}

pub async fn get_device_inventory(client: &MockOmeClient, id: i64) -> Result<Vec<InventoryDetail>, OmeError> {
    client.enter("get_device_inventory")?;
    if !client.devices.lock().unwrap().contains_key(&id) {
        return Err(not_found("Device", id));
    }
    Ok(client
        .inventories
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .unwrap_or_default())
}

pub async fn refresh_device_inventory(client: &MockOmeClient, device_ids: &[i64]) -> Result<i64, OmeError> {
    client.enter("refresh_device_inventory")?;
    {
        let devices = client.devices.lock().unwrap();
        if let Some(missing) = device_ids.iter().find(|id| !devices.contains_key(*id)) {
            return Err(not_found("Device", missing));
        }
    }
    Ok(client.start_job())
}

pub async fn remove_devices(client: &MockOmeClient, device_ids: &[i64]) -> Result<(), OmeError> {
    client.enter("remove_devices")?;
    let mut devices = client.devices.lock().unwrap();
    for id in device_ids {
        devices.remove(id);
    }
    let mut members = client.group_members.lock().unwrap();
    for set in members.values_mut() {
        for id in device_ids {
            set.remove(id);
        }
    }
    Ok(())
}
