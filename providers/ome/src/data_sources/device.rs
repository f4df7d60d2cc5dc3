//! `ome_device` and `ome_groupdevices_info`

use crate::error::{ProviderError, ResultExt};
use crate::resolver::{self, DeviceSelector};
use crate::resource::{Context, DataSource};
use crate::validators;
use async_trait::async_trait;
use ome_schema::{DeviceDataSourceState, GroupDevicesInfoState, InventoryState};
use std::collections::BTreeMap;
use tracing::debug;

/// Devices selected by ID, service tag, IP expression, filter or group, with
/// optional inventory subtrees
#[derive(Debug, Default)]
pub struct DeviceDataSource;

fn selector(config: &DeviceDataSourceState) -> DeviceSelector {
    DeviceSelector {
        device_ids: config.device_ids.clone(),
        service_tags: config.device_service_tags.clone(),
        ip_expressions: config.ip_expressions.clone(),
        filter_expression: Some(config.filter_expression.clone()).filter(|f| !f.trim().is_empty()),
        group_names: config.device_group_names.clone(),
    }
}

#[async_trait]
impl DataSource for DeviceDataSource {
    type State = DeviceDataSourceState;
    const TYPE_NAME: &'static str = "ome_device";

    fn validate(&self, config: &DeviceDataSourceState) -> Result<(), ProviderError> {
        selector(config).validate()?;
        validators::unique("inventory_types", &config.inventory_types)
    }

    async fn read(&self, ctx: &Context<'_>, config: &DeviceDataSourceState) -> Result<DeviceDataSourceState, ProviderError> {
        let summary = "Error fetching devices";
        let devices = resolver::resolve_devices(ctx.client, &selector(config)).await.or_fail(summary)?;

        let mut infos = Vec::with_capacity(devices.len());
        for device in &devices {
            let mut info = resolver::device_info(device);
            if !config.inventory_types.is_empty() {
                let inventory = ctx.client.get_device_inventory(device.id).await.or_fail(summary)?;
                info.inventory = inventory
                    .into_iter()
                    .filter(|detail| config.inventory_types.contains(&detail.inventory_type))
                    .map(|detail| InventoryState {
                        inventory_type: detail.inventory_type,
                        inventory_info: detail.inventory_info.iter().map(|v| v.to_string()).collect(),
                    })
                    .collect();
            }
            infos.push(info);
        }
        debug!("Data source {} found {} devices", Self::TYPE_NAME, infos.len());

        Ok(DeviceDataSourceState {
            id: Self::TYPE_NAME.to_string(),
            devices: infos,
            ..config.clone()
        })
    }
}

/// IDs and service tags of the members of the named groups
#[derive(Debug, Default)]
pub struct GroupDevicesInfoDataSource;

#[async_trait]
impl DataSource for GroupDevicesInfoDataSource {
    type State = GroupDevicesInfoState;
    const TYPE_NAME: &'static str = "ome_groupdevices_info";

    fn validate(&self, config: &GroupDevicesInfoState) -> Result<(), ProviderError> {
        validators::size_between("device_group_names", &config.device_group_names, 1, usize::MAX)?;
        validators::unique("device_group_names", &config.device_group_names)
    }

    async fn read(&self, ctx: &Context<'_>, config: &GroupDevicesInfoState) -> Result<GroupDevicesInfoState, ProviderError> {
        let summary = "Error fetching devices";
        let mut members = BTreeMap::new();
        for name in &config.device_group_names {
            let group = ctx
                .client
                .get_group_by_name(name)
                .await
                .or_fail(summary)?
                .ok_or_else(|| ProviderError::failed(summary, format!("group {} not found", name)))?;
            for device in ctx.client.get_group_devices(group.id).await.or_fail(summary)? {
                members.insert(device.id, device.device_service_tag);
            }
        }
        Ok(GroupDevicesInfoState {
            id: config.device_group_names.join(","),
            device_group_names: config.device_group_names.clone(),
            device_ids: members.keys().copied().collect(),
            device_servicetags: members.into_values().collect(),
        })
    }
}
