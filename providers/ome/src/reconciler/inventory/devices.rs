//! `ome_devices`
//!
//! Takes devices OME already manages under the provider's control. Dropping a
//! device from the resource, or deleting the resource, removes it from OME.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::keep_order;
use crate::resolver::{self, DeviceSelector};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::Device;
use ome_schema::DevicesState;
use tracing::info;

const STATE_ID: &str = "devices";

/// Reconciler for managed devices
#[derive(Debug, Default)]
pub struct DevicesResource;

impl DevicesResource {
    async fn resolve(&self, ctx: &Context<'_>, plan: &DevicesState) -> Result<Vec<Device>, ProviderError> {
        let selector = DeviceSelector::by_ids_or_tags(&plan.device_ids, &plan.device_service_tags);
        resolver::resolve_devices(ctx.client, &selector)
            .await
            .or_fail("Error fetching devices")
    }

    fn state_of(&self, plan: &DevicesState, devices: &[Device]) -> DevicesState {
        let mut state = DevicesState {
            id: STATE_ID.to_string(),
            devices: devices.iter().map(resolver::device_info).collect(),
            ..Default::default()
        };
        if !plan.device_ids.is_empty() {
            let ids: Vec<i64> = devices.iter().map(|d| d.id).collect();
            state.device_ids = keep_order(&plan.device_ids, &ids, |a, b| a == b);
        } else if !plan.device_service_tags.is_empty() {
            let tags: Vec<String> = devices.iter().map(|d| d.device_service_tag.clone()).collect();
            state.device_service_tags = keep_order(&plan.device_service_tags, &tags, |a, b| a.eq_ignore_ascii_case(b));
        }
        state
    }
}

#[async_trait]
impl Resource for DevicesResource {
    type State = DevicesState;
    const TYPE_NAME: &'static str = "ome_devices";

    fn validate(&self, plan: &DevicesState) -> Result<(), ProviderError> {
        validators::exactly_one(&[
            ("device_ids", !plan.device_ids.is_empty()),
            ("device_service_tags", !plan.device_service_tags.is_empty()),
        ])?;
        validators::unique("device_ids", &plan.device_ids)?;
        validators::unique("device_service_tags", &plan.device_service_tags)
    }

    async fn create(&self, ctx: &Context<'_>, plan: &DevicesState) -> Result<DevicesState, ProviderError> {
        let devices = self.resolve(ctx, plan).await?;
        info!("Managing {} devices", devices.len());
        Ok(self.state_of(plan, &devices))
    }

    async fn read(&self, ctx: &Context<'_>, state: &DevicesState) -> Result<Option<DevicesState>, ProviderError> {
        let mut present = Vec::with_capacity(state.devices.len());
        for known in &state.devices {
            match ctx.client.get_device(known.id).await {
                Ok(device) => present.push(device),
                Err(e) if e.is_not_found() => {
                    ctx.warn(
                        "Device not found",
                        format!(
                            "device {} ({}) was removed outside the provider",
                            known.device_service_tag, known.id
                        ),
                    );
                }
                Err(e) => return Err(e).or_fail("Error fetching devices"),
            }
        }
        if present.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.state_of(state, &present)))
    }

    async fn update(&self, ctx: &Context<'_>, state: &DevicesState, plan: &DevicesState) -> Result<DevicesState, ProviderError> {
        let desired = self.resolve(ctx, plan).await?;
        let dropped: Vec<i64> = state
            .devices
            .iter()
            .map(|d| d.id)
            .filter(|id| !desired.iter().any(|d| d.id == *id))
            .collect();
        if !dropped.is_empty() {
            info!("Removing {} devices from OME", dropped.len());
            ctx.client
                .remove_devices(&dropped)
                .await
                .or_fail("Error deleting devices")?;
        }
        Ok(self.state_of(plan, &desired))
    }

    async fn delete(&self, ctx: &Context<'_>, state: &DevicesState) -> Result<(), ProviderError> {
        let ids: Vec<i64> = state.devices.iter().map(|d| d.id).collect();
        if ids.is_empty() {
            return Ok(());
        }
        info!("Removing {} devices from OME", ids.len());
        ctx.client.remove_devices(&ids).await.or_fail("Error deleting devices")
    }
}
