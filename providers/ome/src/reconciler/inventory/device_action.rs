//! `ome_device_action`
//!
//! Starts a one-off action on devices. The job is not tracked; its ID and last
//! seen status are kept in state. Any change replaces the resource.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::read_or_gone;
use crate::resolver::{self, DeviceSelector};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_schema::DeviceActionState;
use tracing::{debug, info};

const INVENTORY_REFRESH: &str = "inventory_refresh";

/// Reconciler for device actions
#[derive(Debug, Default)]
pub struct DeviceActionResource;

#[async_trait]
impl Resource for DeviceActionResource {
    type State = DeviceActionState;
    const TYPE_NAME: &'static str = "ome_device_action";

    fn validate(&self, plan: &DeviceActionState) -> Result<(), ProviderError> {
        validators::one_of("action", &plan.action, &[INVENTORY_REFRESH])?;
        validators::exactly_one(&[
            ("device_ids", !plan.device_ids.is_empty()),
            ("device_service_tags", !plan.device_service_tags.is_empty()),
        ])?;
        validators::unique("device_ids", &plan.device_ids)?;
        validators::unique("device_service_tags", &plan.device_service_tags)
    }

    fn requires_replace(&self, state: &DeviceActionState, plan: &DeviceActionState) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if state.device_ids != plan.device_ids {
            fields.push("device_ids");
        }
        if state.device_service_tags != plan.device_service_tags {
            fields.push("device_service_tags");
        }
        if state.action != plan.action {
            fields.push("action");
        }
        fields
    }

    async fn create(&self, ctx: &Context<'_>, plan: &DeviceActionState) -> Result<DeviceActionState, ProviderError> {
        let selector = DeviceSelector::by_ids_or_tags(&plan.device_ids, &plan.device_service_tags);
        let devices = resolver::resolve_devices(ctx.client, &selector)
            .await
            .or_fail("Error performing device action")?;
        let ids: Vec<i64> = devices.iter().map(|d| d.id).collect();

        let job_id = ctx
            .client
            .refresh_device_inventory(&ids)
            .await
            .or_fail("Error creating job.")?;
        info!("Started inventory refresh job {} for {} devices", job_id, ids.len());
        let job = ctx.client.get_job(job_id).await.or_fail("Error creating job.")?;

        Ok(DeviceActionState {
            id: job_id,
            current_status: job.status().to_string(),
            ..plan.clone()
        })
    }

    async fn read(&self, ctx: &Context<'_>, state: &DeviceActionState) -> Result<Option<DeviceActionState>, ProviderError> {
        let Some(job) = read_or_gone(ctx, ctx.client.get_job(state.id), "Job", state.id, "Error reading").await? else {
            return Ok(None);
        };
        Ok(Some(DeviceActionState {
            current_status: job.status().to_string(),
            ..state.clone()
        }))
    }

    async fn update(
        &self,
        _ctx: &Context<'_>,
        state: &DeviceActionState,
        plan: &DeviceActionState,
    ) -> Result<DeviceActionState, ProviderError> {
        Ok(DeviceActionState {
            id: state.id,
            current_status: state.current_status.clone(),
            ..plan.clone()
        })
    }

    async fn delete(&self, ctx: &Context<'_>, state: &DeviceActionState) -> Result<(), ProviderError> {
        match ctx.client.delete_job(state.id).await {
            Err(e) if e.is_not_found() => {
                debug!("Job {} already gone", state.id);
                Ok(())
            }
            other => other.or_fail("Error performing device action"),
        }
    }
}
