//! `ome_firmware_baseline`
//!
//! A firmware baseline compares the devices it targets against a catalog.
//! Targets are given as device names, service tags and group names; their union
//! must resolve to at least one firmware-update-capable device.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::{read_or_gone, track_job};
use crate::resolver::{self, Capability};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{Catalog, FirmwareBaseline, FirmwareBaselineRequest, TargetModel};
use ome_schema::FirmwareBaselineState;
use tracing::{debug, info};

const JOB_RETRIES: u32 = 5;
const JOB_INTERVAL_SECS: i64 = 30;

/// Reconciler for firmware baselines
#[derive(Debug, Default)]
pub struct FirmwareBaselineResource;

/// `observed` unless the user left the flag unset and OME reports the default
fn flag(planned: Option<bool>, observed: bool) -> Option<bool> {
    match planned {
        None if observed => None,
        _ => Some(observed),
    }
}

impl FirmwareBaselineResource {
    async fn catalog(&self, ctx: &Context<'_>, name: &str, summary: &str) -> Result<Catalog, ProviderError> {
        ctx.client
            .list_catalogs()
            .await
            .or_fail(summary)?
            .into_iter()
            .find(|c| c.repository.name == name)
            .ok_or_else(|| ProviderError::failed(summary, format!("catalog {} not found", name)))
    }

    async fn targets(
        &self,
        ctx: &Context<'_>,
        plan: &FirmwareBaselineState,
        summary: &str,
    ) -> Result<Vec<TargetModel>, ProviderError> {
        let devices = resolver::resolve_firmware_targets(
            ctx.client,
            &plan.device_names,
            &plan.device_service_tags,
            &plan.group_names,
        )
        .await
        .or_fail(summary)?;
        if devices.is_empty() {
            return Err(ProviderError::failed(
                summary,
                "the baseline targets resolve to no devices",
            ));
        }
        resolver::require_capability(&devices, Capability::FirmwareUpdate).or_fail(summary)?;
        debug!("Firmware baseline {} targets {} devices", plan.name, devices.len());
        Ok(devices.iter().map(|d| TargetModel::device(d.id)).collect())
    }

    async fn request(
        &self,
        ctx: &Context<'_>,
        id: Option<i64>,
        plan: &FirmwareBaselineState,
        summary: &str,
    ) -> Result<FirmwareBaselineRequest, ProviderError> {
        let catalog = self.catalog(ctx, &plan.catalog_name, summary).await?;
        let targets = self.targets(ctx, plan, summary).await?;
        Ok(FirmwareBaselineRequest {
            id,
            name: plan.name.clone(),
            description: plan.description.clone(),
            catalog_id: catalog.id,
            repository_id: catalog.repository.id.unwrap_or_default(),
            downgrade_enabled: plan.downgrade_enabled.unwrap_or(true),
            is_64_bit: plan.is_64_bit.unwrap_or(true),
            filter_no_reboot_required: plan.filter_no_reboot_required,
            targets,
        })
    }

    /// State as OME reports it; the target inputs come from `base`
    fn observe(&self, baseline: &FirmwareBaseline, base: &FirmwareBaselineState) -> FirmwareBaselineState {
        let mut target_ids: Vec<i64> = baseline.targets.iter().map(|t| t.id).collect();
        target_ids.sort_unstable();
        FirmwareBaselineState {
            id: baseline.id,
            name: baseline.name.clone(),
            description: baseline.description.clone().unwrap_or_default(),
            catalog_name: baseline.repository_name.clone(),
            device_names: base.device_names.clone(),
            device_service_tags: base.device_service_tags.clone(),
            group_names: base.group_names.clone(),
            is_64_bit: flag(base.is_64_bit, baseline.is_64_bit),
            filter_no_reboot_required: baseline.filter_no_reboot_required,
            downgrade_enabled: flag(base.downgrade_enabled, baseline.downgrade_enabled),
            target_ids,
            catalog_id: baseline.catalog_id,
            repository_id: baseline.repository_id,
            task_id: baseline.task_id,
            compliance_status: baseline.compliance_summary.compliance_status.clone(),
        }
    }
}

#[async_trait]
impl Resource for FirmwareBaselineResource {
    type State = FirmwareBaselineState;
    const TYPE_NAME: &'static str = "ome_firmware_baseline";

    fn validate(&self, plan: &FirmwareBaselineState) -> Result<(), ProviderError> {
        validators::not_blank("name", &plan.name)?;
        validators::not_blank("catalog_name", &plan.catalog_name)?;
        if plan.device_names.is_empty() && plan.device_service_tags.is_empty() && plan.group_names.is_empty() {
            return Err(ProviderError::Validation(
                "at least one of device_names, device_service_tags, group_names must be specified".to_string(),
            ));
        }
        validators::unique("device_names", &plan.device_names)?;
        validators::unique("device_service_tags", &plan.device_service_tags)?;
        validators::unique("group_names", &plan.group_names)?;
        Ok(())
    }

    async fn create(&self, ctx: &Context<'_>, plan: &FirmwareBaselineState) -> Result<FirmwareBaselineState, ProviderError> {
        let summary = "Unable to create Firmware Baseline";
        let request = self.request(ctx, None, plan, summary).await?;
        let job_id = ctx.client.create_firmware_baseline(&request).await.or_fail(summary)?;
        info!("Created firmware baseline {}, job {}", plan.name, job_id);
        track_job(ctx, job_id, JOB_RETRIES, JOB_INTERVAL_SECS, summary).await?;
        let baseline = ctx
            .client
            .get_firmware_baseline_by_name(&plan.name)
            .await
            .or_fail(summary)?
            .ok_or_else(|| ProviderError::failed(summary, format!("baseline {} not found after creation", plan.name)))?;
        Ok(self.observe(&baseline, plan))
    }

    async fn read(&self, ctx: &Context<'_>, state: &FirmwareBaselineState) -> Result<Option<FirmwareBaselineState>, ProviderError> {
        let found = read_or_gone(
            ctx,
            ctx.client.get_firmware_baseline(state.id),
            "Firmware baseline",
            state.id,
            "Error reading",
        )
        .await?;
        Ok(found.map(|baseline| self.observe(&baseline, state)))
    }

    async fn update(
        &self,
        ctx: &Context<'_>,
        state: &FirmwareBaselineState,
        plan: &FirmwareBaselineState,
    ) -> Result<FirmwareBaselineState, ProviderError> {
        let summary = "Unable to update Firmware Baseline";
        let request = self.request(ctx, Some(state.id), plan, summary).await?;
        let job_id = ctx.client.update_firmware_baseline(&request).await.or_fail(summary)?;
        info!("Updated firmware baseline {} (ID: {}), job {}", plan.name, state.id, job_id);
        track_job(ctx, job_id, JOB_RETRIES, JOB_INTERVAL_SECS, summary).await?;
        let baseline = ctx.client.get_firmware_baseline(state.id).await.or_fail(summary)?;
        Ok(self.observe(&baseline, plan))
    }

    async fn delete(&self, ctx: &Context<'_>, state: &FirmwareBaselineState) -> Result<(), ProviderError> {
        info!("Deleting firmware baseline {} ({})", state.name, state.id);
        match ctx.client.delete_firmware_baselines(&[state.id]).await {
            Err(e) if e.is_not_found() => {
                debug!("Firmware baseline {} already gone", state.id);
                Ok(())
            }
            other => other.or_fail("Unable to delete Firmware Baseline"),
        }
    }

    async fn import(&self, ctx: &Context<'_>, id: &str) -> Result<FirmwareBaselineState, ProviderError> {
        let summary = "Error importing firmware baseline";
        let baseline = match id.parse::<i64>() {
            Ok(numeric) => ctx.client.get_firmware_baseline(numeric).await.or_fail(summary)?,
            Err(_) => ctx
                .client
                .get_firmware_baseline_by_name(id)
                .await
                .or_fail(summary)?
                .ok_or_else(|| ProviderError::failed(summary, format!("firmware baseline {} not found", id)))?,
        };
        let mut tags = Vec::with_capacity(baseline.targets.len());
        for target in &baseline.targets {
            tags.push(ctx.client.get_device(target.id).await.or_fail(summary)?.device_service_tag);
        }
        let base = FirmwareBaselineState {
            device_service_tags: tags,
            ..Default::default()
        };
        Ok(self.observe(&baseline, &base))
    }
}
