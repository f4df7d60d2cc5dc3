//! `ome_configuration_baseline`
//!
//! A configuration baseline binds a compliance template to a set of devices.
//! OME runs a compliance check job whenever the baseline is created or changed;
//! the baseline is read back once that job is over and the devices have been
//! inventoried.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::{job_settings, keep_order, read_or_gone, resolve_template, track_job};
use crate::resolver::{self, Capability, DeviceSelector};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{
    ComplianceStatus, ConfigBaseline, ConfigBaselineRequest, CronSchedule, NOTIFY_ON_NON_COMPLIANCE,
    NOTIFY_ON_SCHEDULE, NotificationSettings, OUTPUT_FORMATS, TargetModel, ViewType,
};
use ome_schema::ConfigurationBaselineState;
use std::time::Duration;
use tracing::{debug, info};

const JOB_DEFAULTS: (i64, i64) = (30, 20);
const DEFAULT_OUTPUT_FORMAT: &str = "html";

/// OME needs a moment before the compliance task of a new baseline can be polled
const SETTLE_DELAY: Duration = Duration::from_secs(5);
const INVENTORY_CHECKS: u32 = 12;
const INVENTORY_INTERVAL: Duration = Duration::from_secs(10);

/// Reconciler for configuration baselines
#[derive(Debug, Default)]
pub struct ConfigurationBaselineResource;

/// Whether the report goes out on the cron schedule
fn on_schedule(state: &ConfigurationBaselineState) -> bool {
    state.schedule_notification.unwrap_or(!state.cron.trim().is_empty())
}

fn notifications_configured(state: &ConfigurationBaselineState) -> bool {
    on_schedule(state) || !state.email_addresses.is_empty() || !state.output_format.is_empty()
}

fn notification_settings(plan: &ConfigurationBaselineState) -> Option<NotificationSettings> {
    if !notifications_configured(plan) {
        return None;
    }
    let scheduled = on_schedule(plan);
    let output_format = if plan.output_format.is_empty() {
        DEFAULT_OUTPUT_FORMAT.to_string()
    } else {
        plan.output_format.clone()
    };
    Some(NotificationSettings {
        notification_type: if scheduled { NOTIFY_ON_SCHEDULE } else { NOTIFY_ON_NON_COMPLIANCE }.to_string(),
        email_addresses: plan.email_addresses.clone(),
        schedule: scheduled.then(|| CronSchedule {
            cron: plan.cron.clone(),
        }),
        output_format,
    })
}

impl ConfigurationBaselineResource {
    async fn targets(
        &self,
        ctx: &Context<'_>,
        plan: &ConfigurationBaselineState,
        summary: &str,
    ) -> Result<Vec<TargetModel>, ProviderError> {
        let selector = DeviceSelector::by_ids_or_tags(&plan.device_ids, &plan.device_servicetags);
        let devices = resolver::resolve_devices(ctx.client, &selector).await.or_fail(summary)?;
        resolver::require_capability(&devices, Capability::Compliance).or_fail(summary)?;
        Ok(devices.iter().map(|d| TargetModel::device(d.id)).collect())
    }

    /// Wait for the compliance check to find the devices inventoried
    async fn await_inventory(
        &self,
        ctx: &Context<'_>,
        mut baseline: ConfigBaseline,
        summary: &str,
    ) -> Result<ConfigBaseline, ProviderError> {
        let mut checks = 1;
        while baseline.config_compliance_summary.compliance_status == ComplianceStatus::NotInventoried {
            if checks >= INVENTORY_CHECKS {
                return Err(ProviderError::failed(
                    summary,
                    format!(
                        "compliance of baseline {} is still {} after {} checks",
                        baseline.name,
                        ComplianceStatus::NotInventoried.as_str(),
                        checks
                    ),
                ));
            }
            debug!("Baseline {} not inventoried yet (check {})", baseline.id, checks);
            ctx.sleep(INVENTORY_INTERVAL).await?;
            baseline = ctx.client.get_config_baseline(baseline.id).await.or_fail(summary)?;
            checks += 1;
        }
        Ok(baseline)
    }

    /// State as OME reports it, laid out like `base`
    async fn observe(
        &self,
        ctx: &Context<'_>,
        baseline: ConfigBaseline,
        base: &ConfigurationBaselineState,
        summary: &str,
    ) -> Result<ConfigurationBaselineState, ProviderError> {
        let target_ids = baseline.target_ids();
        let mut state = ConfigurationBaselineState {
            id: baseline.id,
            baseline_name: baseline.name.clone(),
            task_id: baseline.task_id,
            job_retry_count: base.job_retry_count,
            sleep_interval: base.sleep_interval,
            ..Default::default()
        };
        state.description = match baseline.description {
            Some(d) if d.is_empty() && base.description.is_none() => None,
            other => other,
        };
        if base.ref_template_id != 0 {
            state.ref_template_id = baseline.template_id;
        } else {
            state.ref_template_name = baseline.template_name.clone();
        }

        if !base.device_ids.is_empty() {
            state.device_ids = keep_order(&base.device_ids, &target_ids, |a, b| a == b);
        } else {
            let mut tags = Vec::with_capacity(target_ids.len());
            for id in &target_ids {
                tags.push(ctx.client.get_device(*id).await.or_fail(summary)?.device_service_tag);
            }
            state.device_servicetags = keep_order(&base.device_servicetags, &tags, |a, b| a.eq_ignore_ascii_case(b));
        }

        match baseline.notification_settings {
            Some(settings) => {
                state.schedule_notification = Some(settings.notification_type == NOTIFY_ON_SCHEDULE);
                state.cron = settings.schedule.map(|s| s.cron).unwrap_or_default();
                state.email_addresses = settings.email_addresses;
                state.output_format = settings.output_format.to_ascii_lowercase();
            }
            None => state.schedule_notification = base.schedule_notification.map(|_| false),
        }
        Ok(state)
    }
}

#[async_trait]
impl Resource for ConfigurationBaselineResource {
    type State = ConfigurationBaselineState;
    const TYPE_NAME: &'static str = "ome_configuration_baseline";

    fn validate(&self, plan: &ConfigurationBaselineState) -> Result<(), ProviderError> {
        validators::not_blank("baseline_name", &plan.baseline_name)?;
        validators::exactly_one(&[
            ("ref_template_id", plan.ref_template_id != 0),
            ("ref_template_name", !plan.ref_template_name.is_empty()),
        ])?;
        validators::exactly_one(&[
            ("device_ids", !plan.device_ids.is_empty()),
            ("device_servicetags", !plan.device_servicetags.is_empty()),
        ])?;
        validators::unique("device_ids", &plan.device_ids)?;
        validators::unique("device_servicetags", &plan.device_servicetags)?;

        if !plan.output_format.is_empty() {
            validators::one_of("output_format", &plan.output_format, &OUTPUT_FORMATS)?;
        }
        if plan.schedule_notification == Some(true) && plan.cron.trim().is_empty() {
            return Err(ProviderError::Validation(
                "cron is required when schedule_notification is true".to_string(),
            ));
        }
        if plan.schedule_notification == Some(false) && !plan.cron.trim().is_empty() {
            return Err(ProviderError::Validation(
                "cron is only used when schedule_notification is true".to_string(),
            ));
        }
        if notifications_configured(plan) && plan.email_addresses.is_empty() {
            return Err(ProviderError::Validation(
                "email_addresses is required when notifications are configured".to_string(),
            ));
        }
        validators::unique("email_addresses", &plan.email_addresses)?;
        Ok(())
    }

    fn requires_replace(&self, state: &ConfigurationBaselineState, plan: &ConfigurationBaselineState) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if state.ref_template_id != plan.ref_template_id {
            fields.push("ref_template_id");
        }
        if state.ref_template_name != plan.ref_template_name {
            fields.push("ref_template_name");
        }
        fields
    }

    async fn create(
        &self,
        ctx: &Context<'_>,
        plan: &ConfigurationBaselineState,
    ) -> Result<ConfigurationBaselineState, ProviderError> {
        let summary = "Unable to create Baseline";
        let template = resolve_template(ctx, plan.ref_template_id, &plan.ref_template_name, summary).await?;
        if template.view_type() != Some(ViewType::Compliance) {
            return Err(ProviderError::failed(
                summary,
                format!("template {} is not a compliance template", template.name),
            ));
        }

        let request = ConfigBaselineRequest {
            id: None,
            name: plan.baseline_name.clone(),
            description: plan.description.clone(),
            template_id: template.id,
            baseline_targets: self.targets(ctx, plan, summary).await?,
            notification_settings: notification_settings(plan),
        };
        let baseline = ctx.client.create_config_baseline(&request).await.or_fail(summary)?;
        info!("Created baseline {} (ID: {}) from template {}", baseline.name, baseline.id, template.name);

        ctx.sleep(SETTLE_DELAY).await?;
        let (retries, interval) = job_settings(plan.job_retry_count, plan.sleep_interval, JOB_DEFAULTS);
        track_job(ctx, baseline.task_id, retries, interval, summary).await?;

        let baseline = ctx.client.get_config_baseline(baseline.id).await.or_fail(summary)?;
        let baseline = self.await_inventory(ctx, baseline, summary).await?;
        self.observe(ctx, baseline, plan, summary).await
    }

    async fn read(
        &self,
        ctx: &Context<'_>,
        state: &ConfigurationBaselineState,
    ) -> Result<Option<ConfigurationBaselineState>, ProviderError> {
        let summary = "Error reading";
        let Some(baseline) = read_or_gone(
            ctx,
            ctx.client.get_config_baseline(state.id),
            "Baseline",
            state.id,
            summary,
        )
        .await?
        else {
            return Ok(None);
        };
        let baseline = self.await_inventory(ctx, baseline, summary).await?;
        self.observe(ctx, baseline, state, summary).await.map(Some)
    }

    async fn update(
        &self,
        ctx: &Context<'_>,
        state: &ConfigurationBaselineState,
        plan: &ConfigurationBaselineState,
    ) -> Result<ConfigurationBaselineState, ProviderError> {
        let summary = "Unable to Update Baseline";
        let current = ctx.client.get_config_baseline(state.id).await.or_fail(summary)?;

        let request = ConfigBaselineRequest {
            id: Some(state.id),
            name: plan.baseline_name.clone(),
            description: plan.description.clone(),
            template_id: current.template_id,
            baseline_targets: self.targets(ctx, plan, summary).await?,
            notification_settings: notification_settings(plan),
        };
        let baseline = ctx.client.update_config_baseline(&request).await.or_fail(summary)?;
        info!("Updated baseline {} (ID: {})", baseline.name, baseline.id);

        let (retries, interval) = job_settings(plan.job_retry_count, plan.sleep_interval, JOB_DEFAULTS);
        track_job(ctx, baseline.task_id, retries, interval, summary).await?;

        let baseline = ctx.client.get_config_baseline(state.id).await.or_fail(summary)?;
        let baseline = self.await_inventory(ctx, baseline, summary).await?;
        self.observe(ctx, baseline, plan, summary).await
    }

    async fn delete(&self, ctx: &Context<'_>, state: &ConfigurationBaselineState) -> Result<(), ProviderError> {
        info!("Deleting baseline {} ({})", state.baseline_name, state.id);
        match ctx.client.delete_config_baselines(&[state.id]).await {
            Err(e) if e.is_not_found() => {
                debug!("Baseline {} already gone", state.id);
                Ok(())
            }
            other => other.or_fail("Could not delete Baseline"),
        }
    }

    async fn import(&self, ctx: &Context<'_>, id: &str) -> Result<ConfigurationBaselineState, ProviderError> {
        let summary = "Error importing baseline";
        let baseline = match id.parse::<i64>() {
            Ok(numeric) => ctx.client.get_config_baseline(numeric).await.or_fail(summary)?,
            Err(_) => ctx
                .client
                .get_config_baseline_by_name(id)
                .await
                .or_fail(summary)?
                .ok_or_else(|| ProviderError::failed(summary, format!("baseline {} not found", id)))?,
        };
        let baseline = self.await_inventory(ctx, baseline, summary).await?;
        self.observe(ctx, baseline, &ConfigurationBaselineState::default(), summary)
            .await
    }
}
