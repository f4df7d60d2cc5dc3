//! `ome_configuration_compliance`
//!
//! Brings devices of a configuration baseline back to compliance. Only targets
//! the baseline report lists as non-compliant are sent to OME; the remediation
//! job is tracked unless it is scheduled for later. Reading reports the current
//! compliance of each target, so a device that drifts again shows up as a change.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::{job_settings, track_job};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{ComplianceStatus, ConfigBaseline, DeviceComplianceReport, OmeError, RemediationRequest, Schedule};
use ome_schema::{ConfigurationComplianceState, RemediationTargetState};
use tracing::{debug, info};

const JOB_DEFAULTS: (i64, i64) = (30, 20);

/// Reconciler for baseline remediation
#[derive(Debug, Default)]
pub struct ConfigurationComplianceResource;

impl ConfigurationComplianceResource {
    async fn find_baseline(
        &self,
        ctx: &Context<'_>,
        state: &ConfigurationComplianceState,
    ) -> Result<Option<ConfigBaseline>, OmeError> {
        if state.baseline_id != 0 {
            return match ctx.client.get_config_baseline(state.baseline_id).await {
                Ok(baseline) => Ok(Some(baseline)),
                Err(e) if e.is_not_found() => Ok(None),
                Err(e) => Err(e),
            };
        }
        ctx.client.get_config_baseline_by_name(&state.baseline_name).await
    }

    /// Report rows of the requested targets, in target order
    async fn target_reports(
        &self,
        ctx: &Context<'_>,
        baseline: &ConfigBaseline,
        targets: &[RemediationTargetState],
        summary: &str,
    ) -> Result<Vec<DeviceComplianceReport>, ProviderError> {
        let reports = ctx
            .client
            .get_config_compliance_reports(baseline.id)
            .await
            .or_fail(summary)?;
        targets
            .iter()
            .map(|target| {
                reports
                    .iter()
                    .find(|r| r.service_tag.eq_ignore_ascii_case(&target.device_service_tag))
                    .cloned()
                    .ok_or_else(|| {
                        ProviderError::failed(
                            summary,
                            format!(
                                "device {} is not part of baseline {}",
                                target.device_service_tag, baseline.name
                            ),
                        )
                    })
            })
            .collect()
    }

    async fn remediate(
        &self,
        ctx: &Context<'_>,
        plan: &ConfigurationComplianceState,
        summary: &str,
    ) -> Result<ConfigurationComplianceState, ProviderError> {
        let baseline = self.find_baseline(ctx, plan).await.or_fail(summary)?.ok_or_else(|| {
            let label = if plan.baseline_id != 0 {
                plan.baseline_id.to_string()
            } else {
                plan.baseline_name.clone()
            };
            ProviderError::failed(summary, format!("baseline {} not found", label))
        })?;

        let reports = self.target_reports(ctx, &baseline, &plan.target_devices, summary).await?;
        let device_ids: Vec<i64> = reports
            .iter()
            .filter(|r| r.compliance_status != ComplianceStatus::Compliant)
            .map(|r| r.id)
            .collect();

        let mut job_id = 0;
        if device_ids.is_empty() {
            info!("All targets of baseline {} are compliant, nothing to remediate", baseline.name);
        } else {
            let request = RemediationRequest {
                id: baseline.id,
                device_ids,
                schedule: Schedule::new(plan.run_later, Some(plan.cron.clone()).filter(|c| !c.is_empty())),
            };
            info!(
                "Remediating {} devices of baseline {}",
                request.device_ids.len(),
                baseline.name
            );
            job_id = ctx.client.remediate_baseline(&request).await.or_fail(summary)?;
            if plan.run_later {
                info!("Remediation job {} scheduled with cron {}", job_id, plan.cron);
            } else if job_id == 0 {
                debug!("OME started no remediation job for baseline {}", baseline.name);
            } else {
                let (retries, interval) = job_settings(plan.job_retry_count, plan.sleep_interval, JOB_DEFAULTS);
                track_job(ctx, job_id, retries, interval, summary).await?;
            }
        }

        let mut state = ConfigurationComplianceState {
            id: job_id,
            ..plan.clone()
        };
        if plan.baseline_id != 0 {
            state.baseline_name = String::new();
        } else {
            state.baseline_id = 0;
        }
        for target in state.target_devices.iter_mut() {
            if target.compliance_status.is_empty() {
                target.compliance_status = ComplianceStatus::Compliant.as_str().to_string();
            }
        }
        Ok(state)
    }
}

#[async_trait]
impl Resource for ConfigurationComplianceResource {
    type State = ConfigurationComplianceState;
    const TYPE_NAME: &'static str = "ome_configuration_compliance";

    fn validate(&self, plan: &ConfigurationComplianceState) -> Result<(), ProviderError> {
        validators::exactly_one(&[
            ("baseline_id", plan.baseline_id != 0),
            ("baseline_name", !plan.baseline_name.is_empty()),
        ])?;
        validators::size_between("target_devices", &plan.target_devices, 1, usize::MAX)?;
        let mut tags = Vec::with_capacity(plan.target_devices.len());
        for target in &plan.target_devices {
            validators::not_blank("target_devices.device_service_tag", &target.device_service_tag)?;
            if !target.compliance_status.is_empty() {
                validators::one_of(
                    "target_devices.compliance_status",
                    &target.compliance_status,
                    &[ComplianceStatus::Compliant.as_str()],
                )?;
            }
            tags.push(target.device_service_tag.to_ascii_uppercase());
        }
        validators::unique("target_devices.device_service_tag", &tags)?;
        if plan.run_later && plan.cron.trim().is_empty() {
            return Err(ProviderError::Validation(
                "cron is required when run_later is set".to_string(),
            ));
        }
        Ok(())
    }

    fn requires_replace(
        &self,
        state: &ConfigurationComplianceState,
        plan: &ConfigurationComplianceState,
    ) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if state.baseline_id != plan.baseline_id {
            fields.push("baseline_id");
        }
        if state.baseline_name != plan.baseline_name {
            fields.push("baseline_name");
        }
        fields
    }

    async fn create(
        &self,
        ctx: &Context<'_>,
        plan: &ConfigurationComplianceState,
    ) -> Result<ConfigurationComplianceState, ProviderError> {
        self.remediate(ctx, plan, "Error creating baseline remediation").await
    }

    async fn read(
        &self,
        ctx: &Context<'_>,
        state: &ConfigurationComplianceState,
    ) -> Result<Option<ConfigurationComplianceState>, ProviderError> {
        let summary = "Error reading";
        let Some(baseline) = self.find_baseline(ctx, state).await.or_fail(summary)? else {
            ctx.warn(
                "Baseline not found",
                "the baseline of this remediation was deleted outside the provider and is removed from state",
            );
            return Ok(None);
        };

        let reports = ctx
            .client
            .get_config_compliance_reports(baseline.id)
            .await
            .or_fail(summary)?;
        let mut observed = state.clone();
        observed.target_devices = state
            .target_devices
            .iter()
            .filter_map(|target| {
                reports
                    .iter()
                    .find(|r| r.service_tag.eq_ignore_ascii_case(&target.device_service_tag))
                    .map(|r| RemediationTargetState {
                        device_service_tag: target.device_service_tag.clone(),
                        compliance_status: r.compliance_status.as_str().to_string(),
                    })
            })
            .collect();
        Ok(Some(observed))
    }

    async fn update(
        &self,
        ctx: &Context<'_>,
        _state: &ConfigurationComplianceState,
        plan: &ConfigurationComplianceState,
    ) -> Result<ConfigurationComplianceState, ProviderError> {
        self.remediate(ctx, plan, "Error updating baseline remediation").await
    }

    async fn delete(&self, _ctx: &Context<'_>, state: &ConfigurationComplianceState) -> Result<(), ProviderError> {
        // Remediation leaves nothing to remove on OME
        debug!("Forgetting remediation job {}", state.id);
        Ok(())
    }
}
