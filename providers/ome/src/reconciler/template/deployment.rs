//! `ome_deployment`
//!
//! Deploys a deployment template to a set of servers. OME records each target as a
//! server profile; the profiles are the observed state. Updates are differential:
//! new targets get a deployment job, dropped targets lose their profile.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::{find_template, job_settings, keep_order, resolve_template, set_diff, track_job};
use crate::resolver::{self, Capability, DeviceSelector};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{
    AttributeUpdate, DeployOptions, DeployTemplateRequest, Device, DeviceAttributes, NetworkBootIsoModel, Profile,
    Schedule, ShareDetail, Template, ViewType,
};
use ome_schema::{BootToNetworkIsoState, DeploymentState};
use std::collections::BTreeMap;
use tracing::{debug, info};

const JOB_DEFAULTS: (i64, i64) = (20, 60);
const DEFAULT_SHUTDOWN_WAIT: i64 = 300;
const ISO_TIMEOUTS: [i64; 5] = [1, 2, 4, 8, 16];

/// Reconciler for template deployments
#[derive(Debug, Default)]
pub struct DeploymentResource;

fn validate_boot_iso(iso: &BootToNetworkIsoState) -> Result<(), ProviderError> {
    if !iso.boot_to_network {
        return Ok(());
    }
    validators::one_of("boot_to_network_iso.share_type", &iso.share_type, &["CIFS", "NFS"])?;
    if !ISO_TIMEOUTS.contains(&iso.iso_timeout) {
        return Err(ProviderError::Validation(format!(
            "Attribute boot_to_network_iso.iso_timeout value must be one of: {:?}, got: {}",
            ISO_TIMEOUTS, iso.iso_timeout
        )));
    }
    validators::not_blank("boot_to_network_iso.iso_path", &iso.iso_path)?;
    let share = iso.share_detail.as_ref().ok_or_else(|| {
        ProviderError::Validation("boot_to_network_iso.share_detail is required to boot to an ISO".to_string())
    })?;
    validators::not_blank("boot_to_network_iso.share_detail.ip_address", &share.ip_address)?;
    validators::not_blank("boot_to_network_iso.share_detail.share_name", &share.share_name)?;
    if iso.share_type == "CIFS" && (share.user.is_empty() || share.password.is_empty()) {
        return Err(ProviderError::Validation(
            "boot_to_network_iso.share_detail user and password are required for a CIFS share".to_string(),
        ));
    }
    Ok(())
}

fn boot_iso_model(iso: &BootToNetworkIsoState) -> Option<NetworkBootIsoModel> {
    if !iso.boot_to_network {
        return None;
    }
    let share = iso.share_detail.clone().unwrap_or_default();
    let non_empty = |s: String| Some(s).filter(|s| !s.is_empty());
    Some(NetworkBootIsoModel {
        boot_to_network: true,
        share_type: iso.share_type.clone(),
        iso_timeout: iso.iso_timeout,
        iso_path: iso.iso_path.clone(),
        share_detail: ShareDetail {
            ip_address: share.ip_address,
            share_name: share.share_name,
            user: non_empty(share.user),
            password: non_empty(share.password),
        },
    })
}

impl DeploymentResource {
    async fn resolve_targets(
        &self,
        ctx: &Context<'_>,
        state: &DeploymentState,
        summary: &str,
    ) -> Result<Vec<Device>, ProviderError> {
        let selector = DeviceSelector::by_ids_or_tags(&state.device_ids, &state.device_servicetags);
        let devices = resolver::resolve_devices(ctx.client, &selector).await.or_fail(summary)?;
        resolver::require_capability(&devices, Capability::Deployment).or_fail(summary)?;
        Ok(devices)
    }

    /// Submit a deployment job for `targets`; tracked unless scheduled for later
    async fn deploy(
        &self,
        ctx: &Context<'_>,
        template: &Template,
        targets: &[Device],
        plan: &DeploymentState,
        summary: &str,
    ) -> Result<i64, ProviderError> {
        let by_tag: BTreeMap<String, i64> = targets
            .iter()
            .map(|d| (d.device_service_tag.to_ascii_uppercase(), d.id))
            .collect();
        let mut attributes: Vec<DeviceAttributes> = Vec::new();
        for override_ in &plan.device_attributes {
            for tag in &override_.device_servicetags {
                let Some(device_id) = by_tag.get(&tag.to_ascii_uppercase()) else {
                    debug!("Skipping attribute override for {}, not part of this deployment", tag);
                    continue;
                };
                attributes.push(DeviceAttributes {
                    device_id: *device_id,
                    attributes: override_
                        .attributes
                        .iter()
                        .map(|a| AttributeUpdate {
                            id: a.attribute_id,
                            value: a.value.clone(),
                            is_ignored: a.is_ignored,
                        })
                        .collect(),
                });
            }
        }

        let request = DeployTemplateRequest {
            id: template.id,
            target_ids: targets.iter().map(|d| d.id).collect(),
            schedule: Schedule::new(plan.run_later, Some(plan.cron.clone()).filter(|c| !c.is_empty())),
            options: DeployOptions {
                shutdown_type: i64::from(plan.forced_shutdown),
                time_to_wait_before_shutdown: plan
                    .options_time_to_wait_before_shutdown
                    .unwrap_or(DEFAULT_SHUTDOWN_WAIT),
                end_host_power_state: if plan.power_state_off { 0 } else { 1 },
                strict_checking_vlan: plan.options_strict_checking_vlan,
            },
            network_boot_iso_model: plan.boot_to_network_iso.as_ref().and_then(boot_iso_model),
            attributes,
        };

        info!(
            "Deploying template {} to {} devices",
            template.name,
            request.target_ids.len()
        );
        let job_id = ctx.client.deploy_template(&request).await.or_fail(summary)?;
        if plan.run_later {
            info!("Deployment job {} scheduled with cron {}", job_id, plan.cron);
        } else {
            let (retries, interval) = job_settings(plan.job_retry_count, plan.sleep_interval, JOB_DEFAULTS);
            track_job(ctx, job_id, retries, interval, summary).await?;
        }
        Ok(job_id)
    }

    async fn profiles(&self, ctx: &Context<'_>, template_id: i64, summary: &str) -> Result<Vec<Profile>, ProviderError> {
        ctx.client.list_profiles_by_template(template_id).await.or_fail(summary)
    }

    /// Target IDs of the state that OME still knows
    async fn state_target_ids(&self, ctx: &Context<'_>, state: &DeploymentState, summary: &str) -> Result<Vec<i64>, ProviderError> {
        if !state.device_ids.is_empty() {
            return Ok(state.device_ids.clone());
        }
        let mut ids = Vec::new();
        for tag in &state.device_servicetags {
            if let Some(device) = ctx.client.get_device_by_service_tag(tag).await.or_fail(summary)? {
                ids.push(device.id);
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl Resource for DeploymentResource {
    type State = DeploymentState;
    const TYPE_NAME: &'static str = "ome_deployment";

    fn validate(&self, plan: &DeploymentState) -> Result<(), ProviderError> {
        validators::exactly_one(&[
            ("template_id", plan.template_id != 0),
            ("template_name", !plan.template_name.is_empty()),
        ])?;
        validators::exactly_one(&[
            ("device_ids", !plan.device_ids.is_empty()),
            ("device_servicetags", !plan.device_servicetags.is_empty()),
        ])?;
        validators::unique("device_ids", &plan.device_ids)?;
        validators::unique("device_servicetags", &plan.device_servicetags)?;
        if let Some(iso) = &plan.boot_to_network_iso {
            validate_boot_iso(iso)?;
        }
        if plan.run_later && plan.cron.trim().is_empty() {
            return Err(ProviderError::Validation(
                "cron is required when run_later is set".to_string(),
            ));
        }
        if plan.options_time_to_wait_before_shutdown.is_some_and(|wait| wait < 0) {
            return Err(ProviderError::Validation(
                "Attribute options_time_to_wait_before_shutdown must not be negative".to_string(),
            ));
        }
        for override_ in &plan.device_attributes {
            if override_.device_servicetags.is_empty() {
                return Err(ProviderError::Validation(
                    "device_attributes entries must name at least one device_servicetags".to_string(),
                ));
            }
            if override_.attributes.iter().any(|a| a.attribute_id == 0) {
                return Err(ProviderError::Validation(
                    "device_attributes attributes must carry an attribute_id".to_string(),
                ));
            }
        }
        Ok(())
    }

    async fn create(&self, ctx: &Context<'_>, plan: &DeploymentState) -> Result<DeploymentState, ProviderError> {
        let summary = "Error creating template deployment";
        let template = resolve_template(ctx, plan.template_id, &plan.template_name, summary).await?;
        if template.view_type() != Some(ViewType::Deployment) {
            return Err(ProviderError::failed(
                summary,
                format!("template {} is not a deployment template", template.name),
            ));
        }
        let targets = self.resolve_targets(ctx, plan, summary).await?;
        let job_id = self.deploy(ctx, &template, &targets, plan, summary).await?;

        Ok(DeploymentState {
            id: job_id,
            ..plan.clone()
        })
    }

    async fn read(&self, ctx: &Context<'_>, state: &DeploymentState) -> Result<Option<DeploymentState>, ProviderError> {
        let summary = "Error reading";
        let found = find_template(ctx, state.template_id, &state.template_name)
            .await
            .or_fail(summary)?;
        let Some(template) = found else {
            ctx.warn(
                "Template deployment not found",
                format!("template of deployment {} no longer exists", state.id),
            );
            return Ok(None);
        };

        let profiles = self.profiles(ctx, template.id, summary).await?;
        if profiles.is_empty() {
            ctx.warn(
                "Template deployment not found",
                format!("template {} has no server profiles left", template.name),
            );
            return Ok(None);
        }

        let deployed: Vec<i64> = profiles.iter().map(|p| p.target_id).collect();
        let mut observed = state.clone();
        if !state.device_ids.is_empty() {
            observed.device_ids = keep_order(&state.device_ids, &deployed, |a, b| a == b);
        } else {
            let mut tags: BTreeMap<i64, String> = BTreeMap::new();
            for id in &deployed {
                let device = ctx.client.get_device(*id).await.or_fail(summary)?;
                tags.insert(device.id, device.device_service_tag);
            }
            let tags: Vec<String> = tags.into_values().collect();
            observed.device_servicetags = keep_order(&state.device_servicetags, &tags, |a, b| a.eq_ignore_ascii_case(b));
        }
        Ok(Some(observed))
    }

    async fn update(
        &self,
        ctx: &Context<'_>,
        state: &DeploymentState,
        plan: &DeploymentState,
    ) -> Result<DeploymentState, ProviderError> {
        let summary = "Error updating template deployment";
        let template = resolve_template(ctx, plan.template_id, &plan.template_name, summary).await?;
        let current_template = resolve_template(ctx, state.template_id, &state.template_name, summary).await?;
        if template.id != current_template.id {
            return Err(ProviderError::failed(
                summary,
                format!(
                    "the template of a deployment cannot be changed (from {} to {})",
                    current_template.name, template.name
                ),
            ));
        }

        let desired = self.resolve_targets(ctx, plan, summary).await?;
        let desired_ids: Vec<i64> = desired.iter().map(|d| d.id).collect();
        let profiles = self.profiles(ctx, template.id, summary).await?;
        let current_ids: Vec<i64> = profiles.iter().map(|p| p.target_id).collect();
        let (add, remove) = set_diff(&current_ids, &desired_ids);

        let mut job_id = state.id;
        if !add.is_empty() {
            let additions: Vec<Device> = desired.into_iter().filter(|d| add.contains(&d.id)).collect();
            job_id = self.deploy(ctx, &template, &additions, plan, summary).await?;
        }
        if !remove.is_empty() {
            let profile_ids: Vec<i64> = profiles
                .iter()
                .filter(|p| remove.contains(&p.target_id))
                .map(|p| p.id)
                .collect();
            info!("Removing {} server profiles of template {}", profile_ids.len(), template.name);
            ctx.client.delete_profiles(&profile_ids).await.or_fail(summary)?;
        }

        Ok(DeploymentState {
            id: job_id,
            ..plan.clone()
        })
    }

    async fn delete(&self, ctx: &Context<'_>, state: &DeploymentState) -> Result<(), ProviderError> {
        let summary = "Error deleting template deployment";
        let found = find_template(ctx, state.template_id, &state.template_name)
            .await
            .or_fail(summary)?;
        let Some(template) = found else {
            debug!("Template of deployment {} already gone", state.id);
            return Ok(());
        };
        let targets = self.state_target_ids(ctx, state, summary).await?;
        let profile_ids: Vec<i64> = self
            .profiles(ctx, template.id, summary)
            .await?
            .into_iter()
            .filter(|p| targets.contains(&p.target_id))
            .map(|p| p.id)
            .collect();
        if profile_ids.is_empty() {
            return Ok(());
        }
        info!("Deleting {} server profiles of template {}", profile_ids.len(), template.name);
        ctx.client.delete_profiles(&profile_ids).await.or_fail(summary)
    }
}
