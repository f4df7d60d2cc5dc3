//! `ome_discovery`
//!
//! Discovery job group: address ranges to probe, the device types expected there
//! and the credentials to use. OME starts the discovery job when the group is
//! created or updated; it is tracked unless scheduled for later.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::{job_settings, read_or_gone, track_job};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{DiscoveryConfigGroup, DiscoveryConfigModel, DiscoveryTarget, Schedule};
use ome_schema::{DiscoveryCredentialsState, DiscoveryState, DiscoveryTargetState};
use serde_json::{Value, json};
use tracing::{debug, info};

const JOB_DEFAULTS: (i64, i64) = (10, 30);

/// Discoverable device types and their OME type IDs
const DEVICE_TYPES: [(&str, i64); 4] = [("SERVER", 1000), ("CHASSIS", 2000), ("STORAGE", 5000), ("NETWORK SWITCH", 7000)];

const DEFAULT_PORT: i64 = 443;
const DEFAULT_RETRIES: i64 = 3;
const DEFAULT_TIMEOUT: i64 = 60;

/// Reconciler for discovery job groups
#[derive(Debug, Default)]
pub struct DiscoveryResource;

fn device_type_id(name: &str) -> Option<i64> {
    DEVICE_TYPES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, id)| *id)
}

fn device_type_name(id: i64) -> Option<&'static str> {
    DEVICE_TYPES.iter().find(|(_, i)| *i == id).map(|(n, _)| *n)
}

fn credential(kind: &str, creds: &DiscoveryCredentialsState) -> Value {
    json!({
        "id": 0,
        "type": kind,
        "authType": "Basic",
        "modified": false,
        "credentials": {
            "username": creds.username,
            "password": creds.password,
            "port": creds.port.unwrap_or(DEFAULT_PORT),
            "retries": creds.retries.unwrap_or(DEFAULT_RETRIES),
            "timeout": creds.timeout.unwrap_or(DEFAULT_TIMEOUT),
            "caCheck": creds.ca_check,
            "cnCheck": creds.cn_check,
        }
    })
}

/// Credential profile of one target, as the JSON string OME expects
fn connection_profile(target: &DiscoveryTargetState) -> String {
    let mut credentials = Vec::new();
    if let Some(redfish) = &target.redfish {
        credentials.push(credential("REDFISH", redfish));
    }
    if let Some(wsman) = &target.wsman {
        credentials.push(credential("WSMAN", wsman));
    }
    json!({
        "profileName": "",
        "profileDescription": "",
        "type": "DISCOVERY",
        "credentials": credentials,
    })
    .to_string()
}

fn validate_credentials(field: &str, creds: &DiscoveryCredentialsState) -> Result<(), ProviderError> {
    validators::not_blank(&format!("{}.username", field), &creds.username)?;
    validators::not_blank(&format!("{}.password", field), &creds.password)?;
    if creds.port.is_some_and(|p| !(1..=65535).contains(&p)) {
        return Err(ProviderError::Validation(format!(
            "Attribute {}.port must be between 1 and 65535",
            field
        )));
    }
    if creds.retries.is_some_and(|r| r < 0) || creds.timeout.is_some_and(|t| t < 0) {
        return Err(ProviderError::Validation(format!(
            "Attribute {} retries and timeout must not be negative",
            field
        )));
    }
    Ok(())
}

impl DiscoveryResource {
    fn group(&self, id: i64, plan: &DiscoveryState) -> DiscoveryConfigGroup {
        let models = plan
            .discovery_config_targets
            .iter()
            .map(|target| DiscoveryConfigModel {
                discovery_config_targets: target
                    .network_address_detail
                    .iter()
                    .map(|address| DiscoveryTarget {
                        network_address_detail: address.clone(),
                    })
                    .collect(),
                connection_profile: connection_profile(target),
                device_type: target.device_type.iter().filter_map(|t| device_type_id(t)).collect(),
            })
            .collect();
        DiscoveryConfigGroup {
            discovery_config_group_id: id,
            discovery_config_group_name: plan.name.clone(),
            discovery_status_email_recipient: Some(plan.email_recipient.clone()).filter(|e| !e.is_empty()),
            discovery_config_models: models,
            schedule: Schedule::new(plan.run_later, Some(plan.cron.clone()).filter(|c| !c.is_empty())),
            trap_destination: plan.trap_destination,
            community_string: plan.community_string,
            create_group: true,
            ..Default::default()
        }
    }

    async fn run(
        &self,
        ctx: &Context<'_>,
        group: &DiscoveryConfigGroup,
        plan: &DiscoveryState,
        summary: &str,
    ) -> Result<(), ProviderError> {
        let job_id = group.job_id();
        if plan.run_later {
            info!("Discovery job {} scheduled with cron {}", job_id, plan.cron);
            return Ok(());
        }
        if job_id == 0 {
            debug!("OME started no job for discovery {}", group.discovery_config_group_name);
            return Ok(());
        }
        let (retries, interval) = job_settings(plan.job_retry_count, plan.sleep_interval, JOB_DEFAULTS);
        track_job(ctx, job_id, retries, interval, summary).await.map(|_| ())
    }

    /// State as OME reports it; credentials come from `base` since OME never returns them
    fn observe(&self, group: &DiscoveryConfigGroup, base: &DiscoveryState) -> DiscoveryState {
        let targets = group
            .discovery_config_models
            .iter()
            .enumerate()
            .map(|(i, model)| {
                let known = base.discovery_config_targets.get(i);
                DiscoveryTargetState {
                    network_address_detail: model
                        .discovery_config_targets
                        .iter()
                        .map(|t| t.network_address_detail.clone())
                        .collect(),
                    device_type: model
                        .device_type
                        .iter()
                        .filter_map(|id| device_type_name(*id))
                        .map(|name| {
                            known
                                .and_then(|k| k.device_type.iter().find(|t| t.eq_ignore_ascii_case(name)))
                                .cloned()
                                .unwrap_or_else(|| name.to_string())
                        })
                        .collect(),
                    redfish: known.and_then(|k| k.redfish.clone()),
                    wsman: known.and_then(|k| k.wsman.clone()),
                }
            })
            .collect();
        DiscoveryState {
            id: group.discovery_config_group_id,
            name: group.discovery_config_group_name.clone(),
            email_recipient: group.discovery_status_email_recipient.clone().unwrap_or_default(),
            discovery_config_targets: targets,
            run_later: group.schedule.run_later,
            cron: group.schedule.cron.clone().unwrap_or_default(),
            trap_destination: group.trap_destination,
            community_string: group.community_string,
            job_id: group.job_id(),
            job_retry_count: base.job_retry_count,
            sleep_interval: base.sleep_interval,
        }
    }
}

#[async_trait]
impl Resource for DiscoveryResource {
    type State = DiscoveryState;
    const TYPE_NAME: &'static str = "ome_discovery";

    fn validate(&self, plan: &DiscoveryState) -> Result<(), ProviderError> {
        validators::not_blank("name", &plan.name)?;
        validators::size_between("discovery_config_targets", &plan.discovery_config_targets, 1, usize::MAX)?;
        let names: Vec<&str> = DEVICE_TYPES.iter().map(|(n, _)| *n).collect();
        for target in &plan.discovery_config_targets {
            validators::size_between(
                "discovery_config_targets.network_address_detail",
                &target.network_address_detail,
                1,
                usize::MAX,
            )?;
            validators::size_between("discovery_config_targets.device_type", &target.device_type, 1, usize::MAX)?;
            for device_type in &target.device_type {
                validators::one_of(
                    "discovery_config_targets.device_type",
                    &device_type.to_ascii_uppercase(),
                    &names,
                )?;
            }
            if target.redfish.is_none() && target.wsman.is_none() {
                return Err(ProviderError::Validation(
                    "every discovery_config_targets entry needs redfish or wsman credentials".to_string(),
                ));
            }
            if let Some(redfish) = &target.redfish {
                validate_credentials("redfish", redfish)?;
            }
            if let Some(wsman) = &target.wsman {
                validate_credentials("wsman", wsman)?;
            }
        }
        if plan.run_later && plan.cron.trim().is_empty() {
            return Err(ProviderError::Validation(
                "cron is required when run_later is set".to_string(),
            ));
        }
        Ok(())
    }

    async fn create(&self, ctx: &Context<'_>, plan: &DiscoveryState) -> Result<DiscoveryState, ProviderError> {
        let summary = "Error creating discovery";
        let group = ctx
            .client
            .create_discovery(&self.group(0, plan))
            .await
            .or_fail(summary)?;
        info!(
            "Created discovery {} (ID: {}), job {}",
            group.discovery_config_group_name,
            group.discovery_config_group_id,
            group.job_id()
        );
        self.run(ctx, &group, plan, summary).await?;
        Ok(self.observe(&group, plan))
    }

    async fn read(&self, ctx: &Context<'_>, state: &DiscoveryState) -> Result<Option<DiscoveryState>, ProviderError> {
        let found = read_or_gone(ctx, ctx.client.get_discovery(state.id), "Discovery", state.id, "Error reading").await?;
        Ok(found.map(|group| self.observe(&group, state)))
    }

    async fn update(&self, ctx: &Context<'_>, state: &DiscoveryState, plan: &DiscoveryState) -> Result<DiscoveryState, ProviderError> {
        let summary = "Error updating discovery";
        let group = ctx
            .client
            .update_discovery(&self.group(state.id, plan))
            .await
            .or_fail(summary)?;
        info!("Updated discovery {} (ID: {})", group.discovery_config_group_name, state.id);
        self.run(ctx, &group, plan, summary).await?;
        Ok(self.observe(&group, plan))
    }

    async fn delete(&self, ctx: &Context<'_>, state: &DiscoveryState) -> Result<(), ProviderError> {
        info!("Deleting discovery {} ({})", state.name, state.id);
        match ctx.client.delete_discoveries(&[state.id]).await {
            Err(e) if e.is_not_found() => {
                debug!("Discovery {} already gone", state.id);
                Ok(())
            }
            other => other.or_fail("Error deleting discovery"),
        }
    }
}
