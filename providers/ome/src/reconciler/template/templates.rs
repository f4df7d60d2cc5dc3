//! `ome_template`
//!
//! Creates a template from a reference device, clones an existing template or
//! imports template XML, then applies attributes, the identity pool and NIC VLAN
//! settings.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::{job_settings, read_or_gone, track_job};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{
    AttributeUpdate, CloneTemplateRequest, CreateTemplateRequest, ImportTemplateRequest, Template,
    TemplateAttribute, TemplateNetwork, UpdateNetworkConfigRequest, UpdateTemplateRequest, VlanAttributePayload,
    ViewType, TEMPLATE_TYPE_SERVER,
};
use ome_schema::{TemplateAttributeState, TemplateState, TemplateVlanState, VlanAttributeState};
use tracing::{debug, info};

const JOB_DEFAULTS: (i64, i64) = (30, 20);
const FQDDS: [&str; 8] = [
    "All",
    "iDRAC",
    "System",
    "BIOS",
    "NIC",
    "LifeCycleController",
    "RAID",
    "EventFilters",
];
const BONDING: [&str; 3] = ["NoTeaming", "LACP", "Other"];
const DEFAULT_BONDING: &str = "NoTeaming";

/// Reconciler for OME templates
#[derive(Debug, Default)]
pub struct TemplateResource;

fn view_type_of(state: &TemplateState) -> ViewType {
    ViewType::parse(&state.view_type).unwrap_or(ViewType::Deployment)
}

fn fqdds_of(state: &TemplateState) -> String {
    if state.fqdds.trim().is_empty() {
        "All".to_string()
    } else {
        state.fqdds.clone()
    }
}

/// Whether `plan` names the device `state` was captured from, by ID or by service tag
fn same_reference_device(state: &TemplateState, plan: &TemplateState) -> bool {
    if plan.refdevice_id != 0 && plan.refdevice_id == state.refdevice_id {
        return true;
    }
    if !plan.refdevice_servicetag.is_empty() && plan.refdevice_servicetag.eq_ignore_ascii_case(&state.refdevice_servicetag) {
        return true;
    }
    plan.refdevice_id == state.refdevice_id && plan.refdevice_servicetag == state.refdevice_servicetag
}

pub(crate) fn to_attribute_state(attribute: TemplateAttribute) -> TemplateAttributeState {
    TemplateAttributeState {
        attribute_id: attribute.attribute_id,
        display_name: attribute.display_name,
        value: attribute.value,
        is_ignored: attribute.is_ignored,
    }
}

/// Attribute updates that bring `current` to `desired`
///
/// Desired attributes are matched by ID, or by display name when no ID is given.
pub(crate) fn attribute_updates(
    current: &[TemplateAttribute],
    desired: &[TemplateAttributeState],
) -> Result<Vec<AttributeUpdate>, String> {
    let mut updates = Vec::new();
    for want in desired {
        let found = current.iter().find(|have| {
            if want.attribute_id != 0 {
                have.attribute_id == want.attribute_id
            } else {
                have.display_name == want.display_name
            }
        });
        let have = found.ok_or_else(|| {
            if want.attribute_id != 0 {
                format!("attribute {} not found in template", want.attribute_id)
            } else {
                format!("attribute {:?} not found in template", want.display_name)
            }
        })?;
        if have.value != want.value || have.is_ignored != want.is_ignored {
            updates.push(AttributeUpdate {
                id: have.attribute_id,
                value: want.value.clone(),
                is_ignored: want.is_ignored,
            });
        }
    }
    Ok(updates)
}

impl TemplateResource {
    async fn resolve_source_device(&self, ctx: &Context<'_>, plan: &TemplateState) -> Result<i64, ProviderError> {
        if plan.refdevice_id != 0 {
            let device = ctx.client.get_device(plan.refdevice_id).await.or_fail("Error creating template")?;
            return Ok(device.id);
        }
        let device = ctx
            .client
            .get_device_by_service_tag(&plan.refdevice_servicetag)
            .await
            .or_fail("Error creating template")?
            .ok_or_else(|| {
                ProviderError::failed(
                    "Error creating template",
                    format!("device with service tag {} not found", plan.refdevice_servicetag),
                )
            })?;
        Ok(device.id)
    }

    async fn resolve_source_template(&self, ctx: &Context<'_>, plan: &TemplateState) -> Result<Template, ProviderError> {
        if plan.reftemplate_id != 0 {
            return ctx
                .client
                .get_template(plan.reftemplate_id)
                .await
                .or_fail("Error creating template");
        }
        ctx.client
            .get_template_by_name(&plan.reftemplate_name)
            .await
            .or_fail("Error creating template")?
            .ok_or_else(|| {
                ProviderError::failed(
                    "Error creating template",
                    format!("template {} not found", plan.reftemplate_name),
                )
            })
    }

    /// Apply name, description and attribute changes
    async fn apply_attributes(
        &self,
        ctx: &Context<'_>,
        template: &Template,
        plan: &TemplateState,
        summary: &str,
    ) -> Result<(), ProviderError> {
        let updates = match &plan.attributes {
            Some(desired) => {
                let current = ctx
                    .client
                    .get_template_attributes(template.id)
                    .await
                    .or_fail(summary)?
                    .flatten();
                attribute_updates(&current, desired).map_err(|e| ProviderError::failed(summary, e))?
            }
            None => Vec::new(),
        };
        let description_changed = plan.description.is_some() && plan.description != template.description;
        if updates.is_empty() && !description_changed && template.name == plan.name {
            debug!("Template {} attributes already up-to-date", template.id);
            return Ok(());
        }

        info!("Updating template {} ({} attribute changes)", template.id, updates.len());
        ctx.client
            .update_template(&UpdateTemplateRequest {
                id: template.id,
                name: plan.name.clone(),
                description: plan.description.clone(),
                attributes: updates,
            })
            .await
            .or_fail(summary)
    }

    /// Apply identity pool and VLAN settings
    async fn configure_network(
        &self,
        ctx: &Context<'_>,
        template: &Template,
        plan: &TemplateState,
        summary: &str,
    ) -> Result<(), ProviderError> {
        let identity_pool_id = match plan.identity_pool_name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => ctx
                .client
                .list_identity_pools()
                .await
                .or_fail(summary)?
                .into_iter()
                .find(|p| p.name == name)
                .map(|p| p.id)
                .ok_or_else(|| ProviderError::failed(summary, format!("identity pool {} not found", name)))?,
            None => template.identity_pool_id,
        };

        let network = ctx.client.get_template_network(template.id).await.or_fail(summary)?;
        let (bonding_technology, propagate_vlan, vlan_attributes) = match &plan.vlan {
            Some(vlan) => {
                self.check_vlan_networks(ctx, vlan, summary).await?;
                let bonding = if vlan.bonding_technology.is_empty() {
                    DEFAULT_BONDING.to_string()
                } else {
                    vlan.bonding_technology.clone()
                };
                let payload = vlan
                    .vlan_attributes
                    .iter()
                    .map(|attribute| vlan_payload(&network, attribute))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| ProviderError::failed(summary, e))?;
                (bonding, vlan.propagate_vlan, payload)
            }
            None => (network.bonding_technology.clone(), network.propagate_vlan, Vec::new()),
        };

        info!(
            "Configuring network of template {} (identity pool {}, {} ports)",
            template.id,
            identity_pool_id,
            vlan_attributes.len()
        );
        ctx.client
            .update_template_network(&UpdateNetworkConfigRequest {
                template_id: template.id,
                identity_pool_id,
                bonding_technology,
                propagate_vlan,
                vlan_attributes,
            })
            .await
            .or_fail(summary)
    }

    async fn check_vlan_networks(
        &self,
        ctx: &Context<'_>,
        vlan: &TemplateVlanState,
        summary: &str,
    ) -> Result<(), ProviderError> {
        let wanted: Vec<i64> = vlan
            .vlan_attributes
            .iter()
            .flat_map(|a| std::iter::once(a.untagged_network).chain(a.tagged_networks.iter().copied()))
            .filter(|id| *id != 0)
            .collect();
        if wanted.is_empty() {
            return Ok(());
        }
        let known = ctx.client.list_vlan_networks().await.or_fail(summary)?;
        for id in wanted {
            if !known.iter().any(|n| n.id == id) {
                return Err(ProviderError::failed(summary, format!("VLAN network {} not found", id)));
            }
        }
        Ok(())
    }

    /// Observed state of a template, keeping what only the configuration knows
    async fn observe(&self, ctx: &Context<'_>, template: Template, base: &TemplateState) -> Result<TemplateState, ProviderError> {
        let summary = "Error reading";
        let attributes = ctx
            .client
            .get_template_attributes(template.id)
            .await
            .or_fail(summary)?
            .flatten()
            .into_iter()
            .map(to_attribute_state)
            .collect();

        let identity_pool_name = if template.identity_pool_id != 0 {
            ctx.client
                .list_identity_pools()
                .await
                .or_fail(summary)?
                .into_iter()
                .find(|p| p.id == template.identity_pool_id)
                .map(|p| p.name)
        } else {
            None
        };

        let vlan = match &base.vlan {
            Some(tracked) => {
                let network = ctx.client.get_template_network(template.id).await.or_fail(summary)?;
                Some(observe_vlan(&network, &tracked.vlan_attributes))
            }
            None => None,
        };

        let view_type = template
            .view_type()
            .map(|v| v.as_str().to_string())
            .unwrap_or_else(|| view_type_of(base).as_str().to_string());

        Ok(TemplateState {
            id: template.id,
            name: template.name,
            description: template.description.filter(|d| !d.is_empty()),
            view_type,
            view_type_id: template.view_type_id,
            device_type: if base.device_type.is_empty() {
                "Server".to_string()
            } else {
                base.device_type.clone()
            },
            attributes: Some(attributes),
            identity_pool_name,
            vlan,
            ..base.clone()
        })
    }
}

fn vlan_payload(network: &TemplateNetwork, attribute: &VlanAttributeState) -> Result<VlanAttributePayload, String> {
    let port = network
        .ports
        .iter()
        .find(|p| p.nic_identifier == attribute.nic_identifier && p.port == attribute.port)
        .ok_or_else(|| {
            format!(
                "port {} of {} not found in template",
                attribute.port, attribute.nic_identifier
            )
        })?;
    Ok(VlanAttributePayload {
        component_id: port.component_id,
        untagged: attribute.untagged_network,
        tagged: attribute.tagged_networks.clone(),
        is_nic_bonded: attribute.is_nic_bonded,
    })
}

/// VLAN state for the tracked ports, or every port when none are tracked
pub(crate) fn observe_vlan(network: &TemplateNetwork, tracked: &[VlanAttributeState]) -> TemplateVlanState {
    let to_state = |p: &ome_client::NicPortVlan| VlanAttributeState {
        untagged_network: p.untagged_network,
        tagged_networks: p.tagged_networks.clone(),
        is_nic_bonded: p.is_nic_bonded,
        port: p.port,
        nic_identifier: p.nic_identifier.clone(),
    };
    let vlan_attributes = if tracked.is_empty() {
        network.ports.iter().map(to_state).collect()
    } else {
        tracked
            .iter()
            .filter_map(|t| {
                network
                    .ports
                    .iter()
                    .find(|p| p.nic_identifier == t.nic_identifier && p.port == t.port)
                    .map(to_state)
            })
            .collect()
    };
    TemplateVlanState {
        propagate_vlan: network.propagate_vlan,
        bonding_technology: network.bonding_technology.clone(),
        vlan_attributes,
    }
}

#[async_trait]
impl Resource for TemplateResource {
    type State = TemplateState;
    const TYPE_NAME: &'static str = "ome_template";

    fn validate(&self, plan: &TemplateState) -> Result<(), ProviderError> {
        validators::not_blank("name", &plan.name)?;
        validators::exactly_one(&[
            ("refdevice_id", plan.refdevice_id != 0),
            ("refdevice_servicetag", !plan.refdevice_servicetag.is_empty()),
            ("reftemplate_id", plan.reftemplate_id != 0),
            ("reftemplate_name", !plan.reftemplate_name.is_empty()),
            ("content", !plan.content.is_empty()),
        ])?;
        if !plan.view_type.is_empty() {
            validators::one_of("view_type", &plan.view_type, &["Deployment", "Compliance"])?;
        }
        if !plan.device_type.is_empty() {
            validators::one_of("device_type", &plan.device_type, &["Server"])?;
        }
        for component in plan.fqdds.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            if !FQDDS.iter().any(|f| f.eq_ignore_ascii_case(component)) {
                return Err(ProviderError::Validation(format!(
                    "Attribute fqdds contains unknown component {:?}, expected any of {}",
                    component,
                    FQDDS.join(", ")
                )));
            }
        }
        if let Some(attributes) = &plan.attributes {
            let ids: Vec<i64> = attributes.iter().map(|a| a.attribute_id).filter(|id| *id != 0).collect();
            validators::unique("attributes.attribute_id", &ids)?;
        }
        if let Some(vlan) = &plan.vlan {
            if !vlan.bonding_technology.is_empty() {
                validators::one_of("vlan.bonding_technology", &vlan.bonding_technology, &BONDING)?;
            }
            let ports: Vec<(String, i64)> = vlan
                .vlan_attributes
                .iter()
                .map(|a| (a.nic_identifier.clone(), a.port))
                .collect();
            validators::unique("vlan.vlan_attributes", &ports)?;
        }
        Ok(())
    }

    fn requires_replace(&self, state: &TemplateState, plan: &TemplateState) -> Vec<&'static str> {
        let mut replace = Vec::new();
        if !same_reference_device(state, plan) {
            if state.refdevice_id != plan.refdevice_id {
                replace.push("refdevice_id");
            }
            if state.refdevice_servicetag != plan.refdevice_servicetag {
                replace.push("refdevice_servicetag");
            }
        }
        if state.reftemplate_id != plan.reftemplate_id {
            replace.push("reftemplate_id");
        }
        if state.reftemplate_name != plan.reftemplate_name {
            replace.push("reftemplate_name");
        }
        if state.content != plan.content {
            replace.push("content");
        }
        if view_type_of(state) != view_type_of(plan) {
            replace.push("view_type");
        }
        // Empty after import: OME does not report the captured components
        if !state.fqdds.is_empty() && !fqdds_of(state).eq_ignore_ascii_case(&fqdds_of(plan)) {
            replace.push("fqdds");
        }
        replace
    }

    async fn create(&self, ctx: &Context<'_>, plan: &TemplateState) -> Result<TemplateState, ProviderError> {
        let summary = "Error creating template";
        let view_type = view_type_of(plan);

        let template_id = if plan.refdevice_id != 0 || !plan.refdevice_servicetag.is_empty() {
            let source_device_id = self.resolve_source_device(ctx, plan).await?;
            info!("Creating template {} from device {}", plan.name, source_device_id);
            ctx.client
                .create_template(&CreateTemplateRequest {
                    name: plan.name.clone(),
                    description: plan.description.clone(),
                    type_id: TEMPLATE_TYPE_SERVER,
                    view_type_id: view_type.id(),
                    source_device_id,
                    fqdds: fqdds_of(plan),
                })
                .await
                .or_fail(summary)?
        } else if plan.reftemplate_id != 0 || !plan.reftemplate_name.is_empty() {
            let source = self.resolve_source_template(ctx, plan).await?;
            info!("Cloning template {} to {}", source.id, plan.name);
            ctx.client
                .clone_template(&CloneTemplateRequest {
                    source_template_id: source.id,
                    new_template_name: plan.name.clone(),
                    view_type_id: view_type.id(),
                })
                .await
                .or_fail(summary)?
        } else {
            info!("Importing template {}", plan.name);
            ctx.client
                .import_template(&ImportTemplateRequest {
                    name: plan.name.clone(),
                    type_id: TEMPLATE_TYPE_SERVER,
                    view_type_id: view_type.id(),
                    content: plan.content.clone(),
                })
                .await
                .or_fail(summary)?
        };

        let template = ctx.client.get_template(template_id).await.or_fail(summary)?;
        if template.task_id != 0 {
            let (retries, interval) = job_settings(plan.job_retry_count, plan.sleep_interval, JOB_DEFAULTS);
            track_job(ctx, template.task_id, retries, interval, summary).await?;
        }

        self.apply_attributes(ctx, &template, plan, summary).await?;
        if plan.identity_pool_name.is_some() || plan.vlan.is_some() {
            self.configure_network(ctx, &template, plan, summary).await?;
        }

        let template = ctx.client.get_template(template_id).await.or_fail(summary)?;
        let base = TemplateState {
            fqdds: fqdds_of(plan),
            ..plan.clone()
        };
        self.observe(ctx, template, &base).await
    }

    async fn read(&self, ctx: &Context<'_>, state: &TemplateState) -> Result<Option<TemplateState>, ProviderError> {
        let found = read_or_gone(ctx, ctx.client.get_template(state.id), "Template", state.id, "Error reading").await?;
        match found {
            Some(template) => self.observe(ctx, template, state).await.map(Some),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        ctx: &Context<'_>,
        state: &TemplateState,
        plan: &TemplateState,
    ) -> Result<TemplateState, ProviderError> {
        let summary = "Error updating template";
        let template = ctx.client.get_template(state.id).await.or_fail(summary)?;

        self.apply_attributes(ctx, &template, plan, summary).await?;
        let network_changed = plan.identity_pool_name != state.identity_pool_name || plan.vlan != state.vlan;
        if network_changed && (plan.identity_pool_name.is_some() || plan.vlan.is_some()) {
            self.configure_network(ctx, &template, plan, summary).await?;
        }

        let template = ctx.client.get_template(state.id).await.or_fail(summary)?;
        let base = TemplateState {
            id: state.id,
            fqdds: if plan.fqdds.is_empty() { state.fqdds.clone() } else { plan.fqdds.clone() },
            ..plan.clone()
        };
        self.observe(ctx, template, &base).await
    }

    async fn delete(&self, ctx: &Context<'_>, state: &TemplateState) -> Result<(), ProviderError> {
        info!("Deleting template {} ({})", state.name, state.id);
        match ctx.client.delete_template(state.id).await {
            Err(e) if e.is_not_found() => {
                debug!("Template {} already gone", state.id);
                Ok(())
            }
            other => other.or_fail("Error deleting template"),
        }
    }

    async fn import(&self, ctx: &Context<'_>, id: &str) -> Result<TemplateState, ProviderError> {
        let summary = "Error importing template";
        let template = match id.parse::<i64>() {
            Ok(numeric) => ctx.client.get_template(numeric).await.or_fail(summary)?,
            Err(_) => ctx
                .client
                .get_template_by_name(id)
                .await
                .or_fail(summary)?
                .ok_or_else(|| ProviderError::failed(summary, format!("template {} not found", id)))?,
        };
        let refdevice_servicetag = if template.source_device_id != 0 {
            match ctx.client.get_device(template.source_device_id).await {
                Ok(device) => device.device_service_tag,
                Err(e) if e.is_not_found() => {
                    debug!("Source device {} of template {} is gone", template.source_device_id, template.id);
                    String::new()
                }
                Err(e) => return Err(e).or_fail(summary),
            }
        } else {
            String::new()
        };
        let base = TemplateState {
            refdevice_id: template.source_device_id,
            refdevice_servicetag,
            vlan: Some(TemplateVlanState::default()),
            ..Default::default()
        };
        let mut state = self.observe(ctx, template, &base).await?;
        if state.vlan.as_ref().is_some_and(|v| v.vlan_attributes.is_empty() && v.bonding_technology.is_empty()) {
            state.vlan = None;
        }
        Ok(state)
    }
}
