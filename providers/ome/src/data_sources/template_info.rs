//! `ome_template_info` and `ome_vlannetworks_info`

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::find_template;
use crate::reconciler::template::templates::{observe_vlan, to_attribute_state};
use crate::resource::{Context, DataSource};
use crate::validators;
use async_trait::async_trait;
use ome_client::ViewType;
use ome_schema::{TemplateInfoState, VlanNetworkState, VlanNetworksInfoState};

/// A template by name with its attributes, and its VLAN settings for deployment templates
#[derive(Debug, Default)]
pub struct TemplateInfoDataSource;

#[async_trait]
impl DataSource for TemplateInfoDataSource {
    type State = TemplateInfoState;
    const TYPE_NAME: &'static str = "ome_template_info";

    fn validate(&self, config: &TemplateInfoState) -> Result<(), ProviderError> {
        validators::not_blank("name", &config.name)
    }

    async fn read(&self, ctx: &Context<'_>, config: &TemplateInfoState) -> Result<TemplateInfoState, ProviderError> {
        let summary = "Error reading";
        let template = find_template(ctx, 0, &config.name)
            .await
            .or_fail(summary)?
            .ok_or_else(|| ProviderError::failed(summary, format!("template {} not found", config.name)))?;

        let attributes = ctx
            .client
            .get_template_attributes(template.id)
            .await
            .or_fail(summary)?
            .flatten()
            .into_iter()
            .map(to_attribute_state)
            .collect();
        let vlan = if template.view_type() == Some(ViewType::Deployment) {
            let network = ctx.client.get_template_network(template.id).await.or_fail(summary)?;
            Some(observe_vlan(&network, &[]))
        } else {
            None
        };

        Ok(TemplateInfoState {
            name: template.name.clone(),
            id: template.id,
            description: template.description.clone().filter(|d| !d.is_empty()),
            view_type_id: template.view_type_id,
            view_type: template.view_type().map(|v| v.as_str().to_string()).unwrap_or_default(),
            refdevice_id: template.source_device_id,
            status: template.status,
            identity_pool_id: template.identity_pool_id,
            attributes,
            vlan,
        })
    }
}

/// Every VLAN network defined in OME
#[derive(Debug, Default)]
pub struct VlanNetworksInfoDataSource;

#[async_trait]
impl DataSource for VlanNetworksInfoDataSource {
    type State = VlanNetworksInfoState;
    const TYPE_NAME: &'static str = "ome_vlannetworks_info";

    async fn read(&self, ctx: &Context<'_>, _config: &VlanNetworksInfoState) -> Result<VlanNetworksInfoState, ProviderError> {
        let networks = ctx.client.list_vlan_networks().await.or_fail("Error reading")?;
        Ok(VlanNetworksInfoState {
            id: Self::TYPE_NAME.to_string(),
            vlan_networks: networks
                .into_iter()
                .map(|n| VlanNetworkState {
                    vlan_id: n.id,
                    name: n.name,
                    description: n.description.unwrap_or_default(),
                    vlan_maximum: n.vlan_maximum,
                    vlan_minimum: n.vlan_minimum,
                    network_type: n.network_type,
                })
                .collect(),
        })
    }
}
