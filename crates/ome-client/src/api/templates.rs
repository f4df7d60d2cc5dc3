//! TemplateService operations: templates, attributes, network configuration

use crate::client::OmeClient;
use crate::common::odata::eq_filter;
use crate::error::OmeError;
use crate::models::*;
use tracing::debug;

const TEMPLATES_PATH: &str = "/api/TemplateService/Templates";
const ACTIONS_PATH: &str = "/api/TemplateService/Actions";

impl OmeClient {
    /// Create a template from a reference device
    ///
    /// OME answers with the new template id and starts a creation task
    /// (`Template.task_id`) that the caller must track.
    ///
    /// # Arguments
    /// * `request` - Name, view type, reference device and FQDDs
    ///
    /// # Returns
    /// * `Ok(i64)` - ID of the new template
    /// * `Err(OmeError)` - If OME rejects the request (message passed through verbatim)
    pub async fn create_template(&self, request: &CreateTemplateRequest) -> Result<i64, OmeError> {
        debug!(
            "Creating template {} from device {} (fqdds: {})",
            request.name, request.source_device_id, request.fqdds
        );
        self.http.post(TEMPLATES_PATH, request).await
    }

    /// Create a template from inline XML content
    pub async fn import_template(&self, request: &ImportTemplateRequest) -> Result<i64, OmeError> {
        debug!("Importing template {}", request.name);
        self.http
            .post(&format!("{}/TemplateService.Import", ACTIONS_PATH), request)
            .await
    }

    /// Clone an existing template
    ///
    /// OME rejects some view type conversions (compliance to deployment); the
    /// rejection is returned as-is.
    pub async fn clone_template(&self, request: &CloneTemplateRequest) -> Result<i64, OmeError> {
        debug!(
            "Cloning template {} as {}",
            request.source_template_id, request.new_template_name
        );
        self.http
            .post(&format!("{}/TemplateService.Clone", ACTIONS_PATH), request)
            .await
    }

    /// Get a template by ID
    ///
    /// # Arguments
    /// * `id` - Template ID
    ///
    /// # Returns
    /// * `Ok(Template)` - The template
    /// * `Err(OmeError::NotFound)` - If the template does not exist
    pub async fn get_template(&self, id: i64) -> Result<Template, OmeError> {
        self.http.get(&format!("{}({})", TEMPLATES_PATH, id)).await
    }

    /// Look a template up by its exact name
    ///
    /// # Returns
    /// * `Ok(Some(Template))` - If a template with that name exists
    /// * `Ok(None)` - If none does
    pub async fn get_template_by_name(&self, name: &str) -> Result<Option<Template>, OmeError> {
        let path = format!("{}{}", TEMPLATES_PATH, eq_filter("Name", name));
        let templates: Vec<Template> = self.http.get_collection(&path).await?;
        Ok(templates.into_iter().find(|t| t.name == name))
    }

    /// List all templates
    pub async fn list_templates(&self) -> Result<Vec<Template>, OmeError> {
        self.http.get_collection(TEMPLATES_PATH).await
    }

    /// Update name, description and attributes of a template
    ///
    /// Fails when the template has deployments attached; OME's message is kept.
    pub async fn update_template(&self, request: &UpdateTemplateRequest) -> Result<(), OmeError> {
        debug!(
            "Updating template {} ({} attributes)",
            request.id,
            request.attributes.len()
        );
        self.http
            .put_no_content(&format!("{}({})", TEMPLATES_PATH, request.id), request)
            .await
    }

    /// Delete a template
    pub async fn delete_template(&self, id: i64) -> Result<(), OmeError> {
        debug!("Deleting template {}", id);
        self.http.delete(&format!("{}({})", TEMPLATES_PATH, id)).await
    }

    /// Get the attribute tree of a template
    pub async fn get_template_attributes(&self, id: i64) -> Result<AttributeDetails, OmeError> {
        self.http
            .get(&format!("{}({})/AttributeDetails", TEMPLATES_PATH, id))
            .await
    }

    /// Get the NIC/VLAN configuration of a template
    pub async fn get_template_network(&self, id: i64) -> Result<TemplateNetwork, OmeError> {
        let view: AttributeDetails = self
            .http
            .get(&format!(
                "{}({})/Views({})/AttributeViewDetails",
                TEMPLATES_PATH, id, NETWORK_VIEW_ID
            ))
            .await?;
        Ok(TemplateNetwork::from_view(&view))
    }

    /// Set identity pool, NIC bonding and VLANs of a template
    pub async fn update_template_network(&self, request: &UpdateNetworkConfigRequest) -> Result<(), OmeError> {
        debug!(
            "Updating network config of template {} (identity pool {}, {} vlan attributes)",
            request.template_id,
            request.identity_pool_id,
            request.vlan_attributes.len()
        );
        self.http
            .post_no_content(&format!("{}/TemplateService.UpdateNetworkConfig", ACTIONS_PATH), request)
            .await
    }

    /// Export a template as XML
    pub async fn export_template(&self, id: i64) -> Result<String, OmeError> {
        let request = ExportTemplateRequest {
            template_id: id,
            format: "XML".to_string(),
        };
        let response: ExportTemplateResponse = self
            .http
            .post(&format!("{}/TemplateService.Export", ACTIONS_PATH), &request)
            .await?;
        Ok(response.content)
    }

    /// List identity pools
    pub async fn list_identity_pools(&self) -> Result<Vec<IdentityPool>, OmeError> {
        self.http
            .get_collection("/api/IdentityPoolService/IdentityPools")
            .await
    }

    /// List VLAN networks defined on the appliance
    pub async fn list_vlan_networks(&self) -> Result<Vec<VlanNetwork>, OmeError> {
        self.http
            .get_collection("/api/NetworkConfigurationService/Networks")
            .await
    }
}
