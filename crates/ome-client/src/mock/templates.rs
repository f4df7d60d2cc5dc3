//! Template, deployment and profile operations for MockOmeClient
//!
//! New templates get a copy of the attribute seed and network seed, so tests can
//! shape what a freshly created template looks like.

use super::{MockOmeClient, not_found, rejected};
use crate::error::OmeError;
use crate::models::*;

impl MockOmeClient {
    /// Add a template to the mock store (for test setup)
    pub fn add_template(&self, template: Template) {
        self.templates.lock().unwrap().insert(template.id, template);
    }

    /// Attribute groups every new template starts with
    pub fn set_attribute_seed(&self, groups: Vec<AttributeGroup>) {
        *self.attribute_seed.lock().unwrap() = groups;
    }

    /// NIC/VLAN layout every new template starts with
    pub fn set_network_seed(&self, network: TemplateNetwork) {
        *self.network_seed.lock().unwrap() = network;
    }

    /// Add an identity pool (for test setup)
    pub fn add_identity_pool(&self, pool: IdentityPool) {
        self.identity_pools.lock().unwrap().insert(pool.id, pool);
    }

    /// Add a VLAN network (for test setup)
    pub fn add_vlan_network(&self, network: VlanNetwork) {
        self.vlan_networks.lock().unwrap().insert(network.id, network);
    }

    /// Add a server profile (for test setup)
    pub fn add_profile(&self, profile: Profile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    /// Deployment requests received so far
    pub fn deployments(&self) -> Vec<DeployTemplateRequest> {
        self.deployments.lock().unwrap().clone()
    }

    fn insert_new_template(&self, name: &str, description: Option<String>, view_type_id: i64, source_device_id: i64) -> Result<i64, OmeError> {
        if self.templates.lock().unwrap().values().any(|t| t.name == name) {
            return Err(rejected(format!(
                "Unable to complete the operation because the template name {} is already in use.",
                name
            )));
        }
        let id = self.next_id();
        let task_id = self.start_job();
        let template = Template {
            id,
            name: name.to_string(),
            description,
            source_device_id,
            type_id: TEMPLATE_TYPE_SERVER,
            view_type_id,
            task_id,
            status: 2060,
            ..Default::default()
        };
        self.templates.lock().unwrap().insert(id, template);
        self.template_attributes.lock().unwrap().insert(
            id,
            AttributeDetails {
                id,
                name: name.to_string(),
                attribute_groups: self.attribute_seed.lock().unwrap().clone(),
            },
        );
        let network = self.network_seed.lock().unwrap().clone();
        self.template_networks.lock().unwrap().insert(id, network);
        Ok(id)
    }

    fn has_profiles(&self, template_id: i64) -> bool {
        self.profiles
            .lock()
            .unwrap()
            .values()
            .any(|p| p.template_id == template_id)
    }
}

pub async fn create_template(client: &MockOmeClient, request: &CreateTemplateRequest) -> Result<i64, OmeError> {
    client.enter("create_template")?;
    if !client.devices.lock().unwrap().contains_key(&request.source_device_id) {
        return Err(rejected(format!(
            "Unable to create the template because the device {} is not found.",
            request.source_device_id
        )));
    }
    client.insert_new_template(
        &request.name,
        request.description.clone(),
        request.view_type_id,
        request.source_device_id,
    )
}

pub async fn import_template(client: &MockOmeClient, request: &ImportTemplateRequest) -> Result<i64, OmeError> {
    client.enter("import_template")?;
    if request.content.trim().is_empty() {
        return Err(rejected("Unable to import the template because the content is empty."));
    }
    let id = client.insert_new_template(&request.name, None, request.view_type_id, 0)?;
    client
        .template_contents
        .lock()
        .unwrap()
        .insert(id, request.content.clone());
    Ok(id)
}

pub async fn clone_template(client: &MockOmeClient, request: &CloneTemplateRequest) -> Result<i64, OmeError> {
    client.enter("clone_template")?;
    let source = client
        .templates
        .lock()
        .unwrap()
        .get(&request.source_template_id)
        .cloned()
        .ok_or_else(|| not_found("Template", request.source_template_id))?;
    if source.view_type_id == ViewType::Compliance.id() && request.view_type_id == ViewType::Deployment.id() {
        return Err(rejected(
            "Unable to clone the template because a compliance template cannot be cloned to a deployment template.",
        ));
    }
    let id = client.insert_new_template(
        &request.new_template_name,
        None,
        request.view_type_id,
        source.source_device_id,
    )?;
    let attributes = client
        .template_attributes
        .lock()
        .unwrap()
        .get(&source.id)
        .cloned();
    if let Some(mut attributes) = attributes {
        attributes.id = id;
        attributes.name = request.new_template_name.clone();
        client.template_attributes.lock().unwrap().insert(id, attributes);
    }
    let network = client.template_networks.lock().unwrap().get(&source.id).cloned();
    if let Some(network) = network {
        client.template_networks.lock().unwrap().insert(id, network);
    }
    Ok(id)
}

pub async fn get_template(client: &MockOmeClient, id: i64) -> Result<Template, OmeError> {
    client.enter("get_template")?;
    client
        .templates
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found("Template", id))
}

pub async fn get_template_by_name(client: &MockOmeClient, name: &str) -> Result<Option<Template>, OmeError> {
    client.enter("get_template_by_name")?;
    Ok(client
        .templates
        .lock()
        .unwrap()
        .values()
        .find(|t| t.name == name)
        .cloned())
}

pub async fn list_templates(client: &MockOmeClient) -> Result<Vec<Template>, OmeError> {
    client.enter("list_templates")?;
    let mut templates: Vec<Template> = client.templates.lock().unwrap().values().cloned().collect();
    templates.sort_by_key(|t| t.id);
    Ok(templates)
}

fn find_attribute<'a>(groups: &'a mut [AttributeGroup], id: i64) -> Option<&'a mut Attribute> {
    for group in groups.iter_mut() {
        if let Some(attribute) = group.attributes.iter_mut().find(|a| a.attribute_id == id) {
            return Some(attribute);
        }
        if let Some(attribute) = find_attribute(&mut group.sub_attribute_groups, id) {
            return Some(attribute);
        }
    }
    None
}

pub async fn update_template(client: &MockOmeClient, request: &UpdateTemplateRequest) -> Result<(), OmeError> {
    client.enter("update_template")?;
    if client.has_profiles(request.id) {
        return Err(rejected(
            "Unable to update the template because it is associated with one or more deployments.",
        ));
    }
    let mut templates = client.templates.lock().unwrap();
    let template = templates
        .get_mut(&request.id)
        .ok_or_else(|| not_found("Template", request.id))?;
    let mut all_attributes = client.template_attributes.lock().unwrap();
    let details = all_attributes.entry(request.id).or_default();
    for update in &request.attributes {
        let attribute = find_attribute(&mut details.attribute_groups, update.id).ok_or_else(|| {
            rejected(format!(
                "Unable to update the template because the attribute {} is not found.",
                update.id
            ))
        })?;
        attribute.value = Some(update.value.clone());
        attribute.is_ignored = update.is_ignored;
    }
    template.name = request.name.clone();
    details.name = request.name.clone();
    if request.description.is_some() {
        template.description = request.description.clone();
    }
    Ok(())
}

pub async fn delete_template(client: &MockOmeClient, id: i64) -> Result<(), OmeError> {
    client.enter("delete_template")?;
    if client.has_profiles(id) {
        return Err(rejected(
            "Unable to delete the template because it is associated with one or more deployments.",
        ));
    }
    client
        .templates
        .lock()
        .unwrap()
        .remove(&id)
        .ok_or_else(|| not_found("Template", id))?;
    client.template_attributes.lock().unwrap().remove(&id);
    client.template_networks.lock().unwrap().remove(&id);
    Ok(())
}

pub async fn get_template_attributes(client: &MockOmeClient, id: i64) -> Result<AttributeDetails, OmeError> {
    client.enter("get_template_attributes")?;
    if !client.templates.lock().unwrap().contains_key(&id) {
        return Err(not_found("Template", id));
    }
    Ok(client
        .template_attributes
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .unwrap_or_default())
}

pub async fn get_template_network(client: &MockOmeClient, id: i64) -> Result<TemplateNetwork, OmeError> {
    client.enter("get_template_network")?;
    if !client.templates.lock().unwrap().contains_key(&id) {
        return Err(not_found("Template", id));
    }
    Ok(client
        .template_networks
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .unwrap_or_default())
}

pub async fn update_template_network(client: &MockOmeClient, request: &UpdateNetworkConfigRequest) -> Result<(), OmeError> {
    client.enter("update_template_network")?;
    if request.identity_pool_id != 0 && !client.identity_pools.lock().unwrap().contains_key(&request.identity_pool_id) {
        return Err(rejected(format!(
            "Unable to update the network configuration because the identity pool {} is not found.",
            request.identity_pool_id
        )));
    }
    let mut templates = client.templates.lock().unwrap();
    let template = templates
        .get_mut(&request.template_id)
        .ok_or_else(|| not_found("Template", request.template_id))?;
    let mut networks = client.template_networks.lock().unwrap();
    let network = networks.entry(request.template_id).or_default();
    for vlan in &request.vlan_attributes {
        let port = network
            .ports
            .iter_mut()
            .find(|p| p.component_id == vlan.component_id)
            .ok_or_else(|| {
                rejected(format!(
                    "Unable to update the network configuration because the component {} is not found.",
                    vlan.component_id
                ))
            })?;
        port.untagged_network = vlan.untagged;
        port.tagged_networks = vlan.tagged.clone();
        port.is_nic_bonded = vlan.is_nic_bonded;
    }
    if !request.bonding_technology.is_empty() {
        network.bonding_technology = request.bonding_technology.clone();
    }
    network.propagate_vlan = request.propagate_vlan;
    template.identity_pool_id = request.identity_pool_id;
    Ok(())
}

pub async fn export_template(client: &MockOmeClient, id: i64) -> Result<String, OmeError> {
    client.enter("export_template")?;
    let template = client
        .templates
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found("Template", id))?;
    let stored = client.template_contents.lock().unwrap().get(&id).cloned();
    Ok(stored.unwrap_or_else(|| {
        format!(
            "<SystemConfiguration Model=\"\" ServiceTag=\"\" TimeStamp=\"\"><!-- {} --></SystemConfiguration>",
            template.name
        )
    }))
}

pub async fn list_identity_pools(client: &MockOmeClient) -> Result<Vec<IdentityPool>, OmeError> {
    client.enter("list_identity_pools")?;
    let mut pools: Vec<IdentityPool> = client.identity_pools.lock().unwrap().values().cloned().collect();
    pools.sort_by_key(|p| p.id);
    Ok(pools)
}

pub async fn list_vlan_networks(client: &MockOmeClient) -> Result<Vec<VlanNetwork>, OmeError> {
    client.enter("list_vlan_networks")?;
    let mut networks: Vec<VlanNetwork> = client.vlan_networks.lock().unwrap().values().cloned().collect();
    networks.sort_by_key(|n| n.id);
    Ok(networks)
}

pub async fn deploy_template(client: &MockOmeClient, request: &DeployTemplateRequest) -> Result<i64, OmeError> {
    client.enter("deploy_template")?;
    let template = client
        .templates
        .lock()
        .unwrap()
        .get(&request.id)
        .cloned()
        .ok_or_else(|| not_found("Template", request.id))?;
    let devices = client.devices.lock().unwrap().clone();
    for target in &request.target_ids {
        if !devices.contains_key(target) {
            return Err(rejected(format!(
                "Unable to deploy the template because the device {} is not found.",
                target
            )));
        }
    }
    client.deployments.lock().unwrap().push(request.clone());
    for target in &request.target_ids {
        let exists = client
            .profiles
            .lock()
            .unwrap()
            .values()
            .any(|p| p.template_id == template.id && p.target_id == *target);
        if exists {
            continue;
        }
        let id = client.next_id();
        let target_name = devices.get(target).map(|d| d.device_name.clone()).unwrap_or_default();
        client.profiles.lock().unwrap().insert(
            id,
            Profile {
                id,
                profile_name: format!("Profile from template '{}' {:05}", template.name, id),
                template_id: template.id,
                template_name: template.name.clone(),
                target_id: *target,
                target_name,
                profile_state: 4,
            },
        );
    }
    Ok(client.start_job())
}

pub async fn list_profiles_by_template(client: &MockOmeClient, template_id: i64) -> Result<Vec<Profile>, OmeError> {
    client.enter("list_profiles_by_template")?;
    let mut profiles: Vec<Profile> = client
        .profiles
        .lock()
        .unwrap()
        .values()
        .filter(|p| p.template_id == template_id)
        .cloned()
        .collect();
    profiles.sort_by_key(|p| p.id);
    Ok(profiles)
}

pub async fn delete_profiles(client: &MockOmeClient, profile_ids: &[i64]) -> Result<(), OmeError> {
    client.enter("delete_profiles")?;
    let mut profiles = client.profiles.lock().unwrap();
    for id in profile_ids {
        profiles.remove(id).ok_or_else(|| not_found("Profile", id))?;
    }
    Ok(())
}
