//! Group operations for MockOmeClient

use super::{MockOmeClient, not_found, rejected};
use crate::error::OmeError;
use crate::models::*;

impl MockOmeClient {
    /// Add a group to the mock store (for test setup)
    pub fn add_group(&self, group: Group, member_ids: &[i64]) {
        self.group_members
            .lock()
            .unwrap()
            .insert(group.id, member_ids.iter().copied().collect());
        self.groups.lock().unwrap().insert(group.id, group);
    }

    /// Current member ids of a group, ascending
    pub fn group_member_ids(&self, group_id: i64) -> Vec<i64> {
        self.group_members
            .lock()
            .unwrap()
            .get(&group_id)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default()
    }
}

pub async fn create_group(client: &MockOmeClient, model: &GroupModel) -> Result<i64, OmeError> {
    client.enter("create_group")?;
    if client
        .groups
        .lock()
        .unwrap()
        .values()
        .any(|g| g.name == model.name && g.parent_id == model.parent_id)
    {
        return Err(rejected(format!(
            "Unable to create the group because a group with name {} already exists.",
            model.name
        )));
    }
    let id = client.next_id();
    client.groups.lock().unwrap().insert(
        id,
        Group {
            id,
            name: model.name.clone(),
            description: Some(model.description.clone()),
            parent_id: model.parent_id,
            membership_type_id: model.membership_type_id,
            ..Default::default()
        },
    );
    client.group_members.lock().unwrap().insert(id, Default::default());
    Ok(id)
}

pub async fn update_group(client: &MockOmeClient, model: &GroupModel) -> Result<(), OmeError> {
    client.enter("update_group")?;
    let id = model
        .id
        .ok_or_else(|| OmeError::InvalidRequest("group update requires an id".to_string()))?;
    let mut groups = client.groups.lock().unwrap();
    let group = groups.get_mut(&id).ok_or_else(|| not_found("Group", id))?;
    group.name = model.name.clone();
    group.description = Some(model.description.clone());
    group.parent_id = model.parent_id;
    Ok(())
}

pub async fn delete_group(client: &MockOmeClient, id: i64) -> Result<(), OmeError> {
    client.enter("delete_group")?;
    client
        .groups
        .lock()
        .unwrap()
        .remove(&id)
        .ok_or_else(|| not_found("Group", id))?;
    client.group_members.lock().unwrap().remove(&id);
    Ok(())
}

pub async fn get_group(client: &MockOmeClient, id: i64) -> Result<Group, OmeError> {
    client.enter("get_group")?;
    client
        .groups
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found("Group", id))
}

pub async fn get_group_by_name(client: &MockOmeClient, name: &str) -> Result<Option<Group>, OmeError> {
    client.enter("get_group_by_name")?;
    Ok(client
        .groups
        .lock()
        .unwrap()
        .values()
        .find(|g| g.name == name)
        .cloned())
}

pub async fn get_group_devices(client: &MockOmeClient, group_id: i64) -> Result<Vec<Device>, OmeError> {
    client.enter("get_group_devices")?;
    let members = client
        .group_members
        .lock()
        .unwrap()
        .get(&group_id)
        .cloned()
        .ok_or_else(|| not_found("Group", group_id))?;
    let devices = client.devices.lock().unwrap();
    Ok(members.iter().filter_map(|id| devices.get(id).cloned()).collect())
}

pub async fn add_group_members(client: &MockOmeClient, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError> {
    client.enter("add_group_members")?;
    {
        let devices = client.devices.lock().unwrap();
        if let Some(missing) = device_ids.iter().find(|id| !devices.contains_key(*id)) {
            return Err(rejected(format!(
                "Unable to add the devices because the device {} is not found.",
                missing
            )));
        }
    }
    let mut members = client.group_members.lock().unwrap();
    let set = members.get_mut(&group_id).ok_or_else(|| not_found("Group", group_id))?;
    set.extend(device_ids.iter().copied());
    Ok(())
}

pub async fn remove_group_members(client: &MockOmeClient, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError> {
    client.enter("remove_group_members")?;
    let mut members = client.group_members.lock().unwrap();
    let set = members.get_mut(&group_id).ok_or_else(|| not_found("Group", group_id))?;
    for id in device_ids {
        set.remove(id);
    }
    Ok(())
}
