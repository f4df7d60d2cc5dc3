//! GroupService operations

use crate::client::OmeClient;
use crate::common::odata::eq_filter;
use crate::error::OmeError;
use crate::models::*;
use serde::Serialize;
use tracing::debug;

const GROUPS_PATH: &str = "/api/GroupService/Groups";
const ACTIONS_PATH: &str = "/api/GroupService/Actions";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DeleteGroupRequest {
    group_ids: Vec<i64>,
}

impl OmeClient {
    /// Create a group
    ///
    /// # Arguments
    /// * `model` - Name, description, parent and membership type
    ///
    /// # Returns
    /// * `Ok(i64)` - ID of the new group
    /// * `Err(OmeError)` - If OME rejects the group (e.g. duplicate name under the parent)
    pub async fn create_group(&self, model: &GroupModel) -> Result<i64, OmeError> {
        debug!("Creating group {} under {}", model.name, model.parent_id);
        let request = GroupRequest {
            group_model: model.clone(),
        };
        self.http
            .post(&format!("{}/GroupService.CreateGroup", ACTIONS_PATH), &request)
            .await
    }

    /// Update a group; `model.id` selects the group
    pub async fn update_group(&self, model: &GroupModel) -> Result<(), OmeError> {
        debug!("Updating group {:?}", model.id);
        let request = GroupRequest {
            group_model: model.clone(),
        };
        self.http
            .post_no_content(&format!("{}/GroupService.UpdateGroup", ACTIONS_PATH), &request)
            .await
    }

    /// Delete a group
    pub async fn delete_group(&self, id: i64) -> Result<(), OmeError> {
        debug!("Deleting group {}", id);
        self.http
            .post_no_content(
                &format!("{}/GroupService.DeleteGroup", ACTIONS_PATH),
                &DeleteGroupRequest { group_ids: vec![id] },
            )
            .await
    }

    /// Get a group by ID
    pub async fn get_group(&self, id: i64) -> Result<Group, OmeError> {
        self.http.get(&format!("{}({})", GROUPS_PATH, id)).await
    }

    /// Look a group up by its exact name
    pub async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>, OmeError> {
        let path = format!("{}{}", GROUPS_PATH, eq_filter("Name", name));
        let groups: Vec<Group> = self.http.get_collection(&path).await?;
        Ok(groups.into_iter().find(|g| g.name == name))
    }

    /// List the devices that are members of a group
    pub async fn get_group_devices(&self, group_id: i64) -> Result<Vec<Device>, OmeError> {
        self.http
            .get_collection(&format!("{}({})/Devices", GROUPS_PATH, group_id))
            .await
    }

    /// Add devices to a static group
    pub async fn add_group_members(&self, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError> {
        debug!("Adding devices {:?} to group {}", device_ids, group_id);
        let request = GroupMembersRequest {
            group_id,
            member_device_ids: device_ids.to_vec(),
        };
        self.http
            .post_no_content(&format!("{}/GroupService.AddMemberDevices", ACTIONS_PATH), &request)
            .await
    }

    /// Remove devices from a static group
    pub async fn remove_group_members(&self, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError> {
        debug!("Removing devices {:?} from group {}", device_ids, group_id);
        let request = GroupMembersRequest {
            group_id,
            member_device_ids: device_ids.to_vec(),
        };
        self.http
            .post_no_content(&format!("{}/GroupService.RemoveMemberDevices", ACTIONS_PATH), &request)
            .await
    }
}
