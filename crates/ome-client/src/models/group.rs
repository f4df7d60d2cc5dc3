//! Device group models (GroupService)

use serde::{Deserialize, Serialize};

/// Membership type id of a static group
pub const MEMBERSHIP_TYPE_STATIC: i64 = 12;
/// Membership type id of a query group
pub const MEMBERSHIP_TYPE_QUERY: i64 = 24;

/// Group model (`/api/GroupService/Groups({id})`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: i64,
    pub membership_type_id: i64,
    pub type_id: i64,
    pub global_status: i64,
    pub created_by: String,
    pub updated_by: String,
}

impl Group {
    /// True for groups whose members are added explicitly
    pub fn is_static(&self) -> bool {
        self.membership_type_id == MEMBERSHIP_TYPE_STATIC
    }
}

/// Group fields sent on create/update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub membership_type_id: i64,
    pub parent_id: i64,
}

/// Request wrapper for `GroupService.CreateGroup` / `GroupService.UpdateGroup`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupRequest {
    pub group_model: GroupModel,
}

/// Request body for `GroupService.AddMemberDevices` / `GroupService.RemoveMemberDevices`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupMembersRequest {
    pub group_id: i64,
    pub member_device_ids: Vec<i64>,
}
