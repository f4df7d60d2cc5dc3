//! User account models (AccountService)

use serde::{Deserialize, Serialize};

/// User account (`/api/AccountService/Accounts('{id}')`)
///
/// OME exposes account ids as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Account {
    pub id: String,
    pub user_type_id: i64,
    pub directory_service_id: i64,
    pub description: Option<String>,
    pub name: String,
    pub user_name: String,
    pub role_id: String,
    pub locked: bool,
    pub is_built_in: bool,
    pub enabled: bool,
}

/// Request body to create or update an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_type_id: i64,
    pub directory_service_id: i64,
    pub description: String,
    pub user_name: String,
    /// Omitted on updates that keep the current password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role_id: String,
    pub locked: bool,
    pub enabled: bool,
}
