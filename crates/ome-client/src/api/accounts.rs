//! AccountService operations

use crate::client::OmeClient;
use crate::common::odata::eq_filter;
use crate::error::OmeError;
use crate::models::*;
use tracing::debug;

const ACCOUNTS_PATH: &str = "/api/AccountService/Accounts";

impl OmeClient {
    /// Create a user account
    pub async fn create_account(&self, request: &AccountRequest) -> Result<Account, OmeError> {
        debug!("Creating account {}", request.user_name);
        self.http.post(ACCOUNTS_PATH, request).await
    }

    /// Update a user account; `request.id` selects the account
    pub async fn update_account(&self, request: &AccountRequest) -> Result<Account, OmeError> {
        let id = request
            .id
            .as_deref()
            .ok_or_else(|| OmeError::InvalidRequest("account update requires an id".to_string()))?;
        debug!("Updating account {}", id);
        self.http.put(&format!("{}('{}')", ACCOUNTS_PATH, id), request).await
    }

    /// Delete a user account
    pub async fn delete_account(&self, id: &str) -> Result<(), OmeError> {
        debug!("Deleting account {}", id);
        self.http.delete(&format!("{}('{}')", ACCOUNTS_PATH, id)).await
    }

    /// Get a user account by ID
    pub async fn get_account(&self, id: &str) -> Result<Account, OmeError> {
        self.http.get(&format!("{}('{}')", ACCOUNTS_PATH, id)).await
    }

    /// Look a user account up by user name
    pub async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, OmeError> {
        let path = format!("{}{}", ACCOUNTS_PATH, eq_filter("UserName", username));
        let accounts: Vec<Account> = self.http.get_collection(&path).await?;
        Ok(accounts.into_iter().find(|a| a.user_name == username))
    }
}
