//! `ome_user`
//!
//! Local or directory user account. OME never returns passwords, so the password
//! is sent on create and again only when the planned value differs from state.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::read_or_gone;
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{Account, AccountRequest};
use ome_schema::UserState;
use tracing::{debug, info};

const LOCAL_USER: i64 = 1;

/// Reconciler for user accounts
#[derive(Debug, Default)]
pub struct UserResource;

fn request(id: Option<String>, plan: &UserState, password: Option<String>) -> AccountRequest {
    AccountRequest {
        id,
        user_type_id: plan.user_type_id.unwrap_or(LOCAL_USER),
        directory_service_id: plan.directory_service_id,
        description: plan.description.clone(),
        user_name: plan.username.clone(),
        password,
        role_id: plan.role_id.clone(),
        locked: plan.locked,
        enabled: plan.enabled.unwrap_or(true),
    }
}

fn observe(account: &Account, base: &UserState) -> UserState {
    UserState {
        id: account.id.clone(),
        username: account.user_name.clone(),
        password: base.password.clone(),
        role_id: account.role_id.clone(),
        user_type_id: match base.user_type_id {
            None if account.user_type_id == LOCAL_USER => None,
            _ => Some(account.user_type_id),
        },
        directory_service_id: account.directory_service_id,
        description: account.description.clone().unwrap_or_default(),
        locked: account.locked,
        enabled: match base.enabled {
            None if account.enabled => None,
            _ => Some(account.enabled),
        },
    }
}

#[async_trait]
impl Resource for UserResource {
    type State = UserState;
    const TYPE_NAME: &'static str = "ome_user";

    fn validate(&self, plan: &UserState) -> Result<(), ProviderError> {
        validators::not_blank("username", &plan.username)?;
        validators::not_blank("password", &plan.password)?;
        validators::not_blank("role_id", &plan.role_id)?;
        if plan.user_type_id.is_some_and(|t| t < 1) {
            return Err(ProviderError::Validation(
                "Attribute user_type_id must be a positive OME user type".to_string(),
            ));
        }
        Ok(())
    }

    async fn create(&self, ctx: &Context<'_>, plan: &UserState) -> Result<UserState, ProviderError> {
        let account = ctx
            .client
            .create_account(&request(None, plan, Some(plan.password.clone())))
            .await
            .or_fail("Error creating user")?;
        info!("Created user {} (ID: {})", account.user_name, account.id);
        Ok(observe(&account, plan))
    }

    async fn read(&self, ctx: &Context<'_>, state: &UserState) -> Result<Option<UserState>, ProviderError> {
        let found = read_or_gone(ctx, ctx.client.get_account(&state.id), "User", &state.id, "Error reading").await?;
        Ok(found.map(|account| observe(&account, state)))
    }

    async fn update(&self, ctx: &Context<'_>, state: &UserState, plan: &UserState) -> Result<UserState, ProviderError> {
        let password = (plan.password != state.password).then(|| plan.password.clone());
        if password.is_some() {
            debug!("Password of user {} changes", state.username);
        }
        let account = ctx
            .client
            .update_account(&request(Some(state.id.clone()), plan, password))
            .await
            .or_fail("Error updating user")?;
        info!("Updated user {} (ID: {})", account.user_name, account.id);
        Ok(observe(&account, plan))
    }

    async fn delete(&self, ctx: &Context<'_>, state: &UserState) -> Result<(), ProviderError> {
        info!("Deleting user {} ({})", state.username, state.id);
        match ctx.client.delete_account(&state.id).await {
            Err(e) if e.is_not_found() => {
                debug!("User {} already gone", state.id);
                Ok(())
            }
            other => other.or_fail("Error deleting user"),
        }
    }

    async fn import(&self, ctx: &Context<'_>, id: &str) -> Result<UserState, ProviderError> {
        let summary = "Error importing user";
        let account = match id.parse::<i64>() {
            Ok(_) => ctx.client.get_account(id).await.or_fail(summary)?,
            Err(_) => ctx
                .client
                .get_account_by_username(id)
                .await
                .or_fail(summary)?
                .ok_or_else(|| ProviderError::failed(summary, format!("user {} not found", id)))?,
        };
        Ok(observe(&account, &UserState::default()))
    }
}
