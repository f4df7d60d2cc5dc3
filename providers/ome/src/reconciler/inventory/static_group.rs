//! `ome_static_group`
//!
//! A static group and its member devices. Membership is reconciled by ID
//! set difference: members are added first, then removed.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::{read_or_gone, set_diff};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{Group, GroupModel, MEMBERSHIP_TYPE_STATIC};
use ome_schema::StaticGroupState;
use tracing::{debug, info};

/// Root of all static groups in OME
pub const STATIC_GROUPS_ROOT: &str = "Static Groups";

/// Reconciler for static groups
#[derive(Debug, Default)]
pub struct StaticGroupResource;

impl StaticGroupResource {
    /// Parent group ID; 0 stands for the `Static Groups` root
    async fn parent_id(&self, ctx: &Context<'_>, parent_id: i64, summary: &str) -> Result<i64, ProviderError> {
        if parent_id != 0 {
            return Ok(parent_id);
        }
        ctx.client
            .get_group_by_name(STATIC_GROUPS_ROOT)
            .await
            .or_fail(summary)?
            .map(|g| g.id)
            .ok_or_else(|| ProviderError::failed(summary, format!("group {} not found", STATIC_GROUPS_ROOT)))
    }

    async fn member_ids(&self, ctx: &Context<'_>, group_id: i64, summary: &str) -> Result<Vec<i64>, ProviderError> {
        let mut ids: Vec<i64> = ctx
            .client
            .get_group_devices(group_id)
            .await
            .or_fail(summary)?
            .iter()
            .map(|d| d.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Add then remove members so the group holds exactly `desired`
    async fn reconcile_members(
        &self,
        ctx: &Context<'_>,
        group_id: i64,
        current: &[i64],
        desired: &[i64],
    ) -> Result<(), ProviderError> {
        let (add, remove) = set_diff(current, desired);
        if !add.is_empty() {
            info!("Adding {} devices to group {}", add.len(), group_id);
            ctx.client
                .add_group_members(group_id, &add)
                .await
                .or_fail("Error while adding group devices")?;
        }
        if !remove.is_empty() {
            info!("Removing {} devices from group {}", remove.len(), group_id);
            ctx.client
                .remove_group_members(group_id, &remove)
                .await
                .or_fail("Error while removing group devices")?;
        }
        Ok(())
    }

    /// State as OME reports it; a group under the root keeps parent 0 unless `planned_parent` named the root's ID
    async fn observe(
        &self,
        ctx: &Context<'_>,
        group: Group,
        planned_parent: i64,
        summary: &str,
    ) -> Result<StaticGroupState, ProviderError> {
        let parent_id = if planned_parent == 0 && group.parent_id == self.parent_id(ctx, 0, summary).await? {
            0
        } else {
            group.parent_id
        };
        Ok(StaticGroupState {
            id: group.id,
            device_ids: self.member_ids(ctx, group.id, summary).await?,
            name: group.name,
            description: group.description.unwrap_or_default(),
            parent_id,
        })
    }
}

#[async_trait]
impl Resource for StaticGroupResource {
    type State = StaticGroupState;
    const TYPE_NAME: &'static str = "ome_static_group";

    fn validate(&self, plan: &StaticGroupState) -> Result<(), ProviderError> {
        validators::not_blank("name", &plan.name)?;
        validators::unique("device_ids", &plan.device_ids)?;
        if plan.parent_id < 0 {
            return Err(ProviderError::Validation(
                "Attribute parent_id must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    async fn create(&self, ctx: &Context<'_>, plan: &StaticGroupState) -> Result<StaticGroupState, ProviderError> {
        let summary = "Error creating group";
        let model = GroupModel {
            id: None,
            name: plan.name.clone(),
            description: plan.description.clone(),
            membership_type_id: MEMBERSHIP_TYPE_STATIC,
            parent_id: self.parent_id(ctx, plan.parent_id, summary).await?,
        };
        let id = ctx.client.create_group(&model).await.or_fail(summary)?;
        info!("Created group {} (ID: {})", plan.name, id);

        self.reconcile_members(ctx, id, &[], &plan.device_ids).await?;
        let group = ctx.client.get_group(id).await.or_fail(summary)?;
        self.observe(ctx, group, plan.parent_id, summary).await
    }

    async fn read(&self, ctx: &Context<'_>, state: &StaticGroupState) -> Result<Option<StaticGroupState>, ProviderError> {
        let summary = "Error reading";
        let Some(group) = read_or_gone(ctx, ctx.client.get_group(state.id), "Group", state.id, summary).await? else {
            return Ok(None);
        };
        self.observe(ctx, group, state.parent_id, summary).await.map(Some)
    }

    async fn update(
        &self,
        ctx: &Context<'_>,
        state: &StaticGroupState,
        plan: &StaticGroupState,
    ) -> Result<StaticGroupState, ProviderError> {
        let summary = "Error updating group";
        let parent_id = self.parent_id(ctx, plan.parent_id, summary).await?;
        let current_parent = self.parent_id(ctx, state.parent_id, summary).await?;
        if plan.name != state.name || plan.description != state.description || parent_id != current_parent {
            let model = GroupModel {
                id: Some(state.id),
                name: plan.name.clone(),
                description: plan.description.clone(),
                membership_type_id: MEMBERSHIP_TYPE_STATIC,
                parent_id,
            };
            ctx.client.update_group(&model).await.or_fail(summary)?;
            debug!("Updated group {} (ID: {})", plan.name, state.id);
        }

        let current = self.member_ids(ctx, state.id, summary).await?;
        self.reconcile_members(ctx, state.id, &current, &plan.device_ids).await?;
        let group = ctx.client.get_group(state.id).await.or_fail(summary)?;
        self.observe(ctx, group, plan.parent_id, summary).await
    }

    async fn delete(&self, ctx: &Context<'_>, state: &StaticGroupState) -> Result<(), ProviderError> {
        info!("Deleting group {} ({})", state.name, state.id);
        match ctx.client.delete_group(state.id).await {
            Err(e) if e.is_not_found() => {
                debug!("Group {} already gone", state.id);
                Ok(())
            }
            other => other.or_fail("Error deleting group"),
        }
    }

    async fn import(&self, ctx: &Context<'_>, id: &str) -> Result<StaticGroupState, ProviderError> {
        let summary = "Error importing group";
        let group = match id.parse::<i64>() {
            Ok(numeric) => ctx.client.get_group(numeric).await.or_fail(summary)?,
            Err(_) => ctx
                .client
                .get_group_by_name(id)
                .await
                .or_fail(summary)?
                .ok_or_else(|| ProviderError::failed(summary, format!("group {} not found", id)))?,
        };
        if !group.is_static() {
            return Err(ProviderError::failed(
                summary,
                format!("group {} is not a static group", group.name),
            ));
        }
        self.observe(ctx, group, 0, summary).await
    }
}
