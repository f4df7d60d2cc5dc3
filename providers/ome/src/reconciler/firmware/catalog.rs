//! `ome_firmware_catalog`
//!
//! A catalog points OME at a firmware repository: Dell online, or a catalog file
//! on an NFS, CIFS, HTTP or HTTPS share. Automatic catalogs carry a refresh
//! schedule, sent to OME as a Quartz cron expression. OME downloads the catalog
//! in a job that is tracked after every create and update.

use crate::error::{ProviderError, ResultExt};
use crate::reconcile_helpers::{keep_order, read_or_gone, track_job};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{Catalog, CatalogRequest, CatalogSchedule, Repository};
use ome_schema::{AssociatedBaselineState, CatalogRefreshScheduleState, FirmwareCatalogState};
use tracing::{debug, info};

const JOB_RETRIES: u32 = 5;
const JOB_INTERVAL_SECS: i64 = 30;

const MANUAL: &str = "Manual";
const AUTOMATIC: &str = "Automatic";
const DELL_ONLINE: &str = "DELL_ONLINE";
const DELL_ONLINE_SOURCE: &str = "downloads.dell.com";

const SHARE_TYPES: [&str; 5] = [DELL_ONLINE, "NFS", "CIFS", "HTTP", "HTTPS"];
const WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// Reconciler for firmware catalogs
#[derive(Debug, Default)]
pub struct FirmwareCatalogResource;

fn is_automatic(state: &FirmwareCatalogState) -> bool {
    state.catalog_update_type == AUTOMATIC
}

fn valid_schedule(schedule: &CatalogRefreshScheduleState) -> bool {
    let weekday_ok = match schedule.cadence.as_str() {
        "Daily" => true,
        "Weekly" => WEEKDAYS.iter().any(|d| d.eq_ignore_ascii_case(&schedule.day_of_the_week)),
        _ => false,
    };
    weekday_ok && (1..=12).contains(&schedule.time_of_day) && matches!(schedule.am_pm.as_str(), "AM" | "PM")
}

/// Which connection attributes each share type takes
fn valid_share(plan: &FirmwareCatalogState) -> bool {
    let set = |v: &str| !v.trim().is_empty();
    let has_location = set(&plan.share_address) && set(&plan.catalog_file_path);
    let has_credentials = set(&plan.share_user) && set(&plan.share_password);
    let no_credentials = !set(&plan.share_user) && !set(&plan.share_password) && !set(&plan.domain);
    match plan.share_type.as_str() {
        DELL_ONLINE => {
            !set(&plan.share_address) && !set(&plan.catalog_file_path) && no_credentials && !plan.is_certificate_verified
        }
        "NFS" => has_location && no_credentials && !plan.is_certificate_verified,
        "CIFS" => has_location && has_credentials && !plan.is_certificate_verified,
        "HTTP" => has_location && !set(&plan.domain) && !plan.is_certificate_verified,
        "HTTPS" => has_location && !set(&plan.domain),
        _ => false,
    }
}

/// Hour on a 24 hour clock
fn hour_of_day(time_of_day: i64, am_pm: &str) -> i64 {
    match (time_of_day % 12, am_pm) {
        (h, "PM") => h + 12,
        (h, _) => h,
    }
}

/// Quartz cron for a refresh schedule
pub fn refresh_cron(schedule: &CatalogRefreshScheduleState) -> String {
    let hour = hour_of_day(schedule.time_of_day, &schedule.am_pm);
    if schedule.cadence == "Weekly" {
        let day: String = schedule.day_of_the_week.chars().take(3).collect();
        format!("0 0 {} ? * {} *", hour, day.to_ascii_uppercase())
    } else {
        format!("0 0 {} * * ? *", hour)
    }
}

/// Refresh schedule of a Quartz cron, weekday spelled as in `known` when it matches
pub fn parse_refresh_cron(cron: &str, known: Option<&CatalogRefreshScheduleState>) -> Option<CatalogRefreshScheduleState> {
    let fields: Vec<&str> = cron.split_whitespace().collect();
    if fields.len() < 6 {
        return None;
    }
    let hour: i64 = fields[2].parse().ok().filter(|h| (0..24).contains(h))?;
    let (time_of_day, am_pm) = match hour {
        0 => (12, "AM"),
        12 => (12, "PM"),
        h if h > 12 => (h - 12, "PM"),
        h => (h, "AM"),
    };
    let mut schedule = CatalogRefreshScheduleState {
        cadence: "Daily".to_string(),
        time_of_day,
        am_pm: am_pm.to_string(),
        ..Default::default()
    };
    if fields[5] != "?" && fields[5] != "*" {
        let day = WEEKDAYS
            .iter()
            .find(|d| d[..3].eq_ignore_ascii_case(fields[5]))?
            .to_string();
        schedule.cadence = "Weekly".to_string();
        schedule.day_of_the_week = known
            .map(|k| k.day_of_the_week.clone())
            .filter(|k| k.eq_ignore_ascii_case(&day))
            .unwrap_or(day);
    }
    Some(schedule)
}

/// Split a catalog file path into OME's source path and file name
fn split_path(path: &str) -> (String, String) {
    match path.rsplit_once('/') {
        Some(("", file)) => ("/".to_string(), file.to_string()),
        Some((dir, file)) => (dir.to_string(), file.to_string()),
        None => (String::new(), path.to_string()),
    }
}

fn join_path(source_path: &str, filename: &str) -> String {
    if source_path.is_empty() {
        filename.to_string()
    } else if source_path.ends_with('/') {
        format!("{}{}", source_path, filename)
    } else {
        format!("{}/{}", source_path, filename)
    }
}

impl FirmwareCatalogResource {
    fn request(&self, id: Option<i64>, plan: &FirmwareCatalogState) -> CatalogRequest {
        let online = plan.share_type == DELL_ONLINE;
        let (source_path, filename) = if online {
            (String::new(), String::new())
        } else {
            split_path(&plan.catalog_file_path)
        };
        CatalogRequest {
            id,
            filename,
            source_path,
            repository: Repository {
                id: (plan.repository_id != 0).then_some(plan.repository_id),
                name: plan.name.clone(),
                description: Some(plan.description.clone()),
                source: if online {
                    DELL_ONLINE_SOURCE.to_string()
                } else {
                    plan.share_address.clone()
                },
                domain_name: plan.domain.clone(),
                username: plan.share_user.clone(),
                password: plan.share_password.clone(),
                check_certificate: plan.is_certificate_verified,
                repository_type: plan.share_type.clone(),
                backup_existing_catalog: None,
            },
            schedule: plan
                .catalog_refresh_schedule
                .as_ref()
                .filter(|_| is_automatic(plan))
                .map(|s| CatalogSchedule { cron: refresh_cron(s) }),
        }
    }

    async fn refresh(&self, ctx: &Context<'_>, catalog: &Catalog, summary: &str) -> Result<Catalog, ProviderError> {
        if catalog.task_id != 0 {
            track_job(ctx, catalog.task_id, JOB_RETRIES, JOB_INTERVAL_SECS, summary).await?;
        }
        ctx.client.get_catalog(catalog.id).await.or_fail(summary)
    }

    /// State as OME reports it; the share password comes from `base` since OME never returns it
    fn observe(&self, catalog: &Catalog, base: &FirmwareCatalogState) -> FirmwareCatalogState {
        let repository = &catalog.repository;
        let online = repository.repository_type == DELL_ONLINE;
        let update_type = if catalog.schedule.is_some() { AUTOMATIC } else { MANUAL };
        FirmwareCatalogState {
            id: catalog.id,
            name: repository.name.clone(),
            description: repository.description.clone().unwrap_or_default(),
            catalog_update_type: if base.catalog_update_type.is_empty() && update_type == MANUAL {
                String::new()
            } else {
                update_type.to_string()
            },
            share_type: repository.repository_type.clone(),
            share_address: if online { String::new() } else { repository.source.clone() },
            catalog_file_path: if online {
                String::new()
            } else {
                join_path(&catalog.source_path, &catalog.filename)
            },
            domain: repository.domain_name.clone(),
            share_user: repository.username.clone(),
            share_password: base.share_password.clone(),
            catalog_refresh_schedule: catalog
                .schedule
                .as_ref()
                .and_then(|s| parse_refresh_cron(&s.cron, base.catalog_refresh_schedule.as_ref())),
            is_certificate_verified: repository.check_certificate,
            status: catalog.status.clone(),
            bundles_count: catalog.bundles_count,
            release_version: catalog.release_identifier.clone().unwrap_or_default(),
            last_updated: catalog.last_updated.clone().unwrap_or_default(),
            repository_id: repository.id.unwrap_or_default(),
            associated_baselines: keep_order(
                &base.associated_baselines,
                &catalog
                    .associated_baselines
                    .iter()
                    .map(|b| AssociatedBaselineState {
                        baseline_id: b.baseline_id,
                        baseline_name: b.baseline_name.clone(),
                    })
                    .collect::<Vec<_>>(),
                |a, b| a.baseline_id == b.baseline_id,
            ),
        }
    }
}

#[async_trait]
impl Resource for FirmwareCatalogResource {
    type State = FirmwareCatalogState;
    const TYPE_NAME: &'static str = "ome_firmware_catalog";

    fn validate(&self, plan: &FirmwareCatalogState) -> Result<(), ProviderError> {
        validators::not_blank("name", &plan.name)?;
        if !plan.catalog_update_type.is_empty() {
            validators::one_of("catalog_update_type", &plan.catalog_update_type, &[MANUAL, AUTOMATIC])?;
        }
        validators::one_of("share_type", &plan.share_type, &SHARE_TYPES)?;
        let schedule_ok = match (&plan.catalog_refresh_schedule, is_automatic(plan)) {
            (Some(schedule), true) => valid_schedule(schedule),
            (None, true) | (Some(_), false) => false,
            (None, false) => true,
        };
        if !schedule_ok {
            return Err(ProviderError::Validation("invalid automatic update configuration".to_string()));
        }
        if !valid_share(plan) {
            return Err(ProviderError::Validation(format!(
                "invalid {} share configuration",
                plan.share_type
            )));
        }
        Ok(())
    }

    async fn create(&self, ctx: &Context<'_>, plan: &FirmwareCatalogState) -> Result<FirmwareCatalogState, ProviderError> {
        let summary = "Unable to create catalog";
        let catalog = ctx
            .client
            .create_catalog(&self.request(None, plan))
            .await
            .or_fail(summary)?;
        info!(
            "Created catalog {} (ID: {}), refresh job {}",
            catalog.repository.name, catalog.id, catalog.task_id
        );
        let catalog = self.refresh(ctx, &catalog, summary).await?;
        Ok(self.observe(&catalog, plan))
    }

    async fn read(&self, ctx: &Context<'_>, state: &FirmwareCatalogState) -> Result<Option<FirmwareCatalogState>, ProviderError> {
        let found = read_or_gone(ctx, ctx.client.get_catalog(state.id), "Catalog", state.id, "Error reading").await?;
        Ok(found.map(|catalog| self.observe(&catalog, state)))
    }

    async fn update(
        &self,
        ctx: &Context<'_>,
        state: &FirmwareCatalogState,
        plan: &FirmwareCatalogState,
    ) -> Result<FirmwareCatalogState, ProviderError> {
        let summary = "Unable to update catalog";
        let request = self.request(
            Some(state.id),
            &FirmwareCatalogState {
                repository_id: state.repository_id,
                ..plan.clone()
            },
        );
        let catalog = ctx.client.update_catalog(&request).await.or_fail(summary)?;
        info!("Updated catalog {} (ID: {})", catalog.repository.name, state.id);
        let catalog = self.refresh(ctx, &catalog, summary).await?;
        Ok(self.observe(&catalog, plan))
    }

    async fn delete(&self, ctx: &Context<'_>, state: &FirmwareCatalogState) -> Result<(), ProviderError> {
        let summary = "Could not delete catalog";
        let catalog = match ctx.client.get_catalog(state.id).await {
            Err(e) if e.is_not_found() => {
                debug!("Catalog {} already gone", state.id);
                return Ok(());
            }
            other => other.or_fail(summary)?,
        };
        if catalog.is_running() {
            return Err(ProviderError::failed(
                summary,
                format!(
                    "catalog {} is running an update; delete it once the update has finished",
                    catalog.repository.name
                ),
            ));
        }
        info!("Deleting catalog {} ({})", state.name, state.id);
        ctx.client.delete_catalogs(&[state.id]).await.or_fail(summary)
    }

    async fn import(&self, ctx: &Context<'_>, id: &str) -> Result<FirmwareCatalogState, ProviderError> {
        let summary = "Error importing catalog";
        let catalog = match id.parse::<i64>() {
            Ok(numeric) => ctx.client.get_catalog(numeric).await.or_fail(summary)?,
            Err(_) => ctx
                .client
                .list_catalogs()
                .await
                .or_fail(summary)?
                .into_iter()
                .find(|c| c.repository.name == id)
                .ok_or_else(|| ProviderError::failed(summary, format!("catalog {} not found", id)))?,
        };
        Ok(self.observe(
            &catalog,
            &FirmwareCatalogState {
                catalog_update_type: MANUAL.to_string(),
                ..Default::default()
            },
        ))
    }
}
