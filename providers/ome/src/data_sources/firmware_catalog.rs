//! `ome_firmware_catalog` and `ome_firmware_repository`

use crate::error::{ProviderError, ResultExt};
use crate::resource::{Context, DataSource};
use crate::validators;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDateTime, Utc, Weekday};
use ome_client::Catalog;
use ome_schema::{
    AssociatedBaselineState, CatalogInfoState, FirmwareCatalogDataSourceState, FirmwareRepositoryDataSourceState,
    RepositoryInfoState,
};
use std::collections::BTreeMap;

/// Catalogs, all of them or the ones named
#[derive(Debug, Default)]
pub struct FirmwareCatalogDataSource;

/// Next run after `now` of a daily or weekly refresh cron (`0 0 H * * ? *`, `0 0 H ? * DAY *`)
fn next_update(cron: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let fields: Vec<&str> = cron.split_whitespace().collect();
    if fields.len() < 6 {
        return None;
    }
    let hour: u32 = fields[2].parse().ok().filter(|h| *h < 24)?;
    let weekday = match fields[5] {
        "?" | "*" => None,
        day => Some(day.parse::<Weekday>().ok()?),
    };
    let mut candidate = now.date().and_hms_opt(hour, 0, 0)?;
    if candidate <= now {
        candidate += Duration::days(1);
    }
    if let Some(day) = weekday {
        while candidate.weekday() != day {
            candidate += Duration::days(1);
        }
    }
    Some(candidate)
}

fn catalog_info(catalog: Catalog, now: NaiveDateTime) -> CatalogInfoState {
    let next = catalog
        .schedule
        .as_ref()
        .and_then(|s| next_update(&s.cron, now))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    CatalogInfoState {
        id: catalog.id,
        name: catalog.repository.name,
        filename: catalog.filename,
        source_path: catalog.source_path,
        status: catalog.status,
        share_type: catalog.repository.repository_type,
        share_address: catalog.repository.source,
        manifest_version: catalog.manifest_version.unwrap_or_default(),
        release_date: catalog.release_date.unwrap_or_default(),
        bundles_count: catalog.bundles_count,
        next_update: next,
        associated_baselines: catalog
            .associated_baselines
            .into_iter()
            .map(|b| AssociatedBaselineState {
                baseline_id: b.baseline_id,
                baseline_name: b.baseline_name,
            })
            .collect(),
    }
}

/// Keep the entries named in `names`, in the order given; all when `names` is empty
fn select<T>(mut found: Vec<T>, names: &[String], name_of: impl Fn(&T) -> &str, summary: &str) -> Result<Vec<T>, ProviderError> {
    if names.is_empty() {
        return Ok(found);
    }
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let position = found
            .iter()
            .position(|item| name_of(item) == name)
            .ok_or_else(|| ProviderError::failed(summary, format!("{} not found", name)))?;
        selected.push(found.swap_remove(position));
    }
    Ok(selected)
}

impl FirmwareCatalogDataSource {
    async fn read_at(
        &self,
        ctx: &Context<'_>,
        config: &FirmwareCatalogDataSourceState,
        now: NaiveDateTime,
    ) -> Result<FirmwareCatalogDataSourceState, ProviderError> {
        let catalogs = ctx.client.list_catalogs().await.or_fail("Error fetching firmware catalogs")?;
        let catalogs = select(catalogs, &config.names, |c| c.repository.name.as_str(), "Error processing firmware catalogs")?;
        Ok(FirmwareCatalogDataSourceState {
            id: <Self as DataSource>::TYPE_NAME.to_string(),
            names: config.names.clone(),
            firmware_catalogs: catalogs.into_iter().map(|c| catalog_info(c, now)).collect(),
        })
    }
}

#[async_trait]
impl DataSource for FirmwareCatalogDataSource {
    type State = FirmwareCatalogDataSourceState;
    const TYPE_NAME: &'static str = "ome_firmware_catalog";

    fn validate(&self, config: &FirmwareCatalogDataSourceState) -> Result<(), ProviderError> {
        validators::unique("names", &config.names)
    }

    async fn read(
        &self,
        ctx: &Context<'_>,
        config: &FirmwareCatalogDataSourceState,
    ) -> Result<FirmwareCatalogDataSourceState, ProviderError> {
        self.read_at(ctx, config, Utc::now().naive_utc()).await
    }
}

/// Repositories behind the catalogs, all of them or the ones named
#[derive(Debug, Default)]
pub struct FirmwareRepositoryDataSource;

#[async_trait]
impl DataSource for FirmwareRepositoryDataSource {
    type State = FirmwareRepositoryDataSourceState;
    const TYPE_NAME: &'static str = "ome_firmware_repository";

    fn validate(&self, config: &FirmwareRepositoryDataSourceState) -> Result<(), ProviderError> {
        validators::unique("names", &config.names)
    }

    async fn read(
        &self,
        ctx: &Context<'_>,
        config: &FirmwareRepositoryDataSourceState,
    ) -> Result<FirmwareRepositoryDataSourceState, ProviderError> {
        let summary = "Error Reading Repositories";
        let mut repositories = BTreeMap::new();
        for catalog in ctx.client.list_catalogs().await.or_fail(summary)? {
            let repository = catalog.repository;
            repositories.entry(repository.id.unwrap_or_default()).or_insert(RepositoryInfoState {
                id: repository.id.unwrap_or_default(),
                name: repository.name,
                description: repository.description.unwrap_or_default(),
                source: repository.source,
                repository_type: repository.repository_type,
                domain_name: repository.domain_name,
                username: repository.username,
                check_certificate: repository.check_certificate,
            });
        }
        let repositories = select(
            repositories.into_values().collect(),
            &config.names,
            |r| r.name.as_str(),
            summary,
        )?;
        Ok(FirmwareRepositoryDataSourceState {
            id: Self::TYPE_NAME.to_string(),
            names: config.names.clone(),
            firmware_repositories: repositories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_next_update_daily() {
        // 2026-10-19 is a Monday
        let now = at("2026-10-19 10:30:00");
        assert_eq!(next_update("0 0 15 * * ? *", now), Some(at("2026-10-19 15:00:00")));
        assert_eq!(next_update("0 0 9 * * ? *", now), Some(at("2026-10-20 09:00:00")));
        assert_eq!(next_update("0 0 10 * * ? *", at("2026-10-19 10:00:00")), Some(at("2026-10-20 10:00:00")));
    }

    #[test]
    fn test_next_update_weekly() {
        let now = at("2026-10-19 10:30:00");
        assert_eq!(next_update("0 0 0 ? * SUN *", now), Some(at("2026-10-25 00:00:00")));
        assert_eq!(next_update("0 0 9 ? * MON *", now), Some(at("2026-10-26 09:00:00")));
        assert_eq!(next_update("0 0 20 ? * MON *", now), Some(at("2026-10-19 20:00:00")));
    }

    #[test]
    fn test_next_update_rejects_other_crons() {
        let now = at("2026-10-19 10:30:00");
        assert_eq!(next_update("0 0 25 * * ? *", now), None);
        assert_eq!(next_update("0 0 1 ? * XYZ *", now), None);
        assert_eq!(next_update("daily", now), None);
    }
}
