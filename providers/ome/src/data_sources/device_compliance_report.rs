//! `ome_device_compliance_report`
//!
//! Firmware compliance of the selected devices across every firmware baseline.
//! Baselines are found through the catalogs they are attached to. Without a
//! selector every reported device is returned.

use super::fw_baseline_compliance_report_info::report_state;
use crate::error::{ProviderError, ResultExt};
use crate::resolver::{self, DeviceSelector};
use crate::resource::{Context, DataSource};
use crate::validators;
use async_trait::async_trait;
use ome_schema::DeviceComplianceReportState;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Default)]
pub struct DeviceComplianceReportDataSource;

fn selector(config: &DeviceComplianceReportState) -> DeviceSelector {
    DeviceSelector {
        device_ids: config.device_ids.clone(),
        service_tags: config.device_service_tags.clone(),
        group_names: config.device_group_names.clone(),
        ..Default::default()
    }
}

#[async_trait]
impl DataSource for DeviceComplianceReportDataSource {
    type State = DeviceComplianceReportState;
    const TYPE_NAME: &'static str = "ome_device_compliance_report";

    fn validate(&self, config: &DeviceComplianceReportState) -> Result<(), ProviderError> {
        validators::at_most_one(&[
            ("device_ids", !config.device_ids.is_empty()),
            ("device_service_tags", !config.device_service_tags.is_empty()),
            ("device_group_names", !config.device_group_names.is_empty()),
        ])
    }

    async fn read(
        &self,
        ctx: &Context<'_>,
        config: &DeviceComplianceReportState,
    ) -> Result<DeviceComplianceReportState, ProviderError> {
        let selector = selector(config);
        let selected: Option<BTreeSet<i64>> = if selector.is_empty() {
            None
        } else {
            let devices = resolver::resolve_devices(ctx.client, &selector)
                .await
                .or_fail("Error processing device compliance report")?;
            Some(devices.iter().map(|d| d.id).collect())
        };

        let summary = "Error reading device compliance report";
        let baselines: BTreeMap<i64, String> = ctx
            .client
            .list_catalogs()
            .await
            .or_fail(summary)?
            .into_iter()
            .flat_map(|c| c.associated_baselines)
            .map(|b| (b.baseline_id, b.baseline_name))
            .collect();

        let mut reports = Vec::new();
        for (id, name) in &baselines {
            let found = ctx.client.get_firmware_compliance_reports(*id).await.or_fail(summary)?;
            debug!("Firmware baseline {} reports {} devices", name, found.len());
            reports.extend(
                found
                    .into_iter()
                    .filter(|r| selected.as_ref().is_none_or(|s| s.contains(&r.device_id)))
                    .map(report_state),
            );
        }

        Ok(DeviceComplianceReportState {
            id: Self::TYPE_NAME.to_string(),
            reports,
            ..config.clone()
        })
    }
}
