//! `ome_configuration_report_info`
//!
//! Per-device compliance of a configuration baseline. With `fetch_attributes`
//! every device's attribute tree is read too and flattened; each attribute is
//! named by its group path, comma separated.

use crate::error::{ProviderError, ResultExt};
use crate::resource::{Context, DataSource};
use crate::validators;
use async_trait::async_trait;
use ome_client::ComplianceAttributeGroup;
use ome_schema::{ComplianceAttributeState, ConfigurationReportInfoState, DeviceComplianceState};
use tracing::debug;

#[derive(Debug, Default)]
pub struct ConfigurationReportInfoDataSource;

fn flatten(groups: &[ComplianceAttributeGroup]) -> Vec<ComplianceAttributeState> {
    fn walk(group: &ComplianceAttributeGroup, path: &mut Vec<String>, out: &mut Vec<ComplianceAttributeState>) {
        path.push(group.display_name.clone());
        for attribute in &group.attributes {
            let mut name = path.clone();
            name.push(attribute.display_name.clone());
            out.push(ComplianceAttributeState {
                attribute_id: attribute.attribute_id,
                display_name: name.join(","),
                compliance_status: attribute.compliance_status,
                expected_value: attribute.expected_value.clone().unwrap_or_default(),
                actual_value: attribute.value.clone().unwrap_or_default(),
            });
        }
        for sub in &group.compliance_sub_attribute_groups {
            walk(sub, path, out);
        }
        path.pop();
    }

    let mut out = Vec::new();
    for group in groups {
        walk(group, &mut Vec::new(), &mut out);
    }
    out
}

#[async_trait]
impl DataSource for ConfigurationReportInfoDataSource {
    type State = ConfigurationReportInfoState;
    const TYPE_NAME: &'static str = "ome_configuration_report_info";

    fn validate(&self, config: &ConfigurationReportInfoState) -> Result<(), ProviderError> {
        validators::not_blank("baseline_name", &config.baseline_name)
    }

    async fn read(
        &self,
        ctx: &Context<'_>,
        config: &ConfigurationReportInfoState,
    ) -> Result<ConfigurationReportInfoState, ProviderError> {
        let summary = "Error reading";
        let baseline = ctx
            .client
            .get_config_baseline_by_name(&config.baseline_name)
            .await
            .or_fail(summary)?
            .ok_or_else(|| ProviderError::failed(summary, format!("baseline {} not found", config.baseline_name)))?;

        let reports = ctx.client.get_config_compliance_reports(baseline.id).await.or_fail(summary)?;
        let mut devices = Vec::with_capacity(reports.len());
        for report in reports {
            let details = if config.fetch_attributes {
                let details = ctx
                    .client
                    .get_device_compliance_details(baseline.id, report.id)
                    .await
                    .or_fail(summary)?;
                flatten(&details.compliance_attribute_groups)
            } else {
                Vec::new()
            };
            devices.push(DeviceComplianceState {
                device_id: report.id,
                device_servicetag: report.service_tag,
                device_name: report.device_name,
                model: report.model,
                ip_address: report.ip_address,
                compliance_status: report.compliance_status.as_str().to_string(),
                inventory_time: report.inventory_time.unwrap_or_default(),
                device_compliance_details: details,
            });
        }
        debug!("Baseline {} reports {} devices", baseline.name, devices.len());

        Ok(ConfigurationReportInfoState {
            id: baseline.id,
            baseline_name: config.baseline_name.clone(),
            fetch_attributes: config.fetch_attributes,
            compliance_report_device: devices,
        })
    }
}
