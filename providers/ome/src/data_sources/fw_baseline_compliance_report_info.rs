//! `ome_fw_baseline_compliance_report_info`

use crate::error::{ProviderError, ResultExt};
use crate::resource::{Context, DataSource};
use crate::validators;
use async_trait::async_trait;
use ome_client::FirmwareComplianceReport;
use ome_schema::{ComponentComplianceState, FirmwareDeviceReportState, FwBaselineComplianceReportInfoState};

/// Firmware compliance of every device a baseline targets
#[derive(Debug, Default)]
pub struct FwBaselineComplianceReportInfoDataSource;

pub(super) fn report_state(report: FirmwareComplianceReport) -> FirmwareDeviceReportState {
    FirmwareDeviceReportState {
        device_id: report.device_id,
        device_name: report.device_name,
        device_model: report.device_model,
        service_tag: report.service_tag,
        compliance_status: report.compliance_status,
        firmware_status: report.firmware_status,
        reboot_required: report.reboot_required,
        component_compliance_reports: report
            .component_compliance_reports
            .into_iter()
            .map(|c| ComponentComplianceState {
                name: c.name,
                current_version: c.current_version,
                version: c.version,
                update_action: c.update_action,
                compliance_status: c.compliance_status,
                criticality: c.criticality,
                reboot_required: c.reboot_required,
            })
            .collect(),
    }
}

#[async_trait]
impl DataSource for FwBaselineComplianceReportInfoDataSource {
    type State = FwBaselineComplianceReportInfoState;
    const TYPE_NAME: &'static str = "ome_fw_baseline_compliance_report_info";

    fn validate(&self, config: &FwBaselineComplianceReportInfoState) -> Result<(), ProviderError> {
        validators::not_blank("baseline_name", &config.baseline_name)
    }

    async fn read(
        &self,
        ctx: &Context<'_>,
        config: &FwBaselineComplianceReportInfoState,
    ) -> Result<FwBaselineComplianceReportInfoState, ProviderError> {
        let summary = "Error reading firmware baseline compliance report";
        let baseline = ctx
            .client
            .get_firmware_baseline_by_name(&config.baseline_name)
            .await
            .or_fail(summary)?
            .ok_or_else(|| ProviderError::failed(summary, format!("baseline {} not found", config.baseline_name)))?;
        let reports = ctx.client.get_firmware_compliance_reports(baseline.id).await.or_fail(summary)?;
        Ok(FwBaselineComplianceReportInfoState {
            id: baseline.id,
            baseline_name: config.baseline_name.clone(),
            reports: reports.into_iter().map(report_state).collect(),
        })
    }
}
