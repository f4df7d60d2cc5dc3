//! Configuration compliance state
//!
//! Resources: `ome_configuration_baseline`, `ome_configuration_compliance`.
//! Data sources: `ome_configuration_report_info`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `ome_configuration_baseline` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConfigurationBaselineState {
    /// Baseline ID (computed)
    pub id: i64,
    pub baseline_name: String,
    pub description: Option<String>,
    /// Compliance template ID (exclusive with `ref_template_name`)
    pub ref_template_id: i64,
    pub ref_template_name: String,
    /// Target device IDs (exclusive with `device_servicetags`)
    pub device_ids: Vec<i64>,
    pub device_servicetags: Vec<String>,
    /// Send the report on the `cron` schedule rather than on non-compliance.
    /// Defaults to true when a cron expression is given.
    pub schedule_notification: Option<bool>,
    /// Quartz cron expression, e.g. `0 49 8 * * ? *`
    pub cron: String,
    pub email_addresses: Vec<String>,
    /// `csv`, `html`, `pdf` or `xlsx`
    pub output_format: String,
    /// ID of the last compliance check job (computed)
    pub task_id: i64,
    /// Job status checks before giving up (default 30)
    pub job_retry_count: Option<i64>,
    /// Seconds between job status checks (default 20)
    pub sleep_interval: Option<i64>,
}

/// Desired compliance of one device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RemediationTargetState {
    pub device_service_tag: String,
    /// Only `Compliant` can be requested
    pub compliance_status: String,
}

/// `ome_configuration_compliance` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConfigurationComplianceState {
    /// ID of the last remediation job, 0 when nothing needed remediation (computed)
    pub id: i64,
    pub baseline_id: i64,
    pub baseline_name: String,
    pub target_devices: Vec<RemediationTargetState>,
    pub run_later: bool,
    pub cron: String,
    /// Job status checks before giving up (default 30)
    pub job_retry_count: Option<i64>,
    /// Seconds between job status checks (default 20)
    pub sleep_interval: Option<i64>,
}

/// One attribute of a device compliance report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComplianceAttributeState {
    pub attribute_id: i64,
    /// Comma separated path of group names and the attribute name
    pub display_name: String,
    pub compliance_status: i64,
    pub expected_value: String,
    pub actual_value: String,
}

/// Compliance of one device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeviceComplianceState {
    pub device_id: i64,
    pub device_servicetag: String,
    pub device_name: String,
    pub model: String,
    pub ip_address: String,
    pub compliance_status: String,
    pub inventory_time: String,
    /// Filled only when `fetch_attributes` is set
    pub device_compliance_details: Vec<ComplianceAttributeState>,
}

/// `ome_configuration_report_info` data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConfigurationReportInfoState {
    pub id: i64,
    pub baseline_name: String,
    /// Also read attribute-level compliance of every device
    pub fetch_attributes: bool,
    pub compliance_report_device: Vec<DeviceComplianceState>,
}
