//! Configuration compliance baseline models (TemplateService/Baselines)

use super::{Schedule, TargetModel};
use serde::{Deserialize, Serialize};

/// Notification type sent on every scheduled run
pub const NOTIFY_ON_SCHEDULE: &str = "NOTIFY_ON_SCHEDULE";
/// Notification type sent only when a device drifts
pub const NOTIFY_ON_NON_COMPLIANCE: &str = "NOTIFY_ON_NON_COMPLIANCE";

/// Output formats OME accepts for compliance notifications (lowercase only)
pub const OUTPUT_FORMATS: [&str; 4] = ["csv", "html", "pdf", "xlsx"];

/// Compliance status reported for a baseline or a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ComplianceStatus {
    #[serde(rename = "NOT_INVENTORIED")]
    NotInventoried,
    #[serde(rename = "Compliant", alias = "COMPLIANT", alias = "OK")]
    Compliant,
    #[serde(rename = "Non Compliant", alias = "NONCOMPLIANT", alias = "NON_COMPLIANT", alias = "CRITICAL")]
    NonCompliant,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ComplianceStatus {
    /// User-facing name
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::NotInventoried => "NOT_INVENTORIED",
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::NonCompliant => "Non Compliant",
            ComplianceStatus::Unknown => "Unknown",
        }
    }

    /// Parse a user-facing name
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NOT_INVENTORIED" => Some(ComplianceStatus::NotInventoried),
            "Compliant" => Some(ComplianceStatus::Compliant),
            "Non Compliant" => Some(ComplianceStatus::NonCompliant),
            _ => None,
        }
    }
}

/// Summary of a baseline's compliance state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConfigComplianceSummary {
    pub compliance_status: ComplianceStatus,
    pub number_of_normal: i64,
    pub number_of_warning: i64,
    pub number_of_critical: i64,
    pub number_of_unknown: i64,
    pub number_of_not_inventoried: i64,
}

/// Cron schedule of a notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CronSchedule {
    pub cron: String,
}

/// Email notification settings of a baseline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NotificationSettings {
    pub notification_type: String,
    pub email_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<CronSchedule>,
    pub output_format: String,
}

/// Configuration baseline (`/api/TemplateService/Baselines({id})`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConfigBaseline {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub template_id: i64,
    pub template_name: String,
    pub template_type: i64,
    pub task_id: i64,
    pub percentage_complete: String,
    pub last_run: Option<String>,
    pub baseline_targets: Vec<TargetModel>,
    pub config_compliance_summary: ConfigComplianceSummary,
    pub notification_settings: Option<NotificationSettings>,
}

impl ConfigBaseline {
    /// Ids of the devices the baseline targets
    pub fn target_ids(&self) -> Vec<i64> {
        self.baseline_targets.iter().map(|t| t.id).collect()
    }
}

/// Request body to create or update a configuration baseline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigBaselineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub template_id: i64,
    pub baseline_targets: Vec<TargetModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_settings: Option<NotificationSettings>,
}

/// Per-device row of `Baselines({id})/DeviceConfigComplianceReports`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceComplianceReport {
    pub id: i64,
    pub device_name: String,
    pub ip_address: String,
    pub model: String,
    pub service_tag: String,
    pub compliance_status: ComplianceStatus,
    pub device_type: i64,
    pub inventory_time: Option<String>,
}

/// Attribute-level compliance detail (`DeviceComplianceDetails`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ComplianceAttribute {
    pub attribute_id: i64,
    pub display_name: String,
    pub compliance_status: i64,
    pub expected_value: Option<String>,
    pub value: Option<String>,
}

/// Group node of the attribute-level compliance document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ComplianceAttributeGroup {
    pub group_name_id: i64,
    pub display_name: String,
    pub compliance_status: i64,
    pub attributes: Vec<ComplianceAttribute>,
    pub compliance_sub_attribute_groups: Vec<ComplianceAttributeGroup>,
}

/// Attribute-level compliance document for one device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceComplianceDetails {
    pub id: i64,
    pub device_name: String,
    pub baseline_id: i64,
    pub template_id: i64,
    pub compliance_attribute_groups: Vec<ComplianceAttributeGroup>,
}

/// Request body for `TemplateService.Remediate`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemediationRequest {
    pub id: i64,
    pub device_ids: Vec<i64>,
    pub schedule: Schedule,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compliance_status_aliases() {
        let s: ComplianceStatus = serde_json::from_str(r#""NONCOMPLIANT""#).unwrap();
        assert_eq!(s, ComplianceStatus::NonCompliant);
        let s: ComplianceStatus = serde_json::from_str(r#""NOT_INVENTORIED""#).unwrap();
        assert_eq!(s, ComplianceStatus::NotInventoried);
        let s: ComplianceStatus = serde_json::from_str(r#""SOMETHING_NEW""#).unwrap();
        assert_eq!(s, ComplianceStatus::Unknown);
    }

    #[test]
    fn test_baseline_request_omits_absent_fields() {
        let request = ConfigBaselineRequest {
            id: None,
            name: "b".to_string(),
            description: None,
            template_id: 5,
            baseline_targets: vec![TargetModel::device(10)],
            notification_settings: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("Id").is_none());
        assert!(value.get("NotificationSettings").is_none());
        assert_eq!(value["BaselineTargets"][0]["Type"]["Id"], 1000);
    }
}
