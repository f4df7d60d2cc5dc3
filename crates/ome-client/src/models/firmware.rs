//! Firmware catalog and baseline models (UpdateService)

use super::TargetModel;
use serde::{Deserialize, Serialize};

/// Catalog repository (`Repository` block of a catalog)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Repository {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// DELL_ONLINE, NFS, CIFS, HTTP or HTTPS
    pub source: String,
    pub domain_name: String,
    pub username: String,
    pub password: String,
    pub check_certificate: bool,
    pub repository_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_existing_catalog: Option<bool>,
}

/// Firmware catalog (`/api/UpdateService/Catalogs({id})`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Catalog {
    pub id: i64,
    pub filename: String,
    pub source_path: String,
    pub status: String,
    pub task_id: i64,
    pub base_location: Option<String>,
    pub manifest_identifier: Option<String>,
    pub release_identifier: Option<String>,
    pub manifest_version: Option<String>,
    pub release_date: Option<String>,
    pub last_updated: Option<String>,
    pub bundles_count: i64,
    pub predecessor_identifier: Option<String>,
    pub associated_baselines: Vec<AssociatedBaseline>,
    pub repository: Repository,
    /// `None` for manual catalogs
    pub schedule: Option<CatalogSchedule>,
}

impl Catalog {
    /// True while OME is downloading or refreshing the catalog
    pub fn is_running(&self) -> bool {
        self.status.eq_ignore_ascii_case("Running")
    }
}

/// Baseline reference embedded in a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssociatedBaseline {
    pub baseline_id: i64,
    pub baseline_name: String,
}

/// Automatic refresh schedule of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CatalogSchedule {
    pub cron: String,
}

/// Request body to create or update a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub filename: String,
    pub source_path: String,
    pub repository: Repository,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<CatalogSchedule>,
}

/// Request body for `UpdateService.RemoveCatalogs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveCatalogsRequest {
    pub catalog_ids: Vec<i64>,
}

/// Firmware baseline (`/api/UpdateService/Baselines({id})`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FirmwareBaseline {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub catalog_id: i64,
    pub repository_id: i64,
    pub repository_name: String,
    pub repository_type: String,
    pub task_id: i64,
    pub task_status_id: i64,
    pub last_run: Option<String>,
    pub downgrade_enabled: bool,
    pub is_64_bit: bool,
    pub filter_no_reboot_required: bool,
    pub targets: Vec<TargetModel>,
    pub compliance_summary: FirmwareComplianceSummary,
}

/// Summary of a firmware baseline's compliance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FirmwareComplianceSummary {
    pub compliance_status: String,
    pub number_of_critical: i64,
    pub number_of_warning: i64,
    pub number_of_normal: i64,
    pub number_of_downgrade: i64,
}

/// Request body to create or update a firmware baseline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirmwareBaselineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub catalog_id: i64,
    pub repository_id: i64,
    pub downgrade_enabled: bool,
    pub is_64_bit: bool,
    pub filter_no_reboot_required: bool,
    pub targets: Vec<TargetModel>,
}

/// Request body for `UpdateService.RemoveBaselines`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveBaselinesRequest {
    pub baseline_ids: Vec<i64>,
}

/// Per-component row of a firmware compliance report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ComponentComplianceReport {
    pub id: i64,
    pub name: String,
    pub current_version: String,
    pub version: String,
    pub update_action: String,
    pub compliance_status: String,
    pub criticality: String,
    pub reboot_required: bool,
    pub source_name: String,
    pub path: String,
}

/// Per-device row of `Baselines({id})/DeviceComplianceReports`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FirmwareComplianceReport {
    pub id: i64,
    pub device_id: i64,
    pub device_name: String,
    pub device_model: String,
    pub device_type_name: String,
    pub service_tag: String,
    pub compliance_status: String,
    pub firmware_status: String,
    pub reboot_required: bool,
    pub component_compliance_reports: Vec<ComponentComplianceReport>,
}
