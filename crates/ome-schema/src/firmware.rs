//! Firmware update state
//!
//! Resources: `ome_firmware_catalog`, `ome_firmware_baseline`.
//! Data sources: `ome_firmware_catalog`, `ome_firmware_repository`,
//! `ome_device_compliance_report`, `ome_fw_baseline_compliance_report_info`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// When an automatic catalog refreshes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CatalogRefreshScheduleState {
    /// `Daily` or `Weekly`
    pub cadence: String,
    /// Required for `Weekly`, e.g. `Monday`
    pub day_of_the_week: String,
    /// Hour on a 12 hour clock, 1 to 12
    pub time_of_day: i64,
    /// `AM` or `PM`
    pub am_pm: String,
}

/// Baseline that uses a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AssociatedBaselineState {
    pub baseline_id: i64,
    pub baseline_name: String,
}

/// `ome_firmware_catalog` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FirmwareCatalogState {
    /// Catalog ID (computed)
    pub id: i64,
    /// Repository name, unique in OME
    pub name: String,
    pub description: String,
    /// `Manual` (default) or `Automatic`
    pub catalog_update_type: String,
    /// `DELL_ONLINE`, `NFS`, `CIFS`, `HTTP` or `HTTPS`
    pub share_type: String,
    /// Share host name or IP address
    pub share_address: String,
    /// Path of the catalog file on the share, e.g. `/catalogs/catalog.xml`
    pub catalog_file_path: String,
    /// CIFS domain
    pub domain: String,
    pub share_user: String,
    pub share_password: String,
    pub catalog_refresh_schedule: Option<CatalogRefreshScheduleState>,
    /// Verify the certificate of an HTTPS share
    pub is_certificate_verified: bool,
    /// Status of the last catalog refresh (computed)
    pub status: String,
    pub bundles_count: i64,
    pub release_version: String,
    pub last_updated: String,
    pub repository_id: i64,
    pub associated_baselines: Vec<AssociatedBaselineState>,
}

/// `ome_firmware_baseline` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FirmwareBaselineState {
    /// Baseline ID (computed)
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Name of the catalog the baseline compares against
    pub catalog_name: String,
    pub device_names: Vec<String>,
    pub device_service_tags: Vec<String>,
    pub group_names: Vec<String>,
    /// Default true
    pub is_64_bit: Option<bool>,
    pub filter_no_reboot_required: bool,
    /// Default true
    pub downgrade_enabled: Option<bool>,
    /// Resolved target device IDs (computed)
    pub target_ids: Vec<i64>,
    pub catalog_id: i64,
    pub repository_id: i64,
    /// ID of the last baseline job (computed)
    pub task_id: i64,
    /// Overall firmware compliance (computed)
    pub compliance_status: String,
}

/// One catalog, as listed by the data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CatalogInfoState {
    pub id: i64,
    pub name: String,
    pub filename: String,
    pub source_path: String,
    pub status: String,
    pub share_type: String,
    pub share_address: String,
    pub manifest_version: String,
    pub release_date: String,
    pub bundles_count: i64,
    pub next_update: String,
    pub associated_baselines: Vec<AssociatedBaselineState>,
}

/// `ome_firmware_catalog` data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FirmwareCatalogDataSourceState {
    pub id: String,
    /// Catalog names to return; all when empty
    pub names: Vec<String>,
    pub firmware_catalogs: Vec<CatalogInfoState>,
}

/// One repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RepositoryInfoState {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub source: String,
    pub repository_type: String,
    pub domain_name: String,
    pub username: String,
    pub check_certificate: bool,
}

/// `ome_firmware_repository` data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FirmwareRepositoryDataSourceState {
    pub id: String,
    /// Repository names to return; all when empty
    pub names: Vec<String>,
    pub firmware_repositories: Vec<RepositoryInfoState>,
}

/// Compliance of one component against the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComponentComplianceState {
    pub name: String,
    pub current_version: String,
    pub version: String,
    pub update_action: String,
    pub compliance_status: String,
    pub criticality: String,
    pub reboot_required: bool,
}

/// Firmware compliance of one device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FirmwareDeviceReportState {
    pub device_id: i64,
    pub device_name: String,
    pub device_model: String,
    pub service_tag: String,
    pub compliance_status: String,
    pub firmware_status: String,
    pub reboot_required: bool,
    pub component_compliance_reports: Vec<ComponentComplianceState>,
}

/// `ome_fw_baseline_compliance_report_info` data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FwBaselineComplianceReportInfoState {
    pub id: i64,
    pub baseline_name: String,
    pub reports: Vec<FirmwareDeviceReportState>,
}

/// `ome_device_compliance_report` data source
///
/// Firmware compliance of selected devices across every baseline that targets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeviceComplianceReportState {
    pub id: String,
    pub device_ids: Vec<i64>,
    pub device_service_tags: Vec<String>,
    pub device_group_names: Vec<String>,
    pub reports: Vec<FirmwareDeviceReportState>,
}
