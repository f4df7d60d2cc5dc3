//! Data sources
//!
//! Read-only lookups. Each one validates its configuration, reads from OME in
//! its own session and returns the configuration with the computed fields filled.

pub mod application_certificate;
pub mod configuration_report_info;
pub mod device;
pub mod device_compliance_report;
pub mod firmware_catalog;
pub mod fw_baseline_compliance_report_info;
pub mod template_info;

mod device_test;
mod template_info_test;

pub use application_certificate::ApplicationCertificateDataSource;
pub use configuration_report_info::ConfigurationReportInfoDataSource;
pub use device::{DeviceDataSource, GroupDevicesInfoDataSource};
pub use device_compliance_report::DeviceComplianceReportDataSource;
pub use firmware_catalog::{FirmwareCatalogDataSource, FirmwareRepositoryDataSource};
pub use fw_baseline_compliance_report_info::FwBaselineComplianceReportInfoDataSource;
pub use template_info::{TemplateInfoDataSource, VlanNetworksInfoDataSource};

use crate::resource::{DataSourceAdapter, DataSourceHandler};

/// Every data source this provider serves
pub fn handlers() -> Vec<Box<dyn DataSourceHandler>> {
    vec![
        Box::new(DataSourceAdapter(DeviceDataSource)),
        Box::new(DataSourceAdapter(TemplateInfoDataSource)),
        Box::new(DataSourceAdapter(GroupDevicesInfoDataSource)),
        Box::new(DataSourceAdapter(VlanNetworksInfoDataSource)),
        Box::new(DataSourceAdapter(ApplicationCertificateDataSource)),
        Box::new(DataSourceAdapter(ConfigurationReportInfoDataSource)),
        Box::new(DataSourceAdapter(DeviceComplianceReportDataSource)),
        Box::new(DataSourceAdapter(FirmwareCatalogDataSource)),
        Box::new(DataSourceAdapter(FirmwareRepositoryDataSource)),
        Box::new(DataSourceAdapter(FwBaselineComplianceReportInfoDataSource)),
    ]
}
