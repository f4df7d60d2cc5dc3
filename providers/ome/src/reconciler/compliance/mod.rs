//! Configuration compliance reconcilers
//!
//! - `configuration_baseline`: `ome_configuration_baseline`
//! - `configuration_compliance`: `ome_configuration_compliance`

pub mod configuration_baseline;
pub mod configuration_compliance;

mod configuration_compliance_test;

pub use configuration_baseline::ConfigurationBaselineResource;
pub use configuration_compliance::ConfigurationComplianceResource;
