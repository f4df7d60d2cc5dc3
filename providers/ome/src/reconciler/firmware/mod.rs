//! Firmware update reconcilers
//!
//! - `catalog`: `ome_firmware_catalog`
//! - `baseline`: `ome_firmware_baseline`

pub mod baseline;
pub mod catalog;

mod catalog_test;

pub use baseline::FirmwareBaselineResource;
pub use catalog::FirmwareCatalogResource;
