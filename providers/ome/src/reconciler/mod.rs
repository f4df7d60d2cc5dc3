//! Resource reconcilers
//!
//! One module per OME area. Each reconciler implements [`Resource`] and is
//! registered here under its resource type name.
//!
//! [`Resource`]: crate::resource::Resource

pub mod appliance;
pub mod compliance;
pub mod firmware;
pub mod inventory;
pub mod template;

use crate::resource::{ResourceAdapter, ResourceHandler};

/// Every resource the provider serves
pub fn handlers() -> Vec<Box<dyn ResourceHandler>> {
    vec![
        Box::new(ResourceAdapter(template::TemplateResource)),
        Box::new(ResourceAdapter(template::DeploymentResource)),
        Box::new(ResourceAdapter(compliance::ConfigurationBaselineResource)),
        Box::new(ResourceAdapter(compliance::ConfigurationComplianceResource)),
        Box::new(ResourceAdapter(inventory::StaticGroupResource)),
        Box::new(ResourceAdapter(inventory::DevicesResource)),
        Box::new(ResourceAdapter(inventory::DeviceActionResource)),
        Box::new(ResourceAdapter(inventory::DiscoveryResource)),
        Box::new(ResourceAdapter(firmware::FirmwareCatalogResource)),
        Box::new(ResourceAdapter(firmware::FirmwareBaselineResource)),
        Box::new(ResourceAdapter(appliance::UserResource)),
        Box::new(ResourceAdapter(appliance::ApplicationCertificateResource)),
        Box::new(ResourceAdapter(appliance::ApplicationCsrResource)),
        Box::new(ResourceAdapter(appliance::NetworkSettingResource)),
    ]
}
