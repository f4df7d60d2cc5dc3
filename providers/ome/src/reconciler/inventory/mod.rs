//! Device inventory reconcilers
//!
//! - `static_group`: `ome_static_group`
//! - `devices`: `ome_devices`
//! - `device_action`: `ome_device_action`
//! - `discovery`: `ome_discovery`

pub mod device_action;
pub mod devices;
pub mod discovery;
pub mod static_group;

mod discovery_test;
mod static_group_test;

pub use device_action::DeviceActionResource;
pub use devices::DevicesResource;
pub use discovery::DiscoveryResource;
pub use static_group::StaticGroupResource;
