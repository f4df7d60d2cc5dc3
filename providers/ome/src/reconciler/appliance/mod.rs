//! Appliance reconcilers
//!
//! - `user`: `ome_user`
//! - `application_certificate`: `ome_application_certificate`
//! - `application_csr`: `ome_application_csr`
//! - `network_setting`: `ome_network_setting`

pub mod application_certificate;
pub mod application_csr;
pub mod network_setting;
pub mod user;

mod certificate_test;
mod network_setting_test;
mod user_test;

pub use application_certificate::ApplicationCertificateResource;
pub use application_csr::ApplicationCsrResource;
pub use network_setting::NetworkSettingResource;
pub use user::UserResource;
