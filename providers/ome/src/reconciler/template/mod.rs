//! Template reconcilers
//!
//! - `templates`: `ome_template`
//! - `deployment`: `ome_deployment`

pub mod deployment;
pub mod templates;

mod deployment_test;
mod templates_test;

pub use deployment::DeploymentResource;
pub use templates::TemplateResource;
