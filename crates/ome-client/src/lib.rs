//! OpenManage Enterprise REST API Client
//!
//! A Rust client library for the Dell OpenManage Enterprise (OME) REST API.
//! Provides typed models, one method per OME operation, and a job tracker for the
//! asynchronous jobs most mutating OME calls start.
//!
//! # Example
//!
//! ```no_run
//! use ome_client::{ClientOptions, JobTracker, OmeApi, OmeClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Open a session
//! let mut options = ClientOptions::new("https://ome.example.com:443", "admin", "secret");
//! options.skip_ssl = true;
//! let client = OmeClient::connect(&options).await?;
//!
//! // Look up a device and refresh its inventory
//! if let Some(device) = client.get_device_by_service_tag("ABC1234").await? {
//!     let job_id = client.refresh_device_inventory(&[device.id]).await?;
//!     let outcome = JobTracker::from_secs(20, 30)
//!         .track(&client, job_id, &CancellationToken::new())
//!         .await?;
//!     println!("inventory job {} finished: {}", job_id, outcome.status);
//! }
//!
//! // Sessions are not reused across operations
//! client.close_session().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Templates**: create, import, clone, edit attributes and VLANs, deploy
//! - **Compliance**: configuration baselines, compliance reports, remediation
//! - **Firmware**: catalogs, firmware baselines, compliance reports
//! - **Inventory**: devices, static groups, discovery jobs
//! - **Appliance settings**: accounts, certificates, proxy, time, sessions
//! - **Retry Logic**: transport failures are retried with backoff
//! - **Pagination**: OData `@odata.nextLink` pages are followed

mod api;
pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod ome_trait;
pub mod tracker;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::{ClientOptions, OmeClient};
pub use common::odata::ODataCollection;
pub use common::retry::{Backoff, RetryPolicy};
pub use common::HttpClient;
pub use error::OmeError;
pub use models::*;
pub use ome_trait::OmeApi;
pub use tracker::{JobOutcome, JobTracker};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockOmeClient;
