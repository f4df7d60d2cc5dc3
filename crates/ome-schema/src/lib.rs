//! OME Provider State Definitions
//!
//! Desired/observed state of every resource and data source the OME provider
//! manages. The JSON schema the host sees is generated from these types.
//!
//! Conventions:
//! - Field names are snake_case on the wire.
//! - Every field is defaulted, so a configuration only carries what the user set.
//! - Nested blocks that may be absent are `Option`s, never zero-valued records.

pub mod appliance;
pub mod compliance;
pub mod firmware;
pub mod inventory;
pub mod template;

pub use appliance::*;
pub use compliance::*;
pub use firmware::*;
pub use inventory::*;
pub use template::*;

use schemars::JsonSchema;

/// JSON schema of a state type
pub fn schema_of<T: JsonSchema>() -> serde_json::Value {
    schemars::schema_for!(T).to_value()
}
