//! OME API models
//!
//! These models match the JSON documents exchanged with the OpenManage Enterprise
//! REST API. OME uses PascalCase keys throughout.

pub mod account;
pub mod baseline;
pub mod certificate;
pub mod device;
pub mod discovery;
pub mod firmware;
pub mod group;
pub mod job;
pub mod network;
pub mod template;

pub use account::*;
pub use baseline::*;
pub use certificate::*;
pub use device::*;
pub use discovery::*;
pub use firmware::*;
pub use group::*;
pub use job::*;
pub use network::*;
pub use template::*;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Parse an OME timestamp (`2026-03-01 10:00:00.000`, optionally `T`-separated)
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// OME target type id for a single device
pub const TARGET_TYPE_DEVICE: i64 = 1000;
/// OME target type id for a device group
pub const TARGET_TYPE_GROUP: i64 = 6000;

/// Typed reference to a target (device or group) used by baselines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetType {
    pub id: i64,
    pub name: String,
}

impl TargetType {
    /// Target type for a device
    pub fn device() -> Self {
        Self {
            id: TARGET_TYPE_DEVICE,
            name: "DEVICE".to_string(),
        }
    }

    /// Target type for a group
    pub fn group() -> Self {
        Self {
            id: TARGET_TYPE_GROUP,
            name: "GROUP".to_string(),
        }
    }
}

/// A target of a baseline: entity id plus its type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetModel {
    pub id: i64,
    #[serde(rename = "Type")]
    pub target_type: TargetType,
}

impl TargetModel {
    /// Device target
    pub fn device(id: i64) -> Self {
        Self {
            id,
            target_type: TargetType::device(),
        }
    }
}

/// Job schedule attached to deploy, remediate and discovery requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schedule {
    pub run_now: bool,
    pub run_later: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,
}

impl Schedule {
    /// Build the schedule for a run-now or run-later job
    pub fn new(run_later: bool, cron: Option<String>) -> Self {
        if run_later {
            Self {
                run_now: false,
                run_later: true,
                cron,
            }
        } else {
            Self {
                run_now: true,
                run_later: false,
                cron: None,
            }
        }
    }
}
