//! Appliance network settings models

use serde::{Deserialize, Serialize};

/// Proxy settings (`ApplicationService/Network/ProxyConfiguration`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProxyConfiguration {
    pub ip_address: String,
    pub port_number: i64,
    pub enable_authentication: bool,
    pub enable_proxy: bool,
    pub ssl_check_disabled: bool,
    pub username: String,
    /// Never returned by OME
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Time settings (`ApplicationService/Network/TimeConfiguration`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfiguration {
    #[serde(rename = "TimeZone")]
    pub time_zone: String,
    #[serde(rename = "EnableNTP")]
    pub enable_ntp: bool,
    #[serde(rename = "PrimaryNTPAddress", skip_serializing_if = "Option::is_none")]
    pub primary_ntp_address: Option<String>,
    #[serde(rename = "SecondaryNTPAddress1", skip_serializing_if = "Option::is_none")]
    pub secondary_ntp_address1: Option<String>,
    #[serde(rename = "SecondaryNTPAddress2", skip_serializing_if = "Option::is_none")]
    pub secondary_ntp_address2: Option<String>,
    #[serde(rename = "SystemTime", skip_serializing_if = "Option::is_none")]
    pub system_time: Option<String>,
}

/// Limits of one session type (`SessionService/SessionConfiguration`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SessionConfiguration {
    pub session_type: String,
    pub max_sessions: i64,
    /// Milliseconds
    pub session_timeout: i64,
    pub min_session_timeout: i64,
    pub max_session_timeout: i64,
    pub min_sessions_allowed: i64,
    pub max_sessions_allowed: i64,
}
