//! Appliance state
//!
//! Resources: `ome_user`, `ome_application_certificate`, `ome_application_csr`,
//! `ome_network_setting`.
//! Data sources: `ome_application_certificate`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `ome_user` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UserState {
    /// Account ID (computed)
    pub id: String,
    pub username: String,
    pub password: String,
    /// OME role, e.g. `10` (administrator)
    pub role_id: String,
    /// Default 1 (local user)
    pub user_type_id: Option<i64>,
    pub directory_service_id: i64,
    pub description: String,
    pub locked: bool,
    /// Default true
    pub enabled: Option<bool>,
}

/// `ome_application_certificate` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ApplicationCertificateState {
    pub id: String,
    /// Signed certificate, base64 encoded
    pub certificate_base64: String,
}

/// Subject of a certificate signing request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CsrSpecsState {
    pub distinguished_name: String,
    pub department_name: String,
    pub business_name: String,
    pub locality: String,
    pub state: String,
    pub country: String,
    pub email: String,
    /// One to four names
    pub subject_alternate_names: Vec<String>,
}

/// `ome_application_csr` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ApplicationCsrState {
    pub id: String,
    pub specs: CsrSpecsState,
    /// Generated request in PEM form (computed)
    pub csr: String,
}

/// Appliance proxy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ProxySettingState {
    pub enable_proxy: bool,
    pub ip_address: String,
    pub proxy_port: i64,
    pub enable_authentication: bool,
    pub username: String,
    pub password: String,
    pub ssl_check_disabled: bool,
}

/// Appliance clock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TimeSettingState {
    /// OME time zone ID, e.g. `TZ_ID_1`
    pub time_zone: String,
    pub enable_ntp: bool,
    pub primary_ntp_address: String,
    pub secondary_ntp_address1: String,
    pub secondary_ntp_address2: String,
    /// `yyyy-MM-dd HH:mm:ss.SSS`, used when NTP is off
    pub system_time: String,
}

/// Session limits of one session type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SessionSettingState {
    /// `GUI`, `API`, `SSH`, `Serial` or `UniversalTimeout`
    pub session_type: String,
    pub max_sessions: i64,
    /// Minutes
    pub session_timeout: i64,
}

/// `ome_network_setting` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NetworkSettingState {
    pub id: String,
    pub proxy: Option<ProxySettingState>,
    pub time: Option<TimeSettingState>,
    pub session: Option<Vec<SessionSettingState>>,
}

/// Issuer or subject of a certificate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CertificatePartyState {
    pub country: String,
    pub state: String,
    pub city: String,
    pub organization: String,
    pub organizational_unit: String,
    pub common_name: String,
}

/// `ome_application_certificate` data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CertificateInfoState {
    pub id: String,
    pub valid_from: String,
    pub valid_to: String,
    pub issued_by: CertificatePartyState,
    pub issued_to: CertificatePartyState,
}
