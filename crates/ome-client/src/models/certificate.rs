//! Appliance certificate models (ApplicationService)

use serde::{Deserialize, Serialize};

/// Issuer or subject block of a certificate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CertificateParty {
    pub country: String,
    pub state: String,
    pub city: String,
    pub organization: String,
    pub organizational_unit: String,
    pub common_name: String,
}

/// Certificate currently installed on the appliance (`ApplicationService/Certificate`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CertificateInfo {
    pub valid_from: String,
    pub valid_to: String,
    pub issued_by: CertificateParty,
    pub issued_to: CertificateParty,
}

/// Request body for `ApplicationService.GenerateCSR`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CsrRequest {
    pub distinguished_name: String,
    pub department_name: String,
    pub business_name: String,
    pub locality: String,
    pub state: String,
    pub country: String,
    pub email: String,
    /// Comma separated list
    pub subject_alternate_names: String,
}

/// Response of `ApplicationService.GenerateCSR`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CsrResponse {
    pub certificate_data: String,
}
