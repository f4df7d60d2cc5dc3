//! Appliance certificate operations (ApplicationService)

use crate::client::OmeClient;
use crate::error::OmeError;
use crate::models::*;
use tracing::debug;

impl OmeClient {
    /// Upload a signed certificate to the appliance
    ///
    /// # Arguments
    /// * `certificate` - Decoded certificate bytes (PEM or DER)
    pub async fn upload_certificate(&self, certificate: Vec<u8>) -> Result<(), OmeError> {
        debug!("Uploading appliance certificate ({} bytes)", certificate.len());
        self.http
            .post_bytes(
                "/api/ApplicationService/Actions/ApplicationService.UploadCertificate",
                certificate,
                "application/octet-stream",
            )
            .await
    }

    /// Get the certificate currently served by the appliance
    pub async fn get_certificate(&self) -> Result<CertificateInfo, OmeError> {
        self.http.get("/api/ApplicationService/Certificate").await
    }

    /// Generate a certificate signing request
    pub async fn generate_csr(&self, request: &CsrRequest) -> Result<CsrResponse, OmeError> {
        debug!("Generating CSR for {}", request.distinguished_name);
        self.http
            .post("/api/ApplicationService/Actions/ApplicationService.GenerateCSR", request)
            .await
    }
}
