//! Unit tests for the certificate and CSR reconcilers

#[cfg(test)]
mod tests {
    use crate::reconciler::appliance::{ApplicationCertificateResource, ApplicationCsrResource};
    use crate::test_utils::*;
    use ome_client::MockOmeClient;
    use ome_schema::{ApplicationCertificateState, ApplicationCsrState, CsrSpecsState};
    use pretty_assertions::assert_eq;

    fn specs(names: &[&str]) -> CsrSpecsState {
        CsrSpecsState {
            distinguished_name: "ome.example.com".to_string(),
            department_name: "Infrastructure".to_string(),
            business_name: "Example".to_string(),
            locality: "Austin".to_string(),
            state: "Texas".to_string(),
            country: "US".to_string(),
            email: "pki@example.com".to_string(),
            subject_alternate_names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_upload_decodes_certificate() {
        let mock = MockOmeClient::new("https://ome.test");
        let plan = ApplicationCertificateState {
            certificate_base64: "LS0tLS1CRUdJTiBDRVJUSUZJQ0FURS0tLS0t".to_string(),
            ..Default::default()
        };
        let created: ApplicationCertificateState = state_of(&create(ApplicationCertificateResource, &mock, &plan).await);
        assert_eq!(created.id, "application_certificate");
        assert_eq!(mock.uploaded_certificates(), vec![b"-----BEGIN CERTIFICATE-----".to_vec()]);

        let observed: ApplicationCertificateState = state_of(&read(ApplicationCertificateResource, &mock, &created).await);
        assert_eq!(observed, created);
        assert_ok(&delete(ApplicationCertificateResource, &mock, &created).await);
    }

    #[tokio::test]
    async fn test_certificate_errors() {
        let mock = MockOmeClient::new("https://ome.test");
        let garbled = ApplicationCertificateState {
            certificate_base64: "not base64!".to_string(),
            ..Default::default()
        };
        let (summary, detail) = error_of(&create(ApplicationCertificateResource, &mock, &garbled).await);
        assert_eq!(summary, "Validation error");
        assert!(detail.contains("base64"));

        mock.fail_on("upload_certificate", "Unable to upload the certificate.");
        let upload = ApplicationCertificateState {
            certificate_base64: "Y2VydA==".to_string(),
            ..Default::default()
        };
        let (summary, _) = error_of(&create(ApplicationCertificateResource, &mock, &upload).await);
        assert_eq!(summary, "Unable to upload certificate");

        let state = ApplicationCertificateState {
            id: "application_certificate".to_string(),
            ..upload.clone()
        };
        let changed = ApplicationCertificateState {
            certificate_base64: "b3RoZXI=".to_string(),
            ..state.clone()
        };
        let response = plan(ApplicationCertificateResource, Some(&state), &changed).await;
        assert_eq!(response.requires_replace, vec!["certificate_base64".to_string()]);
    }

    #[tokio::test]
    async fn test_csr_generation() {
        let mock = MockOmeClient::new("https://ome.test");
        let plan = ApplicationCsrState {
            specs: specs(&["host1"]),
            ..Default::default()
        };
        let created: ApplicationCsrState = state_of(&create(ApplicationCsrResource, &mock, &plan).await);
        assert!(created.csr.starts_with("-----BEGIN CERTIFICATE REQUEST-----"));
        assert!(created.csr.trim_end().ends_with("-----END CERTIFICATE REQUEST-----"));
        assert_eq!(created.specs, plan.specs);

        let observed: ApplicationCsrState = state_of(&read(ApplicationCsrResource, &mock, &created).await);
        assert_eq!(observed, created);
    }

    #[tokio::test]
    async fn test_csr_subject_alternate_names_bounds() {
        let mock = MockOmeClient::new("https://ome.test");
        let none = ApplicationCsrState {
            specs: specs(&[]),
            ..Default::default()
        };
        let (summary, detail) = error_of(&create(ApplicationCsrResource, &mock, &none).await);
        assert_eq!(summary, "Validation error");
        assert!(detail.contains("at least 1 elements"));

        let five = ApplicationCsrState {
            specs: specs(&["a", "b", "c", "d", "e"]),
            ..Default::default()
        };
        let (_, detail) = error_of(&create(ApplicationCsrResource, &mock, &five).await);
        assert!(detail.contains("at most 4 elements"));

        let mut no_country = specs(&["host1"]);
        no_country.country = String::new();
        let missing = ApplicationCsrState {
            specs: no_country,
            ..Default::default()
        };
        let (_, detail) = error_of(&create(ApplicationCsrResource, &mock, &missing).await);
        assert!(detail.contains("specs.country"));
        assert!(mock.calls().is_empty());
    }
}
