//! `ome_application_certificate`
//!
//! Uploads a signed certificate to the appliance. OME cannot hand the uploaded
//! certificate back, so reads keep the state as it is and deleting only drops it
//! from state. A different certificate replaces the resource.

use crate::error::{ProviderError, ResultExt};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ome_schema::ApplicationCertificateState;
use tracing::{debug, info};

const STATE_ID: &str = "application_certificate";

/// Reconciler for the appliance certificate
#[derive(Debug, Default)]
pub struct ApplicationCertificateResource;

fn decode(certificate_base64: &str) -> Result<Vec<u8>, ProviderError> {
    STANDARD
        .decode(certificate_base64.trim())
        .map_err(|e| ProviderError::Validation(format!("Attribute certificate_base64 is not valid base64: {}", e)))
}

#[async_trait]
impl Resource for ApplicationCertificateResource {
    type State = ApplicationCertificateState;
    const TYPE_NAME: &'static str = "ome_application_certificate";

    fn validate(&self, plan: &ApplicationCertificateState) -> Result<(), ProviderError> {
        validators::not_blank("certificate_base64", &plan.certificate_base64)?;
        decode(&plan.certificate_base64).map(|_| ())
    }

    fn requires_replace(&self, state: &ApplicationCertificateState, plan: &ApplicationCertificateState) -> Vec<&'static str> {
        if state.certificate_base64 != plan.certificate_base64 {
            vec!["certificate_base64"]
        } else {
            Vec::new()
        }
    }

    async fn create(
        &self,
        ctx: &Context<'_>,
        plan: &ApplicationCertificateState,
    ) -> Result<ApplicationCertificateState, ProviderError> {
        let certificate = decode(&plan.certificate_base64)?;
        let size = certificate.len();
        ctx.client
            .upload_certificate(certificate)
            .await
            .or_fail("Unable to upload certificate")?;
        info!("Uploaded appliance certificate ({} bytes)", size);
        Ok(ApplicationCertificateState {
            id: STATE_ID.to_string(),
            ..plan.clone()
        })
    }

    async fn read(
        &self,
        _ctx: &Context<'_>,
        state: &ApplicationCertificateState,
    ) -> Result<Option<ApplicationCertificateState>, ProviderError> {
        Ok(Some(state.clone()))
    }

    async fn update(
        &self,
        _ctx: &Context<'_>,
        state: &ApplicationCertificateState,
        plan: &ApplicationCertificateState,
    ) -> Result<ApplicationCertificateState, ProviderError> {
        Ok(ApplicationCertificateState {
            id: state.id.clone(),
            ..plan.clone()
        })
    }

    async fn delete(&self, _ctx: &Context<'_>, _state: &ApplicationCertificateState) -> Result<(), ProviderError> {
        debug!("Appliance certificate stays installed; removing it from state only");
        Ok(())
    }
}
