//! `ome_application_csr`
//!
//! Generates a certificate signing request on the appliance. The request is
//! generated once; changing the specs replaces the resource.

use crate::error::{ProviderError, ResultExt};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::CsrRequest;
use ome_schema::{ApplicationCsrState, CsrSpecsState};
use tracing::{debug, info};

const STATE_ID: &str = "application_csr";
const MAX_SUBJECT_ALTERNATE_NAMES: usize = 4;

/// Reconciler for certificate signing requests
#[derive(Debug, Default)]
pub struct ApplicationCsrResource;

fn request(specs: &CsrSpecsState) -> CsrRequest {
    CsrRequest {
        distinguished_name: specs.distinguished_name.clone(),
        department_name: specs.department_name.clone(),
        business_name: specs.business_name.clone(),
        locality: specs.locality.clone(),
        state: specs.state.clone(),
        country: specs.country.clone(),
        email: specs.email.clone(),
        subject_alternate_names: specs.subject_alternate_names.join(","),
    }
}

#[async_trait]
impl Resource for ApplicationCsrResource {
    type State = ApplicationCsrState;
    const TYPE_NAME: &'static str = "ome_application_csr";

    fn validate(&self, plan: &ApplicationCsrState) -> Result<(), ProviderError> {
        let specs = &plan.specs;
        validators::not_blank("specs.distinguished_name", &specs.distinguished_name)?;
        validators::not_blank("specs.department_name", &specs.department_name)?;
        validators::not_blank("specs.business_name", &specs.business_name)?;
        validators::not_blank("specs.locality", &specs.locality)?;
        validators::not_blank("specs.state", &specs.state)?;
        validators::not_blank("specs.country", &specs.country)?;
        validators::size_between(
            "specs.subject_alternate_names",
            &specs.subject_alternate_names,
            1,
            MAX_SUBJECT_ALTERNATE_NAMES,
        )?;
        for name in &specs.subject_alternate_names {
            validators::not_blank("specs.subject_alternate_names", name)?;
        }
        validators::unique("specs.subject_alternate_names", &specs.subject_alternate_names)
    }

    fn requires_replace(&self, state: &ApplicationCsrState, plan: &ApplicationCsrState) -> Vec<&'static str> {
        if state.specs != plan.specs {
            vec!["specs"]
        } else {
            Vec::new()
        }
    }

    async fn create(&self, ctx: &Context<'_>, plan: &ApplicationCsrState) -> Result<ApplicationCsrState, ProviderError> {
        let response = ctx
            .client
            .generate_csr(&request(&plan.specs))
            .await
            .or_fail("Unable to generate CSR")?;
        info!("Generated CSR for {}", plan.specs.distinguished_name);
        Ok(ApplicationCsrState {
            id: STATE_ID.to_string(),
            specs: plan.specs.clone(),
            csr: response.certificate_data,
        })
    }

    async fn read(&self, _ctx: &Context<'_>, state: &ApplicationCsrState) -> Result<Option<ApplicationCsrState>, ProviderError> {
        Ok(Some(state.clone()))
    }

    async fn update(
        &self,
        _ctx: &Context<'_>,
        state: &ApplicationCsrState,
        plan: &ApplicationCsrState,
    ) -> Result<ApplicationCsrState, ProviderError> {
        Ok(ApplicationCsrState {
            specs: plan.specs.clone(),
            ..state.clone()
        })
    }

    async fn delete(&self, _ctx: &Context<'_>, _state: &ApplicationCsrState) -> Result<(), ProviderError> {
        debug!("Removing CSR from state");
        Ok(())
    }
}
