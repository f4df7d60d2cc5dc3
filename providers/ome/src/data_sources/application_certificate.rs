//! `ome_application_certificate` data source

use crate::error::{ProviderError, ResultExt};
use crate::resource::{Context, DataSource};
use async_trait::async_trait;
use ome_client::CertificateParty;
use ome_schema::{CertificateInfoState, CertificatePartyState};

/// Certificate currently installed on the appliance
#[derive(Debug, Default)]
pub struct ApplicationCertificateDataSource;

fn party(party: CertificateParty) -> CertificatePartyState {
    CertificatePartyState {
        country: party.country,
        state: party.state,
        city: party.city,
        organization: party.organization,
        organizational_unit: party.organizational_unit,
        common_name: party.common_name,
    }
}

#[async_trait]
impl DataSource for ApplicationCertificateDataSource {
    type State = CertificateInfoState;
    const TYPE_NAME: &'static str = "ome_application_certificate";

    async fn read(&self, ctx: &Context<'_>, _config: &CertificateInfoState) -> Result<CertificateInfoState, ProviderError> {
        let certificate = ctx.client.get_certificate().await.or_fail("Error reading")?;
        Ok(CertificateInfoState {
            id: Self::TYPE_NAME.to_string(),
            valid_from: certificate.valid_from,
            valid_to: certificate.valid_to,
            issued_by: party(certificate.issued_by),
            issued_to: party(certificate.issued_to),
        })
    }
}
