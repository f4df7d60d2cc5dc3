//! OME session lifecycle
//!
//! Every provider call that talks to OME opens its own session through a
//! `Connector` and closes it when the call ends, whatever the outcome.

use crate::diagnostics::Diagnostics;
use crate::error::{ProviderError, ResultExt};
use async_trait::async_trait;
use ome_client::{ClientOptions, OmeApi, OmeClient, OmeError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Opens authenticated OME sessions
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn OmeApi>, OmeError>;
}

/// Connector for a real appliance
pub struct OmeConnector {
    options: ClientOptions,
}

impl std::fmt::Debug for OmeConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmeConnector")
            .field("base_url", &self.options.base_url)
            .field("username", &self.options.username)
            .finish_non_exhaustive()
    }
}

impl OmeConnector {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Connector for OmeConnector {
    async fn connect(&self) -> Result<Box<dyn OmeApi>, OmeError> {
        let client = OmeClient::connect(&self.options).await?;
        Ok(Box::new(client))
    }
}

/// One open session
pub struct Session {
    client: Box<dyn OmeApi>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

impl Session {
    /// Connect, giving up as soon as `cancel` fires
    pub async fn open(
        connector: &dyn Connector,
        cancel: &CancellationToken,
    ) -> Result<Self, ProviderError> {
        let client = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
            result = connector.connect() => result.or_fail("Unable to create OME session")?,
        };
        debug!("OME session open at {}", client.base_url());
        Ok(Self { client })
    }

    pub fn client(&self) -> &dyn OmeApi {
        self.client.as_ref()
    }

    /// Remove the session on OME. A failure here does not fail the call.
    pub async fn close(self, diagnostics: &mut Diagnostics) {
        if let Err(e) = self.client.close_session().await {
            warn!("Failed to close OME session at {}: {}", self.client.base_url(), e);
            diagnostics.warn("Unable to close OME session", e.detail());
        }
    }
}
