//! Resource and data source seams
//!
//! A reconciler implements [`Resource`] (or [`DataSource`]) for its typed state.
//! [`ResourceAdapter`] and [`DataSourceAdapter`] turn those into type-erased
//! handlers that run one host call: decode the documents, validate, open a
//! session, run the operation under the host's cancellation signal, close the
//! session and encode the response.

use crate::diagnostics::Diagnostics;
use crate::error::ProviderError;
use crate::protocol::{Operation, Request, Response};
use crate::session::{Connector, Session};
use async_trait::async_trait;
use ome_client::OmeApi;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Everything an operation needs while its session is open
pub struct Context<'a> {
    pub client: &'a dyn OmeApi,
    pub cancel: &'a CancellationToken,
    diagnostics: Mutex<Diagnostics>,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

impl<'a> Context<'a> {
    pub fn new(client: &'a dyn OmeApi, cancel: &'a CancellationToken) -> Self {
        Self {
            client,
            cancel,
            diagnostics: Mutex::new(Diagnostics::default()),
        }
    }

    /// Attach a warning to the response
    pub fn warn(&self, summary: impl Into<String>, detail: impl Into<String>) {
        let summary = summary.into();
        let detail = detail.into();
        warn!("{}: {}", summary, detail);
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .warn(summary, detail);
    }

    /// Sleep unless the host cancels first
    pub async fn sleep(&self, duration: Duration) -> Result<(), ProviderError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(ProviderError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bounds every state document satisfies
pub trait StateDocument:
    Serialize + DeserializeOwned + JsonSchema + Clone + PartialEq + Default + Debug + Send + Sync
{
}

impl<T> StateDocument for T where
    T: Serialize + DeserializeOwned + JsonSchema + Clone + PartialEq + Default + Debug + Send + Sync
{
}

/// Lifecycle of one OME entity type
#[async_trait]
pub trait Resource: Send + Sync {
    type State: StateDocument;

    /// Host-facing type name, e.g. `ome_template`
    const TYPE_NAME: &'static str;

    /// Local checks on the desired state. Runs before any OME call.
    fn validate(&self, _plan: &Self::State) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Attributes whose change cannot be applied in place
    fn requires_replace(&self, _state: &Self::State, _plan: &Self::State) -> Vec<&'static str> {
        Vec::new()
    }

    async fn create(&self, ctx: &Context<'_>, plan: &Self::State) -> Result<Self::State, ProviderError>;

    /// Refresh from OME. `None` means the entity is gone.
    async fn read(&self, ctx: &Context<'_>, state: &Self::State) -> Result<Option<Self::State>, ProviderError>;

    async fn update(
        &self,
        ctx: &Context<'_>,
        state: &Self::State,
        plan: &Self::State,
    ) -> Result<Self::State, ProviderError>;

    async fn delete(&self, ctx: &Context<'_>, state: &Self::State) -> Result<(), ProviderError>;

    async fn import(&self, _ctx: &Context<'_>, _id: &str) -> Result<Self::State, ProviderError> {
        Err(ProviderError::Unsupported(format!(
            "{} does not support import",
            Self::TYPE_NAME
        )))
    }
}

/// Read-only view of OME entities
#[async_trait]
pub trait DataSource: Send + Sync {
    type State: StateDocument;

    const TYPE_NAME: &'static str;

    fn validate(&self, _config: &Self::State) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn read(&self, ctx: &Context<'_>, config: &Self::State) -> Result<Self::State, ProviderError>;
}

/// Type-erased resource
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Value;
    async fn handle(&self, connector: &dyn Connector, request: &Request, cancel: &CancellationToken) -> Response;
}

/// Type-erased data source
#[async_trait]
pub trait DataSourceHandler: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> Value;
    async fn handle(&self, connector: &dyn Connector, request: &Request, cancel: &CancellationToken) -> Response;
}

/// Operation to run once the session is open
enum Call<S> {
    Create(S),
    Read(S),
    Update(S, S),
    Delete(S),
    Import(String),
}

/// Successful outcome of one call
struct Outcome<S> {
    state: Option<S>,
    requires_replace: Vec<String>,
}

/// Adapts a [`Resource`] to the host protocol
#[derive(Debug, Default)]
pub struct ResourceAdapter<R>(pub R);

impl<R: Resource> ResourceAdapter<R> {
    async fn dispatch(
        &self,
        connector: &dyn Connector,
        request: &Request,
        cancel: &CancellationToken,
        diagnostics: &mut Diagnostics,
    ) -> Result<Outcome<R::State>, ProviderError> {
        let call = match request.operation {
            Operation::Plan => {
                let plan: R::State = decode(request.planned_state.as_ref(), "planned state")?;
                self.0.validate(&plan)?;
                let requires_replace = match request.prior_state.as_ref() {
                    Some(prior) => {
                        let state: R::State = decode(Some(prior), "prior state")?;
                        self.0
                            .requires_replace(&state, &plan)
                            .into_iter()
                            .map(str::to_string)
                            .collect()
                    }
                    None => Vec::new(),
                };
                return Ok(Outcome {
                    state: Some(plan),
                    requires_replace,
                });
            }
            Operation::Create => {
                let plan = decode(request.planned_state.as_ref(), "planned state")?;
                self.0.validate(&plan)?;
                Call::Create(plan)
            }
            Operation::Read => Call::Read(decode(request.prior_state.as_ref(), "prior state")?),
            Operation::Update => {
                let state: R::State = decode(request.prior_state.as_ref(), "prior state")?;
                let plan: R::State = decode(request.planned_state.as_ref(), "planned state")?;
                self.0.validate(&plan)?;
                let replace = self.0.requires_replace(&state, &plan);
                if !replace.is_empty() {
                    return Err(ProviderError::Validation(format!(
                        "{} cannot be changed in place, the resource must be replaced",
                        replace.join(", ")
                    )));
                }
                Call::Update(state, plan)
            }
            Operation::Delete => Call::Delete(decode(request.prior_state.as_ref(), "prior state")?),
            Operation::Import => {
                let id = request
                    .import_id
                    .clone()
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| ProviderError::Validation("import requires an identifier".to_string()))?;
                Call::Import(id)
            }
            Operation::ReadDataSource => {
                return Err(ProviderError::Unsupported(format!(
                    "{} is a resource, not a data source",
                    R::TYPE_NAME
                )));
            }
        };

        let session = Session::open(connector, cancel).await?;
        let ctx = Context::new(session.client(), cancel);
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.execute(&ctx, call) => result,
        };
        diagnostics.extend(ctx.into_diagnostics());
        session.close(diagnostics).await;

        Ok(Outcome {
            state: result?,
            requires_replace: Vec::new(),
        })
    }

    async fn execute(&self, ctx: &Context<'_>, call: Call<R::State>) -> Result<Option<R::State>, ProviderError> {
        match call {
            Call::Create(plan) => self.0.create(ctx, &plan).await.map(Some),
            Call::Read(state) => self.0.read(ctx, &state).await,
            Call::Update(state, plan) => self.0.update(ctx, &state, &plan).await.map(Some),
            Call::Delete(state) => self.0.delete(ctx, &state).await.map(|()| None),
            Call::Import(id) => self.0.import(ctx, &id).await.map(Some),
        }
    }
}

#[async_trait]
impl<R: Resource> ResourceHandler for ResourceAdapter<R> {
    fn type_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn schema(&self) -> Value {
        ome_schema::schema_of::<R::State>()
    }

    async fn handle(&self, connector: &dyn Connector, request: &Request, cancel: &CancellationToken) -> Response {
        info!("{} {}", request.operation, R::TYPE_NAME);
        let mut diagnostics = Diagnostics::default();
        match self.dispatch(connector, request, cancel, &mut diagnostics).await {
            Ok(outcome) => match encode(outcome.state.as_ref()) {
                Ok(state) => Response {
                    state,
                    requires_replace: outcome.requires_replace,
                    diagnostics,
                },
                Err(e) => failure(request, e, diagnostics, R::TYPE_NAME),
            },
            Err(e) => failure(request, e, diagnostics, R::TYPE_NAME),
        }
    }
}

/// Adapts a [`DataSource`] to the host protocol
#[derive(Debug, Default)]
pub struct DataSourceAdapter<D>(pub D);

impl<D: DataSource> DataSourceAdapter<D> {
    async fn dispatch(
        &self,
        connector: &dyn Connector,
        request: &Request,
        cancel: &CancellationToken,
        diagnostics: &mut Diagnostics,
    ) -> Result<D::State, ProviderError> {
        if !matches!(request.operation, Operation::ReadDataSource | Operation::Read) {
            return Err(ProviderError::Unsupported(format!(
                "{} is a data source and only supports read",
                D::TYPE_NAME
            )));
        }
        let config: D::State = match request.planned_state.as_ref() {
            Some(value) => serde_json::from_value(value.clone())?,
            None => D::State::default(),
        };
        self.0.validate(&config)?;

        let session = Session::open(connector, cancel).await?;
        let ctx = Context::new(session.client(), cancel);
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.0.read(&ctx, &config) => result,
        };
        diagnostics.extend(ctx.into_diagnostics());
        session.close(diagnostics).await;
        result
    }
}

#[async_trait]
impl<D: DataSource> DataSourceHandler for DataSourceAdapter<D> {
    fn type_name(&self) -> &'static str {
        D::TYPE_NAME
    }

    fn schema(&self) -> Value {
        ome_schema::schema_of::<D::State>()
    }

    async fn handle(&self, connector: &dyn Connector, request: &Request, cancel: &CancellationToken) -> Response {
        info!("read data source {}", D::TYPE_NAME);
        let mut diagnostics = Diagnostics::default();
        match self.dispatch(connector, request, cancel, &mut diagnostics).await {
            Ok(state) => match serde_json::to_value(&state) {
                Ok(state) => Response {
                    state: Some(state),
                    requires_replace: Vec::new(),
                    diagnostics,
                },
                Err(e) => failure(request, e.into(), diagnostics, D::TYPE_NAME),
            },
            Err(e) => failure(request, e, diagnostics, D::TYPE_NAME),
        }
    }
}

fn decode<S: DeserializeOwned>(value: Option<&Value>, what: &str) -> Result<S, ProviderError> {
    let value = value.ok_or_else(|| ProviderError::Validation(format!("{} is required for this operation", what)))?;
    Ok(serde_json::from_value(value.clone())?)
}

fn encode<S: Serialize>(state: Option<&S>) -> Result<Option<Value>, ProviderError> {
    state
        .map(serde_json::to_value)
        .transpose()
        .map_err(ProviderError::from)
}

/// Error response: the host keeps the state it had before the call
fn failure(request: &Request, err: ProviderError, mut diagnostics: Diagnostics, type_name: &str) -> Response {
    error!("{} {} failed: {}", request.operation, type_name, err);
    diagnostics.push(err.to_diagnostic());
    Response {
        state: request.prior_state.clone(),
        requires_replace: Vec::new(),
        diagnostics,
    }
}
