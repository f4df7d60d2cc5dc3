//! OpenManage Enterprise Provider
//!
//! Declarative provider for Dell OpenManage Enterprise. The host hands over one
//! request at a time (resource type, lifecycle operation, prior and planned
//! state); the provider reconciles OME towards it and answers with the state to
//! record plus diagnostics:
//! - Templates and deployments
//! - Configuration baselines and remediation
//! - Static groups, devices, device actions and discovery
//! - Firmware catalogs and baselines
//! - Appliance users, certificates and network settings
//!
//! Requests and responses are JSON documents on files and stdout; logs go to stderr.

mod config;
mod data_sources;
mod diagnostics;
mod error;
mod protocol;
mod provider;
mod reconcile_helpers;
mod reconciler;
mod resolver;
mod resource;
mod session;
mod validators;

#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::ProviderConfig;
use ome_client::ClientOptions;
use protocol::Request;
use provider::Provider;
use serde::de::DeserializeOwned;
use session::OmeConnector;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ome-provider")]
#[command(about = "Reconcile Dell OpenManage Enterprise towards a declared state")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provider, resource and data source schemas
    Schema,

    /// Serve one request and print the response
    Apply {
        /// Request document (JSON or YAML)
        #[arg(long)]
        request: PathBuf,

        /// Provider configuration document (JSON or YAML); OME_* variables fill the gaps
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Parse a JSON or YAML document, picked by file extension
fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if yaml {
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    } else {
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}

async fn apply(request: &Path, config: Option<&Path>) -> Result<ExitCode> {
    let request: Request = load(request)?;
    let config: ProviderConfig = match config {
        Some(path) => load(path)?,
        None => ProviderConfig::default(),
    };
    let resolved = config.resolve().context("resolving provider configuration")?;
    info!(
        "Serving {} {} against {}",
        request.operation,
        request.type_name,
        resolved.base_url()
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling the running call");
            on_signal.cancel();
        }
    });

    let provider = Provider::new(Box::new(OmeConnector::new(resolved.client_options())));
    debug!(
        "Registered resources {:?}, data sources {:?}",
        provider.resource_types(),
        provider.data_source_types()
    );
    let response = provider.call(&request, &cancel).await;
    for diagnostic in response.diagnostics.warnings() {
        warn!("{}: {}", diagnostic.summary, diagnostic.detail);
    }
    for diagnostic in response.diagnostics.errors() {
        error!("{}: {}", diagnostic.summary, diagnostic.detail);
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.has_error() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Schema => {
            // Schemas come from the registry alone; no session is opened
            let provider = Provider::new(Box::new(OmeConnector::new(ClientOptions::new("", "", ""))));
            println!("{}", serde_json::to_string_pretty(&provider.schema())?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Apply { request, config } => apply(&request, config.as_deref()).await,
    }
}
