//! Host-facing dispatch
//!
//! Holds the registry of resources and data sources and routes each host call
//! to its handler. The provider keeps no state between calls.

use crate::config::ProviderConfig;
use crate::data_sources;
use crate::error::ProviderError;
use crate::protocol::{Operation, Request, Response};
use crate::reconciler;
use crate::resource::{DataSourceHandler, ResourceHandler};
use crate::session::Connector;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The OME provider
pub struct Provider {
    connector: Box<dyn Connector>,
    resources: BTreeMap<&'static str, Box<dyn ResourceHandler>>,
    data_sources: BTreeMap<&'static str, Box<dyn DataSourceHandler>>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Provider {
    /// Provider with every resource and data source registered
    pub fn new(connector: Box<dyn Connector>) -> Self {
        let mut provider = Self {
            connector,
            resources: BTreeMap::new(),
            data_sources: BTreeMap::new(),
        };
        for handler in reconciler::handlers() {
            provider.resources.insert(handler.type_name(), handler);
        }
        for handler in data_sources::handlers() {
            provider.data_sources.insert(handler.type_name(), handler);
        }
        provider
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    pub fn data_source_types(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }

    /// Provider configuration schema plus one schema per resource and data source
    pub fn schema(&self) -> serde_json::Value {
        let resources: serde_json::Map<String, serde_json::Value> = self
            .resources
            .iter()
            .map(|(name, handler)| (name.to_string(), handler.schema()))
            .collect();
        let data_sources: serde_json::Map<String, serde_json::Value> = self
            .data_sources
            .iter()
            .map(|(name, handler)| (name.to_string(), handler.schema()))
            .collect();
        serde_json::json!({
            "provider": ome_schema::schema_of::<ProviderConfig>(),
            "resources": resources,
            "data_sources": data_sources,
        })
    }

    /// Serve one host call
    pub async fn call(&self, request: &Request, cancel: &CancellationToken) -> Response {
        debug!("Dispatching {} {}", request.operation, request.type_name);
        let response = if request.operation == Operation::ReadDataSource {
            match self.data_sources.get(request.type_name.as_str()) {
                Some(handler) => Some(handler.handle(self.connector.as_ref(), request, cancel).await),
                None => None,
            }
        } else {
            match self.resources.get(request.type_name.as_str()) {
                Some(handler) => Some(handler.handle(self.connector.as_ref(), request, cancel).await),
                None => None,
            }
        };

        response.unwrap_or_else(|| {
            let mut response = Response {
                state: request.prior_state.clone(),
                ..Default::default()
            };
            response
                .diagnostics
                .push(ProviderError::UnknownType(request.type_name.clone()).to_diagnostic());
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockConnector;
    use ome_client::MockOmeClient;

    fn provider() -> Provider {
        Provider::new(Box::new(MockConnector::new(MockOmeClient::new("https://ome"))))
    }

    #[test]
    fn test_registry_lists_every_type() {
        let provider = provider();
        let resources = provider.resource_types();
        for name in [
            "ome_template",
            "ome_deployment",
            "ome_configuration_baseline",
            "ome_configuration_compliance",
            "ome_static_group",
            "ome_devices",
            "ome_device_action",
            "ome_firmware_catalog",
            "ome_firmware_baseline",
            "ome_user",
            "ome_application_certificate",
            "ome_application_csr",
            "ome_discovery",
            "ome_network_setting",
        ] {
            assert!(resources.contains(&name), "missing resource {}", name);
        }
        assert_eq!(resources.len(), 14);

        let data_sources = provider.data_source_types();
        for name in [
            "ome_device",
            "ome_template_info",
            "ome_groupdevices_info",
            "ome_vlannetworks_info",
            "ome_application_certificate",
            "ome_configuration_report_info",
            "ome_device_compliance_report",
            "ome_firmware_catalog",
            "ome_firmware_repository",
            "ome_fw_baseline_compliance_report_info",
        ] {
            assert!(data_sources.contains(&name), "missing data source {}", name);
        }
        assert_eq!(data_sources.len(), 10);
    }

    #[test]
    fn test_schema_document() {
        let schema = provider().schema();
        assert!(schema["provider"]["properties"]["host"].is_object());
        assert!(schema["resources"]["ome_static_group"]["properties"]["device_ids"].is_object());
        assert!(schema["data_sources"]["ome_device"]["properties"]["devices"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let request = Request::new("ome_chassis", Operation::Read);
        let response = provider().call(&request, &CancellationToken::new()).await;
        assert!(response.has_error());
        assert!(response.state.is_none());
    }
}
