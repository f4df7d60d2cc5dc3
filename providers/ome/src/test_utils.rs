//! Test utilities for unit testing reconcilers
//!
//! This module provides a connector backed by `MockOmeClient` and helpers for
//! creating test entities and running host calls.

use crate::protocol::{Operation, Request, Response};
use crate::resource::{DataSource, DataSourceAdapter, DataSourceHandler, Resource, ResourceAdapter, ResourceHandler};
use crate::session::Connector;
use async_trait::async_trait;
use ome_client::{
    Device, DeviceManagement, Group, MEMBERSHIP_TYPE_STATIC, MockOmeClient, OmeApi, OmeError, Template, ViewType,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Connector handing out clones of one `MockOmeClient`
#[derive(Debug, Clone)]
pub struct MockConnector {
    client: MockOmeClient,
    failure: Option<String>,
    connects: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn new(client: MockOmeClient) -> Self {
        Self {
            client,
            failure: None,
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Connector whose sessions are always rejected
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(MockOmeClient::new("https://ome"))
        }
    }

    /// Number of sessions opened so far
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self) -> Result<Box<dyn OmeApi>, OmeError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(OmeError::Unauthorized(message.clone())),
            None => Ok(Box::new(self.client.clone())),
        }
    }
}

/// Helper to create a server that can be deployed to and updated
pub fn create_test_server(id: i64, service_tag: &str, ip: &str) -> Device {
    Device {
        id,
        device_type: 1000,
        identifier: service_tag.to_string(),
        device_service_tag: service_tag.to_string(),
        model: "PowerEdge R650".to_string(),
        power_state: 17,
        status: 1000,
        connection_state: true,
        device_name: format!("server-{}", service_tag.to_lowercase()),
        last_inventory_time: Some("2026-03-01 10:00:00.000".to_string()),
        device_capabilities: vec![1009, 1041],
        device_management: vec![DeviceManagement {
            management_id: id,
            network_address: ip.to_string(),
            ..Default::default()
        }],
        enabled: true,
        ..Default::default()
    }
}

/// Helper to create a template of a given view type
pub fn create_test_template(id: i64, name: &str, view_type: ViewType) -> Template {
    Template {
        id,
        name: name.to_string(),
        type_id: ome_client::TEMPLATE_TYPE_SERVER,
        view_type_id: view_type.id(),
        status: 2060,
        ..Default::default()
    }
}

/// Helper to create a static group
pub fn create_test_group(id: i64, name: &str, parent_id: i64) -> Group {
    Group {
        id,
        name: name.to_string(),
        description: Some(String::new()),
        parent_id,
        membership_type_id: MEMBERSHIP_TYPE_STATIC,
        ..Default::default()
    }
}

/// Mock with the `Static Groups` root and three servers
pub fn mock_with_servers() -> MockOmeClient {
    let mock = MockOmeClient::new("https://ome.test");
    mock.add_group(create_test_group(1021, "Static Groups", 0), &[]);
    mock.add_device(create_test_server(101, "SVC1001", "10.0.0.11"));
    mock.add_device(create_test_server(102, "SVC1002", "10.0.0.12"));
    mock.add_device(create_test_server(103, "SVC1003", "10.0.1.13"));
    mock
}

pub fn to_value<S: Serialize>(state: &S) -> serde_json::Value {
    serde_json::to_value(state).unwrap()
}

/// Decode the state of a successful response
pub fn state_of<S: DeserializeOwned>(response: &Response) -> S {
    assert_ok(response);
    serde_json::from_value(response.state.clone().expect("response carries no state")).unwrap()
}

pub fn assert_ok(response: &Response) {
    assert!(
        !response.has_error(),
        "unexpected error diagnostics: {:?}",
        response.diagnostics
    );
}

/// Summary and detail of the first error diagnostic
pub fn error_of(response: &Response) -> (String, String) {
    let error = response
        .diagnostics
        .errors()
        .next()
        .expect("response carries no error");
    (error.summary.clone(), error.detail.clone())
}

/// Run one resource call against the mock
pub async fn run_resource<R: Resource + 'static>(resource: R, mock: &MockOmeClient, request: Request) -> Response {
    let connector = MockConnector::new(mock.clone());
    ResourceAdapter(resource)
        .handle(&connector, &request, &CancellationToken::new())
        .await
}

pub async fn create<R: Resource + 'static>(resource: R, mock: &MockOmeClient, plan: &R::State) -> Response {
    let request = Request::new(R::TYPE_NAME, Operation::Create).with_planned(to_value(plan));
    run_resource(resource, mock, request).await
}

pub async fn read<R: Resource + 'static>(resource: R, mock: &MockOmeClient, state: &R::State) -> Response {
    let request = Request::new(R::TYPE_NAME, Operation::Read).with_prior(to_value(state));
    run_resource(resource, mock, request).await
}

pub async fn update<R: Resource + 'static>(
    resource: R,
    mock: &MockOmeClient,
    state: &R::State,
    plan: &R::State,
) -> Response {
    let request = Request::new(R::TYPE_NAME, Operation::Update)
        .with_prior(to_value(state))
        .with_planned(to_value(plan));
    run_resource(resource, mock, request).await
}

pub async fn delete<R: Resource + 'static>(resource: R, mock: &MockOmeClient, state: &R::State) -> Response {
    let request = Request::new(R::TYPE_NAME, Operation::Delete).with_prior(to_value(state));
    run_resource(resource, mock, request).await
}

pub async fn import<R: Resource + 'static>(resource: R, mock: &MockOmeClient, id: &str) -> Response {
    let request = Request::new(R::TYPE_NAME, Operation::Import).with_import_id(id);
    run_resource(resource, mock, request).await
}

pub async fn plan<R: Resource + 'static>(resource: R, prior: Option<&R::State>, plan: &R::State) -> Response {
    let mut request = Request::new(R::TYPE_NAME, Operation::Plan).with_planned(to_value(plan));
    if let Some(prior) = prior {
        request = request.with_prior(to_value(prior));
    }
    run_resource(resource, &MockOmeClient::new("https://ome.test"), request).await
}

/// Run one data source read against the mock
pub async fn read_data_source<D: DataSource + 'static>(source: D, mock: &MockOmeClient, config: &D::State) -> Response {
    let connector = MockConnector::new(mock.clone());
    let request = Request::new(D::TYPE_NAME, Operation::ReadDataSource).with_planned(to_value(config));
    DataSourceAdapter(source)
        .handle(&connector, &request, &CancellationToken::new())
        .await
}
