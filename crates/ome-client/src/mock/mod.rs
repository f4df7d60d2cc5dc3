//! Mock OmeClient for unit testing
//!
//! This module provides an in-memory implementation of `OmeApi` that can be used
//! in unit tests without requiring a running OME appliance.
//!
//! The mock is organized into domain-specific modules:
//! - `jobs.rs` - scripted job status sequences and execution details
//! - `templates.rs` - templates, attributes, network config, deployments, profiles
//! - `baselines.rs` - configuration baselines, compliance reports, remediation
//! - `groups.rs` - static groups and their members
//! - `devices.rs` - devices, inventory, filters
//! - `updates.rs` - firmware catalogs and firmware baselines
//! - `appliance.rs` - accounts, certificates, discovery, network settings
//!
//! Every operation is recorded in call order (see [`MockOmeClient::calls`]), and any
//! operation can be made to fail with [`MockOmeClient::fail_on`].

mod appliance;
mod baselines;
mod devices;
mod groups;
mod jobs;
mod templates;
mod updates;

use crate::error::OmeError;
use crate::models::*;
use crate::ome_trait::OmeApi;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Mock OmeClient for testing
///
/// This mock stores entities in memory and can be configured to return
/// specific responses for testing different scenarios. Clones share state.
#[derive(Clone, Default)]
pub struct MockOmeClient {
    pub(crate) base_url: String,
    // Jobs
    pub(crate) jobs: Arc<Mutex<HashMap<i64, VecDeque<JobStatus>>>>,
    pub(crate) job_polls: Arc<Mutex<HashMap<i64, usize>>>,
    pub(crate) job_messages: Arc<Mutex<HashMap<i64, Vec<String>>>>,
    pub(crate) scripted_jobs: Arc<Mutex<VecDeque<Vec<JobStatus>>>>,
    // Templates and deployments
    pub(crate) templates: Arc<Mutex<HashMap<i64, Template>>>,
    pub(crate) template_attributes: Arc<Mutex<HashMap<i64, AttributeDetails>>>,
    pub(crate) template_networks: Arc<Mutex<HashMap<i64, TemplateNetwork>>>,
    pub(crate) template_contents: Arc<Mutex<HashMap<i64, String>>>,
    pub(crate) attribute_seed: Arc<Mutex<Vec<AttributeGroup>>>,
    pub(crate) network_seed: Arc<Mutex<TemplateNetwork>>,
    pub(crate) identity_pools: Arc<Mutex<HashMap<i64, IdentityPool>>>,
    pub(crate) vlan_networks: Arc<Mutex<HashMap<i64, VlanNetwork>>>,
    pub(crate) profiles: Arc<Mutex<HashMap<i64, Profile>>>,
    pub(crate) deployments: Arc<Mutex<Vec<DeployTemplateRequest>>>,
    // Configuration baselines
    pub(crate) config_baselines: Arc<Mutex<HashMap<i64, ConfigBaseline>>>,
    pub(crate) baseline_compliance: Arc<Mutex<HashMap<i64, VecDeque<ComplianceStatus>>>>,
    pub(crate) device_compliance: Arc<Mutex<HashMap<(i64, i64), ComplianceStatus>>>,
    pub(crate) compliance_details: Arc<Mutex<HashMap<(i64, i64), DeviceComplianceDetails>>>,
    pub(crate) remediations: Arc<Mutex<Vec<RemediationRequest>>>,
    // Groups and devices
    pub(crate) groups: Arc<Mutex<HashMap<i64, Group>>>,
    pub(crate) group_members: Arc<Mutex<HashMap<i64, BTreeSet<i64>>>>,
    pub(crate) devices: Arc<Mutex<HashMap<i64, Device>>>,
    pub(crate) inventories: Arc<Mutex<HashMap<i64, Vec<InventoryDetail>>>>,
    pub(crate) filter_results: Arc<Mutex<HashMap<String, Vec<i64>>>>,
    // Firmware
    pub(crate) catalogs: Arc<Mutex<HashMap<i64, Catalog>>>,
    pub(crate) firmware_baselines: Arc<Mutex<HashMap<i64, FirmwareBaseline>>>,
    pub(crate) firmware_reports: Arc<Mutex<HashMap<i64, Vec<FirmwareComplianceReport>>>>,
    // Appliance
    pub(crate) accounts: Arc<Mutex<HashMap<String, Account>>>,
    pub(crate) certificate: Arc<Mutex<CertificateInfo>>,
    pub(crate) uploaded_certificates: Arc<Mutex<Vec<Vec<u8>>>>,
    pub(crate) discoveries: Arc<Mutex<HashMap<i64, DiscoveryConfigGroup>>>,
    pub(crate) proxy: Arc<Mutex<ProxyConfiguration>>,
    pub(crate) time: Arc<Mutex<TimeConfiguration>>,
    pub(crate) session_configs: Arc<Mutex<Vec<SessionConfiguration>>>,
    // Bookkeeping
    pub(crate) failures: Arc<Mutex<HashMap<String, String>>>,
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
    pub(crate) sessions_closed: Arc<Mutex<usize>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<i64>>,
}

impl std::fmt::Debug for MockOmeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockOmeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MockOmeClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            next_id: Arc::new(Mutex::new(10_000)),
            ..Default::default()
        }
    }

    /// Make every later call of `operation` fail with an API error carrying `message`
    ///
    /// `operation` is the `OmeApi` method name, e.g. `"add_group_members"`.
    pub fn fail_on(&self, operation: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation.to_string(), message.to_string());
    }

    /// Stop failing `operation`
    pub fn clear_failure(&self, operation: &str) {
        self.failures.lock().unwrap().remove(operation);
    }

    /// Names of the operations called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls of one operation
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == operation).count()
    }

    /// Number of times `close_session` was called
    pub fn sessions_closed(&self) -> usize {
        *self.sessions_closed.lock().unwrap()
    }

    /// Record a call and return the injected failure, if any
    pub(crate) fn enter(&self, operation: &str) -> Result<(), OmeError> {
        self.calls.lock().unwrap().push(operation.to_string());
        match self.failures.lock().unwrap().get(operation) {
            Some(message) => Err(OmeError::Api {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> i64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }
}

pub(crate) fn not_found(kind: &str, id: impl std::fmt::Display) -> OmeError {
    OmeError::NotFound(format!("{} {} not found", kind, id))
}

pub(crate) fn rejected(message: impl Into<String>) -> OmeError {
    OmeError::Api {
        status: 400,
        message: message.into(),
    }
}

#[async_trait::async_trait]
impl OmeApi for MockOmeClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn close_session(&self) -> Result<(), OmeError> {
        *self.sessions_closed.lock().unwrap() += 1;
        self.enter("close_session")
    }

    // Jobs - delegated to jobs module
    async fn get_job(&self, id: i64) -> Result<Job, OmeError> {
        jobs::get_job(self, id).await
    }

    async fn get_job_execution_histories(&self, job_id: i64) -> Result<Vec<JobExecutionHistory>, OmeError> {
        jobs::get_job_execution_histories(self, job_id).await
    }

    async fn get_job_execution_details(&self, job_id: i64, history_id: i64) -> Result<Vec<JobExecutionDetail>, OmeError> {
        jobs::get_job_execution_details(self, job_id, history_id).await
    }

    async fn delete_job(&self, id: i64) -> Result<(), OmeError> {
        jobs::delete_job(self, id).await
    }

    // Templates - delegated to templates module
    async fn create_template(&self, request: &CreateTemplateRequest) -> Result<i64, OmeError> {
        templates::create_template(self, request).await
    }

    async fn import_template(&self, request: &ImportTemplateRequest) -> Result<i64, OmeError> {
        templates::import_template(self, request).await
    }

    async fn clone_template(&self, request: &CloneTemplateRequest) -> Result<i64, OmeError> {
        templates::clone_template(self, request).await
    }

    async fn get_template(&self, id: i64) -> Result<Template, OmeError> {
        templates::get_template(self, id).await
    }

    async fn get_template_by_name(&self, name: &str) -> Result<Option<Template>, OmeError> {
        templates::get_template_by_name(self, name).await
    }

    async fn list_templates(&self) -> Result<Vec<Template>, OmeError> {
        templates::list_templates(self).await
    }

    async fn update_template(&self, request: &UpdateTemplateRequest) -> Result<(), OmeError> {
        templates::update_template(self, request).await
    }

    async fn delete_template(&self, id: i64) -> Result<(), OmeError> {
        templates::delete_template(self, id).await
    }

    async fn get_template_attributes(&self, id: i64) -> Result<AttributeDetails, OmeError> {
        templates::get_template_attributes(self, id).await
    }

    async fn get_template_network(&self, id: i64) -> Result<TemplateNetwork, OmeError> {
        templates::get_template_network(self, id).await
    }

    async fn update_template_network(&self, request: &UpdateNetworkConfigRequest) -> Result<(), OmeError> {
        templates::update_template_network(self, request).await
    }

    async fn export_template(&self, id: i64) -> Result<String, OmeError> {
        templates::export_template(self, id).await
    }

    async fn list_identity_pools(&self) -> Result<Vec<IdentityPool>, OmeError> {
        templates::list_identity_pools(self).await
    }

    async fn list_vlan_networks(&self) -> Result<Vec<VlanNetwork>, OmeError> {
        templates::list_vlan_networks(self).await
    }

    async fn deploy_template(&self, request: &DeployTemplateRequest) -> Result<i64, OmeError> {
        templates::deploy_template(self, request).await
    }

    async fn list_profiles_by_template(&self, template_id: i64) -> Result<Vec<Profile>, OmeError> {
        templates::list_profiles_by_template(self, template_id).await
    }

    async fn delete_profiles(&self, profile_ids: &[i64]) -> Result<(), OmeError> {
        templates::delete_profiles(self, profile_ids).await
    }

    // Configuration baselines - delegated to baselines module
    async fn create_config_baseline(&self, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError> {
        baselines::create_config_baseline(self, request).await
    }

    async fn update_config_baseline(&self, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError> {
        baselines::update_config_baseline(self, request).await
    }

    async fn delete_config_baselines(&self, ids: &[i64]) -> Result<(), OmeError> {
        baselines::delete_config_baselines(self, ids).await
    }

    async fn get_config_baseline(&self, id: i64) -> Result<ConfigBaseline, OmeError> {
        baselines::get_config_baseline(self, id).await
    }

    async fn get_config_baseline_by_name(&self, name: &str) -> Result<Option<ConfigBaseline>, OmeError> {
        baselines::get_config_baseline_by_name(self, name).await
    }

    async fn get_config_compliance_reports(&self, baseline_id: i64) -> Result<Vec<DeviceComplianceReport>, OmeError> {
        baselines::get_config_compliance_reports(self, baseline_id).await
    }

    async fn get_device_compliance_details(&self, baseline_id: i64, device_id: i64) -> Result<DeviceComplianceDetails, OmeError> {
        baselines::get_device_compliance_details(self, baseline_id, device_id).await
    }

    async fn remediate_baseline(&self, request: &RemediationRequest) -> Result<i64, OmeError> {
        baselines::remediate_baseline(self, request).await
    }

    // Groups - delegated to groups module
    async fn create_group(&self, model: &GroupModel) -> Result<i64, OmeError> {
        groups::create_group(self, model).await
    }

    async fn update_group(&self, model: &GroupModel) -> Result<(), OmeError> {
        groups::update_group(self, model).await
    }

    async fn delete_group(&self, id: i64) -> Result<(), OmeError> {
        groups::delete_group(self, id).await
    }

    async fn get_group(&self, id: i64) -> Result<Group, OmeError> {
        groups::get_group(self, id).await
    }

    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>, OmeError> {
        groups::get_group_by_name(self, name).await
    }

    async fn get_group_devices(&self, group_id: i64) -> Result<Vec<Device>, OmeError> {
        groups::get_group_devices(self, group_id).await
    }

    async fn add_group_members(&self, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError> {
        groups::add_group_members(self, group_id, device_ids).await
    }

    async fn remove_group_members(&self, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError> {
        groups::remove_group_members(self, group_id, device_ids).await
    }

    // Devices - delegated to devices module
    async fn list_devices(&self, filter: Option<&str>) -> Result<Vec<Device>, OmeError> {
        devices::list_devices(self, filter).await
    }

    async fn get_device(&self, id: i64) -> Result<Device, OmeError> {
        devices::get_device(self, id).await
    }

    async fn get_device_by_service_tag(&self, service_tag: &str) -> Result<Option<Device>, OmeError> {
        devices::get_device_by_service_tag(self, service_tag).await
    }

    async fn get_device_inventory(&self, id: i64) -> Result<Vec<InventoryDetail>, OmeError> {
        devices::get_device_inventory(self, id).await
    }

    async fn refresh_device_inventory(&self, device_ids: &[i64]) -> Result<i64, OmeError> {
        devices::refresh_device_inventory(self, device_ids).await
    }

    async fn remove_devices(&self, device_ids: &[i64]) -> Result<(), OmeError> {
        devices::remove_devices(self, device_ids).await
    }

    // Firmware - delegated to updates module
    async fn create_catalog(&self, request: &CatalogRequest) -> Result<Catalog, OmeError> {
        updates::create_catalog(self, request).await
    }

    async fn update_catalog(&self, request: &CatalogRequest) -> Result<Catalog, OmeError> {
        updates::update_catalog(self, request).await
    }

    async fn delete_catalogs(&self, ids: &[i64]) -> Result<(), OmeError> {
        updates::delete_catalogs(self, ids).await
    }

    async fn get_catalog(&self, id: i64) -> Result<Catalog, OmeError> {
        updates::get_catalog(self, id).await
    }

    async fn list_catalogs(&self) -> Result<Vec<Catalog>, OmeError> {
        updates::list_catalogs(self).await
    }

    async fn create_firmware_baseline(&self, request: &FirmwareBaselineRequest) -> Result<i64, OmeError> {
        updates::create_firmware_baseline(self, request).await
    }

    async fn update_firmware_baseline(&self, request: &FirmwareBaselineRequest) -> Result<i64, OmeError> {
        updates::update_firmware_baseline(self, request).await
    }

    async fn delete_firmware_baselines(&self, ids: &[i64]) -> Result<(), OmeError> {
        updates::delete_firmware_baselines(self, ids).await
    }

    async fn get_firmware_baseline(&self, id: i64) -> Result<FirmwareBaseline, OmeError> {
        updates::get_firmware_baseline(self, id).await
    }

    async fn get_firmware_baseline_by_name(&self, name: &str) -> Result<Option<FirmwareBaseline>, OmeError> {
        updates::get_firmware_baseline_by_name(self, name).await
    }

    async fn get_firmware_compliance_reports(&self, baseline_id: i64) -> Result<Vec<FirmwareComplianceReport>, OmeError> {
        updates::get_firmware_compliance_reports(self, baseline_id).await
    }

    // Appliance - delegated to appliance module
    async fn create_account(&self, request: &AccountRequest) -> Result<Account, OmeError> {
        appliance::create_account(self, request).await
    }

    async fn update_account(&self, request: &AccountRequest) -> Result<Account, OmeError> {
        appliance::update_account(self, request).await
    }

    async fn delete_account(&self, id: &str) -> Result<(), OmeError> {
        appliance::delete_account(self, id).await
    }

    async fn get_account(&self, id: &str) -> Result<Account, OmeError> {
        appliance::get_account(self, id).await
    }

    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, OmeError> {
        appliance::get_account_by_username(self, username).await
    }

    async fn upload_certificate(&self, certificate: Vec<u8>) -> Result<(), OmeError> {
        appliance::upload_certificate(self, certificate).await
    }

    async fn get_certificate(&self) -> Result<CertificateInfo, OmeError> {
        appliance::get_certificate(self).await
    }

    async fn generate_csr(&self, request: &CsrRequest) -> Result<CsrResponse, OmeError> {
        appliance::generate_csr(self, request).await
    }

    async fn create_discovery(&self, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError> {
        appliance::create_discovery(self, group).await
    }

    async fn update_discovery(&self, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError> {
        appliance::update_discovery(self, group).await
    }

    async fn get_discovery(&self, id: i64) -> Result<DiscoveryConfigGroup, OmeError> {
        appliance::get_discovery(self, id).await
    }

    async fn delete_discoveries(&self, ids: &[i64]) -> Result<(), OmeError> {
        appliance::delete_discoveries(self, ids).await
    }

    async fn get_proxy_configuration(&self) -> Result<ProxyConfiguration, OmeError> {
        appliance::get_proxy_configuration(self).await
    }

    async fn update_proxy_configuration(&self, config: &ProxyConfiguration) -> Result<ProxyConfiguration, OmeError> {
        appliance::update_proxy_configuration(self, config).await
    }

    async fn get_time_configuration(&self) -> Result<TimeConfiguration, OmeError> {
        appliance::get_time_configuration(self).await
    }

    async fn update_time_configuration(&self, config: &TimeConfiguration) -> Result<TimeConfiguration, OmeError> {
        appliance::update_time_configuration(self, config).await
    }

    async fn list_session_configurations(&self) -> Result<Vec<SessionConfiguration>, OmeError> {
        appliance::list_session_configurations(self).await
    }

    async fn update_session_configurations(&self, configs: &[SessionConfiguration]) -> Result<(), OmeError> {
        appliance::update_session_configurations(self, configs).await
    }
}
