//! OmeApi trait for mocking
//!
//! This trait abstracts the OmeClient to enable mocking in unit tests.
//! The concrete OmeClient implements this trait, and tests can use MockOmeClient.

use crate::error::OmeError;
use crate::models::*;

/// Trait for OpenManage Enterprise API operations
///
/// One value of this trait represents one authenticated session.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait OmeApi: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Remove the session this client was created with
    async fn close_session(&self) -> Result<(), OmeError>;

    // Jobs
    async fn get_job(&self, id: i64) -> Result<Job, OmeError>;
    async fn get_job_execution_histories(&self, job_id: i64) -> Result<Vec<JobExecutionHistory>, OmeError>;
    async fn get_job_execution_details(&self, job_id: i64, history_id: i64) -> Result<Vec<JobExecutionDetail>, OmeError>;
    async fn delete_job(&self, id: i64) -> Result<(), OmeError>;

    // Templates
    async fn create_template(&self, request: &CreateTemplateRequest) -> Result<i64, OmeError>;
    async fn import_template(&self, request: &ImportTemplateRequest) -> Result<i64, OmeError>;
    async fn clone_template(&self, request: &CloneTemplateRequest) -> Result<i64, OmeError>;
    async fn get_template(&self, id: i64) -> Result<Template, OmeError>;
    async fn get_template_by_name(&self, name: &str) -> Result<Option<Template>, OmeError>;
    async fn list_templates(&self) -> Result<Vec<Template>, OmeError>;
    async fn update_template(&self, request: &UpdateTemplateRequest) -> Result<(), OmeError>;
    async fn delete_template(&self, id: i64) -> Result<(), OmeError>;
    async fn get_template_attributes(&self, id: i64) -> Result<AttributeDetails, OmeError>;
    async fn get_template_network(&self, id: i64) -> Result<TemplateNetwork, OmeError>;
    async fn update_template_network(&self, request: &UpdateNetworkConfigRequest) -> Result<(), OmeError>;
    async fn export_template(&self, id: i64) -> Result<String, OmeError>;
    async fn list_identity_pools(&self) -> Result<Vec<IdentityPool>, OmeError>;
    async fn list_vlan_networks(&self) -> Result<Vec<VlanNetwork>, OmeError>;

    // Deployment / server profiles
    async fn deploy_template(&self, request: &DeployTemplateRequest) -> Result<i64, OmeError>;
    async fn list_profiles_by_template(&self, template_id: i64) -> Result<Vec<Profile>, OmeError>;
    async fn delete_profiles(&self, profile_ids: &[i64]) -> Result<(), OmeError>;

    // Configuration baselines
    async fn create_config_baseline(&self, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError>;
    async fn update_config_baseline(&self, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError>;
    async fn delete_config_baselines(&self, ids: &[i64]) -> Result<(), OmeError>;
    async fn get_config_baseline(&self, id: i64) -> Result<ConfigBaseline, OmeError>;
    async fn get_config_baseline_by_name(&self, name: &str) -> Result<Option<ConfigBaseline>, OmeError>;
    async fn get_config_compliance_reports(&self, baseline_id: i64) -> Result<Vec<DeviceComplianceReport>, OmeError>;
    async fn get_device_compliance_details(&self, baseline_id: i64, device_id: i64) -> Result<DeviceComplianceDetails, OmeError>;
    async fn remediate_baseline(&self, request: &RemediationRequest) -> Result<i64, OmeError>;

    // Groups
    async fn create_group(&self, model: &GroupModel) -> Result<i64, OmeError>;
    async fn update_group(&self, model: &GroupModel) -> Result<(), OmeError>;
    async fn delete_group(&self, id: i64) -> Result<(), OmeError>;
    async fn get_group(&self, id: i64) -> Result<Group, OmeError>;
    async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>, OmeError>;
    async fn get_group_devices(&self, group_id: i64) -> Result<Vec<Device>, OmeError>;
    async fn add_group_members(&self, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError>;
    async fn remove_group_members(&self, group_id: i64, device_ids: &[i64]) -> Result<(), OmeError>;

    // Devices
    async fn list_devices(&self, filter: Option<&str>) -> Result<Vec<Device>, OmeError>;
    async fn get_device(&self, id: i64) -> Result<Device, OmeError>;
    async fn get_device_by_service_tag(&self, service_tag: &str) -> Result<Option<Device>, OmeError>;
    async fn get_device_inventory(&self, id: i64) -> Result<Vec<InventoryDetail>, OmeError>;
    async fn refresh_device_inventory(&self, device_ids: &[i64]) -> Result<i64, OmeError>;
    async fn remove_devices(&self, device_ids: &[i64]) -> Result<(), OmeError>;

    // Firmware catalogs and baselines
    async fn create_catalog(&self, request: &CatalogRequest) -> Result<Catalog, OmeError>;
    async fn update_catalog(&self, request: &CatalogRequest) -> Result<Catalog, OmeError>;
    async fn delete_catalogs(&self, ids: &[i64]) -> Result<(), OmeError>;
    async fn get_catalog(&self, id: i64) -> Result<Catalog, OmeError>;
    async fn list_catalogs(&self) -> Result<Vec<Catalog>, OmeError>;
    async fn create_firmware_baseline(&self, request: &FirmwareBaselineRequest) -> Result<i64, OmeError>;
    async fn update_firmware_baseline(&self, request: &FirmwareBaselineRequest) -> Result<i64, OmeError>;
    async fn delete_firmware_baselines(&self, ids: &[i64]) -> Result<(), OmeError>;
    async fn get_firmware_baseline(&self, id: i64) -> Result<FirmwareBaseline, OmeError>;
    async fn get_firmware_baseline_by_name(&self, name: &str) -> Result<Option<FirmwareBaseline>, OmeError>;
    async fn get_firmware_compliance_reports(&self, baseline_id: i64) -> Result<Vec<FirmwareComplianceReport>, OmeError>;

    // Accounts
    async fn create_account(&self, request: &AccountRequest) -> Result<Account, OmeError>;
    async fn update_account(&self, request: &AccountRequest) -> Result<Account, OmeError>;
    async fn delete_account(&self, id: &str) -> Result<(), OmeError>;
    async fn get_account(&self, id: &str) -> Result<Account, OmeError>;
    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, OmeError>;

    // Appliance certificates
    async fn upload_certificate(&self, certificate: Vec<u8>) -> Result<(), OmeError>;
    async fn get_certificate(&self) -> Result<CertificateInfo, OmeError>;
    async fn generate_csr(&self, request: &CsrRequest) -> Result<CsrResponse, OmeError>;

    // Discovery
    async fn create_discovery(&self, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError>;
    async fn update_discovery(&self, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError>;
    async fn get_discovery(&self, id: i64) -> Result<DiscoveryConfigGroup, OmeError>;
    async fn delete_discoveries(&self, ids: &[i64]) -> Result<(), OmeError>;

    // Appliance network settings
    async fn get_proxy_configuration(&self) -> Result<ProxyConfiguration, OmeError>;
    async fn update_proxy_configuration(&self, config: &ProxyConfiguration) -> Result<ProxyConfiguration, OmeError>;
    async fn get_time_configuration(&self) -> Result<TimeConfiguration, OmeError>;
    async fn update_time_configuration(&self, config: &TimeConfiguration) -> Result<TimeConfiguration, OmeError>;
    async fn list_session_configurations(&self) -> Result<Vec<SessionConfiguration>, OmeError>;
    async fn update_session_configurations(&self, configs: &[SessionConfiguration]) -> Result<(), OmeError>;
}
