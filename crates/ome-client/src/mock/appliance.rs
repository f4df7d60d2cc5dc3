//! Account, certificate, discovery and network settings operations for MockOmeClient

use super::{MockOmeClient, not_found, rejected};
use crate::error::OmeError;
use crate::models::*;

impl MockOmeClient {
    /// Add an account to the mock store (for test setup)
    pub fn add_account(&self, account: Account) {
        self.accounts.lock().unwrap().insert(account.id.clone(), account);
    }

    /// Certificate returned by `get_certificate`
    pub fn set_certificate(&self, certificate: CertificateInfo) {
        *self.certificate.lock().unwrap() = certificate;
    }

    /// Certificates uploaded so far
    pub fn uploaded_certificates(&self) -> Vec<Vec<u8>> {
        self.uploaded_certificates.lock().unwrap().clone()
    }

    /// Session limits returned by `list_session_configurations`
    pub fn set_session_configurations(&self, configs: Vec<SessionConfiguration>) {
        *self.session_configs.lock().unwrap() = configs;
    }
}

fn account_from(id: String, request: &AccountRequest) -> Account {
    Account {
        id,
        user_type_id: request.user_type_id,
        directory_service_id: request.directory_service_id,
        description: Some(request.description.clone()),
        name: request.user_name.clone(),
        user_name: request.user_name.clone(),
        role_id: request.role_id.clone(),
        locked: request.locked,
        is_built_in: false,
        enabled: request.enabled,
    }
}

pub async fn create_account(client: &MockOmeClient, request: &AccountRequest) -> Result<Account, OmeError> {
    client.enter("create_account")?;
    if client
        .accounts
        .lock()
        .unwrap()
        .values()
        .any(|a| a.user_name == request.user_name)
    {
        return Err(rejected(format!(
            "Unable to create the account because the user name {} is already in use.",
            request.user_name
        )));
    }
    if request.password.as_deref().is_none_or(str::is_empty) {
        return Err(rejected("Unable to create the account because the password is required."));
    }
    let account = account_from(client.next_id().to_string(), request);
    client
        .accounts
        .lock()
        .unwrap()
        .insert(account.id.clone(), account.clone());
    Ok(account)
}

pub async fn update_account(client: &MockOmeClient, request: &AccountRequest) -> Result<Account, OmeError> {
    client.enter("update_account")?;
    let id = request
        .id
        .clone()
        .ok_or_else(|| OmeError::InvalidRequest("account update requires an id".to_string()))?;
    let mut accounts = client.accounts.lock().unwrap();
    let account = accounts.get_mut(&id).ok_or_else(|| not_found("Account", &id))?;
    *account = account_from(id, request);
    Ok(account.clone())
}

pub async fn delete_account(client: &MockOmeClient, id: &str) -> Result<(), OmeError> {
    client.enter("delete_account")?;
    client
        .accounts
        .lock()
        .unwrap()
        .remove(id)
        .map(|_| ())
        .ok_or_else(|| not_found("Account", id))
}

pub async fn get_account(client: &MockOmeClient, id: &str) -> Result<Account, OmeError> {
    client.enter("get_account")?;
    client
        .accounts
        .lock()
        .unwrap()
        .get(id)
        .cloned()
        .ok_or_else(|| not_found("Account", id))
}

pub async fn get_account_by_username(client: &MockOmeClient, username: &str) -> Result<Option<Account>, OmeError> {
    client.enter("get_account_by_username")?;
    Ok(client
        .accounts
        .lock()
        .unwrap()
        .values()
        .find(|a| a.user_name == username)
        .cloned())
}

pub async fn upload_certificate(client: &MockOmeClient, certificate: Vec<u8>) -> Result<(), OmeError> {
    client.enter("upload_certificate")?;
    if certificate.is_empty() {
        return Err(rejected("Unable to upload the certificate because the file is empty."));
    }
    client.uploaded_certificates.lock().unwrap().push(certificate);
    Ok(())
}

pub async fn get_certificate(client: &MockOmeClient) -> Result<CertificateInfo, OmeError> {
    client.enter("get_certificate")?;
    Ok(client.certificate.lock().unwrap().clone())
}

pub async fn generate_csr(client: &MockOmeClient, request: &CsrRequest) -> Result<CsrResponse, OmeError> {
    client.enter("generate_csr")?;
    let body: String = format!(
        "{}{}{}{}",
        request.distinguished_name, request.business_name, request.country, request.subject_alternate_names
    )
    .bytes()
    .map(|b| format!("{:02X}", b))
    .collect();
    Ok(CsrResponse {
        certificate_data: format!(
            "-----BEGIN CERTIFICATE REQUEST-----\n{}\n-----END CERTIFICATE REQUEST-----\n",
            body
        ),
    })
}

pub async fn create_discovery(client: &MockOmeClient, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError> {
    client.enter("create_discovery")?;
    if client
        .discoveries
        .lock()
        .unwrap()
        .values()
        .any(|d| d.discovery_config_group_name == group.discovery_config_group_name)
    {
        return Err(rejected(format!(
            "Unable to create the discovery job because the name {} is already in use.",
            group.discovery_config_group_name
        )));
    }
    let id = client.next_id();
    let mut created = group.clone();
    created.discovery_config_group_id = id;
    created.discovery_config_task_param = vec![DiscoveryTaskParam {
        task_id: client.start_job(),
        task_type_id: 1,
        execution_sequence: 0,
    }];
    client.discoveries.lock().unwrap().insert(id, created.clone());
    Ok(created)
}

pub async fn update_discovery(client: &MockOmeClient, group: &DiscoveryConfigGroup) -> Result<DiscoveryConfigGroup, OmeError> {
    client.enter("update_discovery")?;
    let id = group.discovery_config_group_id;
    let task_id = client.start_job();
    let mut discoveries = client.discoveries.lock().unwrap();
    let stored = discoveries.get_mut(&id).ok_or_else(|| not_found("Discovery", id))?;
    *stored = group.clone();
    stored.discovery_config_task_param = vec![DiscoveryTaskParam {
        task_id,
        task_type_id: 1,
        execution_sequence: 0,
    }];
    Ok(stored.clone())
}

pub async fn get_discovery(client: &MockOmeClient, id: i64) -> Result<DiscoveryConfigGroup, OmeError> {
    client.enter("get_discovery")?;
    client
        .discoveries
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found("Discovery", id))
}

pub async fn delete_discoveries(client: &MockOmeClient, ids: &[i64]) -> Result<(), OmeError> {
    client.enter("delete_discoveries")?;
    let mut discoveries = client.discoveries.lock().unwrap();
    for id in ids {
        discoveries.remove(id).ok_or_else(|| not_found("Discovery", id))?;
    }
    Ok(())
}

pub async fn get_proxy_configuration(client: &MockOmeClient) -> Result<ProxyConfiguration, OmeError> {
    client.enter("get_proxy_configuration")?;
    Ok(client.proxy.lock().unwrap().clone())
}

pub async fn update_proxy_configuration(client: &MockOmeClient, config: &ProxyConfiguration) -> Result<ProxyConfiguration, OmeError> {
    client.enter("update_proxy_configuration")?;
    let mut stored = config.clone();
    stored.password = None;
    *client.proxy.lock().unwrap() = stored.clone();
    Ok(stored)
}

pub async fn get_time_configuration(client: &MockOmeClient) -> Result<TimeConfiguration, OmeError> {
    client.enter("get_time_configuration")?;
    Ok(client.time.lock().unwrap().clone())
}

pub async fn update_time_configuration(client: &MockOmeClient, config: &TimeConfiguration) -> Result<TimeConfiguration, OmeError> {
    client.enter("update_time_configuration")?;
    *client.time.lock().unwrap() = config.clone();
    Ok(config.clone())
}

pub async fn list_session_configurations(client: &MockOmeClient) -> Result<Vec<SessionConfiguration>, OmeError> {
    client.enter("list_session_configurations")?;
    Ok(client.session_configs.lock().unwrap().clone())
}

pub async fn update_session_configurations(client: &MockOmeClient, configs: &[SessionConfiguration]) -> Result<(), OmeError> {
    client.enter("update_session_configurations")?;
    let mut stored = client.session_configs.lock().unwrap();
    for config in configs {
        match stored.iter_mut().find(|s| s.session_type == config.session_type) {
            Some(existing) => {
                existing.max_sessions = config.max_sessions;
                existing.session_timeout = config.session_timeout;
            }
            None => stored.push(config.clone()),
        }
    }
    Ok(())
}
