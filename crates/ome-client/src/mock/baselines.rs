//! Configuration baseline operations for MockOmeClient

use super::{MockOmeClient, not_found, rejected};
use crate::error::OmeError;
use crate::models::*;

impl MockOmeClient {
    /// Add a configuration baseline to the mock store (for test setup)
    pub fn add_config_baseline(&self, baseline: ConfigBaseline) {
        self.config_baselines.lock().unwrap().insert(baseline.id, baseline);
    }

    /// Compliance summary statuses returned by successive reads of a baseline
    ///
    /// The last status sticks once the sequence is exhausted.
    pub fn set_baseline_compliance(&self, baseline_id: i64, statuses: Vec<ComplianceStatus>) {
        self.baseline_compliance
            .lock()
            .unwrap()
            .insert(baseline_id, statuses.into_iter().collect());
    }

    /// Compliance status of one device in a baseline's report
    pub fn set_device_compliance(&self, baseline_id: i64, device_id: i64, status: ComplianceStatus) {
        self.device_compliance
            .lock()
            .unwrap()
            .insert((baseline_id, device_id), status);
    }

    /// Attribute-level compliance document of one device
    pub fn set_compliance_details(&self, baseline_id: i64, device_id: i64, details: DeviceComplianceDetails) {
        self.compliance_details
            .lock()
            .unwrap()
            .insert((baseline_id, device_id), details);
    }

    /// Remediation requests received so far
    pub fn remediations(&self) -> Vec<RemediationRequest> {
        self.remediations.lock().unwrap().clone()
    }

    fn check_baseline_targets(&self, targets: &[TargetModel]) -> Result<(), OmeError> {
        let devices = self.devices.lock().unwrap();
        match targets.iter().find(|t| !devices.contains_key(&t.id)) {
            Some(missing) => Err(rejected(format!(
                "Unable to create or update the baseline because the device {} is not found.",
                missing.id
            ))),
            None => Ok(()),
        }
    }
}

pub async fn create_config_baseline(client: &MockOmeClient, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError> {
    client.enter("create_config_baseline")?;
    if client
        .config_baselines
        .lock()
        .unwrap()
        .values()
        .any(|b| b.name == request.name)
    {
        return Err(rejected(format!(
            "Unable to create the baseline because the name {} is already in use.",
            request.name
        )));
    }
    let template = client
        .templates
        .lock()
        .unwrap()
        .get(&request.template_id)
        .cloned()
        .ok_or_else(|| rejected(format!("Unable to create the baseline because the template {} is not found.", request.template_id)))?;
    client.check_baseline_targets(&request.baseline_targets)?;

    let id = client.next_id();
    let baseline = ConfigBaseline {
        id,
        name: request.name.clone(),
        description: request.description.clone(),
        template_id: template.id,
        template_name: template.name.clone(),
        template_type: template.type_id,
        task_id: client.start_job(),
        percentage_complete: "100".to_string(),
        last_run: None,
        baseline_targets: request.baseline_targets.clone(),
        config_compliance_summary: ConfigComplianceSummary {
            compliance_status: ComplianceStatus::Compliant,
            ..Default::default()
        },
        notification_settings: request.notification_settings.clone(),
    };
    client.config_baselines.lock().unwrap().insert(id, baseline.clone());
    Ok(baseline)
}

pub async fn update_config_baseline(client: &MockOmeClient, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError> {
    client.enter("update_config_baseline")?;
    let id = request
        .id
        .ok_or_else(|| OmeError::InvalidRequest("baseline update requires an id".to_string()))?;
    client.check_baseline_targets(&request.baseline_targets)?;
    let task_id = client.start_job();
    let mut baselines = client.config_baselines.lock().unwrap();
    let baseline = baselines.get_mut(&id).ok_or_else(|| not_found("Baseline", id))?;
    if baseline.template_id != request.template_id {
        return Err(rejected("Unable to update the baseline because the template cannot be changed."));
    }
    baseline.name = request.name.clone();
    baseline.description = request.description.clone();
    baseline.baseline_targets = request.baseline_targets.clone();
    baseline.notification_settings = request.notification_settings.clone();
    baseline.task_id = task_id;
    Ok(baseline.clone())
}

pub async fn delete_config_baselines(client: &MockOmeClient, ids: &[i64]) -> Result<(), OmeError> {
    client.enter("delete_config_baselines")?;
    let mut baselines = client.config_baselines.lock().unwrap();
    for id in ids {
        baselines.remove(id).ok_or_else(|| not_found("Baseline", id))?;
    }
    Ok(())
}

pub async fn get_config_baseline(client: &MockOmeClient, id: i64) -> Result<ConfigBaseline, OmeError> {
    client.enter("get_config_baseline")?;
    let mut baseline = client
        .config_baselines
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found("Baseline", id))?;
    let mut sequences = client.baseline_compliance.lock().unwrap();
    if let Some(queue) = sequences.get_mut(&id) {
        let status = if queue.len() > 1 { queue.pop_front() } else { queue.front().copied() };
        if let Some(status) = status {
            baseline.config_compliance_summary.compliance_status = status;
        }
    }
    Ok(baseline)
}

pub async fn get_config_baseline_by_name(client: &MockOmeClient, name: &str) -> Result<Option<ConfigBaseline>, OmeError> {
    client.enter("get_config_baseline_by_name")?;
    Ok(client
        .config_baselines
        .lock()
        .unwrap()
        .values()
        .find(|b| b.name == name)
        .cloned())
}

pub async fn get_config_compliance_reports(client: &MockOmeClient, baseline_id: i64) -> Result<Vec<DeviceComplianceReport>, OmeError> {
    client.enter("get_config_compliance_reports")?;
    let baseline = client
        .config_baselines
        .lock()
        .unwrap()
        .get(&baseline_id)
        .cloned()
        .ok_or_else(|| not_found("Baseline", baseline_id))?;
    let devices = client.devices.lock().unwrap();
    let statuses = client.device_compliance.lock().unwrap();
    Ok(baseline
        .baseline_targets
        .iter()
        .map(|target| {
            let device = devices.get(&target.id).cloned().unwrap_or_default();
            DeviceComplianceReport {
                id: target.id,
                device_name: device.device_name.clone(),
                ip_address: device.management_ips().first().map(|ip| ip.to_string()).unwrap_or_default(),
                model: device.model.clone(),
                service_tag: device.device_service_tag.clone(),
                compliance_status: statuses
                    .get(&(baseline_id, target.id))
                    .copied()
                    .unwrap_or(ComplianceStatus::Compliant),
                device_type: device.device_type,
                inventory_time: device.last_inventory_time.clone(),
            }
        })
        .collect())
}

pub async fn get_device_compliance_details(client: &MockOmeClient, baseline_id: i64, device_id: i64) -> Result<DeviceComplianceDetails, OmeError> {
    client.enter("get_device_compliance_details")?;
    client
        .compliance_details
        .lock()
        .unwrap()
        .get(&(baseline_id, device_id))
        .cloned()
        .ok_or_else(|| not_found("Compliance details for device", device_id))
}

pub async fn remediate_baseline(client: &MockOmeClient, request: &RemediationRequest) -> Result<i64, OmeError> {
    client.enter("remediate_baseline")?;
    let baseline = client
        .config_baselines
        .lock()
        .unwrap()
        .get(&request.id)
        .cloned()
        .ok_or_else(|| not_found("Baseline", request.id))?;
    let targets = baseline.target_ids();
    if let Some(missing) = request.device_ids.iter().find(|d| !targets.contains(*d)) {
        return Err(rejected(format!(
            "Unable to remediate because the device {} is not part of the baseline.",
            missing
        )));
    }
    client.remediations.lock().unwrap().push(request.clone());
    Ok(client.start_job())
}
