//! Firmware catalog and firmware baseline operations for MockOmeClient

use super::{MockOmeClient, not_found, rejected};
use crate::error::OmeError;
use crate::models::*;

impl MockOmeClient {
    /// Add a catalog to the mock store (for test setup)
    pub fn add_catalog(&self, catalog: Catalog) {
        self.catalogs.lock().unwrap().insert(catalog.id, catalog);
    }

    /// Set the status string of a catalog (e.g. "Running")
    pub fn set_catalog_status(&self, catalog_id: i64, status: &str) {
        if let Some(catalog) = self.catalogs.lock().unwrap().get_mut(&catalog_id) {
            catalog.status = status.to_string();
        }
    }

    /// Add a firmware baseline to the mock store (for test setup)
    pub fn add_firmware_baseline(&self, baseline: FirmwareBaseline) {
        self.firmware_baselines.lock().unwrap().insert(baseline.id, baseline);
    }

    /// Compliance report returned for a firmware baseline
    pub fn set_firmware_reports(&self, baseline_id: i64, reports: Vec<FirmwareComplianceReport>) {
        self.firmware_reports.lock().unwrap().insert(baseline_id, reports);
    }
}

pub async fn create_catalog(client: &MockOmeClient, request: &CatalogRequest) -> Result<Catalog, OmeError> {
    client.enter("create_catalog")?;
    if client
        .catalogs
        .lock()
        .unwrap()
        .values()
        .any(|c| c.repository.name == request.repository.name)
    {
        return Err(rejected(format!(
            "Unable to create the catalog because the name {} is already in use.",
            request.repository.name
        )));
    }
    let id = client.next_id();
    let repository_id = client.next_id();
    let catalog = Catalog {
        id,
        filename: request.filename.clone(),
        source_path: request.source_path.clone(),
        status: "Completed".to_string(),
        task_id: client.start_job(),
        bundles_count: 12,
        repository: Repository {
            id: Some(repository_id),
            ..request.repository.clone()
        },
        schedule: request.schedule.clone(),
        ..Default::default()
    };
    client.catalogs.lock().unwrap().insert(id, catalog.clone());
    Ok(catalog)
}

pub async fn update_catalog(client: &MockOmeClient, request: &CatalogRequest) -> Result<Catalog, OmeError> {
    client.enter("update_catalog")?;
    let id = request
        .id
        .ok_or_else(|| OmeError::InvalidRequest("catalog update requires an id".to_string()))?;
    let task_id = client.start_job();
    let mut catalogs = client.catalogs.lock().unwrap();
    let catalog = catalogs.get_mut(&id).ok_or_else(|| not_found("Catalog", id))?;
    let repository_id = catalog.repository.id;
    catalog.filename = request.filename.clone();
    catalog.source_path = request.source_path.clone();
    catalog.repository = Repository {
        id: repository_id,
        ..request.repository.clone()
    };
    catalog.schedule = request.schedule.clone();
    catalog.task_id = task_id;
    Ok(catalog.clone())
}

pub async fn delete_catalogs(client: &MockOmeClient, ids: &[i64]) -> Result<(), OmeError> {
    client.enter("delete_catalogs")?;
    let mut catalogs = client.catalogs.lock().unwrap();
    for id in ids {
        catalogs.remove(id).ok_or_else(|| not_found("Catalog", id))?;
    }
    Ok(())
}

pub async fn get_catalog(client: &MockOmeClient, id: i64) -> Result<Catalog, OmeError> {
    client.enter("get_catalog")?;
    let mut catalog = client
        .catalogs
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found("Catalog", id))?;
    catalog.associated_baselines = associated_baselines(client, id);
    Ok(catalog)
}

pub async fn list_catalogs(client: &MockOmeClient) -> Result<Vec<Catalog>, OmeError> {
    client.enter("list_catalogs")?;
    let mut catalogs: Vec<Catalog> = client.catalogs.lock().unwrap().values().cloned().collect();
    catalogs.sort_by_key(|c| c.id);
    for catalog in &mut catalogs {
        catalog.associated_baselines = associated_baselines(client, catalog.id);
    }
    Ok(catalogs)
}

fn associated_baselines(client: &MockOmeClient, catalog_id: i64) -> Vec<AssociatedBaseline> {
    let mut baselines: Vec<AssociatedBaseline> = client
        .firmware_baselines
        .lock()
        .unwrap()
        .values()
        .filter(|b| b.catalog_id == catalog_id)
        .map(|b| AssociatedBaseline {
            baseline_id: b.id,
            baseline_name: b.name.clone(),
        })
        .collect();
    baselines.sort_by_key(|b| b.baseline_id);
    baselines
}

fn apply_request(baseline: &mut FirmwareBaseline, request: &FirmwareBaselineRequest, catalog: &Catalog) {
    baseline.name = request.name.clone();
    baseline.description = Some(request.description.clone());
    baseline.catalog_id = request.catalog_id;
    baseline.repository_id = request.repository_id;
    baseline.repository_name = catalog.repository.name.clone();
    baseline.repository_type = catalog.repository.repository_type.clone();
    baseline.downgrade_enabled = request.downgrade_enabled;
    baseline.is_64_bit = request.is_64_bit;
    baseline.filter_no_reboot_required = request.filter_no_reboot_required;
    baseline.targets = request.targets.clone();
}

pub async fn create_firmware_baseline(client: &MockOmeClient, request: &FirmwareBaselineRequest) -> Result<i64, OmeError> {
    client.enter("create_firmware_baseline")?;
    let catalog = client
        .catalogs
        .lock()
        .unwrap()
        .get(&request.catalog_id)
        .cloned()
        .ok_or_else(|| rejected(format!("Unable to create the baseline because the catalog {} is not found.", request.catalog_id)))?;
    if client
        .firmware_baselines
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
    let id = client.next_id();
    let job_id = client.start_job();
    let mut baseline = FirmwareBaseline {
        id,
        task_id: job_id,
        task_status_id: 2060,
        ..Default::default()
    };
    apply_request(&mut baseline, request, &catalog);
    client.firmware_baselines.lock().unwrap().insert(id, baseline);
    Ok(job_id)
}

pub async fn update_firmware_baseline(client: &MockOmeClient, request: &FirmwareBaselineRequest) -> Result<i64, OmeError> {
    client.enter("update_firmware_baseline")?;
    let id = request
        .id
        .ok_or_else(|| OmeError::InvalidRequest("firmware baseline update requires an id".to_string()))?;
    let catalog = client
        .catalogs
        .lock()
        .unwrap()
        .get(&request.catalog_id)
        .cloned()
        .ok_or_else(|| not_found("Catalog", request.catalog_id))?;
    let job_id = client.start_job();
    let mut baselines = client.firmware_baselines.lock().unwrap();
    let baseline = baselines.get_mut(&id).ok_or_else(|| not_found("Firmware baseline", id))?;
    apply_request(baseline, request, &catalog);
    baseline.task_id = job_id;
    Ok(job_id)
}

pub async fn delete_firmware_baselines(client: &MockOmeClient, ids: &[i64]) -> Result<(), OmeError> {
    client.enter("delete_firmware_baselines")?;
    let mut baselines = client.firmware_baselines.lock().unwrap();
    for id in ids {
        baselines.remove(id).ok_or_else(|| not_found("Firmware baseline", id))?;
    }
    Ok(())
}

pub async fn get_firmware_baseline(client: &MockOmeClient, id: i64) -> Result<FirmwareBaseline, OmeError> {
    client.enter("get_firmware_baseline")?;
    client
        .firmware_baselines
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .ok_or_else(|| not_found("Firmware baseline", id))
}

pub async fn get_firmware_baseline_by_name(client: &MockOmeClient, name: &str) -> Result<Option<FirmwareBaseline>, OmeError> {
    client.enter("get_firmware_baseline_by_name")?;
    Ok(client
        .firmware_baselines
        .lock()
        .unwrap()
        .values()
        .find(|b| b.name == name)
        .cloned())
}

pub async fn get_firmware_compliance_reports(client: &MockOmeClient, baseline_id: i64) -> Result<Vec<FirmwareComplianceReport>, OmeError> {
    client.enter("get_firmware_compliance_reports")?;
    if !client.firmware_baselines.lock().unwrap().contains_key(&baseline_id) {
        return Err(not_found("Firmware baseline", baseline_id));
    }
    Ok(client
        .firmware_reports
        .lock()
        .unwrap()
        .get(&baseline_id)
        .cloned()
        .unwrap_or_default())
}
