//! UpdateService operations: firmware catalogs and firmware baselines

use super::job_id_from;
use crate::client::OmeClient;
use crate::error::OmeError;
use crate::models::*;
use tracing::debug;

const CATALOGS_PATH: &str = "/api/UpdateService/Catalogs";
const BASELINES_PATH: &str = "/api/UpdateService/Baselines";
const ACTIONS_PATH: &str = "/api/UpdateService/Actions";

impl OmeClient {
    /// Create a firmware catalog
    ///
    /// OME starts downloading the catalog immediately; `Catalog.task_id` is the job.
    pub async fn create_catalog(&self, request: &CatalogRequest) -> Result<Catalog, OmeError> {
        debug!(
            "Creating catalog {} ({})",
            request.repository.name, request.repository.repository_type
        );
        self.http.post(CATALOGS_PATH, request).await
    }

    /// Update a firmware catalog; `request.id` selects the catalog
    pub async fn update_catalog(&self, request: &CatalogRequest) -> Result<Catalog, OmeError> {
        let id = request
            .id
            .ok_or_else(|| OmeError::InvalidRequest("catalog update requires an id".to_string()))?;
        debug!("Updating catalog {}", id);
        self.http.put(&format!("{}({})", CATALOGS_PATH, id), request).await
    }

    /// Delete firmware catalogs
    pub async fn delete_catalogs(&self, ids: &[i64]) -> Result<(), OmeError> {
        debug!("Deleting catalogs {:?}", ids);
        let request = RemoveCatalogsRequest {
            catalog_ids: ids.to_vec(),
        };
        self.http
            .post_no_content(&format!("{}/UpdateService.RemoveCatalogs", ACTIONS_PATH), &request)
            .await
    }

    /// Get a firmware catalog by ID
    pub async fn get_catalog(&self, id: i64) -> Result<Catalog, OmeError> {
        self.http.get(&format!("{}({})", CATALOGS_PATH, id)).await
    }

    /// List all firmware catalogs
    pub async fn list_catalogs(&self) -> Result<Vec<Catalog>, OmeError> {
        self.http.get_collection(CATALOGS_PATH).await
    }

    /// Create a firmware baseline
    ///
    /// # Returns
    /// * `Ok(i64)` - ID of the job computing the baseline's compliance
    pub async fn create_firmware_baseline(&self, request: &FirmwareBaselineRequest) -> Result<i64, OmeError> {
        debug!(
            "Creating firmware baseline {} on catalog {}",
            request.name, request.catalog_id
        );
        let response: serde_json::Value = self.http.post(BASELINES_PATH, request).await?;
        job_id_from(&response).ok_or_else(|| OmeError::Api {
            status: 200,
            message: format!("firmware baseline response did not contain a job id: {}", response),
        })
    }

    /// Update a firmware baseline; `request.id` selects the baseline
    pub async fn update_firmware_baseline(&self, request: &FirmwareBaselineRequest) -> Result<i64, OmeError> {
        let id = request.id.ok_or_else(|| {
            OmeError::InvalidRequest("firmware baseline update requires an id".to_string())
        })?;
        debug!("Updating firmware baseline {}", id);
        let response: serde_json::Value = self
            .http
            .put(&format!("{}({})", BASELINES_PATH, id), request)
            .await?;
        job_id_from(&response).ok_or_else(|| OmeError::Api {
            status: 200,
            message: format!("firmware baseline response did not contain a job id: {}", response),
        })
    }

    /// Delete firmware baselines
    pub async fn delete_firmware_baselines(&self, ids: &[i64]) -> Result<(), OmeError> {
        debug!("Deleting firmware baselines {:?}", ids);
        let request = RemoveBaselinesRequest {
            baseline_ids: ids.to_vec(),
        };
        self.http
            .post_no_content(&format!("{}/UpdateService.RemoveBaselines", ACTIONS_PATH), &request)
            .await
    }

    /// Get a firmware baseline by ID
    pub async fn get_firmware_baseline(&self, id: i64) -> Result<FirmwareBaseline, OmeError> {
        self.http.get(&format!("{}({})", BASELINES_PATH, id)).await
    }

    /// Look a firmware baseline up by name
    ///
    /// The baselines endpoint does not filter on name, so the list is scanned.
    pub async fn get_firmware_baseline_by_name(&self, name: &str) -> Result<Option<FirmwareBaseline>, OmeError> {
        let baselines: Vec<FirmwareBaseline> = self.http.get_collection(BASELINES_PATH).await?;
        Ok(baselines.into_iter().find(|b| b.name == name))
    }

    /// Per-device firmware compliance of a baseline
    pub async fn get_firmware_compliance_reports(
        &self,
        baseline_id: i64,
    ) -> Result<Vec<FirmwareComplianceReport>, OmeError> {
        self.http
            .get_collection(&format!("{}({})/DeviceComplianceReports", BASELINES_PATH, baseline_id))
            .await
    }
}
