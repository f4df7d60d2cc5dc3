//! Configuration compliance baselines and remediation (TemplateService/Baselines)

use super::job_id_from;
use crate::client::OmeClient;
use crate::common::odata::eq_filter;
use crate::error::OmeError;
use crate::models::*;
use serde::Serialize;
use tracing::debug;

const BASELINES_PATH: &str = "/api/TemplateService/Baselines";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RemoveBaselineRequest<'a> {
    baseline_ids: &'a [i64],
}

impl OmeClient {
    /// Create a configuration baseline
    ///
    /// The returned baseline carries the `task_id` of the initial compliance scan.
    pub async fn create_config_baseline(&self, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError> {
        debug!(
            "Creating baseline {} from template {}",
            request.name, request.template_id
        );
        self.http.post(BASELINES_PATH, request).await
    }

    /// Update a configuration baseline; `request.id` selects the baseline
    pub async fn update_config_baseline(&self, request: &ConfigBaselineRequest) -> Result<ConfigBaseline, OmeError> {
        let id = request
            .id
            .ok_or_else(|| OmeError::InvalidRequest("baseline update requires an id".to_string()))?;
        debug!("Updating baseline {}", id);
        self.http.put(&format!("{}({})", BASELINES_PATH, id), request).await
    }

    /// Delete configuration baselines
    pub async fn delete_config_baselines(&self, ids: &[i64]) -> Result<(), OmeError> {
        debug!("Deleting baselines {:?}", ids);
        self.http
            .post_no_content(
                "/api/TemplateService/Actions/TemplateService.RemoveBaseline",
                &RemoveBaselineRequest { baseline_ids: ids },
            )
            .await
    }

    /// Get a configuration baseline by ID
    pub async fn get_config_baseline(&self, id: i64) -> Result<ConfigBaseline, OmeError> {
        self.http.get(&format!("{}({})", BASELINES_PATH, id)).await
    }

    /// Look a configuration baseline up by its exact name
    pub async fn get_config_baseline_by_name(&self, name: &str) -> Result<Option<ConfigBaseline>, OmeError> {
        let path = format!("{}{}", BASELINES_PATH, eq_filter("Name", name));
        let baselines: Vec<ConfigBaseline> = self.http.get_collection(&path).await?;
        Ok(baselines.into_iter().find(|b| b.name == name))
    }

    /// Per-device compliance report of a baseline
    pub async fn get_config_compliance_reports(
        &self,
        baseline_id: i64,
    ) -> Result<Vec<DeviceComplianceReport>, OmeError> {
        self.http
            .get_collection(&format!(
                "{}({})/DeviceConfigComplianceReports",
                BASELINES_PATH, baseline_id
            ))
            .await
    }

    /// Attribute-level compliance of one device against a baseline
    pub async fn get_device_compliance_details(
        &self,
        baseline_id: i64,
        device_id: i64,
    ) -> Result<DeviceComplianceDetails, OmeError> {
        self.http
            .get(&format!(
                "{}({})/DeviceConfigComplianceReports({})/DeviceComplianceDetails",
                BASELINES_PATH, baseline_id, device_id
            ))
            .await
    }

    /// Submit a remediation of non-compliant devices
    ///
    /// # Returns
    /// * `Ok(i64)` - ID of the remediation job, 0 when OME had nothing to do
    pub async fn remediate_baseline(&self, request: &RemediationRequest) -> Result<i64, OmeError> {
        debug!(
            "Remediating baseline {} on devices {:?}",
            request.id, request.device_ids
        );
        let response: serde_json::Value = self
            .http
            .post("/api/TemplateService/Actions/TemplateService.Remediate", request)
            .await?;
        Ok(job_id_from(&response).unwrap_or_default())
    }
}
