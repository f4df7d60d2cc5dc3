//! Template deployment and server profile operations

use super::job_id_from;
use crate::client::OmeClient;
use crate::common::odata::filter_query;
use crate::error::OmeError;
use crate::models::*;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DeleteProfilesRequest<'a> {
    profile_ids: &'a [i64],
}

impl OmeClient {
    /// Deploy a template to a set of devices
    ///
    /// # Arguments
    /// * `request` - Template id, target device ids, schedule, boot ISO and power options
    ///
    /// # Returns
    /// * `Ok(i64)` - ID of the deployment job
    /// * `Err(OmeError)` - If OME rejects the deployment
    pub async fn deploy_template(&self, request: &DeployTemplateRequest) -> Result<i64, OmeError> {
        debug!(
            "Deploying template {} to devices {:?}",
            request.id, request.target_ids
        );
        let response: serde_json::Value = self
            .http
            .post("/api/TemplateService/Actions/TemplateService.Deploy", request)
            .await?;
        job_id_from(&response).ok_or_else(|| OmeError::Api {
            status: 200,
            message: format!("deploy response did not contain a job id: {}", response),
        })
    }

    /// List server profiles created from a template
    pub async fn list_profiles_by_template(&self, template_id: i64) -> Result<Vec<Profile>, OmeError> {
        let path = format!(
            "/api/ProfileService/Profiles{}",
            filter_query(&format!("TemplateId eq {}", template_id))
        );
        self.http.get_collection(&path).await
    }

    /// Delete server profiles
    pub async fn delete_profiles(&self, profile_ids: &[i64]) -> Result<(), OmeError> {
        debug!("Deleting profiles {:?}", profile_ids);
        self.http
            .post_no_content(
                "/api/ProfileService/Actions/ProfileService.Delete",
                &DeleteProfilesRequest { profile_ids },
            )
            .await
    }
}
