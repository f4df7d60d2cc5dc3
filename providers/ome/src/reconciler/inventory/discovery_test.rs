//! Unit tests for the discovery reconciler

#[cfg(test)]
mod tests {
    use crate::reconciler::inventory::DiscoveryResource;
    use crate::test_utils::*;
    use ome_client::{JobStatus, MockOmeClient, OmeApi};
    use ome_schema::{DiscoveryCredentialsState, DiscoveryState, DiscoveryTargetState};
    use pretty_assertions::assert_eq;

    fn redfish() -> DiscoveryCredentialsState {
        DiscoveryCredentialsState {
            username: "root".to_string(),
            password: "calvin".to_string(),
            ..Default::default()
        }
    }

    fn discovery(name: &str) -> DiscoveryState {
        DiscoveryState {
            name: name.to_string(),
            discovery_config_targets: vec![DiscoveryTargetState {
                network_address_detail: vec!["10.0.2.0/24".to_string(), "10.0.3.5".to_string()],
                device_type: vec!["server".to_string()],
                redfish: Some(redfish()),
                wsman: None,
            }],
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_tracks_discovery_job() {
        let mock = MockOmeClient::new("https://ome.test");
        mock.script_next_job(vec![JobStatus::Running, JobStatus::Completed]);

        let created: DiscoveryState = state_of(&create(DiscoveryResource, &mock, &discovery("lab")).await);
        assert!(created.id > 0);
        assert!(created.job_id > 0);
        assert_eq!(mock.job_polls(created.job_id), 2);
        assert_eq!(created.discovery_config_targets, discovery("lab").discovery_config_targets);

        let group = mock.get_discovery(created.id).await.unwrap();
        let model = &group.discovery_config_models[0];
        assert_eq!(model.device_type, vec![1000]);
        assert_eq!(model.discovery_config_targets.len(), 2);
        let profile: serde_json::Value = serde_json::from_str(&model.connection_profile).unwrap();
        assert_eq!(profile["type"], "DISCOVERY");
        assert_eq!(profile["credentials"][0]["type"], "REDFISH");
        assert_eq!(profile["credentials"][0]["credentials"]["port"], 443);
        assert_eq!(profile["credentials"][0]["credentials"]["retries"], 3);
        assert_eq!(profile["credentials"][0]["credentials"]["timeout"], 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_discovery_job() {
        let mock = MockOmeClient::new("https://ome.test");
        mock.script_next_job(vec![JobStatus::Failed]);
        let response = create(DiscoveryResource, &mock, &discovery("broken")).await;
        let (summary, _) = error_of(&response);
        assert_eq!(summary, "Error creating discovery");
        assert!(response.state.is_none());
    }

    #[tokio::test]
    async fn test_read_update_delete() {
        let mock = MockOmeClient::new("https://ome.test");
        let created: DiscoveryState = state_of(&create(DiscoveryResource, &mock, &discovery("lab")).await);
        let observed: DiscoveryState = state_of(&read(DiscoveryResource, &mock, &created).await);
        assert_eq!(observed, created);

        let mut plan = created.clone();
        plan.email_recipient = "ops@example.com".to_string();
        plan.discovery_config_targets[0].device_type.push("CHASSIS".to_string());
        let updated: DiscoveryState = state_of(&update(DiscoveryResource, &mock, &created, &plan).await);
        assert_eq!(updated.email_recipient, "ops@example.com");
        assert_eq!(updated.discovery_config_targets[0].device_type, vec!["server", "CHASSIS"]);
        assert_ne!(updated.job_id, created.job_id);

        assert_ok(&delete(DiscoveryResource, &mock, &updated).await);
        assert!(read(DiscoveryResource, &mock, &updated).await.state.is_none());
    }

    #[tokio::test]
    async fn test_run_later_is_not_tracked() {
        let mock = MockOmeClient::new("https://ome.test");
        let plan = DiscoveryState {
            run_later: true,
            cron: "0 0 0 ? * SUN *".to_string(),
            ..discovery("weekly")
        };
        let created: DiscoveryState = state_of(&create(DiscoveryResource, &mock, &plan).await);
        assert_eq!(mock.job_polls(created.job_id), 0);
        assert_eq!(created.cron, "0 0 0 ? * SUN *");
    }

    #[tokio::test]
    async fn test_validation() {
        let mock = MockOmeClient::new("https://ome.test");
        let mut no_creds = discovery("x");
        no_creds.discovery_config_targets[0].redfish = None;
        let (_, detail) = error_of(&create(DiscoveryResource, &mock, &no_creds).await);
        assert!(detail.contains("redfish or wsman"));

        let mut bad_type = discovery("x");
        bad_type.discovery_config_targets[0].device_type = vec!["PRINTER".to_string()];
        let (_, detail) = error_of(&create(DiscoveryResource, &mock, &bad_type).await);
        assert!(detail.contains("device_type"));

        let mut bad_port = discovery("x");
        if let Some(creds) = bad_port.discovery_config_targets[0].redfish.as_mut() {
            creds.port = Some(70000);
        }
        let (_, detail) = error_of(&create(DiscoveryResource, &mock, &bad_port).await);
        assert!(detail.contains("port"));
        assert!(mock.calls().is_empty());
    }
}
