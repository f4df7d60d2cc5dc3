//! Unit tests for the deployment reconciler

#[cfg(test)]
mod tests {
    use crate::reconciler::template::DeploymentResource;
    use crate::test_utils::*;
    use ome_client::{MockOmeClient, OmeApi, ViewType};
    use ome_schema::{BootToNetworkIsoState, DeploymentState, ShareDetailState};
    use pretty_assertions::assert_eq;

    fn mock_with_template() -> MockOmeClient {
        let mock = mock_with_servers();
        mock.add_template(create_test_template(700, "web-tier", ViewType::Deployment));
        mock.add_template(create_test_template(701, "db-tier", ViewType::Deployment));
        mock.add_template(create_test_template(702, "audit", ViewType::Compliance));
        mock
    }

    fn deploy_tags(tags: &[&str]) -> DeploymentState {
        DeploymentState {
            template_name: "web-tier".to_string(),
            device_servicetags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    async fn profile_targets(mock: &MockOmeClient, template_id: i64) -> Vec<i64> {
        let mut targets: Vec<i64> = mock
            .list_profiles_by_template(template_id)
            .await
            .unwrap()
            .iter()
            .map(|p| p.target_id)
            .collect();
        targets.sort();
        targets
    }

    #[tokio::test]
    async fn test_create_deploys_to_targets() {
        let mock = mock_with_template();
        let state: DeploymentState = state_of(&create(DeploymentResource, &mock, &deploy_tags(&["SVC1001", "SVC1002"])).await);

        assert!(state.id > 0);
        assert_eq!(profile_targets(&mock, 700).await, vec![101, 102]);
        let deployments = mock.deployments();
        assert_eq!(deployments.len(), 1);
        assert_eq!(deployments[0].options.shutdown_type, 0);
        assert_eq!(deployments[0].options.time_to_wait_before_shutdown, 300);
        assert_eq!(deployments[0].options.end_host_power_state, 1);
        assert!(deployments[0].schedule.run_now);
        assert!(deployments[0].network_boot_iso_model.is_none());
        assert_eq!(mock.job_polls(state.id), 1);
    }

    #[tokio::test]
    async fn test_compliance_template_is_rejected() {
        let mock = mock_with_template();
        let plan = DeploymentState {
            template_id: 702,
            template_name: String::new(),
            ..deploy_tags(&["SVC1001"])
        };
        let (summary, detail) = error_of(&create(DeploymentResource, &mock, &plan).await);
        assert_eq!(summary, "Error creating template deployment");
        assert!(detail.contains("not a deployment template"));
        assert!(mock.deployments().is_empty());
    }

    #[tokio::test]
    async fn test_update_adds_then_removes() {
        let mock = mock_with_template();
        let state: DeploymentState = state_of(&create(DeploymentResource, &mock, &deploy_tags(&["SVC1001", "SVC1002"])).await);

        let plan = deploy_tags(&["SVC1002", "SVC1003"]);
        let updated: DeploymentState = state_of(&update(DeploymentResource, &mock, &state, &plan).await);

        assert_ne!(updated.id, state.id);
        let deployments = mock.deployments();
        assert_eq!(deployments.len(), 2);
        assert_eq!(deployments[1].target_ids, vec![103]);
        assert_eq!(profile_targets(&mock, 700).await, vec![102, 103]);

        let calls = mock.calls();
        let deployed = calls.iter().rposition(|c| c == "deploy_template").unwrap();
        let removed = calls.iter().position(|c| c == "delete_profiles").unwrap();
        assert!(deployed < removed);
    }

    #[tokio::test]
    async fn test_template_change_is_rejected() {
        let mock = mock_with_template();
        let state: DeploymentState = state_of(&create(DeploymentResource, &mock, &deploy_tags(&["SVC1001"])).await);
        let plan = DeploymentState {
            template_name: "db-tier".to_string(),
            ..state.clone()
        };

        let response = update(DeploymentResource, &mock, &state, &plan).await;
        let (summary, _) = error_of(&response);
        assert_eq!(summary, "Error updating template deployment");
        assert_eq!(mock.deployments().len(), 1);
        assert_eq!(response.state, Some(to_value(&state)));
    }

    #[tokio::test]
    async fn test_run_later_is_not_tracked() {
        let mock = mock_with_template();
        let plan = DeploymentState {
            run_later: true,
            cron: "0 0 1 * * ? *".to_string(),
            ..deploy_tags(&["SVC1001"])
        };
        let state: DeploymentState = state_of(&create(DeploymentResource, &mock, &plan).await);
        assert_eq!(mock.job_polls(state.id), 0);
        assert_eq!(mock.deployments()[0].schedule.cron.as_deref(), Some("0 0 1 * * ? *"));
    }

    #[tokio::test]
    async fn test_validation() {
        let mock = mock_with_template();
        let no_cron = DeploymentState {
            run_later: true,
            ..deploy_tags(&["SVC1001"])
        };
        let (summary, detail) = error_of(&create(DeploymentResource, &mock, &no_cron).await);
        assert_eq!(summary, "Validation error");
        assert!(detail.contains("cron"));

        let bad_iso = DeploymentState {
            boot_to_network_iso: Some(BootToNetworkIsoState {
                boot_to_network: true,
                share_type: "NFS".to_string(),
                iso_path: "/isos/rhel.iso".to_string(),
                iso_timeout: 3,
                share_detail: Some(ShareDetailState {
                    ip_address: "10.0.0.5".to_string(),
                    share_name: "/isos".to_string(),
                    ..Default::default()
                }),
            }),
            ..deploy_tags(&["SVC1001"])
        };
        let (_, detail) = error_of(&create(DeploymentResource, &mock, &bad_iso).await);
        assert!(detail.contains("iso_timeout"));

        let both = DeploymentState {
            device_ids: vec![101],
            ..deploy_tags(&["SVC1001"])
        };
        assert!(error_of(&create(DeploymentResource, &mock, &both).await).1.contains("device_ids"));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_boot_iso_is_sent() {
        let mock = mock_with_template();
        let plan = DeploymentState {
            boot_to_network_iso: Some(BootToNetworkIsoState {
                boot_to_network: true,
                share_type: "CIFS".to_string(),
                iso_path: "rhel.iso".to_string(),
                iso_timeout: 4,
                share_detail: Some(ShareDetailState {
                    ip_address: "10.0.0.5".to_string(),
                    share_name: "isos".to_string(),
                    user: "svc".to_string(),
                    password: "secret".to_string(),
                    ..Default::default()
                }),
            }),
            forced_shutdown: true,
            power_state_off: true,
            ..deploy_tags(&["SVC1001"])
        };
        state_of::<DeploymentState>(&create(DeploymentResource, &mock, &plan).await);

        let request = &mock.deployments()[0];
        let iso = request.network_boot_iso_model.as_ref().unwrap();
        assert_eq!(iso.share_type, "CIFS");
        assert_eq!(iso.share_detail.user.as_deref(), Some("svc"));
        assert_eq!(request.options.shutdown_type, 1);
        assert_eq!(request.options.end_host_power_state, 0);
    }

    #[tokio::test]
    async fn test_read_and_delete() {
        let mock = mock_with_template();
        let state: DeploymentState = state_of(&create(DeploymentResource, &mock, &deploy_tags(&["svc1001", "SVC1002"])).await);

        let observed: DeploymentState = state_of(&read(DeploymentResource, &mock, &state).await);
        assert_eq!(observed, state);

        assert_ok(&delete(DeploymentResource, &mock, &state).await);
        assert!(profile_targets(&mock, 700).await.is_empty());

        let response = read(DeploymentResource, &mock, &state).await;
        assert_ok(&response);
        assert!(response.state.is_none());
    }
}
