//! Unit tests for the baseline remediation reconciler

#[cfg(test)]
mod tests {
    use crate::reconciler::compliance::ConfigurationComplianceResource;
    use crate::test_utils::*;
    use ome_client::{
        ComplianceStatus, ConfigBaseline, ConfigComplianceSummary, JobStatus, MockOmeClient, TargetModel, ViewType,
    };
    use ome_schema::{ConfigurationComplianceState, RemediationTargetState};
    use pretty_assertions::assert_eq;

    const BASELINE_ID: i64 = 900;

    fn mock_with_baseline(targets: &[i64]) -> MockOmeClient {
        let mock = mock_with_servers();
        mock.add_template(create_test_template(800, "gold", ViewType::Compliance));
        mock.add_config_baseline(ConfigBaseline {
            id: BASELINE_ID,
            name: "gold-baseline".to_string(),
            template_id: 800,
            template_name: "gold".to_string(),
            baseline_targets: targets.iter().map(|id| TargetModel::device(*id)).collect(),
            config_compliance_summary: ConfigComplianceSummary {
                compliance_status: ComplianceStatus::Compliant,
                ..Default::default()
            },
            ..Default::default()
        });
        mock
    }

    fn remediation(tags: &[&str]) -> ConfigurationComplianceState {
        ConfigurationComplianceState {
            baseline_name: "gold-baseline".to_string(),
            target_devices: tags
                .iter()
                .map(|t| RemediationTargetState {
                    device_service_tag: t.to_string(),
                    compliance_status: "Compliant".to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_device_outside_baseline_is_named() {
        let mock = mock_with_baseline(&[101]);
        let (summary, detail) =
            error_of(&create(ConfigurationComplianceResource, &mock, &remediation(&["SVC1002"])).await);
        assert_eq!(summary, "Error creating baseline remediation");
        assert!(detail.contains("SVC1002"));
        assert!(mock.remediations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_non_compliant_devices_are_remediated() {
        let mock = mock_with_baseline(&[101, 102]);
        mock.set_device_compliance(BASELINE_ID, 102, ComplianceStatus::NonCompliant);
        mock.script_next_job(vec![JobStatus::Running, JobStatus::Completed]);

        let state: ConfigurationComplianceState = state_of(
            &create(ConfigurationComplianceResource, &mock, &remediation(&["SVC1001", "svc1002"])).await,
        );

        let remediations = mock.remediations();
        assert_eq!(remediations.len(), 1);
        assert_eq!(remediations[0].id, BASELINE_ID);
        assert_eq!(remediations[0].device_ids, vec![102]);
        assert!(remediations[0].schedule.run_now);
        assert!(state.id > 0);
        assert_eq!(mock.job_polls(state.id), 2);
        assert_eq!(state.target_devices, remediation(&["SVC1001", "svc1002"]).target_devices);
    }

    #[tokio::test]
    async fn test_compliant_targets_need_nothing() {
        let mock = mock_with_baseline(&[101, 102]);
        let plan = ConfigurationComplianceState {
            target_devices: vec![RemediationTargetState {
                device_service_tag: "SVC1001".to_string(),
                compliance_status: String::new(),
            }],
            ..remediation(&[])
        };
        let state: ConfigurationComplianceState = state_of(&create(ConfigurationComplianceResource, &mock, &plan).await);
        assert_eq!(state.id, 0);
        assert_eq!(state.target_devices[0].compliance_status, "Compliant");
        assert!(mock.remediations().is_empty());
    }

    #[tokio::test]
    async fn test_run_later_is_not_tracked() {
        let mock = mock_with_baseline(&[101]);
        mock.set_device_compliance(BASELINE_ID, 101, ComplianceStatus::NonCompliant);
        let plan = ConfigurationComplianceState {
            run_later: true,
            cron: "0 30 2 * * ? *".to_string(),
            ..remediation(&["SVC1001"])
        };
        let state: ConfigurationComplianceState = state_of(&create(ConfigurationComplianceResource, &mock, &plan).await);
        assert_eq!(mock.job_polls(state.id), 0);
        let schedule = &mock.remediations()[0].schedule;
        assert!(schedule.run_later);
        assert_eq!(schedule.cron.as_deref(), Some("0 30 2 * * ? *"));
    }

    #[tokio::test]
    async fn test_read_reports_drift_again() {
        let mock = mock_with_baseline(&[101, 102]);
        let state: ConfigurationComplianceState =
            state_of(&create(ConfigurationComplianceResource, &mock, &remediation(&["SVC1001", "SVC1002"])).await);

        let observed: ConfigurationComplianceState = state_of(&read(ConfigurationComplianceResource, &mock, &state).await);
        assert_eq!(observed, state);

        mock.set_device_compliance(BASELINE_ID, 101, ComplianceStatus::NonCompliant);
        let observed: ConfigurationComplianceState = state_of(&read(ConfigurationComplianceResource, &mock, &state).await);
        assert_eq!(observed.target_devices[0].compliance_status, "Non Compliant");
        assert_eq!(observed.target_devices[1].compliance_status, "Compliant");
    }

    #[tokio::test]
    async fn test_read_without_baseline_is_gone() {
        let mock = mock_with_baseline(&[101]);
        let state = ConfigurationComplianceState {
            baseline_id: 4040,
            baseline_name: String::new(),
            ..remediation(&["SVC1001"])
        };
        let response = read(ConfigurationComplianceResource, &mock, &state).await;
        assert_ok(&response);
        assert!(response.state.is_none());
    }

    #[tokio::test]
    async fn test_validation() {
        let mock = mock_with_baseline(&[101]);
        let (_, detail) = error_of(&create(ConfigurationComplianceResource, &mock, &remediation(&[])).await);
        assert!(detail.contains("at least 1 elements"));

        let mut plan = remediation(&["SVC1001"]);
        plan.target_devices[0].compliance_status = "Non Compliant".to_string();
        let (summary, detail) = error_of(&create(ConfigurationComplianceResource, &mock, &plan).await);
        assert_eq!(summary, "Validation error");
        assert!(detail.contains("compliance_status"));

        let (_, detail) =
            error_of(&create(ConfigurationComplianceResource, &mock, &remediation(&["SVC1001", "svc1001"])).await);
        assert!(detail.contains("duplicate"));
        assert!(mock.calls().is_empty());
    }
}
