//! Unit tests for reconcile_helpers module

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::resource::Context;
    use ome_client::{JobStatus, MockOmeClient, OmeApi};
    use pretty_assertions::assert_eq;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_set_diff_sorted() {
        let (add, remove) = set_diff(&[5, 1, 3], &[3, 4, 2, 4]);
        assert_eq!(add, vec![2, 4]);
        assert_eq!(remove, vec![1, 5]);
    }

    #[test]
    fn test_job_settings_defaults() {
        assert_eq!(job_settings(None, None, (30, 20)), (30, 20));
        assert_eq!(job_settings(Some(2), Some(1), (30, 20)), (2, 1));
        assert_eq!(job_settings(Some(0), Some(-5), (30, 20)), (1, 0));
    }

    #[test]
    fn test_keep_order_follows_prior() {
        let prior = vec!["svc1002".to_string(), "SVC1009".to_string(), "SVC1001".to_string()];
        let observed = vec!["SVC1001".to_string(), "SVC1002".to_string(), "SVC1003".to_string()];
        let ordered = keep_order(&prior, &observed, |a, b| a.eq_ignore_ascii_case(b));
        assert_eq!(ordered, vec!["svc1002", "SVC1001", "SVC1003"]);
        assert_eq!(keep_order(&[3, 1], &[1, 2, 3], |a, b| a == b), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_read_or_gone_detects_drift() {
        let mock = MockOmeClient::new("https://ome");
        let cancel = CancellationToken::new();
        let ctx = Context::new(&mock, &cancel);

        let found = read_or_gone(&ctx, mock.get_group(404), "Group", 404, "Unable to read group")
            .await
            .unwrap();
        assert!(found.is_none());
        let diagnostics = ctx.into_diagnostics();
        assert!(!diagnostics.has_error());
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[tokio::test]
    async fn test_read_or_gone_keeps_other_errors() {
        let mock = MockOmeClient::new("https://ome");
        mock.fail_on("get_group", "service unavailable");
        let cancel = CancellationToken::new();
        let ctx = Context::new(&mock, &cancel);

        let err = read_or_gone(&ctx, mock.get_group(1), "Group", 1, "Unable to read group")
            .await
            .unwrap_err();
        assert_eq!(err.summary(), "Unable to read group");
        assert!(err.detail().contains("service unavailable"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_job_failure_uses_summary() {
        let mock = MockOmeClient::new("https://ome");
        mock.set_job_statuses(77, vec![JobStatus::Running, JobStatus::Failed]);
        let cancel = CancellationToken::new();
        let ctx = Context::new(&mock, &cancel);

        let err = track_job(&ctx, 77, 5, 10, "Unable to create catalog").await.unwrap_err();
        assert_eq!(err.summary(), "Unable to create catalog");
        assert_eq!(mock.job_polls(77), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_job_warning_passes() {
        let mock = MockOmeClient::new("https://ome");
        mock.set_job_statuses(78, vec![JobStatus::Warning]);
        let cancel = CancellationToken::new();
        let ctx = Context::new(&mock, &cancel);

        let outcome = track_job(&ctx, 78, 5, 10, "Unable to create catalog").await.unwrap();
        assert!(outcome.is_warning());
        assert_eq!(ctx.into_diagnostics().warnings().count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_job_times_out() {
        let mock = MockOmeClient::new("https://ome");
        mock.set_job_statuses(79, vec![JobStatus::Running]);
        let cancel = CancellationToken::new();
        let ctx = Context::new(&mock, &cancel);

        let err = track_job(&ctx, 79, 3, 5, "Error creating template").await.unwrap_err();
        assert_eq!(err.summary(), "Error creating template");
        assert_eq!(mock.job_polls(79), 3);
    }
}
