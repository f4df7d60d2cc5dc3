//! Unit tests for the firmware catalog reconciler

#[cfg(test)]
mod tests {
    use crate::reconciler::firmware::FirmwareCatalogResource;
    use crate::reconciler::firmware::catalog::{parse_refresh_cron, refresh_cron};
    use crate::test_utils::*;
    use ome_client::{JobStatus, MockOmeClient, OmeApi};
    use ome_schema::{CatalogRefreshScheduleState, FirmwareCatalogState};
    use pretty_assertions::assert_eq;

    fn schedule(cadence: &str, day: &str, time_of_day: i64, am_pm: &str) -> CatalogRefreshScheduleState {
        CatalogRefreshScheduleState {
            cadence: cadence.to_string(),
            day_of_the_week: day.to_string(),
            time_of_day,
            am_pm: am_pm.to_string(),
        }
    }

    fn nfs_catalog() -> FirmwareCatalogState {
        FirmwareCatalogState {
            name: "nfs-catalog".to_string(),
            description: "rack firmware".to_string(),
            catalog_update_type: "Automatic".to_string(),
            share_type: "NFS".to_string(),
            share_address: "10.0.9.2".to_string(),
            catalog_file_path: "/catalogs/catalog.xml".to_string(),
            catalog_refresh_schedule: Some(schedule("Weekly", "Monday", 3, "PM")),
            ..Default::default()
        }
    }

    fn online_catalog() -> FirmwareCatalogState {
        FirmwareCatalogState {
            name: "dell-online".to_string(),
            share_type: "DELL_ONLINE".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_refresh_cron() {
        assert_eq!(refresh_cron(&schedule("Daily", "", 12, "AM")), "0 0 0 * * ? *");
        assert_eq!(refresh_cron(&schedule("Daily", "", 12, "PM")), "0 0 12 * * ? *");
        assert_eq!(refresh_cron(&schedule("Weekly", "Sunday", 11, "PM")), "0 0 23 ? * SUN *");

        let known = schedule("Weekly", "sunday", 11, "PM");
        assert_eq!(parse_refresh_cron("0 0 23 ? * SUN *", Some(&known)), Some(known.clone()));
        assert_eq!(
            parse_refresh_cron("0 0 7 * * ? *", None),
            Some(schedule("Daily", "", 7, "AM"))
        );
        assert_eq!(parse_refresh_cron("garbage", None), None);
    }

    #[tokio::test]
    async fn test_share_validation() {
        let mock = MockOmeClient::new("https://ome.test");
        let no_schedule = FirmwareCatalogState {
            catalog_refresh_schedule: None,
            ..nfs_catalog()
        };
        let (summary, detail) = error_of(&create(FirmwareCatalogResource, &mock, &no_schedule).await);
        assert_eq!(summary, "Validation error");
        assert!(detail.contains("invalid automatic update configuration"));

        let bad_hour = FirmwareCatalogState {
            catalog_refresh_schedule: Some(schedule("Daily", "", 13, "AM")),
            ..nfs_catalog()
        };
        let (_, detail) = error_of(&create(FirmwareCatalogResource, &mock, &bad_hour).await);
        assert!(detail.contains("invalid automatic update configuration"));

        let cifs = FirmwareCatalogState {
            share_type: "CIFS".to_string(),
            ..nfs_catalog()
        };
        let (_, detail) = error_of(&create(FirmwareCatalogResource, &mock, &cifs).await);
        assert!(detail.contains("invalid CIFS share configuration"));

        let online_with_path = FirmwareCatalogState {
            catalog_file_path: "/catalog.xml".to_string(),
            ..online_catalog()
        };
        let (_, detail) = error_of(&create(FirmwareCatalogResource, &mock, &online_with_path).await);
        assert!(detail.contains("invalid DELL_ONLINE share configuration"));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_tracks_refresh_job() {
        let mock = MockOmeClient::new("https://ome.test");
        mock.script_next_job(vec![JobStatus::Running, JobStatus::Completed]);

        let created: FirmwareCatalogState = state_of(&create(FirmwareCatalogResource, &mock, &nfs_catalog()).await);
        assert!(created.id > 0);
        assert_eq!(created.status, "Completed");
        assert_eq!(created.catalog_file_path, "/catalogs/catalog.xml");
        assert_eq!(created.catalog_refresh_schedule, nfs_catalog().catalog_refresh_schedule);

        let catalog = mock.get_catalog(created.id).await.unwrap();
        assert_eq!(catalog.source_path, "/catalogs");
        assert_eq!(catalog.filename, "catalog.xml");
        assert_eq!(catalog.schedule.unwrap().cron, "0 0 15 ? * MON *");
        assert_eq!(mock.job_polls(catalog.task_id), 2);

        let observed: FirmwareCatalogState = state_of(&read(FirmwareCatalogResource, &mock, &created).await);
        assert_eq!(observed, created);
    }

    #[tokio::test]
    async fn test_failed_refresh_job() {
        let mock = MockOmeClient::new("https://ome.test");
        mock.script_next_job(vec![JobStatus::Failed]);
        let response = create(FirmwareCatalogResource, &mock, &online_catalog()).await;
        let (summary, _) = error_of(&response);
        assert_eq!(summary, "Unable to create catalog");
        assert!(response.state.is_none());
    }

    #[tokio::test]
    async fn test_update_to_manual() {
        let mock = MockOmeClient::new("https://ome.test");
        let created: FirmwareCatalogState = state_of(&create(FirmwareCatalogResource, &mock, &nfs_catalog()).await);

        let plan = FirmwareCatalogState {
            catalog_update_type: "Manual".to_string(),
            catalog_refresh_schedule: None,
            catalog_file_path: "/catalogs/2026/catalog.xml".to_string(),
            ..nfs_catalog()
        };
        let updated: FirmwareCatalogState = state_of(&update(FirmwareCatalogResource, &mock, &created, &plan).await);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.repository_id, created.repository_id);
        assert_eq!(updated.catalog_update_type, "Manual");
        assert_eq!(updated.catalog_refresh_schedule, None);
        assert_eq!(updated.catalog_file_path, "/catalogs/2026/catalog.xml");
        assert!(mock.get_catalog(created.id).await.unwrap().schedule.is_none());
    }

    #[tokio::test]
    async fn test_running_catalog_is_not_deleted() {
        let mock = MockOmeClient::new("https://ome.test");
        let created: FirmwareCatalogState = state_of(&create(FirmwareCatalogResource, &mock, &online_catalog()).await);
        mock.set_catalog_status(created.id, "Running");

        let (summary, detail) = error_of(&delete(FirmwareCatalogResource, &mock, &created).await);
        assert_eq!(summary, "Could not delete catalog");
        assert!(detail.contains("running"));
        assert_eq!(mock.call_count("delete_catalogs"), 0);

        mock.set_catalog_status(created.id, "Completed");
        assert_ok(&delete(FirmwareCatalogResource, &mock, &created).await);
        assert!(read(FirmwareCatalogResource, &mock, &created).await.state.is_none());
        assert_ok(&delete(FirmwareCatalogResource, &mock, &created).await);
    }

    #[tokio::test]
    async fn test_import_by_name() {
        let mock = MockOmeClient::new("https://ome.test");
        let created: FirmwareCatalogState = state_of(&create(FirmwareCatalogResource, &mock, &online_catalog()).await);
        let imported: FirmwareCatalogState = state_of(&import(FirmwareCatalogResource, &mock, "dell-online").await);
        assert_eq!(imported.id, created.id);
        assert_eq!(imported.catalog_update_type, "Manual");
        assert_eq!(imported.share_type, "DELL_ONLINE");
        assert_eq!(imported.share_address, "");

        let (summary, _) = error_of(&import(FirmwareCatalogResource, &mock, "missing").await);
        assert_eq!(summary, "Error importing catalog");
    }
}
