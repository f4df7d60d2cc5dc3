//! Unit tests for the static group reconciler

#[cfg(test)]
mod tests {
    use crate::reconciler::inventory::StaticGroupResource;
    use crate::test_utils::*;
    use ome_client::{Group, MEMBERSHIP_TYPE_QUERY, OmeApi};
    use ome_schema::StaticGroupState;
    use pretty_assertions::assert_eq;

    fn group(device_ids: &[i64]) -> StaticGroupState {
        StaticGroupState {
            name: "rack-7".to_string(),
            description: "servers in rack 7".to_string(),
            device_ids: device_ids.to_vec(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_membership_follows_plan() {
        let mock = mock_with_servers();
        let created: StaticGroupState = state_of(&create(StaticGroupResource, &mock, &group(&[102, 101])).await);
        assert_eq!(created.device_ids.len(), 2);
        assert_eq!(created.device_ids, vec![101, 102]);
        assert_eq!(created.parent_id, 0);
        assert_eq!(mock.get_group(created.id).await.unwrap().parent_id, 1021);
        assert_eq!(mock.group_member_ids(created.id), vec![101, 102]);

        let shrunk: StaticGroupState = state_of(&update(StaticGroupResource, &mock, &created, &group(&[101])).await);
        assert_eq!(shrunk.device_ids.len(), 1);
        assert_eq!(mock.group_member_ids(created.id), vec![101]);

        let emptied: StaticGroupState = state_of(&update(StaticGroupResource, &mock, &shrunk, &group(&[])).await);
        assert_eq!(emptied.device_ids.len(), 0);
        assert!(mock.group_member_ids(created.id).is_empty());
    }

    #[tokio::test]
    async fn test_members_are_added_before_removal() {
        let mock = mock_with_servers();
        let created: StaticGroupState = state_of(&create(StaticGroupResource, &mock, &group(&[101])).await);

        let plan = StaticGroupState {
            name: "rack-7b".to_string(),
            ..group(&[102, 103])
        };
        let updated: StaticGroupState = state_of(&update(StaticGroupResource, &mock, &created, &plan).await);
        assert_eq!(updated.name, "rack-7b");
        assert_eq!(updated.device_ids, vec![102, 103]);

        let calls = mock.calls();
        let added = calls.iter().rposition(|c| c == "add_group_members").unwrap();
        let removed = calls.iter().rposition(|c| c == "remove_group_members").unwrap();
        assert!(added < removed);
        assert_eq!(mock.call_count("update_group"), 1);
    }

    #[tokio::test]
    async fn test_unknown_member_fails_with_add_summary() {
        let mock = mock_with_servers();
        let (summary, detail) = error_of(&create(StaticGroupResource, &mock, &group(&[101, 999])).await);
        assert_eq!(summary, "Error while adding group devices");
        assert!(detail.contains("999"));
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_prior_state() {
        let mock = mock_with_servers();
        let created: StaticGroupState = state_of(&create(StaticGroupResource, &mock, &group(&[101, 102])).await);
        mock.fail_on("remove_group_members", "Unable to remove the devices.");

        let response = update(StaticGroupResource, &mock, &created, &group(&[101])).await;
        let (summary, _) = error_of(&response);
        assert_eq!(summary, "Error while removing group devices");
        assert_eq!(response.state, Some(to_value(&created)));
    }

    #[tokio::test]
    async fn test_read_and_delete() {
        let mock = mock_with_servers();
        let created: StaticGroupState = state_of(&create(StaticGroupResource, &mock, &group(&[101])).await);
        let observed: StaticGroupState = state_of(&read(StaticGroupResource, &mock, &created).await);
        assert_eq!(observed, created);

        assert_ok(&delete(StaticGroupResource, &mock, &created).await);
        let response = read(StaticGroupResource, &mock, &created).await;
        assert_ok(&response);
        assert!(response.state.is_none());
        assert_ok(&delete(StaticGroupResource, &mock, &created).await);
    }

    #[tokio::test]
    async fn test_import() {
        let mock = mock_with_servers();
        let created: StaticGroupState = state_of(&create(StaticGroupResource, &mock, &group(&[101, 103])).await);
        let imported: StaticGroupState = state_of(&import(StaticGroupResource, &mock, "rack-7").await);
        assert_eq!(imported, created);

        mock.add_group(
            Group {
                membership_type_id: MEMBERSHIP_TYPE_QUERY,
                ..create_test_group(3000, "dynamic", 1021)
            },
            &[],
        );
        let (summary, detail) = error_of(&import(StaticGroupResource, &mock, "dynamic").await);
        assert_eq!(summary, "Error importing group");
        assert!(detail.contains("not a static group"));
    }

    #[tokio::test]
    async fn test_validation() {
        let mock = mock_with_servers();
        let plan = StaticGroupState {
            name: " ".to_string(),
            ..group(&[101])
        };
        assert_eq!(error_of(&create(StaticGroupResource, &mock, &plan).await).0, "Validation error");
        let (_, detail) = error_of(&create(StaticGroupResource, &mock, &group(&[101, 101])).await);
        assert!(detail.contains("duplicate"));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_root_parent_stays_as_configured() {
        let mock = mock_with_servers();
        mock.add_group(create_test_group(2001, "rack-1", 1021), &[]);
        let created: StaticGroupState = state_of(&create(StaticGroupResource, &mock, &group(&[101])).await);
        assert_eq!(created.parent_id, 0);

        let explicit = StaticGroupState {
            parent_id: 1021,
            ..group(&[101])
        };
        let updated: StaticGroupState = state_of(&update(StaticGroupResource, &mock, &created, &explicit).await);
        assert_eq!(updated.parent_id, 1021);
        assert_eq!(mock.call_count("update_group"), 0);

        let nested = StaticGroupState {
            parent_id: 2001,
            ..group(&[101])
        };
        let moved: StaticGroupState = state_of(&update(StaticGroupResource, &mock, &updated, &nested).await);
        assert_eq!(moved.parent_id, 2001);

        // Moved under another group outside the provider: the real parent shows up
        let observed: StaticGroupState = state_of(&read(StaticGroupResource, &mock, &created).await);
        assert_eq!(observed.parent_id, 2001);
    }
}
