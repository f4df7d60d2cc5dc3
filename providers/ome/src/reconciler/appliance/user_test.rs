//! Unit tests for the user reconciler

#[cfg(test)]
mod tests {
    use crate::reconciler::appliance::UserResource;
    use crate::test_utils::*;
    use ome_client::{MockOmeClient, OmeApi};
    use ome_schema::UserState;
    use pretty_assertions::assert_eq;

    fn user() -> UserState {
        UserState {
            username: "operator".to_string(),
            password: "S3cret!pass".to_string(),
            role_id: "16".to_string(),
            description: "night shift".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_read_delete() {
        let mock = MockOmeClient::new("https://ome.test");
        let created: UserState = state_of(&create(UserResource, &mock, &user()).await);
        assert!(!created.id.is_empty());
        assert_eq!(created.password, "S3cret!pass");
        assert_eq!(created.enabled, None);
        assert_eq!(created.user_type_id, None);

        let account = mock.get_account(&created.id).await.unwrap();
        assert_eq!(account.user_type_id, 1);
        assert!(account.enabled);

        let observed: UserState = state_of(&read(UserResource, &mock, &created).await);
        assert_eq!(observed, created);

        assert_ok(&delete(UserResource, &mock, &created).await);
        assert!(read(UserResource, &mock, &created).await.state.is_none());
        assert_ok(&delete(UserResource, &mock, &created).await);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let mock = MockOmeClient::new("https://ome.test");
        assert_ok(&create(UserResource, &mock, &user()).await);
        let (summary, detail) = error_of(&create(UserResource, &mock, &user()).await);
        assert_eq!(summary, "Error creating user");
        assert!(detail.contains("operator"));
    }

    #[tokio::test]
    async fn test_update_and_failed_update() {
        let mock = MockOmeClient::new("https://ome.test");
        let created: UserState = state_of(&create(UserResource, &mock, &user()).await);

        let plan = UserState {
            role_id: "10".to_string(),
            enabled: Some(false),
            ..user()
        };
        let updated: UserState = state_of(&update(UserResource, &mock, &created, &plan).await);
        assert_eq!(updated.role_id, "10");
        assert_eq!(updated.enabled, Some(false));
        assert!(!mock.get_account(&created.id).await.unwrap().enabled);

        mock.fail_on("update_account", "Unable to update the account.");
        let response = update(UserResource, &mock, &updated, &user()).await;
        let (summary, _) = error_of(&response);
        assert_eq!(summary, "Error updating user");
        assert_eq!(response.state, Some(to_value(&updated)));
    }

    #[tokio::test]
    async fn test_import_by_username() {
        let mock = MockOmeClient::new("https://ome.test");
        let created: UserState = state_of(&create(UserResource, &mock, &user()).await);
        let imported: UserState = state_of(&import(UserResource, &mock, "operator").await);
        assert_eq!(imported.id, created.id);
        assert_eq!(imported.password, "");
        let by_id: UserState = state_of(&import(UserResource, &mock, &created.id).await);
        assert_eq!(by_id, imported);
    }

    #[tokio::test]
    async fn test_validation() {
        let mock = MockOmeClient::new("https://ome.test");
        let plan = UserState {
            role_id: String::new(),
            ..user()
        };
        let (summary, detail) = error_of(&create(UserResource, &mock, &plan).await);
        assert_eq!(summary, "Validation error");
        assert!(detail.contains("role_id"));
        assert!(mock.calls().is_empty());
    }
}
