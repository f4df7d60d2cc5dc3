//! Unit tests for the network setting reconciler

#[cfg(test)]
mod tests {
    use crate::reconciler::appliance::NetworkSettingResource;
    use crate::test_utils::*;
    use ome_client::{MockOmeClient, OmeApi, SessionConfiguration};
    use ome_schema::{NetworkSettingState, ProxySettingState, SessionSettingState, TimeSettingState};
    use pretty_assertions::assert_eq;

    fn proxy() -> ProxySettingState {
        ProxySettingState {
            enable_proxy: true,
            ip_address: "proxy.example.com".to_string(),
            proxy_port: 3128,
            enable_authentication: true,
            username: "proxyuser".to_string(),
            password: "proxypass".to_string(),
            ssl_check_disabled: false,
        }
    }

    fn gui_limits() -> SessionConfiguration {
        SessionConfiguration {
            session_type: "GUI".to_string(),
            max_sessions: 5,
            session_timeout: 1_800_000,
            min_session_timeout: 60_000,
            max_session_timeout: 86_400_000,
            min_sessions_allowed: 1,
            max_sessions_allowed: 100,
        }
    }

    fn gui(max_sessions: i64, minutes: i64) -> SessionSettingState {
        SessionSettingState {
            session_type: "GUI".to_string(),
            max_sessions,
            session_timeout: minutes,
        }
    }

    #[tokio::test]
    async fn test_proxy_password_is_kept() {
        let mock = MockOmeClient::new("https://ome.test");
        let plan = NetworkSettingState {
            proxy: Some(proxy()),
            ..Default::default()
        };
        let created: NetworkSettingState = state_of(&create(NetworkSettingResource, &mock, &plan).await);
        assert_eq!(created.id, "network_setting");
        assert_eq!(created.proxy, Some(proxy()));
        assert_eq!(created.time, None);
        assert_eq!(mock.call_count("update_time_configuration"), 0);

        let stored = mock.get_proxy_configuration().await.unwrap();
        assert_eq!(stored.port_number, 3128);
        assert_eq!(stored.password, None);

        let observed: NetworkSettingState = state_of(&read(NetworkSettingResource, &mock, &created).await);
        assert_eq!(observed, created);
    }

    #[tokio::test]
    async fn test_session_timeout_in_minutes() {
        let mock = MockOmeClient::new("https://ome.test");
        mock.set_session_configurations(vec![gui_limits()]);
        let plan = NetworkSettingState {
            session: Some(vec![gui(10, 45)]),
            ..Default::default()
        };
        let created: NetworkSettingState = state_of(&create(NetworkSettingResource, &mock, &plan).await);
        assert_eq!(created.session, Some(vec![gui(10, 45)]));

        let stored = mock.list_session_configurations().await.unwrap();
        assert_eq!(stored[0].session_timeout, 45 * 60_000);
        assert_eq!(stored[0].max_sessions, 10);

        let too_long = NetworkSettingState {
            session: Some(vec![gui(10, 2000)]),
            ..Default::default()
        };
        let response = update(NetworkSettingResource, &mock, &created, &too_long).await;
        let (summary, detail) = error_of(&response);
        assert_eq!(summary, "Error while updation");
        assert!(detail.contains("between 1 and 1440 minutes"));
        assert_eq!(response.state, Some(to_value(&created)));
    }

    #[tokio::test]
    async fn test_time_settings() {
        let mock = MockOmeClient::new("https://ome.test");
        let plan = NetworkSettingState {
            time: Some(TimeSettingState {
                time_zone: "TZ_ID_65".to_string(),
                enable_ntp: true,
                primary_ntp_address: "0.pool.ntp.org".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let created: NetworkSettingState = state_of(&create(NetworkSettingResource, &mock, &plan).await);
        assert_eq!(created.time, plan.time);

        mock.fail_on("update_time_configuration", "Unable to update the time.");
        let (summary, _) = error_of(&create(NetworkSettingResource, &mock, &plan).await);
        assert_eq!(summary, "Error while creation");

        assert_ok(&delete(NetworkSettingResource, &mock, &created).await);
    }

    #[tokio::test]
    async fn test_validation() {
        let mock = MockOmeClient::new("https://ome.test");
        let (_, detail) = error_of(&create(NetworkSettingResource, &mock, &NetworkSettingState::default()).await);
        assert!(detail.contains("at least one of proxy, time, session"));

        let manual_clock = NetworkSettingState {
            time: Some(TimeSettingState {
                time_zone: "TZ_ID_1".to_string(),
                system_time: "yesterday".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (_, detail) = error_of(&create(NetworkSettingResource, &mock, &manual_clock).await);
        assert!(detail.contains("system_time"));

        let duplicate = NetworkSettingState {
            session: Some(vec![gui(1, 10), gui(2, 20)]),
            ..Default::default()
        };
        let (_, detail) = error_of(&create(NetworkSettingResource, &mock, &duplicate).await);
        assert!(detail.contains("duplicate"));
        assert!(mock.calls().is_empty());
    }
}
