//! Unit tests for the device and group device data sources

#[cfg(test)]
mod tests {
    use crate::data_sources::{DeviceDataSource, GroupDevicesInfoDataSource};
    use crate::test_utils::*;
    use ome_client::InventoryDetail;
    use ome_schema::{DeviceDataSourceState, GroupDevicesInfoState};
    use pretty_assertions::assert_eq;

    fn ids(state: &DeviceDataSourceState) -> Vec<i64> {
        state.devices.iter().map(|d| d.id).collect()
    }

    #[tokio::test]
    async fn test_all_devices_without_selector() {
        let mock = mock_with_servers();
        let found: DeviceDataSourceState =
            state_of(&read_data_source(DeviceDataSource, &mock, &DeviceDataSourceState::default()).await);
        assert_eq!(found.id, "ome_device");
        assert_eq!(ids(&found), vec![101, 102, 103]);
        assert_eq!(found.devices[0].management_ips, vec!["10.0.0.11"]);
        assert!(found.devices[0].inventory.is_empty());
    }

    #[tokio::test]
    async fn test_select_by_tags_and_ip_range() {
        let mock = mock_with_servers();
        let by_tags = DeviceDataSourceState {
            device_service_tags: vec!["SVC1003".to_string(), "SVC1001".to_string()],
            ..Default::default()
        };
        let found: DeviceDataSourceState = state_of(&read_data_source(DeviceDataSource, &mock, &by_tags).await);
        assert_eq!(ids(&found), vec![101, 103]);
        assert_eq!(found.device_service_tags, by_tags.device_service_tags);

        let by_ip = DeviceDataSourceState {
            ip_expressions: vec!["10.0.0.0/24".to_string()],
            ..Default::default()
        };
        let found: DeviceDataSourceState = state_of(&read_data_source(DeviceDataSource, &mock, &by_ip).await);
        assert_eq!(ids(&found), vec![101, 102]);
    }

    #[tokio::test]
    async fn test_filter_expression_and_inventory() {
        let mock = mock_with_servers();
        mock.set_filter_result("Model eq 'PowerEdge R650'", vec![102]);
        mock.set_inventory(
            102,
            vec![
                InventoryDetail {
                    inventory_type: "serverProcessors".to_string(),
                    inventory_info: vec![serde_json::json!({"Id": 1, "Family": "Xeon"})],
                },
                InventoryDetail {
                    inventory_type: "serverMemoryDevices".to_string(),
                    inventory_info: vec![serde_json::json!({"Id": 2})],
                },
            ],
        );
        let config = DeviceDataSourceState {
            filter_expression: "Model eq 'PowerEdge R650'".to_string(),
            inventory_types: vec!["serverProcessors".to_string()],
            ..Default::default()
        };
        let found: DeviceDataSourceState = state_of(&read_data_source(DeviceDataSource, &mock, &config).await);
        assert_eq!(ids(&found), vec![102]);
        let inventory = &found.devices[0].inventory;
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].inventory_type, "serverProcessors");
        let entry: serde_json::Value = serde_json::from_str(&inventory[0].inventory_info[0]).unwrap();
        assert_eq!(entry["Family"], "Xeon");
    }

    #[tokio::test]
    async fn test_selectors_are_exclusive() {
        let mock = mock_with_servers();
        let config = DeviceDataSourceState {
            device_ids: vec![101],
            device_group_names: vec!["rack-1".to_string()],
            ..Default::default()
        };
        let (_, detail) = error_of(&read_data_source(DeviceDataSource, &mock, &config).await);
        assert!(detail.contains("only one of"));

        let bad_ip = DeviceDataSourceState {
            ip_expressions: vec!["10.0.0.300".to_string()],
            ..Default::default()
        };
        assert!(read_data_source(DeviceDataSource, &mock, &bad_ip).await.has_error());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_device_id() {
        let mock = mock_with_servers();
        let config = DeviceDataSourceState {
            device_ids: vec![999],
            ..Default::default()
        };
        let (summary, detail) = error_of(&read_data_source(DeviceDataSource, &mock, &config).await);
        assert_eq!(summary, "Error fetching devices");
        assert!(detail.contains("999"));
    }

    #[tokio::test]
    async fn test_group_devices_union() {
        let mock = mock_with_servers();
        mock.add_group(create_test_group(2001, "rack-1", 1021), &[103, 101]);
        mock.add_group(create_test_group(2002, "rack-2", 1021), &[101, 102]);
        let config = GroupDevicesInfoState {
            device_group_names: vec!["rack-1".to_string(), "rack-2".to_string()],
            ..Default::default()
        };
        let found: GroupDevicesInfoState =
            state_of(&read_data_source(GroupDevicesInfoDataSource, &mock, &config).await);
        assert_eq!(found.device_ids, vec![101, 102, 103]);
        assert_eq!(found.device_servicetags, vec!["SVC1001", "SVC1002", "SVC1003"]);
    }

    #[tokio::test]
    async fn test_group_devices_errors() {
        let mock = mock_with_servers();
        let (_, detail) = error_of(
            &read_data_source(GroupDevicesInfoDataSource, &mock, &GroupDevicesInfoState::default()).await,
        );
        assert!(detail.contains("device_group_names"));

        let config = GroupDevicesInfoState {
            device_group_names: vec!["missing".to_string()],
            ..Default::default()
        };
        let (summary, detail) = error_of(&read_data_source(GroupDevicesInfoDataSource, &mock, &config).await);
        assert_eq!(summary, "Error fetching devices");
        assert!(detail.contains("missing"));
    }
}
