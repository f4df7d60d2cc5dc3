//! Unit tests for the template and VLAN network data sources

#[cfg(test)]
mod tests {
    use crate::data_sources::{TemplateInfoDataSource, VlanNetworksInfoDataSource};
    use crate::reconciler::template::TemplateResource;
    use crate::test_utils::*;
    use ome_client::{Attribute, AttributeGroup, NicPortVlan, TemplateNetwork, ViewType, VlanNetwork};
    use ome_schema::{TemplateInfoState, TemplateState, VlanNetworksInfoState};
    use pretty_assertions::assert_eq;

    fn info(name: &str) -> TemplateInfoState {
        TemplateInfoState {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_deployment_template_with_attributes_and_vlan() {
        let mock = mock_with_servers();
        mock.set_attribute_seed(vec![AttributeGroup {
            display_name: "iDRAC".to_string(),
            attributes: vec![Attribute {
                attribute_id: 1002,
                display_name: "Time Zone".to_string(),
                value: Some("UTC".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }]);
        mock.set_network_seed(TemplateNetwork {
            bonding_technology: "NoTeaming".to_string(),
            propagate_vlan: true,
            ports: vec![NicPortVlan {
                component_id: 5001,
                nic_identifier: "NIC in Mezzanine 1A".to_string(),
                port: 1,
                untagged_network: 40,
                ..Default::default()
            }],
        });
        let plan = TemplateState {
            name: "web".to_string(),
            refdevice_servicetag: "SVC1001".to_string(),
            ..Default::default()
        };
        let created: TemplateState = state_of(&create(TemplateResource, &mock, &plan).await);

        let found: TemplateInfoState = state_of(&read_data_source(TemplateInfoDataSource, &mock, &info("web")).await);
        assert_eq!(found.id, created.id);
        assert_eq!(found.view_type, "Deployment");
        assert_eq!(found.refdevice_id, 101);
        assert_eq!(found.attributes.len(), 1);
        assert_eq!(found.attributes[0].display_name, "iDRAC,Time Zone");
        assert_eq!(found.attributes[0].value, "UTC");
        let vlan = found.vlan.unwrap();
        assert_eq!(vlan.vlan_attributes.len(), 1);
        assert_eq!(vlan.vlan_attributes[0].untagged_network, 40);
    }

    #[tokio::test]
    async fn test_compliance_template_has_no_vlan() {
        let mock = mock_with_servers();
        mock.add_template(create_test_template(77, "golden", ViewType::Compliance));
        let found: TemplateInfoState =
            state_of(&read_data_source(TemplateInfoDataSource, &mock, &info("golden")).await);
        assert_eq!(found.id, 77);
        assert_eq!(found.view_type, "Compliance");
        assert!(found.vlan.is_none());
        assert_eq!(mock.call_count("get_template_network"), 0);
    }

    #[tokio::test]
    async fn test_missing_template() {
        let mock = mock_with_servers();
        let (summary, detail) = error_of(&read_data_source(TemplateInfoDataSource, &mock, &info("nope")).await);
        assert_eq!(summary, "Error reading");
        assert!(detail.contains("nope"));

        let (_, detail) = error_of(&read_data_source(TemplateInfoDataSource, &mock, &info(" ")).await);
        assert!(detail.contains("name"));
    }

    #[tokio::test]
    async fn test_vlan_networks() {
        let mock = mock_with_servers();
        mock.add_vlan_network(VlanNetwork {
            id: 40,
            name: "VLAN1".to_string(),
            description: Some("data".to_string()),
            vlan_maximum: 100,
            vlan_minimum: 100,
            network_type: 1,
            ..Default::default()
        });
        mock.add_vlan_network(VlanNetwork {
            id: 41,
            name: "VLAN2".to_string(),
            vlan_maximum: 210,
            vlan_minimum: 200,
            ..Default::default()
        });
        let found: VlanNetworksInfoState =
            state_of(&read_data_source(VlanNetworksInfoDataSource, &mock, &VlanNetworksInfoState::default()).await);
        assert_eq!(found.vlan_networks.len(), 2);
        let first = found.vlan_networks.iter().find(|n| n.vlan_id == 40).unwrap();
        assert_eq!(first.description, "data");
        let second = found.vlan_networks.iter().find(|n| n.vlan_id == 41).unwrap();
        assert_eq!((second.vlan_minimum, second.vlan_maximum), (200, 210));
        assert_eq!(second.description, "");
    }
}
