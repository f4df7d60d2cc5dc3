//! Unit tests for the template reconciler

#[cfg(test)]
mod tests {
    use crate::reconciler::template::TemplateResource;
    use crate::test_utils::*;
    use ome_client::{
        Attribute, AttributeGroup, IdentityPool, JobStatus, MockOmeClient, NicPortVlan, TemplateNetwork, ViewType,
        VlanNetwork,
    };
    use ome_schema::{TemplateAttributeState, TemplateState, TemplateVlanState, VlanAttributeState};
    use pretty_assertions::assert_eq;

    const NIC: &str = "NIC in Mezzanine 1A";

    fn seeded_mock() -> MockOmeClient {
        let mock = mock_with_servers();
        mock.set_attribute_seed(vec![AttributeGroup {
            display_name: "iDRAC".to_string(),
            sub_attribute_groups: vec![AttributeGroup {
                display_name: "Users".to_string(),
                attributes: vec![Attribute {
                    attribute_id: 1001,
                    display_name: "User Name".to_string(),
                    value: Some("root".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            attributes: vec![Attribute {
                attribute_id: 1002,
                display_name: "Time Zone".to_string(),
                value: Some("UTC".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }]);
        mock.set_network_seed(TemplateNetwork {
            bonding_technology: String::new(),
            propagate_vlan: true,
            ports: vec![
                NicPortVlan {
                    component_id: 5001,
                    nic_identifier: NIC.to_string(),
                    port: 1,
                    ..Default::default()
                },
                NicPortVlan {
                    component_id: 5002,
                    nic_identifier: NIC.to_string(),
                    port: 2,
                    ..Default::default()
                },
            ],
        });
        mock.add_identity_pool(IdentityPool {
            id: 30,
            name: "IO1".to_string(),
            description: None,
        });
        mock.add_vlan_network(VlanNetwork {
            id: 40,
            name: "VLAN1".to_string(),
            vlan_maximum: 100,
            vlan_minimum: 100,
            ..Default::default()
        });
        mock
    }

    fn from_device(name: &str) -> TemplateState {
        TemplateState {
            name: name.to_string(),
            refdevice_servicetag: "SVC1001".to_string(),
            fqdds: "iDRAC,niC".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_configure_vlan() {
        let mock = seeded_mock();

        let response = create(TemplateResource, &mock, &from_device("test_acc_template-1")).await;
        let created: TemplateState = state_of(&response);
        assert_eq!(created.name, "test_acc_template-1");
        assert_eq!(created.fqdds, "iDRAC,niC");
        assert_eq!(created.view_type, "Deployment");
        assert_eq!(created.attributes.as_ref().map(Vec::len), Some(2));

        let plan = TemplateState {
            identity_pool_name: Some("IO1".to_string()),
            vlan: Some(TemplateVlanState {
                propagate_vlan: true,
                bonding_technology: String::new(),
                vlan_attributes: vec![VlanAttributeState {
                    untagged_network: 40,
                    port: 1,
                    nic_identifier: NIC.to_string(),
                    ..Default::default()
                }],
            }),
            ..created.clone()
        };
        let response = update(TemplateResource, &mock, &created, &plan).await;
        let updated: TemplateState = state_of(&response);
        assert_eq!(updated.identity_pool_name.as_deref(), Some("IO1"));
        let vlan = updated.vlan.unwrap();
        assert_eq!(vlan.bonding_technology, "NoTeaming");
        assert_eq!(vlan.vlan_attributes.len(), 1);
        assert_eq!(vlan.vlan_attributes[0].untagged_network, 40);

        assert_eq!(mock.sessions_closed(), 2);
    }

    #[tokio::test]
    async fn test_attributes_read_back_as_sent() {
        let mock = seeded_mock();
        let plan = TemplateState {
            attributes: Some(vec![TemplateAttributeState {
                display_name: "iDRAC,Users,User Name".to_string(),
                value: "admin2".to_string(),
                ..Default::default()
            }]),
            ..from_device("attrs")
        };

        let created: TemplateState = state_of(&create(TemplateResource, &mock, &plan).await);
        let attributes = created.attributes.clone().unwrap();
        let user = attributes
            .iter()
            .find(|a| a.display_name == "iDRAC,Users,User Name")
            .unwrap();
        assert_eq!(user.value, "admin2");
        assert_eq!(user.attribute_id, 1001);

        let mut changed = attributes.clone();
        for attribute in changed.iter_mut() {
            if attribute.attribute_id == 1002 {
                attribute.value = "CET".to_string();
                attribute.is_ignored = true;
            }
        }
        let plan = TemplateState {
            attributes: Some(changed.clone()),
            ..created.clone()
        };
        let updated: TemplateState = state_of(&update(TemplateResource, &mock, &created, &plan).await);
        assert_eq!(updated.attributes, Some(changed));
    }

    #[tokio::test]
    async fn test_unknown_attribute_fails_update() {
        let mock = seeded_mock();
        let created: TemplateState = state_of(&create(TemplateResource, &mock, &from_device("t1")).await);
        let plan = TemplateState {
            attributes: Some(vec![TemplateAttributeState {
                attribute_id: 4242,
                value: "x".to_string(),
                ..Default::default()
            }]),
            ..created.clone()
        };

        let response = update(TemplateResource, &mock, &created, &plan).await;
        let (summary, detail) = error_of(&response);
        assert_eq!(summary, "Error updating template");
        assert!(detail.contains("4242"));
        assert_eq!(response.state, Some(to_value(&created)));
    }

    #[tokio::test]
    async fn test_clone_compliance_to_deployment_is_fatal() {
        let mock = seeded_mock();
        mock.add_template(create_test_template(500, "compliance-src", ViewType::Compliance));
        let plan = TemplateState {
            name: "clone".to_string(),
            reftemplate_name: "compliance-src".to_string(),
            view_type: "Deployment".to_string(),
            ..Default::default()
        };

        let (summary, detail) = error_of(&create(TemplateResource, &mock, &plan).await);
        assert_eq!(summary, "Error creating template");
        assert!(detail.contains("cannot be cloned"));
    }

    #[tokio::test]
    async fn test_clone_to_compliance() {
        let mock = seeded_mock();
        mock.add_template(create_test_template(500, "deploy-src", ViewType::Deployment));
        let plan = TemplateState {
            name: "compliance-copy".to_string(),
            reftemplate_id: 500,
            view_type: "Compliance".to_string(),
            ..Default::default()
        };
        let created: TemplateState = state_of(&create(TemplateResource, &mock, &plan).await);
        assert_eq!(created.view_type, "Compliance");
        assert_eq!(created.view_type_id, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_creation_job() {
        let mock = seeded_mock();
        mock.script_next_job(vec![JobStatus::Running, JobStatus::Failed]);

        let response = create(TemplateResource, &mock, &from_device("broken")).await;
        let (summary, _) = error_of(&response);
        assert_eq!(summary, "Error creating template");
        assert!(response.state.is_none());
        assert_eq!(mock.sessions_closed(), 1);
    }

    #[tokio::test]
    async fn test_validation_runs_before_connecting() {
        let mock = seeded_mock();
        let plan = TemplateState {
            content: "<SystemConfiguration/>".to_string(),
            ..from_device("both")
        };
        let (summary, detail) = error_of(&create(TemplateResource, &mock, &plan).await);
        assert_eq!(summary, "Validation error");
        assert!(detail.contains("refdevice_servicetag, reftemplate_id"));
        assert!(mock.calls().is_empty());
        assert_eq!(mock.sessions_closed(), 0);
    }

    #[tokio::test]
    async fn test_plan_flags_immutable_changes() {
        let state = TemplateState {
            id: 10,
            ..from_device("t1")
        };
        let plan = TemplateState {
            view_type: "Compliance".to_string(),
            fqdds: "IDRAC,NIC".to_string(),
            name: "renamed".to_string(),
            ..state.clone()
        };
        let response = plan_call(&state, &plan).await;
        assert_ok(&response);
        assert_eq!(response.requires_replace, vec!["view_type".to_string()]);
    }

    async fn plan_call(state: &TemplateState, planned: &TemplateState) -> crate::protocol::Response {
        plan(TemplateResource, Some(state), planned).await
    }

    #[tokio::test]
    async fn test_read_detects_deleted_template() {
        let mock = seeded_mock();
        let created: TemplateState = state_of(&create(TemplateResource, &mock, &from_device("gone")).await);
        delete(TemplateResource, &mock, &created).await;

        let response = read(TemplateResource, &mock, &created).await;
        assert_ok(&response);
        assert!(response.state.is_none());
        assert_eq!(response.diagnostics.warnings().count(), 1);
    }

    #[tokio::test]
    async fn test_import_by_name() {
        let mock = seeded_mock();
        let created: TemplateState = state_of(&create(TemplateResource, &mock, &from_device("shared")).await);

        let imported: TemplateState = state_of(&import(TemplateResource, &mock, "shared").await);
        assert_eq!(imported.id, created.id);
        assert_eq!(imported.name, "shared");
        assert_eq!(imported.refdevice_id, 101);
        assert_eq!(imported.refdevice_servicetag, "SVC1001");
        assert_eq!(imported.attributes, created.attributes);

        let (summary, _) = error_of(&import(TemplateResource, &mock, "missing").await);
        assert_eq!(summary, "Error importing template");
    }

    #[tokio::test]
    async fn test_plan_after_import_keeps_template() {
        let mock = seeded_mock();
        let config = from_device("round-trip");
        assert_ok(&create(TemplateResource, &mock, &config).await);

        let imported: TemplateState = state_of(&import(TemplateResource, &mock, "round-trip").await);
        let response = plan_call(&imported, &config).await;
        assert_ok(&response);
        assert!(response.requires_replace.is_empty(), "{:?}", response.requires_replace);

        let refreshed: TemplateState = state_of(&read(TemplateResource, &mock, &imported).await);
        assert_eq!(refreshed.fqdds, "");
        assert!(plan_call(&refreshed, &config).await.requires_replace.is_empty());

        let by_id = TemplateState {
            refdevice_servicetag: String::new(),
            refdevice_id: 101,
            ..config.clone()
        };
        assert!(plan_call(&imported, &by_id).await.requires_replace.is_empty());

        let other_device = TemplateState {
            refdevice_servicetag: "SVC1002".to_string(),
            ..config
        };
        assert_eq!(
            plan_call(&imported, &other_device).await.requires_replace,
            vec!["refdevice_id".to_string(), "refdevice_servicetag".to_string()]
        );
    }
}
