//! HTTP-level tests for the OME client against a local mock server

use ome_client::{ClientOptions, JobStatus, OmeApi, OmeClient, OmeError, RetryPolicy};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "token-123";

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/SessionService/Sessions"))
        .and(body_json(json!({
            "UserName": "admin",
            "Password": "secret",
            "SessionType": "API"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Auth-Token", TOKEN)
                .set_body_json(json!({"Id": "session-1"})),
        )
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> OmeClient {
    let mut options = ClientOptions::new(server.uri(), "admin", "secret");
    options.retry = RetryPolicy::none();
    OmeClient::connect(&options).await.unwrap()
}

#[tokio::test]
async fn test_connect_sends_token_on_later_requests() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/JobService/Jobs(42)"))
        .and(header("X-Auth-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": 42,
            "JobName": "Deploy",
            "LastRunStatus": {"Id": 2050, "Name": "Running"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    assert_eq!(client.session_id(), "session-1");

    let job = client.get_job(42).await.unwrap();
    assert_eq!(job.id, 42);
    assert_eq!(job.status(), JobStatus::Running);
}

#[tokio::test]
async fn test_connect_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/SessionService/Sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Unable to create a session."}
        })))
        .mount(&server)
        .await;

    let options = ClientOptions::new(server.uri(), "admin", "wrong");
    let err = OmeClient::connect(&options).await.unwrap_err();
    assert!(matches!(err, OmeError::Unauthorized(ref m) if m == "Unable to create a session."));
}

#[tokio::test]
async fn test_error_message_passed_through() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/GroupService/Actions/GroupService.AddMemberDevices"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "Base.1.0.GeneralError",
                "message": "A general error has occurred.",
                "@Message.ExtendedInfo": [
                    {"MessageId": "CGRP9013", "Message": "Unable to add the devices to the group."}
                ]
            }
        })))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client.add_group_members(7, &[1, 2]).await.unwrap_err();
    match err {
        OmeError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Unable to add the devices to the group.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_maps_to_not_found() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/TemplateService/Templates(9)"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client.get_template(9).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_collection_follows_next_link() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/DeviceService/Devices"))
        .and(query_param_is_missing("$skip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.count": 2,
            "@odata.nextLink": "/api/DeviceService/Devices?$skip=1&$top=1",
            "value": [{"Id": 1, "DeviceServiceTag": "AAA1111"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/DeviceService/Devices"))
        .and(query_param("$skip", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.count": 2,
            "value": [{"Id": 2, "DeviceServiceTag": "BBB2222"}]
        })))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let devices = client.list_devices(None).await.unwrap();
    let tags: Vec<&str> = devices.iter().map(|d| d.device_service_tag.as_str()).collect();
    assert_eq!(tags, vec!["AAA1111", "BBB2222"]);
}

#[tokio::test]
async fn test_service_tag_lookup_uses_filter() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/DeviceService/Devices"))
        .and(query_param("$filter", "DeviceServiceTag eq 'ABC1234'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"Id": 5, "DeviceServiceTag": "ABC1234"}]
        })))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let device = client.get_device_by_service_tag("ABC1234").await.unwrap();
    assert_eq!(device.map(|d| d.id), Some(5));
}

#[tokio::test]
async fn test_close_session_tolerates_missing_session() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/SessionService/Sessions('session-1')"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let api: &dyn OmeApi = &client;
    api.close_session().await.unwrap();
}
