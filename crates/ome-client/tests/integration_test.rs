//! Integration tests for the OME client
//!
//! These tests require a reachable OpenManage Enterprise appliance.
//! Set OME_HOST, OME_USERNAME and OME_PASSWORD environment variables to run.

use ome_client::{ClientOptions, OmeApi, OmeClient};

fn options() -> ClientOptions {
    let host = std::env::var("OME_HOST").expect("OME_HOST environment variable must be set");
    let username = std::env::var("OME_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("OME_PASSWORD").expect("OME_PASSWORD environment variable must be set");
    let mut options = ClientOptions::new(format!("https://{}:443", host), username, password);
    options.skip_ssl = true;
    options
}

#[tokio::test]
#[ignore] // Requires a running OME appliance
async fn test_open_and_close_session() {
    let client = OmeClient::connect(&options()).await.expect("Failed to open session");
    assert!(!client.session_id().is_empty());
    client.close_session().await.expect("Failed to close session");
}

#[tokio::test]
#[ignore]
async fn test_list_devices() {
    let client = OmeClient::connect(&options()).await.expect("Failed to open session");
    let devices = client.list_devices(None).await.expect("Failed to list devices");
    println!("Found {} devices", devices.len());
    client.close_session().await.expect("Failed to close session");
}

#[tokio::test]
#[ignore]
async fn test_list_templates() {
    let client = OmeClient::connect(&options()).await.expect("Failed to open session");
    let templates = client.list_templates().await.expect("Failed to list templates");
    for template in &templates {
        println!("{} {} ({})", template.id, template.name, template.view_type().map(|v| v.as_str()).unwrap_or("Unknown"));
    }
    client.close_session().await.expect("Failed to close session");
}

#[tokio::test]
#[ignore]
async fn test_read_appliance_settings() {
    let client = OmeClient::connect(&options()).await.expect("Failed to open session");
    let time = client.get_time_configuration().await.expect("Failed to read time settings");
    println!("Time zone: {}", time.time_zone);
    let sessions = client
        .list_session_configurations()
        .await
        .expect("Failed to read session settings");
    println!("{} session types", sessions.len());
    client.close_session().await.expect("Failed to close session");
}
