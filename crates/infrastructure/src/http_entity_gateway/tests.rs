use metaform_application::EntityGateway;
use metaform_core::AppError;
use metaform_domain::EntityPayload;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::HttpEntityGateway;

fn gateway(base_url: &str) -> HttpEntityGateway {
    let base_url = Url::parse(base_url).unwrap_or_else(|_| unreachable!());
    HttpEntityGateway::new(reqwest::Client::new(), base_url)
}

fn payload() -> EntityPayload {
    EntityPayload::from_value(json!({ "id": "ignored", "firstName": "Ada" }))
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn list_fetches_collection_under_base_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "1", "firstName": "Ada" },
            { "id": 2, "firstName": "Grace" }
        ])))
        .mount(&server)
        .await;

    let records = gateway(&format!("{}/api/", server.uri()))
        .list("users")
        .await
        .unwrap_or_else(|_| unreachable!());

    let ids: Vec<&str> = records.iter().map(|record| record.id()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(records[1].get("firstName"), Some(&json!("Grace")));
}

#[tokio::test]
async fn create_posts_payload_without_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({ "firstName": "Ada" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "9", "firstName": "Ada" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway(&server.uri())
        .create("users", &payload())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(created.id(), "9");
}

#[tokio::test]
async fn update_puts_payload_to_record_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/5"))
        .and(body_json(json!({ "firstName": "Ada" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "5", "firstName": "Ada" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated = gateway(&server.uri())
        .update("users", "5", &payload())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.id(), "5");
}

#[tokio::test]
async fn delete_accepts_empty_success_response() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = gateway(&server.uri()).delete("users", "5").await;
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn non_success_statuses_collapse_to_fixed_messages() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500).set_body_string("database exploded"))
        .mount(&server)
        .await;
    let gateway = gateway(&server.uri());

    assert_eq!(
        gateway.list("users").await,
        Err(AppError::Network("Failed to fetch".to_owned()))
    );
    assert_eq!(
        gateway.create("users", &payload()).await,
        Err(AppError::Network("Failed to create".to_owned()))
    );
    assert_eq!(
        gateway.update("users", "1", &payload()).await,
        Err(AppError::Network("Failed to update".to_owned()))
    );
    assert_eq!(
        gateway.delete("users", "1").await,
        Err(AppError::Network("Failed to delete".to_owned()))
    );
}

#[tokio::test]
async fn unreadable_bodies_are_reported_as_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    assert_eq!(
        gateway(&server.uri()).list("users").await,
        Err(AppError::Network("Failed to fetch".to_owned()))
    );
}

#[tokio::test]
async fn transport_errors_are_reported_as_failures() {
    // Nothing listens on the discard port in the test environment.
    assert_eq!(
        gateway("http://127.0.0.1:9").list("users").await,
        Err(AppError::Network("Failed to fetch".to_owned()))
    );
}
