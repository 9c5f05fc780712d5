use crate::helpers::{default_privacy, spawn_app, spawn_app_with_privacy};
use postroom::models::{ListVisibility, OptinMode, SubscriptionStatus};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn the_export_is_emailed_to_the_subscriber() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_export(&subscriber.to_string()).await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("A copy of your data has been e-mailed to you."));

    let request = &app.email_server.received_requests().await.unwrap()[0];
    let payload: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(payload["To"], "ursula@example.com");
    assert_eq!(payload["Attachments"][0]["Name"], "data.json");
    assert_eq!(payload["Attachments"][0]["ContentType"], "application/json");
}

#[tokio::test]
async fn private_list_names_are_masked_in_the_attachment() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");
    let private = app
        .store
        .seed_list("Staff announcements", ListVisibility::Private, OptinMode::Single);
    app.store
        .seed_relation(subscriber, private, SubscriptionStatus::Confirmed);

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_export(&subscriber.to_string()).await;
    assert_eq!(response.status().as_u16(), 200);

    use base64::Engine;
    let request = &app.email_server.received_requests().await.unwrap()[0];
    let payload: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    let attachment = base64::engine::general_purpose::STANDARD
        .decode(payload["Attachments"][0]["Content"].as_str().unwrap())
        .unwrap();
    let document: serde_json::Value = serde_json::from_slice(&attachment).unwrap();

    assert_eq!(document["subscriptions"][0]["list"], "Private list");
    assert!(
        !String::from_utf8_lossy(&attachment).contains("Staff announcements"),
        "the private list name must not leak"
    );
}

#[tokio::test]
async fn the_export_is_rejected_when_the_gate_is_closed() {
    let mut privacy = default_privacy();
    privacy.allow_export = false;
    let app = spawn_app_with_privacy(privacy).await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");

    let response = app.post_export(&subscriber.to_string()).await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(app.email_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn an_unknown_subscriber_gets_not_found_and_no_email() {
    let app = spawn_app().await;

    let response = app.post_export(&Uuid::new_v4().to_string()).await;

    assert_eq!(response.status().as_u16(), 404);
    assert!(app.email_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn a_failing_email_transport_surfaces_as_a_server_error() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_export(&subscriber.to_string()).await;

    assert_eq!(response.status().as_u16(), 500);
}
