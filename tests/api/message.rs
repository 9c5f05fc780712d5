use crate::helpers::spawn_app;
use uuid::Uuid;

#[tokio::test]
async fn the_hosted_message_substitutes_the_subscriber_merge_tags() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");
    let campaign = app
        .store
        .seed_campaign("launch", "## Hello {{ name }}", &[]);

    let response = app
        .get_message(&campaign.to_string(), &subscriber.to_string())
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(
        response
            .headers()
            .get("Content-Type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let body = response.text().await.unwrap();
    assert!(body.contains("<h2>Hello Ursula</h2>"));
}

#[tokio::test]
async fn an_unknown_campaign_renders_not_found() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");

    let response = app
        .get_message(&Uuid::new_v4().to_string(), &subscriber.to_string())
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn a_malformed_identifier_is_indistinguishable_from_an_unknown_one() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");

    let unknown = app
        .get_message(&Uuid::new_v4().to_string(), &subscriber.to_string())
        .await;
    let malformed = app.get_message("not-a-uuid", &subscriber.to_string()).await;

    assert_eq!(unknown.status(), malformed.status());
    assert_eq!(
        unknown.text().await.unwrap(),
        malformed.text().await.unwrap()
    );
}
