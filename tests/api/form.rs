use crate::helpers::{default_privacy, spawn_app, spawn_app_with_privacy};
use postroom::models::{ListVisibility, OptinMode, SubscriptionStatus};
use uuid::Uuid;

#[tokio::test]
async fn the_form_only_offers_public_lists() {
    let app = spawn_app().await;
    app.store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);
    app.store
        .seed_list("Staff announcements", ListVisibility::Private, OptinMode::Single);

    let response = app.get_subscription_form().await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Weekly digest"));
    assert!(!body.contains("Staff announcements"));
}

#[tokio::test]
async fn the_form_is_rejected_when_the_page_is_not_public() {
    let mut privacy = default_privacy();
    privacy.public_subscription_page = false;
    let app = spawn_app_with_privacy(privacy).await;

    let page = app.get_subscription_form().await;
    let post = app.post_subscription_form("email=a%40example.com").await;

    assert_eq!(page.status().as_u16(), 400);
    assert_eq!(post.status().as_u16(), 400);
}

#[tokio::test]
async fn without_public_lists_the_page_says_so() {
    let app = spawn_app().await;
    app.store
        .seed_list("Staff announcements", ListVisibility::Private, OptinMode::Single);

    let response = app.get_subscription_form().await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("There are no lists available for subscription."));
}

#[tokio::test]
async fn subscribing_to_a_single_optin_list_completes_immediately() {
    let app = spawn_app().await;
    let list = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);

    let response = app
        .post_subscription_form(&format!(
            "email=ursula%40example.com&name=Ursula&l={}",
            list
        ))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("You have been subscribed successfully."));

    let subscriber = app.store.subscriber_by_email("ursula@example.com").unwrap();
    assert_eq!(subscriber.name, "Ursula");
    assert_eq!(
        app.store.relation_statuses(subscriber.uuid),
        vec![(list, SubscriptionStatus::Confirmed)]
    );
}

#[tokio::test]
async fn subscribing_to_a_double_optin_list_reports_the_pending_confirmation() {
    let app = spawn_app().await;
    let list = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Double);

    let response = app
        .post_subscription_form(&format!("email=ursula%40example.com&l={}", list))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("An e-mail has been sent to you to confirm your subscription."));

    let subscriber = app.store.subscriber_by_email("ursula@example.com").unwrap();
    assert_eq!(
        app.store.relation_statuses(subscriber.uuid),
        vec![(list, SubscriptionStatus::Unconfirmed)]
    );
}

#[tokio::test]
async fn a_missing_name_falls_back_to_the_email_local_part() {
    let app = spawn_app().await;
    let list = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);

    let response = app
        .post_subscription_form(&format!("email=ursula%40example.com&l={}", list))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let subscriber = app.store.subscriber_by_email("ursula@example.com").unwrap();
    assert_eq!(subscriber.name, "ursula");
}

#[tokio::test]
async fn a_filled_honeypot_field_creates_nothing() {
    let app = spawn_app().await;
    let list = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);

    let response = app
        .post_subscription_form(&format!(
            "email=bot%40example.com&nonce=gotcha&l={}",
            list
        ))
        .await;

    // The bot still sees a 200 so there is nothing to learn from it.
    assert_eq!(response.status().as_u16(), 200);
    assert!(app.store.subscriber_by_email("bot@example.com").is_none());
}

#[tokio::test]
async fn subscribing_without_lists_renders_not_found() {
    let app = spawn_app().await;

    let response = app
        .post_subscription_form("email=ursula%40example.com")
        .await;

    assert_eq!(response.status().as_u16(), 404);
    assert!(app.store.subscriber_by_email("ursula@example.com").is_none());
}

#[tokio::test]
async fn an_invalid_email_renders_not_found() {
    let app = spawn_app().await;
    let list = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);

    let response = app
        .post_subscription_form(&format!("email=not-an-address&l={}", list))
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn subscribing_twice_reuses_the_existing_subscriber() {
    let app = spawn_app().await;
    let list = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);
    let body = format!("email=ursula%40example.com&name=Ursula&l={}", list);

    let first = app.post_subscription_form(&body).await;
    let second = app.post_subscription_form(&body).await;

    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 200);

    let subscriber = app.store.subscriber_by_email("ursula@example.com").unwrap();
    assert_eq!(
        app.store.relation_statuses(subscriber.uuid),
        vec![(list, SubscriptionStatus::Confirmed)]
    );
}

#[tokio::test]
async fn the_form_page_carries_the_honeypot_field() {
    let app = spawn_app().await;
    app.store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);

    let body = app.get_subscription_form().await.text().await.unwrap();
    assert!(body.contains(r#"name="nonce""#));
}

#[tokio::test]
async fn unknown_selected_lists_are_ignored_rather_than_guessable() {
    let app = spawn_app().await;
    app.store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);

    let response = app
        .post_subscription_form(&format!(
            "email=ursula%40example.com&l={}",
            Uuid::new_v4()
        ))
        .await;

    // The identifier is well-formed, so the signup goes through; it simply
    // subscribes to nothing.
    assert_eq!(response.status().as_u16(), 200);
    let subscriber = app.store.subscriber_by_email("ursula@example.com").unwrap();
    assert!(app.store.relation_statuses(subscriber.uuid).is_empty());
}
