use crate::helpers::{default_privacy, spawn_app, spawn_app_with_privacy};
use postroom::models::{ListVisibility, OptinMode, SubscriptionStatus};
use uuid::Uuid;

#[tokio::test]
async fn wiping_deletes_the_subscriber_and_orphans_the_events() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");
    let list = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);
    app.store
        .seed_relation(subscriber, list, SubscriptionStatus::Confirmed);
    let campaign = app.store.seed_campaign("launch", "hi", &[list]);

    // Record an engagement event before the wipe.
    app.get_pixel(&campaign.to_string(), &subscriber.to_string())
        .await;
    assert_eq!(app.store.views(), vec![(campaign, Some(subscriber))]);

    let response = app.post_wipe(&subscriber.to_string()).await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Your subscription data has been removed."));

    assert!(app.store.subscriber(subscriber).is_none());
    assert!(app.store.relation_statuses(subscriber).is_empty());
    // The event row survives without its subscriber reference.
    assert_eq!(app.store.views(), vec![(campaign, None)]);
}

#[tokio::test]
async fn wiping_twice_reports_success_both_times() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");

    let first = app.post_wipe(&subscriber.to_string()).await;
    let second = app.post_wipe(&subscriber.to_string()).await;

    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 200);
    assert_eq!(
        first.text().await.unwrap(),
        second.text().await.unwrap()
    );
}

#[tokio::test]
async fn wiping_an_unknown_subscriber_is_indistinguishable_from_success() {
    let app = spawn_app().await;

    let response = app.post_wipe(&Uuid::new_v4().to_string()).await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn the_wipe_is_rejected_when_the_gate_is_closed() {
    let mut privacy = default_privacy();
    privacy.allow_wipe = false;
    let app = spawn_app_with_privacy(privacy).await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");

    let response = app.post_wipe(&subscriber.to_string()).await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(app.store.subscriber(subscriber).is_some());
}
