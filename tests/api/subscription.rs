use crate::helpers::{default_privacy, spawn_app, spawn_app_with_privacy};
use postroom::models::{ListVisibility, OptinMode, SubscriptionStatus};

#[tokio::test]
async fn the_subscription_page_offers_the_blocklist_option_when_allowed() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");
    let campaign = app.store.seed_campaign("launch", "hi", &[]);

    let response = app
        .get_subscription_page(&campaign.to_string(), &subscriber.to_string())
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Also unsubscribe me from all future e-mails."));
}

#[tokio::test]
async fn the_blocklist_option_is_hidden_when_the_gate_is_closed() {
    let mut privacy = default_privacy();
    privacy.allow_blocklist = false;
    let app = spawn_app_with_privacy(privacy).await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");
    let campaign = app.store.seed_campaign("launch", "hi", &[]);

    let response = app
        .get_subscription_page(&campaign.to_string(), &subscriber.to_string())
        .await;

    let body = response.text().await.unwrap();
    assert!(!body.contains("Also unsubscribe me from all future e-mails."));
}

#[tokio::test]
async fn unsubscribing_only_touches_the_lists_the_campaign_targeted() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");
    let targeted = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);
    let untouched = app
        .store
        .seed_list("Product news", ListVisibility::Public, OptinMode::Single);
    app.store
        .seed_relation(subscriber, targeted, SubscriptionStatus::Confirmed);
    app.store
        .seed_relation(subscriber, untouched, SubscriptionStatus::Confirmed);
    let campaign = app.store.seed_campaign("launch", "hi", &[targeted]);

    let response = app
        .post_unsubscribe(&campaign.to_string(), &subscriber.to_string(), "")
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let statuses = app.store.relation_statuses(subscriber);
    assert!(
        statuses
            .iter()
            .any(|(l, s)| *l == targeted && *s == SubscriptionStatus::Unsubscribed)
    );
    assert!(
        statuses
            .iter()
            .any(|(l, s)| *l == untouched && *s == SubscriptionStatus::Confirmed)
    );
}

#[tokio::test]
async fn unsubscribing_twice_succeeds_both_times() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");
    let list = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);
    app.store
        .seed_relation(subscriber, list, SubscriptionStatus::Confirmed);
    let campaign = app.store.seed_campaign("launch", "hi", &[list]);

    let first = app
        .post_unsubscribe(&campaign.to_string(), &subscriber.to_string(), "")
        .await;
    let second = app
        .post_unsubscribe(&campaign.to_string(), &subscriber.to_string(), "")
        .await;

    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 200);
}

#[tokio::test]
async fn a_blocklist_request_unsubscribes_everything() {
    let app = spawn_app().await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");
    let targeted = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);
    let other = app
        .store
        .seed_list("Product news", ListVisibility::Public, OptinMode::Single);
    app.store
        .seed_relation(subscriber, targeted, SubscriptionStatus::Confirmed);
    app.store
        .seed_relation(subscriber, other, SubscriptionStatus::Confirmed);
    let campaign = app.store.seed_campaign("launch", "hi", &[targeted]);

    let response = app
        .post_unsubscribe(
            &campaign.to_string(),
            &subscriber.to_string(),
            "blocklist=true",
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(app.store.subscriber(subscriber).unwrap().blocklisted);
    assert!(
        app.store
            .relation_statuses(subscriber)
            .iter()
            .all(|(_, s)| *s == SubscriptionStatus::Unsubscribed)
    );
}

#[tokio::test]
async fn the_blocklist_request_is_downgraded_when_the_gate_is_closed() {
    let mut privacy = default_privacy();
    privacy.allow_blocklist = false;
    let app = spawn_app_with_privacy(privacy).await;
    let subscriber = app.store.seed_subscriber("ursula@example.com", "Ursula");
    let list = app
        .store
        .seed_list("Weekly digest", ListVisibility::Public, OptinMode::Single);
    app.store
        .seed_relation(subscriber, list, SubscriptionStatus::Confirmed);
    let campaign = app.store.seed_campaign("launch", "hi", &[list]);

    let response = app
        .post_unsubscribe(
            &campaign.to_string(),
            &subscriber.to_string(),
            "blocklist=true",
        )
        .await;

    // The unsubscribe itself still goes through.
    assert_eq!(response.status().as_u16(), 200);
    assert!(!app.store.subscriber(subscriber).unwrap().blocklisted);
    assert!(
        app.store
            .relation_statuses(subscriber)
            .iter()
            .any(|(l, s)| *l == list && *s == SubscriptionStatus::Unsubscribed)
    );
}

#[tokio::test]
async fn malformed_identifiers_render_not_found() {
    let app = spawn_app().await;

    let page = app.get_subscription_page("not-a-uuid", "also-not").await;
    let post = app.post_unsubscribe("not-a-uuid", "also-not", "").await;

    assert_eq!(page.status().as_u16(), 404);
    assert_eq!(post.status().as_u16(), 404);
}
