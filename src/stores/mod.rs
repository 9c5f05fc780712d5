mod postgres;

pub use postgres::PgStore;

use crate::domain::NewSubscriber;
use crate::models::{
    Campaign, CreatedSubscriber, EngagementSummary, List, ListRelation, ListVisibility, Subscriber,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Failures a store can report. Anything that is not "the record does not
/// exist" is an opaque backend failure; the caller decides whether it is
/// fatal or swallowed.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Backend(other.into()),
        }
    }
}

/// Subscriber profile and consent-state persistence.
///
/// Every state transition is a single atomic store operation (one statement
/// or one transaction); concurrency correctness lives here, not in the
/// request handlers.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn subscriber_by_uuid(&self, uuid: Uuid) -> Result<Subscriber, StoreError>;

    /// Every list relation of the subscriber, regardless of status.
    async fn subscriber_lists(&self, subscriber_uuid: Uuid) -> Result<Vec<ListRelation>, StoreError>;

    /// Unconfirmed relations, optionally narrowed to the given lists. An
    /// empty filter means "all lists".
    async fn unconfirmed_lists(
        &self,
        subscriber_uuid: Uuid,
        list_uuids: &[Uuid],
    ) -> Result<Vec<ListRelation>, StoreError>;

    /// Moves the matching unconfirmed relations to confirmed as one unit of
    /// work and reports how many moved. Already-confirmed relations are
    /// untouched.
    async fn confirm_opt_in(
        &self,
        subscriber_uuid: Uuid,
        list_uuids: &[Uuid],
    ) -> Result<u64, StoreError>;

    /// Unsubscribes the relations tied to the lists the campaign targeted.
    /// With `blocklist`, additionally flags the subscriber and unsubscribes
    /// every relation, suppressing all future sends.
    async fn unsubscribe_by_campaign(
        &self,
        subscriber_uuid: Uuid,
        campaign_uuid: Uuid,
        blocklist: bool,
    ) -> Result<(), StoreError>;

    async fn create_subscriber(
        &self,
        subscriber: &NewSubscriber,
        list_uuids: &[Uuid],
    ) -> Result<CreatedSubscriber, StoreError>;

    /// Deletes the subscriber and its relations. Interaction events are left
    /// behind with a dangling subscriber reference.
    async fn delete_subscriber(&self, subscriber_uuid: Uuid) -> Result<(), StoreError>;

    async fn campaign_view_summary(
        &self,
        subscriber_uuid: Uuid,
    ) -> Result<Vec<EngagementSummary>, StoreError>;

    async fn link_click_summary(
        &self,
        subscriber_uuid: Uuid,
    ) -> Result<Vec<EngagementSummary>, StoreError>;
}

/// Campaign lookup and engagement-event recording.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn campaign_by_uuid(&self, uuid: Uuid) -> Result<Campaign, StoreError>;

    /// Destination URL for a tracked link, without recording anything.
    async fn resolve_link(&self, link_uuid: Uuid) -> Result<String, StoreError>;

    /// Records a click and returns the destination URL. `subscriber_uuid` is
    /// `None` when the event is recorded anonymously.
    async fn register_link_click(
        &self,
        link_uuid: Uuid,
        campaign_uuid: Uuid,
        subscriber_uuid: Option<Uuid>,
    ) -> Result<String, StoreError>;

    /// Records a message-open event. Append-only.
    async fn register_view(
        &self,
        campaign_uuid: Uuid,
        subscriber_uuid: Option<Uuid>,
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ListStore: Send + Sync {
    /// `None` returns every list, `Some(visibility)` filters.
    async fn lists(&self, visibility: Option<ListVisibility>) -> Result<Vec<List>, StoreError>;
}

/// The store handles the request handlers work against, injected once at
/// startup.
#[derive(Clone)]
pub struct AppStores {
    pub subscribers: Arc<dyn SubscriberStore>,
    pub campaigns: Arc<dyn CampaignStore>,
    pub lists: Arc<dyn ListStore>,
}
