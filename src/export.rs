//! Self-service data export.
//!
//! Assembles the subscriber's profile, list subscriptions and engagement
//! history into one JSON document, filtered by the configured exportable
//! sections, and e-mails it to the subscriber as an attachment. The HTTP
//! response only ever confirms dispatch.

use crate::domain::PublicId;
use crate::email_client::{Attachment, EmailClient, OutboundMessage};
use crate::models::{EngagementSummary, ListRelation, ListVisibility, SubscriptionStatus};
use crate::privacy::PrivacyOptions;
use crate::stores::SubscriberStore;
use crate::utils::PublicError;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stand-in for list names the subscriber is not meant to see.
const PRIVATE_LIST_PLACEHOLDER: &str = "Private list";

const ATTACHMENT_NAME: &str = "data.json";

#[derive(Debug, Serialize)]
pub struct ExportProfile {
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExportSubscription {
    pub list: String,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExportDocument {
    /// Delivery address; not part of the exported payload itself.
    #[serde(skip_serializing)]
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ExportProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Vec<ExportSubscription>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_views: Option<Vec<EngagementSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_clicks: Option<Vec<EngagementSummary>>,
}

fn mask_subscription(relation: ListRelation) -> ExportSubscription {
    let list = match relation.visibility {
        ListVisibility::Public => relation.list_name,
        ListVisibility::Private => PRIVATE_LIST_PLACEHOLDER.to_string(),
    };

    ExportSubscription {
        list,
        status: relation.status,
        created_at: relation.created_at,
    }
}

/// Builds the export document for a subscriber, honoring the exportable
/// allow-list. The subscriber must exist; the gate must already be open.
#[tracing::instrument(name = "Assemble subscriber export", skip(store, privacy))]
pub async fn assemble_export(
    store: &dyn SubscriberStore,
    privacy: &PrivacyOptions,
    subscriber: PublicId,
) -> Result<ExportDocument, PublicError> {
    let profile = store.subscriber_by_uuid(subscriber.as_uuid()).await?;
    let recipient = profile.email.clone();

    let subscriptions = if privacy.exports("subscriptions") {
        let relations = store.subscriber_lists(subscriber.as_uuid()).await?;
        Some(relations.into_iter().map(mask_subscription).collect())
    } else {
        None
    };

    let campaign_views = if privacy.exports("campaign_views") {
        Some(store.campaign_view_summary(subscriber.as_uuid()).await?)
    } else {
        None
    };

    let link_clicks = if privacy.exports("link_clicks") {
        Some(store.link_click_summary(subscriber.as_uuid()).await?)
    } else {
        None
    };

    let profile = privacy.exports("profile").then(|| ExportProfile {
        uuid: profile.uuid,
        email: profile.email,
        name: profile.name,
        created_at: profile.created_at,
    });

    Ok(ExportDocument {
        recipient,
        profile,
        subscriptions,
        campaign_views,
        link_clicks,
    })
}

/// Assembles the document and pushes it to the subscriber as a JSON
/// attachment. Delivery happens out of band; success here only means the
/// message was handed to the transport.
#[tracing::instrument(name = "Dispatch subscriber export", skip(store, privacy, email_client))]
pub async fn dispatch_export(
    store: &dyn SubscriberStore,
    privacy: &PrivacyOptions,
    email_client: &EmailClient,
    subscriber: PublicId,
) -> Result<(), PublicError> {
    if !privacy.allow_export {
        return Err(PublicError::FeatureDisabled);
    }

    let document = assemble_export(store, privacy, subscriber).await?;
    let payload =
        serde_json::to_vec_pretty(&document).context("Failed to serialize export document.")?;

    email_client
        .push(OutboundMessage {
            to: document.recipient.clone(),
            subject: "Your data".to_string(),
            html_body: "A copy of the data stored about you is attached.".to_string(),
            attachments: vec![Attachment {
                name: ATTACHMENT_NAME.to_string(),
                content: payload,
                content_type: "application/json".to_string(),
            }],
        })
        .await
        .context("Failed to dispatch export e-mail.")?;

    Ok(())
}
