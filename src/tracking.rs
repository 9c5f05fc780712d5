//! Campaign interaction tracking: link clicks and message opens.
//!
//! Clicks and views are attributed to (campaign, subscriber) pairs, or
//! recorded anonymously when individual tracking is disabled. A click must
//! land somewhere, so its link resolution failure is fatal; a pixel load
//! has a fixed response, so view recording is fire-and-forget.

use crate::domain::PublicId;
use crate::privacy::PrivacyOptions;
use crate::stores::CampaignStore;
use crate::utils::PublicError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::LazyLock;

/// 1x1 transparent PNG served for every open-tracking request.
const PIXEL_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

pub static TRACKING_PIXEL: LazyLock<Vec<u8>> =
    LazyLock::new(|| STANDARD.decode(PIXEL_B64).expect("embedded pixel is valid base64"));

/// Drops the subscriber attribution when individual tracking is off or the
/// identifier is the preview sentinel.
fn attributable(privacy: &PrivacyOptions, subscriber: Option<PublicId>) -> Option<PublicId> {
    if !privacy.individual_tracking {
        return None;
    }
    subscriber.filter(|s| !s.is_preview())
}

/// Resolves a tracked link and records the click.
///
/// Returns the destination URL; there is no fallback redirect, so a link
/// that cannot be resolved is a hard error. Preview hits resolve the URL
/// without writing an event.
#[tracing::instrument(name = "Record link click", skip(store, privacy))]
pub async fn record_click(
    store: &dyn CampaignStore,
    privacy: &PrivacyOptions,
    link: PublicId,
    campaign: PublicId,
    subscriber: Option<PublicId>,
) -> Result<String, PublicError> {
    if link.is_preview() {
        // There is no destination behind the sentinel.
        return Err(PublicError::NotFound);
    }

    if campaign.is_preview() || subscriber.is_some_and(|s| s.is_preview()) {
        let url = store.resolve_link(link.as_uuid()).await?;
        return Ok(url);
    }

    let subscriber = attributable(privacy, subscriber);
    let url = store
        .register_link_click(
            link.as_uuid(),
            campaign.as_uuid(),
            subscriber.map(|s| s.as_uuid()),
        )
        .await?;

    Ok(url)
}

/// Records a message-open event, best effort.
///
/// Never fails: store errors are logged and swallowed so the caller can
/// return the fixed pixel unconditionally.
#[tracing::instrument(name = "Record campaign view", skip(store, privacy))]
pub async fn record_view(
    store: &dyn CampaignStore,
    privacy: &PrivacyOptions,
    campaign: PublicId,
    subscriber: Option<PublicId>,
) {
    if campaign.is_preview() || subscriber.is_some_and(|s| s.is_preview()) {
        return;
    }

    let subscriber = attributable(privacy, subscriber);
    if let Err(e) = store
        .register_view(campaign.as_uuid(), subscriber.map(|s| s.as_uuid()))
        .await
    {
        tracing::error!(
            error = %e,
            campaign = %campaign,
            "failed to register campaign view"
        );
    }
}
