//! The subscriber consent state machine.
//!
//! Per (subscriber, list) status moves `unconfirmed -> confirmed` and
//! `* -> unsubscribed`; the subscriber-level blocklist flag is orthogonal.
//! Every transition is delegated to the store as one atomic operation, so
//! repeated or concurrent invocations cannot corrupt state.

use crate::domain::PublicId;
use crate::models::ListRelation;
use crate::privacy::PrivacyOptions;
use crate::stores::{StoreError, SubscriberStore};
use crate::utils::PublicError;

#[derive(Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// How many relations moved to confirmed.
    Confirmed(u64),
    /// Nothing was pending for the targeted lists: already confirmed,
    /// already unsubscribed, or the wrong list set. A repeat confirmation
    /// lands here, not in an error.
    NoPendingConfirmation,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnsubscribeOutcome {
    /// Whether the subscriber ended up blocklisted. False when the request
    /// asked for it but the privacy configuration forbids it.
    pub blocklisted: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum WipeOutcome {
    Wiped,
    /// The subscriber was already gone. Terminal and benign: a wipe link
    /// clicked twice must not alarm anyone.
    AlreadyGone,
}

/// Unconfirmed relations for the opt-in page. An empty `lists` filter
/// targets every list with a pending confirmation.
#[tracing::instrument(name = "Fetch pending confirmations", skip(store))]
pub async fn pending_confirmations(
    store: &dyn SubscriberStore,
    subscriber: PublicId,
    lists: &[PublicId],
) -> Result<Vec<ListRelation>, PublicError> {
    let list_uuids: Vec<_> = lists.iter().map(|l| l.as_uuid()).collect();
    let relations = store
        .unconfirmed_lists(subscriber.as_uuid(), &list_uuids)
        .await?;
    Ok(relations)
}

/// Confirms the double opt-in for the targeted lists.
///
/// The store moves the whole matched set in one unit of work; a zero-row
/// result means there was nothing to confirm.
#[tracing::instrument(name = "Confirm opt-in", skip(store))]
pub async fn confirm_opt_in(
    store: &dyn SubscriberStore,
    subscriber: PublicId,
    lists: &[PublicId],
) -> Result<ConfirmOutcome, PublicError> {
    let list_uuids: Vec<_> = lists.iter().map(|l| l.as_uuid()).collect();
    let moved = store
        .confirm_opt_in(subscriber.as_uuid(), &list_uuids)
        .await?;

    if moved == 0 {
        Ok(ConfirmOutcome::NoPendingConfirmation)
    } else {
        Ok(ConfirmOutcome::Confirmed(moved))
    }
}

/// Unsubscribes the subscriber from the lists the campaign was sent to.
///
/// A blocklist request is silently downgraded when the gate is closed;
/// unsubscription itself must still go through. Idempotent: repeating the
/// call is a no-op success.
#[tracing::instrument(name = "Unsubscribe by campaign", skip(store, privacy))]
pub async fn unsubscribe(
    store: &dyn SubscriberStore,
    privacy: &PrivacyOptions,
    subscriber: PublicId,
    campaign: PublicId,
    blocklist_requested: bool,
) -> Result<UnsubscribeOutcome, PublicError> {
    let blocklist = blocklist_requested && privacy.allow_blocklist;

    store
        .unsubscribe_by_campaign(subscriber.as_uuid(), campaign.as_uuid(), blocklist)
        .await?;

    Ok(UnsubscribeOutcome {
        blocklisted: blocklist,
    })
}

/// Deletes the subscriber's profile and list relations. Interaction events
/// are left orphaned by design; the wipe is not reversible.
#[tracing::instrument(name = "Wipe subscriber", skip(store, privacy))]
pub async fn wipe(
    store: &dyn SubscriberStore,
    privacy: &PrivacyOptions,
    subscriber: PublicId,
) -> Result<WipeOutcome, PublicError> {
    if !privacy.allow_wipe {
        return Err(PublicError::FeatureDisabled);
    }

    match store.delete_subscriber(subscriber.as_uuid()).await {
        Ok(()) => Ok(WipeOutcome::Wiped),
        Err(StoreError::NotFound) => Ok(WipeOutcome::AlreadyGone),
        Err(e) => Err(e.into()),
    }
}
