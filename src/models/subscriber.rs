use crate::models::ListVisibility;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

/// Per-list consent status. Confirmation never regresses: the only legal
/// moves are `Unconfirmed -> Confirmed` and `* -> Unsubscribed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Unconfirmed,
    Confirmed,
    Unsubscribed,
}

impl SubscriptionStatus {
    pub fn parse(value: &str) -> Result<SubscriptionStatus, String> {
        match value {
            "unconfirmed" => Ok(SubscriptionStatus::Unconfirmed),
            "confirmed" => Ok(SubscriptionStatus::Confirmed),
            "unsubscribed" => Ok(SubscriptionStatus::Unsubscribed),
            other => Err(format!("{} is not a valid subscription status.", other)),
        }
    }
}

impl AsRef<str> for SubscriptionStatus {
    fn as_ref(&self) -> &str {
        match self {
            SubscriptionStatus::Unconfirmed => "unconfirmed",
            SubscriptionStatus::Confirmed => "confirmed",
            SubscriptionStatus::Unsubscribed => "unsubscribed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Subscriber {
    #[serde(skip_serializing)]
    pub id: i64,
    pub uuid: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub blocklisted: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PgRow> for Subscriber {
    type Error = sqlx::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            uuid: row.try_get("uuid")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            blocklisted: row.try_get("blocklisted")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A subscriber's membership in one list, carried together with the list
/// fields the public pages need.
#[derive(Debug, Clone, Serialize)]
pub struct ListRelation {
    pub list_uuid: Uuid,
    pub list_name: String,
    pub visibility: ListVisibility,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PgRow> for ListRelation {
    type Error = sqlx::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        let visibility: String = row.try_get("visibility")?;
        let status: String = row.try_get("status")?;

        Ok(Self {
            list_uuid: row.try_get("list_uuid")?,
            list_name: row.try_get("list_name")?,
            visibility: ListVisibility::parse(&visibility)
                .map_err(|e| sqlx::Error::Decode(e.into()))?,
            status: SubscriptionStatus::parse(&status)
                .map_err(|e| sqlx::Error::Decode(e.into()))?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Outcome of a public-form signup.
#[derive(Debug, Clone)]
pub struct CreatedSubscriber {
    pub uuid: Uuid,
    pub has_pending_optin: bool,
}

/// Per-campaign engagement counts used by the self-service data export.
#[derive(Debug, Clone, Serialize)]
pub struct EngagementSummary {
    pub campaign: String,
    pub count: i64,
    pub last_seen: DateTime<Utc>,
}

impl TryFrom<PgRow> for EngagementSummary {
    type Error = sqlx::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            campaign: row.try_get("campaign")?,
            count: row.try_get("count")?,
            last_seen: row.try_get("last_seen")?,
        })
    }
}
