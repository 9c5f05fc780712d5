use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListVisibility {
    Public,
    Private,
}

impl ListVisibility {
    pub fn parse(value: &str) -> Result<ListVisibility, String> {
        match value {
            "public" => Ok(ListVisibility::Public),
            "private" => Ok(ListVisibility::Private),
            other => Err(format!("{} is not a valid list visibility.", other)),
        }
    }
}

impl AsRef<str> for ListVisibility {
    fn as_ref(&self) -> &str {
        match self {
            ListVisibility::Public => "public",
            ListVisibility::Private => "private",
        }
    }
}

/// Whether joining the list takes effect immediately or requires the
/// double opt-in confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptinMode {
    Single,
    Double,
}

impl OptinMode {
    pub fn parse(value: &str) -> Result<OptinMode, String> {
        match value {
            "single" => Ok(OptinMode::Single),
            "double" => Ok(OptinMode::Double),
            other => Err(format!("{} is not a valid opt-in mode.", other)),
        }
    }
}

impl AsRef<str> for OptinMode {
    fn as_ref(&self) -> &str {
        match self {
            OptinMode::Single => "single",
            OptinMode::Double => "double",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct List {
    #[serde(skip_serializing)]
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub visibility: ListVisibility,
    pub optin: OptinMode,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PgRow> for List {
    type Error = sqlx::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        let visibility: String = row.try_get("visibility")?;
        let optin: String = row.try_get("optin")?;

        Ok(Self {
            id: row.try_get("id")?,
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            visibility: ListVisibility::parse(&visibility)
                .map_err(|e| sqlx::Error::Decode(e.into()))?,
            optin: OptinMode::parse(&optin).map_err(|e| sqlx::Error::Decode(e.into()))?,
            created_at: row.try_get("created_at")?,
        })
    }
}
