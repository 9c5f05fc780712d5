use crate::models::Subscriber;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

/// A campaign as seen by the public surface: read-only apart from the
/// view/click side effects recorded against it.
#[derive(Debug, Clone, Serialize)]
pub struct Campaign {
    #[serde(skip_serializing)]
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub subject: String,
    /// Markdown body as composed in the campaign editor.
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PgRow> for Campaign {
    type Error = sqlx::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            subject: row.try_get("subject")?,
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl Campaign {
    /// Produces the HTML a recipient sees on the hosted message view.
    ///
    /// Substitutes the subscriber merge tags and converts the markdown body.
    /// The full template engine lives outside this surface; the hosted view
    /// only needs the compiled body.
    pub fn render_for(&self, subscriber: &Subscriber) -> String {
        let body = self
            .body
            .replace("{{ name }}", &subscriber.name)
            .replace("{{ email }}", &subscriber.email);

        markdown::to_html(&body)
    }
}
