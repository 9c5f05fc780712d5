use crate::domain::NewSubscriber;
use crate::models::{
    Campaign, CreatedSubscriber, EngagementSummary, List, ListRelation, ListVisibility, Subscriber,
};
use crate::stores::{CampaignStore, ListStore, StoreError, SubscriberStore};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Production store backed by Postgres. Transitions are single statements
/// or explicit transactions; two concurrent confirmations either both see
/// "already confirmed" or exactly one flips the rows.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberStore for PgStore {
    async fn subscriber_by_uuid(&self, uuid: Uuid) -> Result<Subscriber, StoreError> {
        let row = sqlx::query(
            r#"
              SELECT id, uuid, email, name, blocklisted, created_at
              FROM subscribers
              WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(row.try_into().map_err(sqlx::Error::from)?)
    }

    async fn subscriber_lists(
        &self,
        subscriber_uuid: Uuid,
    ) -> Result<Vec<ListRelation>, StoreError> {
        let rows = sqlx::query(
            r#"
              SELECT l.uuid AS list_uuid, l.name AS list_name, l.visibility,
                     sl.status, sl.created_at
              FROM subscriber_lists sl
              JOIN subscribers s ON s.id = sl.subscriber_id
              JOIN lists l ON l.id = sl.list_id
              WHERE s.uuid = $1
              ORDER BY l.name
            "#,
        )
        .bind(subscriber_uuid)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.try_into().map_err(|e: sqlx::Error| e.into()))
            .collect()
    }

    async fn unconfirmed_lists(
        &self,
        subscriber_uuid: Uuid,
        list_uuids: &[Uuid],
    ) -> Result<Vec<ListRelation>, StoreError> {
        let rows = sqlx::query(
            r#"
              SELECT l.uuid AS list_uuid, l.name AS list_name, l.visibility,
                     sl.status, sl.created_at
              FROM subscriber_lists sl
              JOIN subscribers s ON s.id = sl.subscriber_id
              JOIN lists l ON l.id = sl.list_id
              WHERE s.uuid = $1
                AND sl.status = 'unconfirmed'
                AND (cardinality($2::uuid[]) = 0 OR l.uuid = ANY($2))
              ORDER BY l.name
            "#,
        )
        .bind(subscriber_uuid)
        .bind(list_uuids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.try_into().map_err(|e: sqlx::Error| e.into()))
            .collect()
    }

    async fn confirm_opt_in(
        &self,
        subscriber_uuid: Uuid,
        list_uuids: &[Uuid],
    ) -> Result<u64, StoreError> {
        // One statement, so the whole targeted set moves or none of it does.
        let result = sqlx::query(
            r#"
              UPDATE subscriber_lists sl
              SET status = 'confirmed', updated_at = now()
              FROM subscribers s, lists l
              WHERE s.id = sl.subscriber_id
                AND l.id = sl.list_id
                AND s.uuid = $1
                AND sl.status = 'unconfirmed'
                AND (cardinality($2::uuid[]) = 0 OR l.uuid = ANY($2))
            "#,
        )
        .bind(subscriber_uuid)
        .bind(list_uuids.to_vec())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn unsubscribe_by_campaign(
        &self,
        subscriber_uuid: Uuid,
        campaign_uuid: Uuid,
        blocklist: bool,
    ) -> Result<(), StoreError> {
        let mut transaction = self.pool.begin().await.map_err(sqlx::Error::from)?;

        sqlx::query(
            r#"
              UPDATE subscriber_lists sl
              SET status = 'unsubscribed', updated_at = now()
              FROM subscribers s
              WHERE s.id = sl.subscriber_id
                AND s.uuid = $1
                AND sl.list_id IN (
                  SELECT cl.list_id
                  FROM campaign_lists cl
                  JOIN campaigns c ON c.id = cl.campaign_id
                  WHERE c.uuid = $2
                )
            "#,
        )
        .bind(subscriber_uuid)
        .bind(campaign_uuid)
        .execute(&mut *transaction)
        .await?;

        if blocklist {
            sqlx::query(
                r#"
                  UPDATE subscribers
                  SET blocklisted = true, updated_at = now()
                  WHERE uuid = $1
                "#,
            )
            .bind(subscriber_uuid)
            .execute(&mut *transaction)
            .await?;

            // Blocklisting suppresses sends platform-wide, not just for the
            // lists this campaign targeted.
            sqlx::query(
                r#"
                  UPDATE subscriber_lists sl
                  SET status = 'unsubscribed', updated_at = now()
                  FROM subscribers s
                  WHERE s.id = sl.subscriber_id AND s.uuid = $1
                "#,
            )
            .bind(subscriber_uuid)
            .execute(&mut *transaction)
            .await?;
        }

        transaction.commit().await.map_err(sqlx::Error::from)?;
        Ok(())
    }

    async fn create_subscriber(
        &self,
        subscriber: &NewSubscriber,
        list_uuids: &[Uuid],
    ) -> Result<CreatedSubscriber, StoreError> {
        let mut transaction = self.pool.begin().await.map_err(sqlx::Error::from)?;
        let uuid = Uuid::new_v4();

        let row = sqlx::query(
            r#"
              INSERT INTO subscribers (uuid, email, name, blocklisted, created_at, updated_at)
              VALUES ($1, $2, $3, false, now(), now())
              ON CONFLICT (email)
              DO UPDATE SET name = EXCLUDED.name, updated_at = now()
              RETURNING id, uuid
            "#,
        )
        .bind(uuid)
        .bind(subscriber.email.as_ref())
        .bind(subscriber.name.as_ref())
        .fetch_one(&mut *transaction)
        .await?;
        let subscriber_id: i64 = row.try_get("id").map_err(sqlx::Error::from)?;
        let subscriber_uuid: Uuid = row.try_get("uuid").map_err(sqlx::Error::from)?;

        sqlx::query(
            r#"
              INSERT INTO subscriber_lists (subscriber_id, list_id, status, created_at, updated_at)
              SELECT $1, l.id,
                     CASE WHEN l.optin = 'double' THEN 'unconfirmed' ELSE 'confirmed' END,
                     now(), now()
              FROM lists l
              WHERE l.uuid = ANY($2)
              ON CONFLICT (subscriber_id, list_id) DO NOTHING
            "#,
        )
        .bind(subscriber_id)
        .bind(list_uuids.to_vec())
        .execute(&mut *transaction)
        .await?;

        let row = sqlx::query(
            r#"
              SELECT EXISTS(
                SELECT 1 FROM lists WHERE uuid = ANY($1) AND optin = 'double'
              ) AS has_pending_optin
            "#,
        )
        .bind(list_uuids.to_vec())
        .fetch_one(&mut *transaction)
        .await?;
        let has_pending_optin: bool = row
            .try_get("has_pending_optin")
            .map_err(sqlx::Error::from)?;

        transaction.commit().await.map_err(sqlx::Error::from)?;

        Ok(CreatedSubscriber {
            uuid: subscriber_uuid,
            has_pending_optin,
        })
    }

    async fn delete_subscriber(&self, subscriber_uuid: Uuid) -> Result<(), StoreError> {
        // List relations cascade; view and click rows keep a dangling
        // subscriber reference on purpose (see migrations).
        let result = sqlx::query("DELETE FROM subscribers WHERE uuid = $1")
            .bind(subscriber_uuid)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn campaign_view_summary(
        &self,
        subscriber_uuid: Uuid,
    ) -> Result<Vec<EngagementSummary>, StoreError> {
        let rows = sqlx::query(
            r#"
              SELECT c.name AS campaign, COUNT(*) AS count, MAX(v.created_at) AS last_seen
              FROM campaign_views v
              JOIN campaigns c ON c.id = v.campaign_id
              JOIN subscribers s ON s.id = v.subscriber_id
              WHERE s.uuid = $1
              GROUP BY c.name
              ORDER BY last_seen DESC
            "#,
        )
        .bind(subscriber_uuid)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.try_into().map_err(|e: sqlx::Error| e.into()))
            .collect()
    }

    async fn link_click_summary(
        &self,
        subscriber_uuid: Uuid,
    ) -> Result<Vec<EngagementSummary>, StoreError> {
        let rows = sqlx::query(
            r#"
              SELECT c.name AS campaign, COUNT(*) AS count, MAX(k.created_at) AS last_seen
              FROM link_clicks k
              JOIN campaigns c ON c.id = k.campaign_id
              JOIN subscribers s ON s.id = k.subscriber_id
              WHERE s.uuid = $1
              GROUP BY c.name
              ORDER BY last_seen DESC
            "#,
        )
        .bind(subscriber_uuid)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.try_into().map_err(|e: sqlx::Error| e.into()))
            .collect()
    }
}

#[async_trait]
impl CampaignStore for PgStore {
    async fn campaign_by_uuid(&self, uuid: Uuid) -> Result<Campaign, StoreError> {
        let row = sqlx::query(
            r#"
              SELECT id, uuid, name, subject, body, created_at
              FROM campaigns
              WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(row.try_into().map_err(sqlx::Error::from)?)
    }

    async fn resolve_link(&self, link_uuid: Uuid) -> Result<String, StoreError> {
        let row = sqlx::query("SELECT url FROM links WHERE uuid = $1")
            .bind(link_uuid)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        Ok(row.try_get("url").map_err(sqlx::Error::from)?)
    }

    async fn register_link_click(
        &self,
        link_uuid: Uuid,
        campaign_uuid: Uuid,
        subscriber_uuid: Option<Uuid>,
    ) -> Result<String, StoreError> {
        let url = self.resolve_link(link_uuid).await?;

        sqlx::query(
            r#"
              INSERT INTO link_clicks (link_id, campaign_id, subscriber_id, created_at)
              VALUES (
                (SELECT id FROM links WHERE uuid = $1),
                (SELECT id FROM campaigns WHERE uuid = $2),
                (SELECT id FROM subscribers WHERE uuid = $3),
                now()
              )
            "#,
        )
        .bind(link_uuid)
        .bind(campaign_uuid)
        .bind(subscriber_uuid)
        .execute(&self.pool)
        .await?;

        Ok(url)
    }

    async fn register_view(
        &self,
        campaign_uuid: Uuid,
        subscriber_uuid: Option<Uuid>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
              INSERT INTO campaign_views (campaign_id, subscriber_id, created_at)
              VALUES (
                (SELECT id FROM campaigns WHERE uuid = $1),
                (SELECT id FROM subscribers WHERE uuid = $2),
                now()
              )
            "#,
        )
        .bind(campaign_uuid)
        .bind(subscriber_uuid)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ListStore for PgStore {
    async fn lists(&self, visibility: Option<ListVisibility>) -> Result<Vec<List>, StoreError> {
        let rows = sqlx::query(
            r#"
              SELECT id, uuid, name, visibility, optin, created_at
              FROM lists
              WHERE $1::text IS NULL OR visibility = $1
              ORDER BY name
            "#,
        )
        .bind(visibility.map(|v| v.as_ref().to_string()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.try_into().map_err(|e: sqlx::Error| e.into()))
            .collect()
    }
}
