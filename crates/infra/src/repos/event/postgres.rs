use super::IEventRepo;
use anyhow::anyhow;
use chrono::{DateTime, TimeZone, Utc};
use reminder_service_domain::{CalendarEvent, ID};
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};

/// Reads and deletes rows of the `events` table owned by the calendar api
pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug)]
struct EventRaw {
    id: i64,
    user_id: i64,
    event: String,
    date: DateTime<Utc>,
    mail: String,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for EventRaw {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            event: row.try_get("event")?,
            date: row.try_get("date")?,
            mail: row.try_get("mail")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl Into<CalendarEvent> for EventRaw {
    fn into(self) -> CalendarEvent {
        CalendarEvent {
            id: self.id.into(),
            user_id: self.user_id,
            description: self.event,
            occurs_at: self.date.timestamp_millis(),
            destination: self.mail,
            created: self.created_at.timestamp_millis(),
        }
    }
}

fn to_datetime(ts: i64) -> anyhow::Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ts)
        .single()
        .ok_or_else(|| anyhow!("Timestamp: {} is out of range", ts))
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &CalendarEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events(id, user_id, event, date, mail, created_at)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(e.id.inner())
        .bind(e.user_id)
        .bind(&e.description)
        .bind(to_datetime(e.occurs_at)?)
        .bind(&e.destination)
        .bind(to_datetime(e.created)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_expired(&self, now: i64) -> anyhow::Result<Vec<CalendarEvent>> {
        let events = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT id, user_id, event, date, mail, created_at FROM events
            WHERE date <= $1
            "#,
        )
        .bind(to_datetime(now)?)
        .fetch_all(&self.pool)
        .await?;

        Ok(events.into_iter().map(|e| e.into()).collect())
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<ID> {
        let deleted = sqlx::query_scalar::<_, i64>(
            r#"
            DELETE FROM events
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(event_id.inner())
        .fetch_optional(&self.pool)
        .await?;

        deleted
            .map(ID::from)
            .ok_or_else(|| anyhow!("Event with id: {} was not found", event_id))
    }
}
