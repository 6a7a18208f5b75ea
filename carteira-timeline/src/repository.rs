use async_trait::async_trait;
use carteira_core::config::CoreConfig;
use carteira_core::db::{run_migrations, DatabaseMigrator, DatabasePool};
use carteira_core::errors::{CarteiraError, Result};
use carteira_protocol::timeline::{
    Event, EventPosition, EventStatus, EventUpdate, NewEvent, NewTimeline, Timeline,
    TimelineRecord, TimelineUpdate,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, QueryBuilder};

/// Storage surface consumed by the HTTP handlers. Consistency guarantees
/// are delegated to the backend; this layer does no retries.
#[async_trait]
pub trait TimelineStore: Send + Sync {
    async fn list_timelines(&self) -> Result<Vec<Timeline>>;
    async fn get_timeline(&self, id: &str) -> Result<Timeline>;
    async fn insert_timeline(&self, new: NewTimeline) -> Result<Timeline>;
    async fn update_timeline(&self, id: &str, update: TimelineUpdate) -> Result<Timeline>;
    async fn delete_timeline(&self, id: &str) -> Result<()>;

    async fn list_events(&self, timeline_id: &str) -> Result<Vec<Event>>;
    async fn get_event(&self, id: &str) -> Result<Event>;
    async fn insert_event(&self, new: NewEvent) -> Result<Event>;
    async fn update_event(&self, id: &str, update: EventUpdate) -> Result<Event>;
    async fn delete_event(&self, id: &str) -> Result<()>;

    async fn list_client_records(&self) -> Result<Vec<TimelineRecord>>;
}

/// Database-backed store for timelines and their events.
#[derive(Clone)]
pub struct PostgresStore {
    pool: DatabasePool,
}

impl PostgresStore {
    /// Connects to the database using the supplied configuration and
    /// ensures migrations ran.
    pub async fn from_config(config: &CoreConfig) -> Result<Self> {
        let pool = DatabasePool::connect(config).await?;
        Self::from_pool(pool).await
    }

    /// Builds the store from an existing database pool, migrating the
    /// schema through the shared migrator seam.
    pub async fn from_pool(pool: DatabasePool) -> Result<Self> {
        let store = Self { pool };
        let migrators: Vec<Box<dyn DatabaseMigrator + Send + Sync>> =
            vec![Box::new(store.clone())];
        run_migrations(&store.pool, &migrators).await?;
        Ok(store)
    }
}

#[async_trait]
impl DatabaseMigrator for PostgresStore {
    async fn run_migrations(&self, pool: &DatabasePool) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(pool.inner())
            .await
            .map_err(|err| CarteiraError::StoreError(err.to_string()))
    }
}

#[async_trait]
impl TimelineStore for PostgresStore {
    async fn list_timelines(&self) -> Result<Vec<Timeline>> {
        let rows = sqlx::query_as::<_, TimelineRow>(
            "SELECT id, name, user_id, created_at FROM timelines ORDER BY created_at DESC",
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_timeline(&self, id: &str) -> Result<Timeline> {
        let row = sqlx::query_as::<_, TimelineRow>(
            "SELECT id, name, user_id, created_at FROM timelines WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| CarteiraError::TimelineNotFound(id.to_string()))
    }

    async fn insert_timeline(&self, new: NewTimeline) -> Result<Timeline> {
        let row = sqlx::query_as::<_, TimelineRow>(
            r#"
            INSERT INTO timelines (id, name, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, user_id, created_at
            "#,
        )
        .bind(&new.id)
        .bind(&new.name)
        .bind(&new.user_id)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn update_timeline(&self, id: &str, update: TimelineUpdate) -> Result<Timeline> {
        // An empty patch must leave the row untouched and still answer
        // with the current state.
        if update.is_empty() {
            return self.get_timeline(id).await;
        }

        let row = sqlx::query_as::<_, TimelineRow>(
            r#"
            UPDATE timelines SET name = $2
            WHERE id = $1
            RETURNING id, name, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(update.name.as_deref())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| CarteiraError::TimelineNotFound(id.to_string()))
    }

    async fn delete_timeline(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM timelines WHERE id = $1")
            .bind(id)
            .execute(self.pool.inner())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CarteiraError::TimelineNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_events(&self, timeline_id: &str) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, timeline_id, event_date, description, position,
                   status, icon, icon_size, created_at
            FROM events
            WHERE timeline_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(timeline_id)
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_event(&self, id: &str) -> Result<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, timeline_id, event_date, description, position,
                   status, icon, icon_size, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.inner())
        .await?;

        row.ok_or_else(|| CarteiraError::EventNotFound(id.to_string()))?
            .try_into()
    }

    async fn insert_event(&self, new: NewEvent) -> Result<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (
                id, timeline_id, event_date, description, position,
                status, icon, icon_size
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, timeline_id, event_date, description, position,
                      status, icon, icon_size, created_at
            "#,
        )
        .bind(&new.id)
        .bind(&new.timeline_id)
        .bind(&new.date)
        .bind(&new.description)
        .bind(new.position.as_str())
        .bind(new.status.as_str())
        .bind(&new.icon)
        .bind(&new.icon_size)
        .fetch_one(self.pool.inner())
        .await?;

        row.try_into()
    }

    async fn update_event(&self, id: &str, update: EventUpdate) -> Result<Event> {
        if update.is_empty() {
            return self.get_event(id).await;
        }

        let mut builder = QueryBuilder::new("UPDATE events SET ");
        let mut fields = builder.separated(", ");

        if let Some(date) = &update.date {
            fields.push("event_date = ");
            fields.push_bind_unseparated(date);
        }
        if let Some(description) = &update.description {
            fields.push("description = ");
            fields.push_bind_unseparated(description);
        }
        if let Some(position) = update.position {
            fields.push("position = ");
            fields.push_bind_unseparated(position.as_str());
        }
        if let Some(status) = update.status {
            fields.push("status = ");
            fields.push_bind_unseparated(status.as_str());
        }
        if let Some(icon) = &update.icon {
            fields.push("icon = ");
            fields.push_bind_unseparated(icon);
        }
        if let Some(icon_size) = &update.icon_size {
            fields.push("icon_size = ");
            fields.push_bind_unseparated(icon_size);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(
            " RETURNING id, timeline_id, event_date, description, position, \
             status, icon, icon_size, created_at",
        );

        let row = builder
            .build_query_as::<EventRow>()
            .fetch_optional(self.pool.inner())
            .await?;

        row.ok_or_else(|| CarteiraError::EventNotFound(id.to_string()))?
            .try_into()
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.pool.inner())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CarteiraError::EventNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_client_records(&self) -> Result<Vec<TimelineRecord>> {
        let rows = sqlx::query_as::<_, ClientTimelineRow>(
            r#"
            SELECT id, client_id, client_name, is_active,
                   created_at, updated_at, attributes
            FROM client_timelines
            ORDER BY created_at
            "#,
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(FromRow)]
struct TimelineRow {
    id: String,
    name: String,
    user_id: String,
    created_at: DateTime<Utc>,
}

impl From<TimelineRow> for Timeline {
    fn from(row: TimelineRow) -> Self {
        Timeline {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct EventRow {
    id: String,
    timeline_id: String,
    event_date: String,
    description: Option<String>,
    position: String,
    status: String,
    icon: String,
    icon_size: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = CarteiraError;

    fn try_from(row: EventRow) -> Result<Self> {
        let position = EventPosition::parse(&row.position).ok_or_else(|| {
            CarteiraError::StoreError(format!("posição desconhecida: {}", row.position))
        })?;
        let status = EventStatus::parse(&row.status).ok_or_else(|| {
            CarteiraError::StoreError(format!("status desconhecido: {}", row.status))
        })?;

        Ok(Event {
            id: row.id,
            timeline_id: row.timeline_id,
            date: row.event_date,
            description: row.description,
            position,
            status,
            icon: row.icon,
            icon_size: row.icon_size,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct ClientTimelineRow {
    id: String,
    client_id: String,
    client_name: String,
    is_active: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    attributes: Value,
}

impl From<ClientTimelineRow> for TimelineRecord {
    fn from(row: ClientTimelineRow) -> Self {
        let extra = match row.attributes {
            Value::Object(map) => map,
            _ => Default::default(),
        };

        TimelineRecord {
            id: row.id,
            client_id: row.client_id,
            client_name: row.client_name,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            extra,
        }
    }
}
