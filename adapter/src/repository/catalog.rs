use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    catalog::{
        event::{CreateEvent, UpdateEvent},
        Event,
    },
    id::EventId,
};
use kernel::repository::catalog::EventRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::catalog::{EventRow, EVENT_COLUMNS},
    ConnectionPool,
};

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn create(&self, event: CreateEvent) -> AppResult<Event> {
        let sql = format!(
            r#"
                INSERT INTO events
                (event_id, title, description, event_date, event_time, location,
                category, price, capacity, image, organizer)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING {EVENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(EventId::new())
            .bind(event.title)
            .bind(event.description)
            .bind(event.date)
            .bind(event.time)
            .bind(event.location)
            .bind(event.category)
            .bind(event.price)
            .bind(event.capacity)
            .bind(event.image)
            .bind(event.organizer)
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(Event::from(row))
    }

    async fn find_all(&self) -> AppResult<Vec<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY event_date ASC, event_time ASC");
        sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(self.db.inner_ref())
            .await
            .map(|rows| rows.into_iter().map(Event::from).collect())
            .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1");
        sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map(|row| row.map(Event::from))
            .map_err(AppError::SpecificOperationError)
    }

    async fn update(&self, event: UpdateEvent) -> AppResult<Event> {
        let event_id = event.event_id;
        let mut tx = self.db.begin().await?;

        // 登録数と定員の比較を予約台帳と直列化するため、行ロックを取ってから反映する
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(Event::from)
            .ok_or_else(|| AppError::EntityNotFound(format!("event ({event_id}) was not found")))?;

        let updated = current.apply(event)?;

        let sql = format!(
            r#"
                UPDATE events
                SET
                    title = $2,
                    description = $3,
                    event_date = $4,
                    event_time = $5,
                    location = $6,
                    category = $7,
                    price = $8,
                    capacity = $9,
                    image = $10,
                    organizer = $11
                WHERE event_id = $1
                RETURNING {EVENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id)
            .bind(updated.title)
            .bind(updated.description)
            .bind(updated.date)
            .bind(updated.time)
            .bind(updated.location)
            .bind(updated.category)
            .bind(updated.price)
            .bind(updated.capacity)
            .bind(updated.image)
            .bind(updated.organizer)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Event::from(row))
    }

    async fn delete(&self, event_id: EventId) -> AppResult<()> {
        // 予約は ON DELETE CASCADE で削除される
        let res = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "event ({event_id}) was not found"
            )));
        }

        Ok(())
    }
}
