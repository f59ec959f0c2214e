use kernel::model::{catalog::Event, id::EventId};
use rust_decimal::Decimal;
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveTime, Utc};

// 取得する列は全クエリ共通
pub const EVENT_COLUMNS: &str = r#"
    event_id, title, description, event_date, event_time, location, category,
    price, capacity, registered_count, image, organizer, created_at
"#;

#[derive(sqlx::FromRow)]
pub struct EventRow {
    pub event_id: EventId,
    pub title: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub location: String,
    pub category: String,
    pub price: Decimal,
    pub capacity: i32,
    pub registered_count: i32,
    pub image: Option<String>,
    pub organizer: String,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(value: EventRow) -> Self {
        let EventRow {
            event_id,
            title,
            description,
            event_date,
            event_time,
            location,
            category,
            price,
            capacity,
            registered_count,
            image,
            organizer,
            created_at,
        } = value;
        Event {
            event_id,
            title,
            description,
            date: event_date,
            time: event_time,
            location,
            category,
            price,
            capacity,
            registered_count,
            image,
            organizer,
            created_at,
        }
    }
}
