use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::model::id::EventId;

// registered_count は予約台帳だけが更新するため、ここには含めない
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub category: String,
    pub price: Decimal,
    pub capacity: i32,
    pub image: Option<String>,
    pub organizer: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub event_id: EventId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub capacity: Option<i32>,
    // Some(None) は画像の削除
    pub image: Option<Option<String>>,
    pub organizer: Option<String>,
}

impl UpdateEvent {
    // PUT 用。全項目を置き換える
    pub fn replace_with(event_id: EventId, event: CreateEvent) -> Self {
        let CreateEvent {
            title,
            description,
            date,
            time,
            location,
            category,
            price,
            capacity,
            image,
            organizer,
        } = event;
        Self {
            event_id,
            title: Some(title),
            description: Some(description),
            date: Some(date),
            time: Some(time),
            location: Some(location),
            category: Some(category),
            price: Some(price),
            capacity: Some(capacity),
            image: Some(image),
            organizer: Some(organizer),
        }
    }
}
