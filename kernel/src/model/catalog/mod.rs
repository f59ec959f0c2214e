use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};

use crate::model::id::EventId;

pub mod event;

use event::UpdateEvent;

/// 金額の上限（この値未満）。
pub fn price_limit() -> Decimal {
    Decimal::from(100_000_000)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_id: EventId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub category: String,
    pub price: Decimal,
    pub capacity: i32,
    pub registered_count: i32,
    pub image: Option<String>,
    pub organizer: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn remaining_tickets(&self) -> i32 {
        (self.capacity - self.registered_count).max(0)
    }

    /// `ticket_count` 枚を追加で受け付けた後の登録数を返す。
    ///
    /// 定員を超える場合はエラーにする。呼び出し側はイベント行をロックした
    /// トランザクションの中で使うこと。
    pub fn registered_count_after_admit(&self, ticket_count: i32) -> AppResult<i32> {
        if ticket_count <= 0 {
            return Err(AppError::UnprocessableEntity(
                "ticket count must be greater than zero".into(),
            ));
        }
        let remaining = self.remaining_tickets();
        if ticket_count > remaining {
            return Err(AppError::UnprocessableEntity(format!(
                "event ({}) has only {} ticket(s) left, {} requested",
                self.event_id, remaining, ticket_count
            )));
        }
        Ok(self.registered_count + ticket_count)
    }

    /// `ticket_count` 枚を解放した後の登録数を返す。0 未満にはならない。
    pub fn registered_count_after_release(&self, ticket_count: i32) -> i32 {
        (self.registered_count - ticket_count.max(0)).max(0)
    }

    // 合計金額も NUMERIC(10, 2) に収まらなければならない
    pub fn price_for(&self, ticket_count: i32) -> AppResult<Decimal> {
        let total = self.price * Decimal::from(ticket_count);
        if total >= price_limit() {
            return Err(AppError::UnprocessableEntity(format!(
                "total price {total} for {ticket_count} ticket(s) exceeds the maximum amount"
            )));
        }
        Ok(total)
    }

    // 更新内容を反映した Event を返す。定員を現在の登録数より下げることはできない
    pub fn apply(self, update: UpdateEvent) -> AppResult<Event> {
        let UpdateEvent {
            event_id: _,
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
        } = update;

        let capacity = capacity.unwrap_or(self.capacity);
        if capacity < self.registered_count {
            return Err(AppError::UnprocessableEntity(format!(
                "capacity ({}) cannot be lower than the registered count ({})",
                capacity, self.registered_count
            )));
        }

        Ok(Event {
            title: title.unwrap_or(self.title),
            description: description.unwrap_or(self.description),
            date: date.unwrap_or(self.date),
            time: time.unwrap_or(self.time),
            location: location.unwrap_or(self.location),
            category: category.unwrap_or(self.category),
            price: price.unwrap_or(self.price),
            capacity,
            image: image.unwrap_or(self.image),
            organizer: organizer.unwrap_or(self.organizer),
            ..self
        })
    }
}
