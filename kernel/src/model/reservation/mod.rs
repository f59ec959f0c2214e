use crate::model::id::{EventId, ReservationId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, Display, EnumString};

pub mod event;

use event::UpdateReservation;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    // キャンセル済みの予約を確定に戻すことはできない
    pub fn transition_to(self, next: ReservationStatus) -> AppResult<ReservationStatus> {
        match (self, next) {
            (ReservationStatus::Cancelled, ReservationStatus::Confirmed) => Err(
                AppError::UnprocessableEntity("a cancelled reservation cannot be confirmed again".into()),
            ),
            (_, next) => Ok(next),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub ticket_count: i32,
    pub total_price: Decimal,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// 予約の更新によって生じる変化。
/// `registered_delta` はイベントの登録数に加減する枚数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationChange {
    pub ticket_count: i32,
    pub status: ReservationStatus,
    pub registered_delta: i32,
    pub newly_cancelled: bool,
}

impl Reservation {
    // 登録数に計上されているのは確定済みの予約だけ
    pub fn holds_tickets(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    pub fn plan_update(&self, update: &UpdateReservation) -> AppResult<ReservationChange> {
        let ticket_count = update.ticket_count.unwrap_or(self.ticket_count);
        if ticket_count <= 0 {
            return Err(AppError::UnprocessableEntity(
                "ticket count must be greater than zero".into(),
            ));
        }
        let status = match update.status {
            Some(next) => self.status.transition_to(next)?,
            None => self.status,
        };

        let held_before = if self.holds_tickets() { self.ticket_count } else { 0 };
        let held_after = if status == ReservationStatus::Confirmed { ticket_count } else { 0 };

        Ok(ReservationChange {
            ticket_count,
            status,
            registered_delta: held_after - held_before,
            newly_cancelled: self.holds_tickets() && status == ReservationStatus::Cancelled,
        })
    }
}
