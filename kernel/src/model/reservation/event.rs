use crate::model::{
    id::{EventId, ReservationId, UserId},
    reservation::ReservationStatus,
};
use derive_new::new;
use rust_decimal::Decimal;

#[derive(Debug, new)]
pub struct CreateReservation {
    pub user_id: UserId,
    pub event_id: EventId,
    pub ticket_count: i32,
    // None の場合はイベントの価格 × 枚数で計算する
    pub total_price: Option<Decimal>,
}

#[derive(Debug, Default)]
pub struct UpdateReservation {
    pub reservation_id: ReservationId,
    pub ticket_count: Option<i32>,
    pub total_price: Option<Decimal>,
    pub status: Option<ReservationStatus>,
}
