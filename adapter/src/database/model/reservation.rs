use kernel::model::{
    id::{EventId, ReservationId, UserId},
    reservation::{Reservation, ReservationStatus},
};
use rust_decimal::Decimal;
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

pub const RESERVATION_COLUMNS: &str = r#"
    reservation_id, user_id, event_id, ticket_count, total_price,
    status, created_at, cancelled_at
"#;

#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub ticket_count: i32,
    pub total_price: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            user_id,
            event_id,
            ticket_count,
            total_price,
            status,
            created_at,
            cancelled_at,
        } = value;
        let status = status.parse::<ReservationStatus>().map_err(|e| {
            AppError::ConversionEntityError(format!("reservation status '{status}': {e}"))
        })?;
        Ok(Reservation {
            reservation_id,
            user_id,
            event_id,
            ticket_count,
            total_price,
            status,
            created_at,
            cancelled_at,
        })
    }
}
