use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{EventId, ReservationId, UserId},
    reservation::{
        event::{CreateReservation, UpdateReservation},
        Reservation, ReservationStatus,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{validate_optional_price, validate_price};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatusName {
    Confirmed,
    Cancelled,
}

impl From<ReservationStatus> for ReservationStatusName {
    fn from(value: ReservationStatus) -> Self {
        match value {
            ReservationStatus::Confirmed => Self::Confirmed,
            ReservationStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<ReservationStatusName> for ReservationStatus {
    fn from(value: ReservationStatusName) -> Self {
        match value {
            ReservationStatusName::Confirmed => Self::Confirmed,
            ReservationStatusName::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: ReservationId,
    pub user: UserId,
    pub event: EventId,
    pub ticket_count: i32,
    pub total_price: Decimal,
    pub status: ReservationStatusName,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            user_id,
            event_id,
            ticket_count,
            total_price,
            status,
            created_at,
            cancelled_at,
        } = value;
        Self {
            id: reservation_id,
            user: user_id,
            event: event_id,
            ticket_count,
            total_price,
            status: status.into(),
            created_at,
            cancelled_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub user: UserId,
    #[garde(skip)]
    pub event: EventId,
    // 1 回の予約で取れるのは 10 枚まで
    #[garde(range(min = 1, max = 10))]
    pub ticket_count: i32,
    #[garde(custom(validate_optional_price))]
    #[serde(default)]
    pub total_price: Option<Decimal>,
}

impl From<CreateReservationRequest> for CreateReservation {
    fn from(value: CreateReservationRequest) -> Self {
        let CreateReservationRequest {
            user,
            event,
            ticket_count,
            total_price,
        } = value;
        CreateReservation::new(user, event, ticket_count, total_price)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceReservationRequest {
    #[garde(range(min = 1, max = 10))]
    pub ticket_count: i32,
    #[garde(custom(validate_price))]
    pub total_price: Decimal,
    #[garde(skip)]
    pub status: ReservationStatusName,
}

#[derive(new)]
pub struct ReplaceReservationRequestWithId(ReservationId, ReplaceReservationRequest);
impl From<ReplaceReservationRequestWithId> for UpdateReservation {
    fn from(value: ReplaceReservationRequestWithId) -> Self {
        let ReplaceReservationRequestWithId(
            reservation_id,
            ReplaceReservationRequest {
                ticket_count,
                total_price,
                status,
            },
        ) = value;
        UpdateReservation {
            reservation_id,
            ticket_count: Some(ticket_count),
            total_price: Some(total_price),
            status: Some(status.into()),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    #[garde(range(min = 1, max = 10))]
    pub ticket_count: Option<i32>,
    #[garde(custom(validate_optional_price))]
    pub total_price: Option<Decimal>,
    #[garde(skip)]
    pub status: Option<ReservationStatusName>,
}

#[derive(new)]
pub struct UpdateReservationRequestWithId(ReservationId, UpdateReservationRequest);
impl From<UpdateReservationRequestWithId> for UpdateReservation {
    fn from(value: UpdateReservationRequestWithId) -> Self {
        let UpdateReservationRequestWithId(
            reservation_id,
            UpdateReservationRequest {
                ticket_count,
                total_price,
                status,
            },
        ) = value;
        UpdateReservation {
            reservation_id,
            ticket_count,
            total_price,
            status: status.map(ReservationStatus::from),
        }
    }
}
