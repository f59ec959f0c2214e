use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kernel::model::id::ReservationId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::ValidatedJson,
    model::reservation::{
        CreateReservationRequest, ReplaceReservationRequest, ReplaceReservationRequestWithId,
        ReservationResponse, ReservationsResponse, UpdateReservationRequest,
        UpdateReservationRequestWithId,
    },
};

pub async fn create_reservation(
    State(registry): State<AppRegistry>,
    ValidatedJson(req): ValidatedJson<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    // 閲覧専用アカウントは予約できない
    let user = registry
        .user_repository()
        .find_by_id(req.user)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("user ({}) was not found", req.user)))?;
    if !user.role.can_reserve() {
        return Err(AppError::ForbiddenOperation(format!(
            "user ({}) with role '{}' cannot make reservations",
            user.user_id, user.role
        )));
    }

    registry
        .reservation_repository()
        .create(req.into())
        .await
        .map(|reservation| (StatusCode::CREATED, Json(reservation.into())))
}

pub async fn show_reservation_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_all()
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await
        .and_then(|reservation| match reservation {
            Some(reservation) => Ok(Json(reservation.into())),
            None => Err(AppError::EntityNotFound(format!(
                "reservation ({reservation_id}) was not found"
            ))),
        })
}

pub async fn replace_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    ValidatedJson(req): ValidatedJson<ReplaceReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let replace_reservation = ReplaceReservationRequestWithId::new(reservation_id, req);
    registry
        .reservation_repository()
        .update(replace_reservation.into())
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn update_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    ValidatedJson(req): ValidatedJson<UpdateReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    let update_reservation = UpdateReservationRequestWithId::new(reservation_id, req);
    registry
        .reservation_repository()
        .update(update_reservation.into())
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn cancel_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .reservation_repository()
        .cancel(reservation_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
