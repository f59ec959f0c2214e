use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kernel::model::id::EventId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::ValidatedJson,
    model::event::{
        CreateEventRequest, EventResponse, EventsResponse, ReplaceEventRequestWithId,
        UpdateEventRequest, UpdateEventRequestWithId,
    },
};

pub async fn register_event(
    State(registry): State<AppRegistry>,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    registry
        .event_repository()
        .create(req.into())
        .await
        .map(|event| (StatusCode::CREATED, Json(event.into())))
}

pub async fn show_event_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventsResponse>> {
    registry
        .event_repository()
        .find_all()
        .await
        .map(EventsResponse::from)
        .map(Json)
}

pub async fn show_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventResponse>> {
    registry
        .event_repository()
        .find_by_id(event_id)
        .await
        .and_then(|event| match event {
            Some(event) => Ok(Json(event.into())),
            None => Err(AppError::EntityNotFound(format!(
                "event ({event_id}) was not found"
            ))),
        })
}

pub async fn replace_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    let replace_event = ReplaceEventRequestWithId::new(event_id, req);
    registry
        .event_repository()
        .update(replace_event.into())
        .await
        .map(EventResponse::from)
        .map(Json)
}

pub async fn update_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    ValidatedJson(req): ValidatedJson<UpdateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    let update_event = UpdateEventRequestWithId::new(event_id, req);
    registry
        .event_repository()
        .update(update_event.into())
        .await
        .map(EventResponse::from)
        .map(Json)
}

pub async fn delete_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .event_repository()
        .delete(event_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
