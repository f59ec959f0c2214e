use crate::model::{
    catalog::{
        event::{CreateEvent, UpdateEvent},
        Event,
    },
    id::EventId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: CreateEvent) -> AppResult<Event>;
    async fn find_all(&self) -> AppResult<Vec<Event>>;
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>>;
    async fn update(&self, event: UpdateEvent) -> AppResult<Event>;
    async fn delete(&self, event_id: EventId) -> AppResult<()>;
}
