use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    catalog::{
        event::{CreateEvent, UpdateEvent},
        Event,
    },
    id::EventId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{double_option, validate_price};

fn validate_image(value: &Option<Option<String>>, _: &()) -> garde::Result {
    match value {
        Some(Some(image)) if image.len() > 255 => Err(garde::Error::new(
            "ensure this field has no more than 255 characters.",
        )),
        _ => Ok(()),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub items: Vec<EventResponse>,
}

impl From<Vec<Event>> for EventsResponse {
    fn from(value: Vec<Event>) -> Self {
        Self {
            items: value.into_iter().map(EventResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
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

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
            event_id,
            title,
            description,
            date,
            time,
            location,
            category,
            price,
            capacity,
            registered_count,
            image,
            organizer,
            created_at,
        } = value;
        Self {
            id: event_id,
            title,
            description,
            date,
            time,
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

// registeredCount は受け付けない（予約によってのみ変化する）
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[garde(length(min = 1, max = 255))]
    pub title: String,
    #[garde(skip)]
    pub description: String,
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub time: NaiveTime,
    #[garde(length(min = 1, max = 255))]
    pub location: String,
    #[garde(length(min = 1, max = 100))]
    pub category: String,
    #[garde(custom(validate_price))]
    pub price: Decimal,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(length(max = 255))]
    #[serde(default)]
    pub image: Option<String>,
    #[garde(length(min = 1, max = 255))]
    pub organizer: String,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(value: CreateEventRequest) -> Self {
        let CreateEventRequest {
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
        } = value;
        CreateEvent {
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
        }
    }
}

// PUT は CreateEventRequest で全項目を受け取る
#[derive(new)]
pub struct ReplaceEventRequestWithId(EventId, CreateEventRequest);
impl From<ReplaceEventRequestWithId> for UpdateEvent {
    fn from(value: ReplaceEventRequestWithId) -> Self {
        let ReplaceEventRequestWithId(event_id, req) = value;
        UpdateEvent::replace_with(event_id, req.into())
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[garde(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub date: Option<NaiveDate>,
    #[garde(skip)]
    pub time: Option<NaiveTime>,
    #[garde(length(min = 1, max = 255))]
    pub location: Option<String>,
    #[garde(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[garde(custom(super::validate_optional_price))]
    pub price: Option<Decimal>,
    #[garde(range(min = 1))]
    pub capacity: Option<i32>,
    #[garde(custom(validate_image))]
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[garde(length(min = 1, max = 255))]
    pub organizer: Option<String>,
}

#[derive(new)]
pub struct UpdateEventRequestWithId(EventId, UpdateEventRequest);
impl From<UpdateEventRequestWithId> for UpdateEvent {
    fn from(value: UpdateEventRequestWithId) -> Self {
        let UpdateEventRequestWithId(
            event_id,
            UpdateEventRequest {
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
            },
        ) = value;
        UpdateEvent {
            event_id,
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
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_distinguishes_null_from_missing() {
        let missing: UpdateEventRequest = serde_json::from_value(json!({ "title": "New" })).unwrap();
        assert_eq!(missing.image, None);

        let cleared: UpdateEventRequest = serde_json::from_value(json!({ "image": null })).unwrap();
        assert_eq!(cleared.image, Some(None));
    }

    #[test]
    fn create_request_rejects_bad_capacity_and_price() {
        let req: CreateEventRequest = serde_json::from_value(json!({
            "title": "Startup Networking",
            "description": "Meet founders",
            "date": "2025-01-25",
            "time": "18:00:00",
            "location": "The Pavilion, Austin, TX",
            "category": "Networking",
            "price": "-1",
            "capacity": 0,
            "organizer": "Startup Collective"
        }))
        .unwrap();

        let report = req.validate().unwrap_err();
        let fields: Vec<String> = report.iter().map(|(path, _)| path.to_string()).collect();
        assert!(fields.contains(&"price".to_string()));
        assert!(fields.contains(&"capacity".to_string()));
    }
}
