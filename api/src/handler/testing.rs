use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use kernel::{
    model::{id::UserId, role::Role, user::User},
    repository::{
        catalog::MockEventRepository, health::MockHealthCheckRepository,
        reservation::MockReservationRepository, user::MockUserRepository,
    },
};
use registry::AppRegistry;
use serde_json::Value;
use tower::ServiceExt;

// 期待値を設定していない呼び出しはモック側で panic する
#[derive(Default)]
pub(crate) struct Mocks {
    pub health: MockHealthCheckRepository,
    pub user: MockUserRepository,
    pub event: MockEventRepository,
    pub reservation: MockReservationRepository,
}

impl Mocks {
    pub fn into_app(self) -> Router {
        let registry = AppRegistry::with_repositories(
            Arc::new(self.health),
            Arc::new(self.user),
            Arc::new(self.event),
            Arc::new(self.reservation),
        );
        Router::new()
            .merge(crate::route::v1::routes())
            .with_state(registry)
    }
}

pub(crate) async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string()))?,
        None => request.body(Body::empty())?,
    };

    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

pub(crate) fn user_with_role(role: Role) -> User {
    User {
        user_id: UserId::new(),
        email: "ana@example.com".into(),
        name: "Ana".into(),
        role,
        created_at: Utc::now(),
    }
}
