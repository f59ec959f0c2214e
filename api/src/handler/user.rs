use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kernel::model::id::UserId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::ValidatedJson,
    model::user::{
        CreateUserRequest, LoginRequest, UpdateUserRequest, UpdateUserRequestWithUserId,
        UserResponse, UsersResponse,
    },
};

pub async fn signup(
    State(registry): State<AppRegistry>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    registry
        .user_repository()
        .create(req.into())
        .await
        .map(|user| (StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(registry): State<AppRegistry>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Json<UserResponse>> {
    if req.is_incomplete() {
        return Err(AppError::UnauthenticatedError);
    }
    registry
        .user_repository()
        .verify(req.into())
        .await
        .map(UserResponse::from)
        .map(Json)
}

pub async fn show_user_list(State(registry): State<AppRegistry>) -> AppResult<Json<UsersResponse>> {
    registry
        .user_repository()
        .find_all()
        .await
        .map(UsersResponse::from)
        .map(Json)
}

pub async fn show_user(
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserResponse>> {
    registry
        .user_repository()
        .find_by_id(user_id)
        .await
        .and_then(|user| match user {
            Some(user) => Ok(Json(user.into())),
            None => Err(AppError::EntityNotFound(format!(
                "user ({user_id}) was not found"
            ))),
        })
}

pub async fn update_user(
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let update_user = UpdateUserRequestWithUserId::new(user_id, req);
    registry
        .user_repository()
        .update(update_user.into())
        .await
        .map(UserResponse::from)
        .map(Json)
}

pub async fn delete_user(
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .user_repository()
        .delete(user_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use kernel::model::role::Role;
    use serde_json::json;
    use shared::error::{AppError, FieldErrors};

    use crate::handler::testing::{send, user_with_role, Mocks};

    #[tokio::test]
    async fn login_returns_user_without_password() -> anyhow::Result<()> {
        let mut mocks = Mocks::default();
        let user = user_with_role(Role::User);
        let expected_id = user.user_id.to_string();
        mocks
            .user
            .expect_verify()
            .withf(|login| login.email == "ana@example.com" && login.password == "secret")
            .returning(move |_| Ok(user.clone()));

        let (status, body) = send(
            mocks.into_app(),
            Method::POST,
            "/api/v1/users/login",
            Some(json!({ "email": "ana@example.com", "password": "secret" })),
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], json!(expected_id));
        assert_eq!(body["role"], json!("user"));
        assert!(body.get("password").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn login_failure_is_generic() -> anyhow::Result<()> {
        let mut mocks = Mocks::default();
        mocks
            .user
            .expect_verify()
            .returning(|_| Err(AppError::UnauthenticatedError));

        let (status, body) = send(
            mocks.into_app(),
            Method::POST,
            "/api/v1/users/login",
            Some(json!({ "email": "ana@example.com", "password": "wrong" })),
        )
        .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid credentials" }));
        Ok(())
    }

    #[tokio::test]
    async fn login_with_missing_credentials_is_generic() -> anyhow::Result<()> {
        // リポジトリには到達しない
        let app = Mocks::default().into_app();

        for body in [
            json!({ "password": "x" }),
            json!({ "email": "", "password": "x" }),
            json!({ "email": "ana@example.com" }),
            json!({}),
        ] {
            let (status, res) =
                send(app.clone(), Method::POST, "/api/v1/users/login", Some(body)).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(res, json!({ "error": "Invalid credentials" }));
        }
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_signup_reports_email_field() -> anyhow::Result<()> {
        let mut mocks = Mocks::default();
        mocks.user.expect_create().returning(|_| {
            Err(AppError::ValidationError(FieldErrors::single(
                "email",
                "user with this email already exists.",
            )))
        });

        let (status, body) = send(
            mocks.into_app(),
            Method::POST,
            "/api/v1/users/signup",
            Some(json!({ "email": "ana@example.com", "password": "secret", "name": "Ana" })),
        )
        .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "email": ["user with this email already exists."] }));
        Ok(())
    }

    #[tokio::test]
    async fn signup_rejects_malformed_body_before_storage() -> anyhow::Result<()> {
        // リポジトリには到達しない
        let app = Mocks::default().into_app();

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/api/v1/users/signup",
            Some(json!({ "email": "not-an-email", "password": "secret", "name": "Ana" })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("email").is_some());

        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/users/signup",
            Some(json!({ "password": "secret", "name": "Ana" })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "email": ["this field is required."] }));
        Ok(())
    }

    #[tokio::test]
    async fn signup_defaults_role_to_user() -> anyhow::Result<()> {
        let mut mocks = Mocks::default();
        mocks
            .user
            .expect_create()
            .withf(|create| create.role == Role::User)
            .returning(|_| Ok(user_with_role(Role::User)));

        let (status, _) = send(
            mocks.into_app(),
            Method::POST,
            "/api/v1/users",
            Some(json!({ "email": "ana@example.com", "password": "secret", "name": "Ana" })),
        )
        .await?;

        assert_eq!(status, StatusCode::CREATED);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() -> anyhow::Result<()> {
        let mut mocks = Mocks::default();
        mocks.user.expect_find_by_id().returning(|_| Ok(None));

        let (status, _) = send(
            mocks.into_app(),
            Method::GET,
            &format!("/api/v1/users/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }
}
