use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use garde::Validate;
use serde::de::DeserializeOwned;
use shared::error::{AppError, FieldErrors};

/// JSON ボディを読み取り、garde の検証まで済ませるエクストラクタ。
///
/// 読み取り・検証のどちらで失敗しても、フィールドごとのエラーとして 400 を返す。
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    T::Context: Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_field_errors)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn rejection_to_field_errors(rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    let field = missing_field_name(&message).unwrap_or(FieldErrors::NON_FIELD);
    let message = if field == FieldErrors::NON_FIELD {
        message.clone()
    } else {
        "this field is required.".to_string()
    };
    AppError::ValidationError(FieldErrors::single(field, message))
}

// serde のエラーメッセージ "missing field `email`" からフィールド名を取り出す
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = &message[message.find("missing field `")? + "missing field `".len()..];
    rest.find('`').map(|end| &rest[..end])
}
