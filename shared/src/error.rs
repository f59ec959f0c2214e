use std::{collections::BTreeMap, fmt};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// フィールド名ごとのエラーメッセージ一覧
// レスポンスでは {"email": ["..."]} の形で返す
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub const NON_FIELD: &'static str = "non_field_errors";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<garde::Report> for FieldErrors {
    fn from(report: garde::Report) -> Self {
        let mut errors = Self::new();
        for (path, error) in report.iter() {
            let field = path.to_string();
            let field = if field.is_empty() {
                Self::NON_FIELD.to_string()
            } else {
                to_camel_case(&field)
            };
            errors.push(field, error.to_string());
        }
        errors
    }
}

// garde はフィールド名をそのまま返すので、JSON の表記 (camelCase) に揃える
fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(FieldErrors),
    #[error("failed to execute transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("an error occurred while executing a database operation")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("password hashing failed: {0}")]
    PasswordHashError(String),
    #[error("Invalid credentials")]
    UnauthenticatedError,
    #[error("{0}")]
    ForbiddenOperation(String),
    #[error("{0}")]
    ConversionEntityError(String),
}

impl From<garde::Report> for AppError {
    fn from(report: garde::Report) -> Self {
        Self::ValidationError(report.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            AppError::ValidationError(_)
            | AppError::UnauthenticatedError
            | AppError::ConvertToUuidError(_) => StatusCode::BAD_REQUEST,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ForbiddenOperation(_) => StatusCode::FORBIDDEN,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::PasswordHashError(_)
            | AppError::ConversionEntityError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // 500 系は内部情報を漏らさない
        let body = match self {
            AppError::ValidationError(errors) => json!(errors.0),
            _ if status_code.is_server_error() => json!({ "error": "Internal server error" }),
            e => json!({ "error": e.to_string() }),
        };

        (status_code, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
