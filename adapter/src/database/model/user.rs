use kernel::model::{id::UserId, role::Role, user::User};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            email,
            name,
            role,
            created_at,
        } = value;
        let role = role
            .parse::<Role>()
            .map_err(|e| AppError::ConversionEntityError(format!("role '{role}': {e}")))?;
        Ok(User {
            user_id,
            email,
            name,
            role,
            created_at,
        })
    }
}

// ログイン時のみパスワードハッシュも取得する
#[derive(sqlx::FromRow)]
pub struct UserCredentialRow {
    #[sqlx(flatten)]
    pub user: UserRow,
    pub password_hash: String,
}
