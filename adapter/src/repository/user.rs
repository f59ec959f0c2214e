use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    user::{
        event::{CreateUser, LoginUser, UpdateUser},
        normalize_email, User,
    },
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult, FieldErrors};

use crate::{
    database::{
        model::user::{UserCredentialRow, UserRow},
        ConnectionPool,
    },
    password::{hash_password, verify_password, verify_unknown_user},
};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();
        let email = normalize_email(&event.email);
        let password_hash = hash_password(&event.password)?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
                INSERT INTO users (user_id, email, name, role, password_hash)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING user_id, email, name, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(&email)
        .bind(&event.name)
        .bind(event.role.as_ref())
        .bind(&password_hash)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(|e| match e {
            // email の一意制約違反は入力エラーとして返す
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::ValidationError(FieldErrors::single(
                    "email",
                    "user with this email already exists.",
                ))
            }
            e => AppError::SpecificOperationError(e),
        })?;

        tracing::info!(user.id = %user_id, "user created");
        User::try_from(row)
    }

    async fn verify(&self, event: LoginUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserCredentialRow>(
            r#"
                SELECT user_id, email, name, role, created_at, password_hash
                FROM users
                WHERE email = $1
            "#,
        )
        .bind(normalize_email(&event.email))
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            verify_unknown_user(&event.password)?;
            return Err(AppError::UnauthenticatedError);
        };

        if !verify_password(&event.password, &row.password_hash)? {
            return Err(AppError::UnauthenticatedError);
        }

        User::try_from(row.user)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, email, name, role, created_at
                FROM users
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, email, name, role, created_at
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(User::try_from)
        .transpose()
    }

    async fn update(&self, event: UpdateUser) -> AppResult<User> {
        let UpdateUser {
            user_id,
            name,
            role,
            password,
        } = event;
        let password_hash = password.as_deref().map(hash_password).transpose()?;

        let mut tx = self.db.begin().await?;

        let current: User = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, email, name, role, created_at
                FROM users
                WHERE user_id = $1
                FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound(format!("user ({user_id}) was not found")))?
        .try_into()?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
                UPDATE users
                SET
                    name = $2,
                    role = $3,
                    password_hash = COALESCE($4, password_hash)
                WHERE user_id = $1
                RETURNING user_id, email, name, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(name.unwrap_or(current.name))
        .bind(role.unwrap_or(current.role).as_ref())
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        User::try_from(row)
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM users WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
        if exists.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "user ({user_id}) was not found"
            )));
        }

        // 予約行 → イベント行の順にロックする（予約台帳と同じ順序）
        sqlx::query("SELECT reservation_id FROM reservations WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        // 確定済み予約の枚数をイベントの登録数から差し引く
        sqlx::query(
            r#"
                UPDATE events AS e
                SET registered_count = GREATEST(e.registered_count - held.tickets, 0)
                FROM (
                    SELECT event_id, SUM(ticket_count)::INTEGER AS tickets
                    FROM reservations
                    WHERE user_id = $1 AND status = 'confirmed'
                    GROUP BY event_id
                ) AS held
                WHERE e.event_id = held.event_id
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        // 予約は ON DELETE CASCADE で削除される
        let res = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}
