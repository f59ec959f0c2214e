use crate::model::{
    id::UserId,
    user::{
        event::{CreateUser, LoginUser, UpdateUser},
        User,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    // アカウントを作成する。メールアドレスが重複していれば ValidationError
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    // メールアドレスとパスワードを照合する。失敗時はどちらが誤りかを区別しない
    async fn verify(&self, event: LoginUser) -> AppResult<User>;
    async fn find_all(&self) -> AppResult<Vec<User>>;
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;
    async fn update(&self, event: UpdateUser) -> AppResult<User>;
    // 削除するユーザーの確定済み予約分をイベントの登録数から差し引いてから削除する
    async fn delete(&self, user_id: UserId) -> AppResult<()>;
}
