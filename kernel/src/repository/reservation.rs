use crate::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, UpdateReservation},
        Reservation,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

/// 予約台帳。イベントの登録数を変更するのはこのリポジトリだけである。
///
/// 登録数の読み取り・更新は、対象イベント行をロックした 1 つのトランザクション内で行う。
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 予約を確定し、イベントの登録数に枚数を加える
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation>;
    async fn find_all(&self) -> AppResult<Vec<Reservation>>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // 枚数・金額・状態を更新し、差分をイベントの登録数に反映する
    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation>;
    // 予約を取り消す。登録数から枚数を差し引いて行を削除する
    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<()>;
}
