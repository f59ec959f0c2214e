use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::model::{
    catalog::Event,
    id::{EventId, ReservationId, UserId},
    reservation::{
        event::{CreateReservation, UpdateReservation},
        Reservation, ReservationStatus,
    },
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        catalog::{EventRow, EVENT_COLUMNS},
        reservation::{ReservationRow, RESERVATION_COLUMNS},
    },
    ConnectionPool,
};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    // 予約操作を行う
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定のイベントが存在するか（存在すれば行ロックを取る）
        // - 指定のユーザーが存在するか
        // - 残り枚数が足りるか
        let target = self.lock_event(&mut tx, event.event_id).await?;
        self.ensure_user_exists(&mut tx, event.user_id).await?;
        let registered_count = target.registered_count_after_admit(event.ticket_count)?;

        let total_price = match event.total_price {
            Some(price) => price,
            None => target.price_for(event.ticket_count)?,
        };

        let sql = format!(
            r#"
                INSERT INTO reservations
                (reservation_id, user_id, event_id, ticket_count, total_price, status)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {RESERVATION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(ReservationId::new())
            .bind(event.user_id)
            .bind(event.event_id)
            .bind(event.ticket_count)
            .bind(total_price)
            .bind(ReservationStatus::Confirmed.as_ref())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match e {
                // 並行してユーザーが削除された場合
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::EntityNotFound(format!("user ({}) was not found", event.user_id))
                }
                e => AppError::SpecificOperationError(e),
            })?;

        self.set_registered_count(&mut tx, event.event_id, registered_count)
            .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        let reservation = Reservation::try_from(row)?;
        tracing::info!(
            reservation.id = %reservation.reservation_id,
            event.id = %event.event_id,
            tickets = event.ticket_count,
            registered_count,
            "reservation confirmed"
        );
        Ok(reservation)
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations ORDER BY created_at DESC");
        sqlx::query_as::<_, ReservationRow>(&sql)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Reservation::try_from)
            .collect()
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1");
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(reservation_id)
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(Reservation::try_from)
            .transpose()
    }

    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        // 予約行 → イベント行の順にロックする
        let current = self.lock_reservation(&mut tx, event.reservation_id).await?;
        let change = current.plan_update(&event)?;
        let target = self.lock_event(&mut tx, current.event_id).await?;

        let registered_count = match change.registered_delta {
            d if d > 0 => target.registered_count_after_admit(d)?,
            d if d < 0 => target.registered_count_after_release(-d),
            _ => target.registered_count,
        };

        // 枚数だけが変わった場合は金額を計算し直す
        let total_price = match event.total_price {
            Some(price) => price,
            None if change.ticket_count != current.ticket_count => {
                target.price_for(change.ticket_count)?
            }
            None => current.total_price,
        };
        let cancelled_at = if change.newly_cancelled {
            Some(Utc::now())
        } else {
            current.cancelled_at
        };

        let sql = format!(
            r#"
                UPDATE reservations
                SET
                    ticket_count = $2,
                    total_price = $3,
                    status = $4,
                    cancelled_at = $5
                WHERE reservation_id = $1
                RETURNING {RESERVATION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(event.reservation_id)
            .bind(change.ticket_count)
            .bind(total_price)
            .bind(change.status.as_ref())
            .bind(cancelled_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if registered_count != target.registered_count {
            self.set_registered_count(&mut tx, current.event_id, registered_count)
                .await?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Reservation::try_from(row)
    }

    // 予約の取り消しを行う
    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // 既に削除済みの予約であればここで NotFound になり、登録数は変わらない
        let current = self.lock_reservation(&mut tx, reservation_id).await?;

        // キャンセル済みの予約は既に登録数から差し引かれている
        if current.holds_tickets() {
            let target = self.lock_event(&mut tx, current.event_id).await?;
            let registered_count = target.registered_count_after_release(current.ticket_count);
            self.set_registered_count(&mut tx, current.event_id, registered_count)
                .await?;
        }

        let res = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(reservation_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            reservation.id = %reservation_id,
            event.id = %current.event_id,
            tickets = current.ticket_count,
            "reservation cancelled"
        );
        Ok(())
    }
}

impl ReservationRepositoryImpl {
    // イベント行を FOR UPDATE で取得する。
    // トランザクションが終わるまで他の予約処理はこの行で待たされる
    async fn lock_event(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: EventId,
    ) -> AppResult<Event> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1 FOR UPDATE");
        sqlx::query_as::<_, EventRow>(&sql)
            .bind(event_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?
            .map(Event::from)
            .ok_or_else(|| AppError::EntityNotFound(format!("event ({event_id}) was not found")))
    }

    async fn lock_reservation(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        reservation_id: ReservationId,
    ) -> AppResult<Reservation> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(reservation_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("reservation ({reservation_id}) was not found"))
            })?
            .try_into()
    }

    async fn ensure_user_exists(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: UserId,
    ) -> AppResult<()> {
        let found = sqlx::query_scalar::<_, UserId>("SELECT user_id FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        match found {
            Some(_) => Ok(()),
            None => Err(AppError::EntityNotFound(format!(
                "user ({user_id}) was not found"
            ))),
        }
    }

    async fn set_registered_count(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: EventId,
        registered_count: i32,
    ) -> AppResult<()> {
        let res = sqlx::query("UPDATE events SET registered_count = $2 WHERE event_id = $1")
            .bind(event_id)
            .bind(registered_count)
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been updated".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{catalog::EventRepositoryImpl, user::UserRepositoryImpl};
    use chrono::{NaiveDate, NaiveTime};
    use kernel::model::{catalog::event::CreateEvent, role::Role, user::event::CreateUser};
    use kernel::repository::{catalog::EventRepository, user::UserRepository};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct Fixture {
        reservations: Arc<ReservationRepositoryImpl>,
        events: EventRepositoryImpl,
        user_id: UserId,
        event_id: EventId,
    }

    async fn fixture(pool: sqlx::PgPool, capacity: i32) -> anyhow::Result<Fixture> {
        let db = ConnectionPool::new(pool);
        let users = UserRepositoryImpl::new(db.clone());
        let events = EventRepositoryImpl::new(db.clone());

        let user = users
            .create(CreateUser::new(
                "ana@example.com".into(),
                "Ana".into(),
                "s3cret-pass".into(),
                Role::User,
            ))
            .await?;
        let event = events
            .create(CreateEvent {
                title: "Design Workshop".into(),
                description: "Creative design principles".into(),
                date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
                time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                location: "Design Center, New York, NY".into(),
                category: "Design".into(),
                price: dec!(89.00),
                capacity,
                image: None,
                organizer: "Creative Minds".into(),
            })
            .await?;

        Ok(Fixture {
            reservations: Arc::new(ReservationRepositoryImpl::new(db)),
            events,
            user_id: user.user_id,
            event_id: event.event_id,
        })
    }

    impl Fixture {
        async fn registered_count(&self) -> anyhow::Result<i32> {
            let event = self
                .events
                .find_by_id(self.event_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("event disappeared"))?;
            Ok(event.registered_count)
        }

        async fn reserve(&self, tickets: i32) -> AppResult<Reservation> {
            self.reservations
                .create(CreateReservation::new(
                    self.user_id,
                    self.event_id,
                    tickets,
                    None,
                ))
                .await
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[cfg_attr(not(feature = "database-tests"), ignore = "requires DATABASE_URL")]
    async fn reserve_and_cancel_scenario(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let f = fixture(pool, 10).await?;
        assert_eq!(f.registered_count().await?, 0);

        let first = f.reserve(3).await?;
        assert_eq!(first.status, ReservationStatus::Confirmed);
        assert_eq!(first.ticket_count, 3);
        assert_eq!(first.total_price, dec!(267.00));
        assert_eq!(f.registered_count().await?, 3);

        f.reserve(4).await?;
        assert_eq!(f.registered_count().await?, 7);

        f.reservations.cancel(first.reservation_id).await?;
        assert_eq!(f.registered_count().await?, 4);
        assert!(f
            .reservations
            .find_by_id(first.reservation_id)
            .await?
            .is_none());

        // 二度目の取り消しは NotFound で、登録数は変わらない
        let res = f.reservations.cancel(first.reservation_id).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        assert_eq!(f.registered_count().await?, 4);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[cfg_attr(not(feature = "database-tests"), ignore = "requires DATABASE_URL")]
    async fn overbooking_is_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let f = fixture(pool, 5).await?;
        f.reserve(4).await?;

        let res = f.reserve(2).await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
        assert_eq!(f.registered_count().await?, 4);
        assert_eq!(f.reservations.find_all().await?.len(), 1);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[cfg_attr(not(feature = "database-tests"), ignore = "requires DATABASE_URL")]
    async fn unknown_references_are_not_found(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let f = fixture(pool, 5).await?;

        let res = f
            .reservations
            .create(CreateReservation::new(UserId::new(), f.event_id, 1, None))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        let res = f
            .reservations
            .create(CreateReservation::new(f.user_id, EventId::new(), 1, None))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));

        assert_eq!(f.registered_count().await?, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[cfg_attr(not(feature = "database-tests"), ignore = "requires DATABASE_URL")]
    async fn concurrent_reservations_are_all_counted(pool: sqlx::PgPool) -> anyhow::Result<()> {
        const N: i32 = 8;
        let f = fixture(pool, 100).await?;

        let handles: Vec<_> = (0..N)
            .map(|_| {
                let repo = f.reservations.clone();
                let (user_id, event_id) = (f.user_id, f.event_id);
                tokio::spawn(async move {
                    repo.create(CreateReservation::new(user_id, event_id, 1, None))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await??;
        }

        assert_eq!(f.registered_count().await?, N);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[cfg_attr(not(feature = "database-tests"), ignore = "requires DATABASE_URL")]
    async fn update_adjusts_the_registered_count(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let f = fixture(pool, 10).await?;
        let r = f.reserve(2).await?;

        let grown = f
            .reservations
            .update(UpdateReservation {
                reservation_id: r.reservation_id,
                ticket_count: Some(5),
                ..Default::default()
            })
            .await?;
        assert_eq!(grown.total_price, dec!(445.00));
        assert_eq!(f.registered_count().await?, 5);

        let cancelled = f
            .reservations
            .update(UpdateReservation {
                reservation_id: r.reservation_id,
                status: Some(ReservationStatus::Cancelled),
                ..Default::default()
            })
            .await?;
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(f.registered_count().await?, 0);

        // キャンセル済みの予約を削除しても二重に差し引かない
        f.reservations.cancel(r.reservation_id).await?;
        assert_eq!(f.registered_count().await?, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[cfg_attr(not(feature = "database-tests"), ignore = "requires DATABASE_URL")]
    async fn deleting_a_user_releases_their_tickets(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let f = fixture(pool.clone(), 10).await?;
        f.reserve(3).await?;
        assert_eq!(f.registered_count().await?, 3);

        UserRepositoryImpl::new(ConnectionPool::new(pool))
            .delete(f.user_id)
            .await?;

        assert_eq!(f.registered_count().await?, 0);
        assert!(f.reservations.find_all().await?.is_empty());
        Ok(())
    }
}
