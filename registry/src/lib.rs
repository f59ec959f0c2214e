use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::{
    catalog::EventRepositoryImpl, health::HealthCheckRepositoryImpl,
    reservation::ReservationRepositoryImpl, user::UserRepositoryImpl,
};
use kernel::repository::{
    catalog::EventRepository, health::HealthCheckRepository,
    reservation::ReservationRepository, user::UserRepository,
};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    user_repository: Arc<dyn UserRepository>,
    event_repository: Arc<dyn EventRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let event_repository = Arc::new(EventRepositoryImpl::new(pool.clone()));
        let reservation_repository = Arc::new(ReservationRepositoryImpl::new(pool));
        Self {
            health_check_repository,
            user_repository,
            event_repository,
            reservation_repository,
        }
    }

    // 任意の実装を差し込む。ハンドラのテストでモックを使うためのもの
    pub fn with_repositories(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        user_repository: Arc<dyn UserRepository>,
        event_repository: Arc<dyn EventRepository>,
        reservation_repository: Arc<dyn ReservationRepository>,
    ) -> Self {
        Self {
            health_check_repository,
            user_repository,
            event_repository,
            reservation_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn event_repository(&self) -> Arc<dyn EventRepository> {
        self.event_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }
}
