use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    cancel_reservation, create_reservation, replace_reservation, show_reservation,
    show_reservation_list, update_reservation,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservations_routers = Router::new()
        .route("/", post(create_reservation))
        .route("/", get(show_reservation_list))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id", put(replace_reservation))
        .route("/:reservation_id", patch(update_reservation))
        .route("/:reservation_id", delete(cancel_reservation));

    Router::new().nest("/reservations", reservations_routers)
}
