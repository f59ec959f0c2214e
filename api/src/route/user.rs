use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{
    delete_user, login, show_user, show_user_list, signup, update_user,
};

pub fn build_user_routers() -> Router<AppRegistry> {
    let users_routers = Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/", get(show_user_list))
        .route("/", post(signup))
        .route("/:user_id", get(show_user))
        .route("/:user_id", put(update_user))
        .route("/:user_id", patch(update_user))
        .route("/:user_id", delete(delete_user));

    Router::new().nest("/users", users_routers)
}
