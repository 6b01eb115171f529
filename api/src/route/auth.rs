use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::user::{approve_user, login, register_user, show_pending_users};

pub fn build_auth_routers() -> Router<AppRegistry> {
    let auth_routers = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login))
        .route("/approve-user/:user_id", post(approve_user))
        .route("/pending-users", get(show_pending_users));

    Router::new().nest("/auth", auth_routers)
}
