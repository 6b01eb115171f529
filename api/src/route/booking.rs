use axum::{
    routing::{get, patch, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    approve_booking, register_booking, reject_booking, show_booking, show_booking_list,
    show_pending_booking_list, update_booking_status,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", post(register_booking))
        .route("/", get(show_booking_list))
        .route("/pending", get(show_pending_booking_list))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id", patch(update_booking_status))
        .route("/:booking_id/approve", post(approve_booking))
        .route("/:booking_id/reject", post(reject_booking));

    Router::new().nest("/bookings", booking_routers)
}
