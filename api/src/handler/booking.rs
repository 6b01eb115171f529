use crate::{
    extractor::AppJson,
    model::{
        booking::{
            BookingListQuery, BookingResponse, BookingsResponse, CreateBookingRequest,
            UpdateBookingStatusRequest,
        },
        MessageResponse,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{
    booking::{event::UpdateBookingStatus, BookingListFilter, BookingStatus},
    id::BookingId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_booking(
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate(&())?;
    req.ensure_time_range()?;

    registry
        .booking_repository()
        .create(req.into())
        .await
        .map(|booking| (StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

pub async fn show_booking_list(
    Query(query): Query<BookingListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    let filter = BookingListFilter::try_from(query)?;

    registry
        .booking_repository()
        .find_all(filter)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_pending_booking_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    let filter = BookingListFilter::new(Some(BookingStatus::Pending), None);

    registry
        .booking_repository()
        .find_all(filter)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    registry
        .booking_repository()
        .find_by_id(booking_id)
        .await
        .and_then(|booking| match booking {
            Some(booking) => Ok(Json(booking.into())),
            None => Err(AppError::EntityNotFound("Booking not found".into())),
        })
}

pub async fn approve_booking(
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MessageResponse>> {
    let event = UpdateBookingStatus::new(booking_id, BookingStatus::Approved, false);
    let booking = registry.booking_repository().update_status(event).await?;

    // 担当者への通知はベストエフォート。送信結果はログに残すだけで、
    // このリクエストのレスポンスには反映させない
    let notifier = registry.mail_notifier();
    tokio::spawn(async move {
        let body = format!(
            "Your booking \"{}\" has been approved.",
            booking.booking_name
        );
        if let Err(e) = notifier
            .notify(&booking.in_charge_email, "Booking Approved", &body)
            .await
        {
            tracing::warn!(
                booking_id = %booking.booking_id,
                error.message = %e,
                "failed to send approval mail"
            );
        }
    });

    Ok(Json(MessageResponse::new("Booking approved")))
}

pub async fn reject_booking(
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MessageResponse>> {
    let event = UpdateBookingStatus::new(booking_id, BookingStatus::Rejected, false);

    registry
        .booking_repository()
        .update_status(event)
        .await
        .map(|_| Json(MessageResponse::new("Booking rejected")))
}

// 管理者向けの修正操作。終端状態からの遷移も許可する
pub async fn update_booking_status(
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<UpdateBookingStatusRequest>,
) -> AppResult<Json<BookingResponse>> {
    let status = req.parse_status()?;
    let event = UpdateBookingStatus::new(booking_id, status, true);

    registry
        .booking_repository()
        .update_status(event)
        .await
        .map(|booking| Json(booking.into()))
}
