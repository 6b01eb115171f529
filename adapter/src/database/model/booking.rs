use kernel::model::{
    booking::{Booking, BookingStatus},
    id::BookingId,
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub booking_name: String,
    pub project_name: String,
    pub program_name: Option<String>,
    pub program_title: String,
    pub participants: i32,
    pub event_in_charge: String,
    pub in_charge_email: String,
    pub approver_email: String,
    pub meeting_room: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub audio_visual: bool,
    pub video_conf: bool,
    pub catering: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            booking_name,
            project_name,
            program_name,
            program_title,
            participants,
            event_in_charge,
            in_charge_email,
            approver_email,
            meeting_room,
            start_time,
            end_time,
            audio_visual,
            video_conf,
            catering,
            status,
            created_at,
        } = value;
        let status = status.parse::<BookingStatus>().map_err(|_| {
            AppError::ConversionEntityError(format!("unknown booking status: {status}"))
        })?;
        Ok(Booking {
            booking_id,
            booking_name,
            project_name,
            program_name,
            program_title,
            participants,
            event_in_charge,
            in_charge_email,
            approver_email,
            meeting_room,
            start_time,
            end_time,
            audio_visual,
            video_conf,
            catering,
            status,
            created_at,
        })
    }
}
