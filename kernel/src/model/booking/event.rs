use crate::model::booking::BookingStatus;
use crate::model::id::BookingId;
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateBooking {
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
}

#[derive(Debug, new)]
pub struct UpdateBookingStatus {
    pub booking_id: BookingId,
    pub status: BookingStatus,
    // 管理者による修正操作。終端状態からの遷移も許可する
    pub force: bool,
}
