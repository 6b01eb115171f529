use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use garde::Validate;
use kernel::model::{
    booking::{event::CreateBooking, Booking, BookingListFilter, BookingStatus},
    id::BookingId,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use shared::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(length(min = 1))]
    pub booking_name: String,
    #[garde(length(min = 1))]
    pub project_name: String,
    #[serde(default)]
    #[garde(inner(length(min = 1)))]
    pub program_name: Option<String>,
    #[garde(length(min = 1))]
    pub program_title: String,
    #[serde(deserialize_with = "deserialize_participants")]
    #[garde(custom(positive_participants))]
    pub participants: i32,
    #[garde(length(min = 1))]
    pub event_in_charge: String,
    #[garde(length(min = 1), email)]
    pub in_charge_email: String,
    #[garde(length(min = 1), email)]
    pub approver_email: String,
    #[garde(length(min = 1))]
    pub meeting_room: String,
    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    // フラグは省略時・null 時に false として扱う
    #[serde(default)]
    #[garde(skip)]
    pub audio_visual: Option<bool>,
    #[serde(default)]
    #[garde(skip)]
    pub video_conf: Option<bool>,
    #[serde(default)]
    #[garde(skip)]
    pub catering: Option<bool>,
}

impl CreateBookingRequest {
    // 終了時刻は開始時刻より厳密に後でなければならない
    pub fn ensure_time_range(&self) -> AppResult<()> {
        if self.end_time <= self.start_time {
            return Err(AppError::UnprocessableEntity("end not after start".into()));
        }
        Ok(())
    }
}

impl From<CreateBookingRequest> for CreateBooking {
    fn from(value: CreateBookingRequest) -> Self {
        let CreateBookingRequest {
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
        } = value;
        CreateBooking {
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
            audio_visual: audio_visual.unwrap_or(false),
            video_conf: video_conf.unwrap_or(false),
            catering: catering.unwrap_or(false),
        }
    }
}

fn positive_participants(value: &i32, _context: &()) -> garde::Result {
    if *value <= 0 {
        return Err(garde::Error::new("participants must be a positive number"));
    }
    Ok(())
}

// JSON の数値でも "12" のような文字列でも受け付ける
fn deserialize_participants<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(i64),
        Text(String),
    }

    let n = match NumberOrText::deserialize(deserializer)
        .map_err(|_| de::Error::custom("participants must be a positive number"))?
    {
        NumberOrText::Number(n) => n,
        NumberOrText::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom("participants must be a positive number"))?,
    };
    i32::try_from(n).map_err(|_| de::Error::custom("participants must be a positive number"))
}

// RFC 3339 のほか、タイムゾーンなしの "2024-01-01T10:00:00" も UTC として受け付ける
fn deserialize_flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer).map_err(|_| de::Error::custom("invalid date/time"))?;
    parse_datetime(&s).ok_or_else(|| de::Error::custom("invalid date/time"))
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub status: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<BookingListQuery> for BookingListFilter {
    type Error = AppError;

    fn try_from(value: BookingListQuery) -> Result<Self, Self::Error> {
        let status = value
            .status
            .map(|s| {
                s.parse::<BookingStatus>()
                    .map_err(|_| AppError::UnprocessableEntity("Invalid status value".into()))
            })
            .transpose()?;
        Ok(BookingListFilter::new(status, value.email))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

impl UpdateBookingStatusRequest {
    /// 閉じたステータス集合以外の値は受け付けない
    pub fn parse_status(&self) -> AppResult<BookingStatus> {
        if self.status.is_empty() {
            return Err(AppError::UnprocessableEntity("Missing status".into()));
        }
        self.status
            .parse::<BookingStatus>()
            .map_err(|_| AppError::UnprocessableEntity("Invalid status value".into()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
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
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
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
        Self {
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
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}
