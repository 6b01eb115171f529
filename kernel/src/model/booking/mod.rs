use crate::model::id::BookingId;
use chrono::{DateTime, Utc};
use derive_new::new;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, Display, EnumString};

pub mod event;

#[derive(Debug, Clone)]
pub struct Booking {
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

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    // pending 以外は終端状態であり、通常の操作では遷移できない
    pub fn is_terminal(self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    /// 状態遷移の妥当性を検査する。
    ///
    /// 承認・却下などの通常操作は pending からの遷移のみ許可する。
    /// `force` は管理者による修正操作で、閉じたステータス集合の範囲内で
    /// 無条件に上書きできる。
    pub fn ensure_transition_to(self, _next: BookingStatus, force: bool) -> AppResult<()> {
        if !force && self.is_terminal() {
            return Err(AppError::UnprocessableEntity(
                "Booking is not pending".into(),
            ));
        }
        Ok(())
    }
}

/// `[s1, e1)` と `[s2, e2)` が重なるかどうか。
/// 半開区間なので、前の予約の終了時刻ちょうどに始まる予約は重ならない。
pub fn overlaps(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && s2 < e1
}

/// 重複判定の対象にどのステータスの予約を含めるか。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictScope {
    /// 却下済み・取消済みの予約は部屋を塞がない
    #[default]
    ActiveOnly,
    /// ステータスを問わず全予約を対象にする
    AllStatuses,
}

impl ConflictScope {
    pub fn counts(self, status: BookingStatus) -> bool {
        match self {
            ConflictScope::AllStatuses => true,
            ConflictScope::ActiveOnly => !matches!(
                status,
                BookingStatus::Rejected | BookingStatus::Cancelled
            ),
        }
    }
}

#[derive(Debug, Default, new)]
pub struct BookingListFilter {
    pub status: Option<BookingStatus>,
    pub email: Option<String>,
}
