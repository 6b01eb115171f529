use crate::model::{
    booking::{
        event::{CreateBooking, UpdateBookingStatus},
        Booking, BookingListFilter,
    },
    id::BookingId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    // 予約を作成する。重複チェックと INSERT は単一トランザクションで行う
    async fn create(&self, event: CreateBooking) -> AppResult<Booking>;
    // booking_id から予約を取得する
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    // 条件に合う予約の一覧を開始時刻の降順で取得する
    async fn find_all(&self, filter: BookingListFilter) -> AppResult<Vec<Booking>>;
    // 予約のステータスを更新する。遷移の妥当性チェックも同一トランザクションで行う
    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<Booking>;
}
