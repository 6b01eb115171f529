use crate::database::{model::booking::BookingRow, ConnectionPool};
use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::model::booking::{
    event::{CreateBooking, UpdateBookingStatus},
    Booking, BookingListFilter, BookingStatus, ConflictScope,
};
use kernel::model::id::BookingId;
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
    conflict_scope: ConflictScope,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    // 予約作成を行う
    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // 重複チェックと INSERT を同一トランザクションで行うことで、
        // 同時刻に届いた 2 つの予約リクエストが両方ともチェックを
        // 通過してしまうのを防ぐ。
        //
        // 重複条件：
        //     existing.start < new.end AND new.start < existing.end
        {
            let sql = match self.conflict_scope {
                ConflictScope::AllStatuses => {
                    r#"
                    SELECT booking_id
                    FROM bookings
                    WHERE meeting_room = $1
                      AND start_time < $3
                      AND $2 < end_time
                    LIMIT 1;
                    "#
                }
                ConflictScope::ActiveOnly => {
                    r#"
                    SELECT booking_id
                    FROM bookings
                    WHERE meeting_room = $1
                      AND start_time < $3
                      AND $2 < end_time
                      AND status NOT IN ('rejected', 'cancelled')
                    LIMIT 1;
                    "#
                }
            };

            let overlap = sqlx::query_scalar::<_, BookingId>(sql)
                .bind(&event.meeting_room)
                .bind(event.start_time)
                .bind(event.end_time)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

            if overlap.is_some() {
                return Err(AppError::ResourceConflict(
                    "Room already booked at this time.".into(),
                ));
            }
        }

        // チェックを通過したので bookings テーブルにレコードを追加する。
        // ステータスはクライアントの入力に関係なく pending 固定
        let booking_id = BookingId::new();
        let status = BookingStatus::Pending;
        let created_at = Utc::now();
        let res = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, booking_name, project_name, program_name, program_title,
                participants, event_in_charge, in_charge_email, approver_email,
                meeting_room, start_time, end_time,
                audio_visual, video_conf, catering, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                ;
            "#,
        )
        .bind(booking_id)
        .bind(&event.booking_name)
        .bind(&event.project_name)
        .bind(&event.program_name)
        .bind(&event.program_title)
        .bind(event.participants)
        .bind(&event.event_in_charge)
        .bind(&event.in_charge_email)
        .bind(&event.approver_email)
        .bind(&event.meeting_room)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.audio_visual)
        .bind(event.video_conf)
        .bind(event.catering)
        .bind(status.to_string())
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        let CreateBooking {
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
        } = event;
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

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT
                booking_id, booking_name, project_name, program_name, program_title,
                participants, event_in_charge, in_charge_email, approver_email,
                meeting_room, start_time, end_time,
                audio_visual, video_conf, catering, status, created_at
                FROM bookings
                WHERE booking_id = $1
                ;
            "#,
        )
        .bind(booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Booking::try_from).transpose()
    }

    // ステータス・メールアドレスで絞り込んだ一覧を開始時刻の降順で返す
    async fn find_all(&self, filter: BookingListFilter) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT
                booking_id, booking_name, project_name, program_name, program_title,
                participants, event_in_charge, in_charge_email, approver_email,
                meeting_room, start_time, end_time,
                audio_visual, video_conf, catering, status, created_at
                FROM bookings
                WHERE ($1::text IS NULL OR status = $1)
                  AND ($2::text IS NULL OR in_charge_email = $2 OR approver_email = $2)
                ORDER BY start_time DESC
                ;
            "#,
        )
        .bind(filter.status.map(|s| s.to_string()))
        .bind(filter.email)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    // ステータス更新を行う
    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // 現在のステータスの読み取りと遷移チェック、UPDATE を
        // 同一トランザクションで行う。同じ予約への同時操作が
        // 交差して二重承認になるのを防ぐ
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT
                booking_id, booking_name, project_name, program_name, program_title,
                participants, event_in_charge, in_charge_email, approver_email,
                meeting_room, start_time, end_time,
                audio_visual, video_conf, catering, status, created_at
                FROM bookings
                WHERE booking_id = $1
                ;
            "#,
        )
        .bind(event.booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound("Booking not found".into()));
        };
        let booking = Booking::try_from(row)?;

        booking
            .status
            .ensure_transition_to(event.status, event.force)?;
        if event.force && booking.status.is_terminal() {
            tracing::warn!(
                booking_id = %event.booking_id,
                from = %booking.status,
                to = %event.status,
                "administrative status overwrite past a terminal state"
            );
        }

        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET status = $1
                WHERE booking_id = $2
                ;
            "#,
        )
        .bind(event.status.to_string())
        .bind(event.booking_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Booking {
            status: event.status,
            ..booking
        })
    }
}

impl BookingRepositoryImpl {
    // create, update_status メソッドでのトランザクションを利用するにあたり
    // トランザクション分離レベルを SERIALIZABLE にするために
    // 内部的に使うメソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}
