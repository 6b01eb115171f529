//! ルーターを本物の axum スタックごと駆動するための共通ヘルパー。
//! 永続化とメール送信はインメモリの代替実装に差し替える。

use std::sync::{Arc, Mutex};

use api::route::{
    auth::build_auth_routers, booking::build_booking_routers, health::build_health_check_routers,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use kernel::model::booking::{
    event::{CreateBooking, UpdateBookingStatus},
    overlaps, Booking, BookingListFilter, BookingStatus, ConflictScope,
};
use kernel::model::id::{BookingId, UserId};
use kernel::model::user::{event::CreateUser, User, UserStatus};
use kernel::notifier::MailNotifier;
use kernel::repository::booking::BookingRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::user::UserRepository;
use registry::AppRegistry;
use serde_json::Value;
use shared::error::{AppError, AppResult};
use tower::ServiceExt;

pub struct InMemoryBookingRepository {
    conflict_scope: ConflictScope,
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new(conflict_scope: ConflictScope) -> Self {
        Self {
            conflict_scope,
            bookings: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        // ロックの中で重複チェックと追加を行い、本番実装の
        // 単一トランザクションと同じ原子性を保つ
        let mut bookings = self.bookings.lock().unwrap();
        let conflict = bookings.iter().any(|b| {
            b.meeting_room == event.meeting_room
                && self.conflict_scope.counts(b.status)
                && overlaps(b.start_time, b.end_time, event.start_time, event.end_time)
        });
        if conflict {
            return Err(AppError::ResourceConflict(
                "Room already booked at this time.".into(),
            ));
        }

        let booking = Booking {
            booking_id: BookingId::new(),
            booking_name: event.booking_name,
            project_name: event.project_name,
            program_name: event.program_name,
            program_title: event.program_title,
            participants: event.participants,
            event_in_charge: event.event_in_charge,
            in_charge_email: event.in_charge_email,
            approver_email: event.approver_email,
            meeting_room: event.meeting_room,
            start_time: event.start_time,
            end_time: event.end_time,
            audio_visual: event.audio_visual,
            video_conf: event.video_conf,
            catering: event.catering,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.iter().find(|b| b.booking_id == booking_id).cloned())
    }

    async fn find_all(&self, filter: BookingListFilter) -> AppResult<Vec<Booking>> {
        let bookings = self.bookings.lock().unwrap();
        let mut found: Vec<Booking> = bookings
            .iter()
            .filter(|b| filter.status.map_or(true, |s| b.status == s))
            .filter(|b| {
                filter.email.as_deref().map_or(true, |email| {
                    b.in_charge_email == email || b.approver_email == email
                })
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(found)
    }

    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .iter_mut()
            .find(|b| b.booking_id == event.booking_id)
            .ok_or_else(|| AppError::EntityNotFound("Booking not found".into()))?;

        booking.status.ensure_transition_to(event.status, event.force)?;
        booking.status = event.status;
        Ok(booking.clone())
    }
}

struct StoredUser {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<StoredUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        // 大文字小文字を区別する完全一致
        if users.iter().any(|u| u.user.email == event.email) {
            return Err(AppError::ResourceConflict("Email already exists".into()));
        }

        let user = User {
            user_id: UserId::new(),
            email: event.email,
            role: event.role,
            status: UserStatus::Pending,
            created_at: Utc::now(),
        };
        users.push(StoredUser {
            user: user.clone(),
            password: event.password,
        });
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let users = self.users.lock().unwrap();
        let stored = users
            .iter()
            .find(|u| u.user.email == email)
            .ok_or_else(|| AppError::EntityNotFound("User not found".into()))?;

        if stored.password != password {
            return Err(AppError::UnauthenticatedError("Invalid password".into()));
        }
        Ok(stored.user.clone())
    }

    async fn approve(&self, user_id: UserId) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| u.user.user_id == user_id)
            .ok_or_else(|| AppError::EntityNotFound("User not found".into()))?;

        stored.user.status = UserStatus::Approved;
        Ok(stored.user.clone())
    }

    async fn find_pending_all(&self) -> AppResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        let mut found: Vec<User> = users
            .iter()
            .filter(|u| u.user.status == UserStatus::Pending)
            .map(|u| u.user.clone())
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }
}

pub struct StubHealthCheckRepository;

#[async_trait]
impl HealthCheckRepository for StubHealthCheckRepository {
    async fn check_db(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// 送信内容を記録するだけの通知実装。`failing` で常に失敗させられる
#[derive(Default)]
pub struct RecordingNotifier {
    fail: bool,
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailNotifier for RecordingNotifier {
    async fn notify(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        });
        if self.fail {
            return Err(AppError::ExternalServiceError("mail send failed".into()));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn spawn_app() -> TestApp {
    app_with(ConflictScope::ActiveOnly, Arc::new(RecordingNotifier::new()))
}

pub fn app_with(conflict_scope: ConflictScope, notifier: Arc<RecordingNotifier>) -> TestApp {
    let registry = AppRegistry::from_parts(
        Arc::new(StubHealthCheckRepository),
        Arc::new(InMemoryBookingRepository::new(conflict_scope)),
        Arc::new(InMemoryUserRepository::new()),
        notifier.clone(),
    );

    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_booking_routers())
        .merge(build_auth_routers())
        .with_state(registry);

    TestApp { router, notifier }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json("POST", uri, body).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn patch(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json("PATCH", uri, body).await
    }

    async fn send_json(&self, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

/// handler が spawn したベストエフォート通知タスクを走らせる
pub async fn run_spawned_tasks() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
