use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::mailer::{GmailNotifier, LogOnlyNotifier};
use adapter::repository::booking::BookingRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use kernel::model::booking::ConflictScope;
use kernel::notifier::MailNotifier;
use kernel::repository::booking::BookingRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    user_repository: Arc<dyn UserRepository>,
    mail_notifier: Arc<dyn MailNotifier>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: AppConfig) -> Self {
        let conflict_scope = if app_config.booking.conflict_all_statuses {
            ConflictScope::AllStatuses
        } else {
            ConflictScope::ActiveOnly
        };
        // アクセストークンが未設定の環境ではログ出力のみの実装に差し替える
        let mail_notifier: Arc<dyn MailNotifier> = if app_config.mail.access_token.is_empty() {
            Arc::new(LogOnlyNotifier::new())
        } else {
            Arc::new(GmailNotifier::new(app_config.mail))
        };
        Self {
            health_check_repository: Arc::new(HealthCheckRepositoryImpl::new(pool.clone())),
            booking_repository: Arc::new(BookingRepositoryImpl::new(pool.clone(), conflict_scope)),
            user_repository: Arc::new(UserRepositoryImpl::new(pool.clone())),
            mail_notifier,
        }
    }

    /// テストで代替実装を差し込むためのコンストラクタ
    pub fn from_parts(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        booking_repository: Arc<dyn BookingRepository>,
        user_repository: Arc<dyn UserRepository>,
        mail_notifier: Arc<dyn MailNotifier>,
    ) -> Self {
        Self {
            health_check_repository,
            booking_repository,
            user_repository,
            mail_notifier,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn mail_notifier(&self) -> Arc<dyn MailNotifier> {
        self.mail_notifier.clone()
    }
}
