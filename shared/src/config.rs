use anyhow::Result;
use std::env;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub mail: MailConfig,
    pub server: ServerConfig,
    pub booking: BookingConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST")?,
            port: env::var("DATABASE_PORT")?.parse()?,
            username: env::var("DATABASE_USERNAME")?,
            password: env::var("DATABASE_PASSWORD")?,
            database: env::var("DATABASE_NAME")?,
        };
        let mail = MailConfig {
            endpoint: env::var("MAIL_SEND_ENDPOINT").unwrap_or_else(|_| {
                "https://gmail.googleapis.com/gmail/v1/users/me/messages/send".into()
            }),
            access_token: env::var("MAIL_ACCESS_TOKEN").unwrap_or_default(),
            sender: env::var("MAIL_SENDER").unwrap_or_else(|_| "no-reply@example.com".into()),
        };
        let server = ServerConfig {
            port: env::var("PORT")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(8080),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };
        let booking = BookingConfig {
            // true にすると、却下済み・取消済みの予約も重複判定の対象になる
            conflict_all_statuses: env::var("BOOKING_CONFLICT_ALL_STATUSES")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(false),
        };
        Ok(Self {
            database,
            mail,
            server,
            booking,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct MailConfig {
    pub endpoint: String,
    pub access_token: String,
    pub sender: String,
}

pub struct ServerConfig {
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

pub struct BookingConfig {
    pub conflict_all_statuses: bool,
}
