use kernel::model::{
    id::UserId,
    role::Role,
    user::{User, UserStatus},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            email,
            password_hash: _,
            role,
            status,
            created_at,
        } = value;
        let role = role
            .parse::<Role>()
            .map_err(|_| AppError::ConversionEntityError(format!("unknown role: {role}")))?;
        let status = status.parse::<UserStatus>().map_err(|_| {
            AppError::ConversionEntityError(format!("unknown user status: {status}"))
        })?;
        Ok(User {
            user_id,
            email,
            role,
            status,
            created_at,
        })
    }
}
