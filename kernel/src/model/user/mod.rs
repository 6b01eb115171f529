use crate::model::{id::UserId, role::Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, Display, EnumString};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 承認待ちのアカウントはログインできない。
    /// 承認者ロールは承認ゲートの対象外とする。
    pub fn ensure_login_allowed(&self) -> AppResult<()> {
        if self.role != Role::Approver && self.status != UserStatus::Approved {
            return Err(AppError::ForbiddenOperation(
                "Your account is pending approval".into(),
            ));
        }
        Ok(())
    }
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
pub enum UserStatus {
    Pending,
    Approved,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, status: UserStatus) -> User {
        User {
            user_id: UserId::new(),
            email: "someone@example.com".into(),
            role,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pending_employee_cannot_login() {
        let res = user(Role::Employee, UserStatus::Pending).ensure_login_allowed();
        assert!(matches!(res, Err(AppError::ForbiddenOperation(_))));
    }

    #[test]
    fn approved_employee_can_login() {
        assert!(user(Role::Employee, UserStatus::Approved)
            .ensure_login_allowed()
            .is_ok());
    }

    #[test]
    fn approver_bypasses_the_approval_gate() {
        assert!(user(Role::Approver, UserStatus::Pending)
            .ensure_login_allowed()
            .is_ok());
    }
}
