use crate::database::{model::user::UserRow, ConnectionPool};
use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::model::{
    id::UserId,
    user::{event::CreateUser, User, UserStatus},
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    // ユーザー登録を行う
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let mut tx = self.db.begin().await?;

        // メールアドレスの一意性チェックと INSERT を同一トランザクションで行う。
        // 比較は大文字小文字を区別する完全一致
        let existing = sqlx::query_scalar::<_, UserId>(
            r#"
                SELECT user_id
                FROM users
                WHERE email = $1
                ;
            "#,
        )
        .bind(&event.email)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if existing.is_some() {
            return Err(AppError::ResourceConflict("Email already exists".into()));
        }

        // パスワードは平文では保存せず、ソルト付きハッシュにして保存する
        let password_hash = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;

        let user_id = UserId::new();
        let status = UserStatus::Pending;
        let created_at = Utc::now();
        let res = sqlx::query(
            r#"
                INSERT INTO users (user_id, email, password_hash, role, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ;
            "#,
        )
        .bind(user_id)
        .bind(&event.email)
        .bind(&password_hash)
        .bind(event.role.to_string())
        .bind(status.to_string())
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(User {
            user_id,
            email: event.email,
            role: event.role,
            status,
            created_at,
        })
    }

    // メールアドレスとパスワードでユーザーを認証する
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, email, password_hash, role, status, created_at
                FROM users
                WHERE email = $1
                ;
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound("User not found".into()));
        };

        let valid = bcrypt::verify(password, &row.password_hash)?;
        if !valid {
            return Err(AppError::UnauthenticatedError("Invalid password".into()));
        }

        row.try_into()
    }

    // ユーザーを承認済みにする。承認済みのユーザーに対しては何もしない
    async fn approve(&self, user_id: UserId) -> AppResult<User> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, email, password_hash, role, status, created_at
                FROM users
                WHERE user_id = $1
                ;
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound("User not found".into()));
        };

        let res = sqlx::query(
            r#"
                UPDATE users
                SET status = $1
                WHERE user_id = $2
                ;
            "#,
        )
        .bind(UserStatus::Approved.to_string())
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        let user: User = row.try_into()?;
        Ok(User {
            status: UserStatus::Approved,
            ..user
        })
    }

    // 承認待ちのユーザー一覧を登録日時の古い順で返す
    async fn find_pending_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, email, password_hash, role, status, created_at
                FROM users
                WHERE status = 'pending'
                ORDER BY created_at ASC
                ;
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(User::try_from).collect()
    }
}
