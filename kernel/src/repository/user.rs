use crate::model::{id::UserId, user::event::CreateUser, user::User};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    // ユーザーを登録する。ステータスは必ず pending で作成される
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    // メールアドレスとパスワードでユーザーを認証する
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;
    // ユーザーを承認済みにする
    async fn approve(&self, user_id: UserId) -> AppResult<User>;
    // 承認待ちのユーザー一覧を取得する
    async fn find_pending_all(&self) -> AppResult<Vec<User>>;
}
