use async_trait::async_trait;
use shared::error::AppResult;

/// ステータス遷移時に呼び出すメール通知のフック。
/// 呼び出し側は結果をログに残すだけで、レスポンスには反映させない。
#[async_trait]
pub trait MailNotifier: Send + Sync {
    async fn notify(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}
