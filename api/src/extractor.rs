use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use shared::error::AppError;

/// JSON ボディの展開に失敗したとき、axum 既定のレスポンスではなく
/// バリデーションエラーと同じ 400 + `{"error": ...}` の形に揃える extractor。
/// 必須フィールドの欠落はここで検出され、フィールド名つきで返る。
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::UnprocessableEntity(rejection.body_text())),
        }
    }
}
