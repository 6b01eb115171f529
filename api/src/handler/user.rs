use crate::{
    extractor::AppJson,
    model::{
        user::{LoginRequest, LoginResponse, RegisterUserRequest, UserResponse, UsersResponse},
        MessageResponse,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::id::UserId;
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn register_user(
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<RegisterUserRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate(&())?;

    registry
        .user_repository()
        .create(req.into())
        .await
        .map(|user| (StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn login(
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate(&())?;

    let user = registry
        .user_repository()
        .authenticate(&req.email, &req.password)
        .await?;
    user.ensure_login_allowed()?;

    Ok(Json(LoginResponse {
        role: user.role,
        status: user.status,
    }))
}

pub async fn approve_user(
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MessageResponse>> {
    registry
        .user_repository()
        .approve(user_id)
        .await
        .map(|_| Json(MessageResponse::new("User approved")))
}

pub async fn show_pending_users(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UsersResponse>> {
    registry
        .user_repository()
        .find_pending_all()
        .await
        .map(UsersResponse::from)
        .map(Json)
}
