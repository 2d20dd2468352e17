//! Registration, login and user administration handlers.

use axum::{
    extract::{Path, State},
    Form, Json,
};

use crate::{
    api::extract,
    auth::AdminUser,
    models::{LoginForm, Message, RegisterPayload, TokenResponse, UserResponse},
    state::AppState,
    Result,
};

pub async fn register(
    State(state): State<AppState>,
    extract::Json(payload): extract::Json<RegisterPayload>,
) -> Result<Json<UserResponse>> {
    let user = state.accounts.register(payload).await?;
    Ok(Json(user))
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>> {
    let token = state.accounts.login(form).await?;
    Ok(Json(token))
}

pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<UserResponse>>> {
    let users = state.accounts.list_users().await?;
    Ok(Json(users))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Message>> {
    state.accounts.delete_user(id).await?;
    Ok(Json(Message::new("User deleted successfully")))
}
