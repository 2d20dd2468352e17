//! Book CRUD, search and rating handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    api::extract,
    auth::{AdminUser, CurrentUser},
    models::{BookDetail, BookPayload, Message, Pagination, RatePayload},
    state::AppState,
    Result,
};

pub async fn create_book(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    extract::Json(payload): extract::Json<BookPayload>,
) -> Result<Json<BookDetail>> {
    let book = state.catalog.create_book(payload).await?;
    Ok(Json(book))
}

pub async fn list_books(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<BookDetail>>> {
    let books = state.catalog.list_books(page).await?;
    Ok(Json(books))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BookDetail>> {
    let book = state.catalog.get_book(id).await?;
    Ok(Json(book))
}

pub async fn update_book(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
    extract::Json(payload): extract::Json<BookPayload>,
) -> Result<Json<BookDetail>> {
    let book = state.catalog.update_book(id, payload).await?;
    Ok(Json(book))
}

pub async fn delete_book(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Message>> {
    let message = state.catalog.delete_book(id).await?;
    Ok(Json(message))
}

pub async fn search_books(
    State(state): State<AppState>,
    Path(text): Path<String>,
) -> Result<Json<Vec<BookDetail>>> {
    let books = state.catalog.search_books(&text).await?;
    Ok(Json(books))
}

/// Any authenticated user may rate; admin is not required.
pub async fn rate_book(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    extract::Json(payload): extract::Json<RatePayload>,
) -> Result<Json<BookDetail>> {
    let book = state.catalog.rate_book(id, user.id, payload.rating).await?;
    Ok(Json(book))
}
