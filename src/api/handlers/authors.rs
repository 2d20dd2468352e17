//! Author CRUD and search handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    api::extract,
    auth::AdminUser,
    models::{AuthorDeletion, AuthorDetail, AuthorPayload, Pagination},
    state::AppState,
    Result,
};

pub async fn create_author(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    extract::Json(payload): extract::Json<AuthorPayload>,
) -> Result<Json<AuthorDetail>> {
    let author = state.catalog.create_author(payload).await?;
    Ok(Json(author))
}

pub async fn list_authors(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<AuthorDetail>>> {
    let authors = state.catalog.list_authors(page).await?;
    Ok(Json(authors))
}

pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AuthorDetail>> {
    let author = state.catalog.get_author(id).await?;
    Ok(Json(author))
}

pub async fn update_author(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
    extract::Json(payload): extract::Json<AuthorPayload>,
) -> Result<Json<AuthorDetail>> {
    let author = state.catalog.update_author(id, payload).await?;
    Ok(Json(author))
}

pub async fn delete_author(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<AuthorDeletion>> {
    let result = state.catalog.delete_author(id).await?;
    Ok(Json(result))
}

pub async fn search_authors(
    State(state): State<AppState>,
    Path(text): Path<String>,
) -> Result<Json<Vec<AuthorDetail>>> {
    let authors = state.catalog.search_authors(&text).await?;
    Ok(Json(authors))
}
