//! Router assembly.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{api::handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/authors", author_routes())
        .nest("/books", book_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/token", post(handlers::auth::login))
        .route("/users", get(handlers::auth::list_users))
        .route("/users/:id", axum::routing::delete(handlers::auth::delete_user))
}

fn author_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::authors::create_author).get(handlers::authors::list_authors),
        )
        .route(
            "/:id",
            get(handlers::authors::get_author)
                .put(handlers::authors::update_author)
                .delete(handlers::authors::delete_author),
        )
        .route("/search/:text", get(handlers::authors::search_authors))
}

fn book_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::books::create_book).get(handlers::books::list_books),
        )
        .route(
            "/:id",
            get(handlers::books::get_book)
                .put(handlers::books::update_book)
                .delete(handlers::books::delete_book),
        )
        .route("/search/:text", get(handlers::books::search_books))
        .route("/:id/rate", post(handlers::books::rate_book))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
