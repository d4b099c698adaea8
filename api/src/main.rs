//! REST passthrough over the library database.
//!
//! Unauthenticated read-only endpoints mirroring the catalog queries; the
//! search and saved-items logic lives in the `ghadir` crate and is not
//! exposed here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ghadir::{AppState, Book, Chapter, Hadith, LibraryError, Volume};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(err: LibraryError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let book_count = state.store.list_books().map(|books| books.len()).unwrap_or(0);
    Json(serde_json::json!({
        "status": "ok",
        "books": book_count,
    }))
}

async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    state.store.list_books().map(Json).map_err(internal_error)
}

async fn book_volumes(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<i64>,
) -> Result<Json<Vec<Volume>>, ApiError> {
    state
        .store
        .volumes_for_book(book_id)
        .map(Json)
        .map_err(internal_error)
}

async fn volume_chapters(
    State(state): State<Arc<AppState>>,
    Path(volume_id): Path<i64>,
) -> Result<Json<Vec<Chapter>>, ApiError> {
    state
        .store
        .chapters_for_volume(volume_id)
        .map(Json)
        .map_err(internal_error)
}

async fn book_chapters(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<i64>,
) -> Result<Json<Vec<Chapter>>, ApiError> {
    state
        .store
        .chapters_for_book(book_id)
        .map(Json)
        .map_err(internal_error)
}

async fn chapter_hadith(
    State(state): State<Arc<AppState>>,
    Path(chapter_id): Path<i64>,
) -> Result<Json<Vec<Hadith>>, ApiError> {
    state
        .chapter_cache
        .get(chapter_id)
        .map(|hadiths| Json((*hadiths).clone()))
        .map_err(internal_error)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let db_path = std::env::var("GHADIR_DB")
        .map(Into::into)
        .unwrap_or_else(|_| ghadir::default_db_path());
    let state = Arc::new(AppState::new(db_path)?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/books", get(list_books))
        .route("/api/books/:book_id/volumes", get(book_volumes))
        .route("/api/books/:book_id/chapters", get(book_chapters))
        .route("/api/volumes/:volume_id/chapters", get(volume_chapters))
        .route("/api/chapters/:chapter_id/hadith", get(chapter_hadith))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:4000").await?;
    tracing::info!("Listening on http://127.0.0.1:4000");
    axum::serve(listener, app).await?;

    Ok(())
}
