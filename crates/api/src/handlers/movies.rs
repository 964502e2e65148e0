//! Handlers for the `/movies` resource.
//!
//! Each handler translates the request into one storage call and sends the
//! storage response back as-is. Bodies are validated before create and
//! update reach the backend.

use axum::extract::{Path, State};
use movies_core::types::{MoviePatch, NewMovie};
use serde::Deserialize;

use crate::extract::{QueryParams, ValidatedJson};
use crate::response::StoreReply;
use crate::state::AppState;

/// Query parameters for `GET /movies`.
#[derive(Debug, Default, Deserialize)]
pub struct ListMoviesParams {
    /// Only return movies in this genre. An empty value means no filter.
    pub genre: Option<String>,
}

/// GET /movies
///
/// List all movies, optionally filtered by `?genre=`.
pub async fn list_movies(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListMoviesParams>,
) -> StoreReply {
    let genre = params.genre.as_deref().filter(|g| !g.is_empty());
    StoreReply(state.store.list(genre).await)
}

/// GET /movies/{id}
pub async fn get_movie(State(state): State<AppState>, Path(id): Path<String>) -> StoreReply {
    StoreReply(state.store.get(&id).await)
}

/// POST /movies
///
/// Create a movie from a full, validated body.
pub async fn create_movie(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewMovie>,
) -> StoreReply {
    let response = state.store.create(input).await;

    if let Some(movie) = response.movie().filter(|_| response.is_success()) {
        tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie created");
    }

    StoreReply(response)
}

/// PATCH /movies/{id}
///
/// Merge the supplied fields into an existing movie.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<MoviePatch>,
) -> StoreReply {
    let response = state.store.update(&id, patch).await;

    if response.is_success() {
        tracing::info!(movie_id = %id, "Movie updated");
    }

    StoreReply(response)
}

/// DELETE /movies/{id}
pub async fn delete_movie(State(state): State<AppState>, Path(id): Path<String>) -> StoreReply {
    let response = state.store.delete(&id).await;

    if response.is_success() {
        tracing::info!(movie_id = %id, "Movie deleted");
    }

    StoreReply(response)
}
