pub mod health;
pub mod movies;

use axum::Router;

use crate::state::AppState;

/// Build the resource routes.
///
/// Route hierarchy:
///
/// ```text
/// /movies                 list (?genre=), create
/// /movies/{id}            get, update (PATCH), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(movies::router())
}
