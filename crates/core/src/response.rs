//! The `(status, payload)` envelope every storage operation returns.
//!
//! Payloads serialise to the exact JSON bodies the HTTP layer sends:
//! a movie object, an array of movies, `{ "error": ... }` or
//! `{ "message": ... }`.

use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::types::Movie;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;

/// Confirmation text for a successful delete.
pub const MOVIE_DELETED: &str = "Movie deleted";

/// Body of a storage response. Exactly one variant per response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Movie(Movie),
    Movies(Vec<Movie>),
    Error { error: String },
    Message { message: String },
}

impl From<Movie> for Payload {
    fn from(movie: Movie) -> Self {
        Payload::Movie(movie)
    }
}

impl From<Vec<Movie>> for Payload {
    fn from(movies: Vec<Movie>) -> Self {
        Payload::Movies(movies)
    }
}

/// Marker for a successful delete, carrying no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deleted;

impl From<Deleted> for Payload {
    fn from(_: Deleted) -> Self {
        Payload::Message {
            message: MOVIE_DELETED.to_string(),
        }
    }
}

/// Status code plus payload, as produced by a [`MovieStore`](crate::store::MovieStore).
#[derive(Debug, Clone, PartialEq)]
pub struct MovieResponse {
    pub status: u16,
    pub payload: Payload,
}

impl MovieResponse {
    /// Build a response from a backend result, using `status` on success.
    pub fn from_result<T: Into<Payload>>(status: u16, result: StoreResult<T>) -> Self {
        match result {
            Ok(value) => Self {
                status,
                payload: value.into(),
            },
            Err(err) => err.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The single movie carried by this response, if any.
    pub fn movie(&self) -> Option<&Movie> {
        match &self.payload {
            Payload::Movie(movie) => Some(movie),
            _ => None,
        }
    }

    /// The movie list carried by this response, if any.
    pub fn movies(&self) -> Option<&[Movie]> {
        match &self.payload {
            Payload::Movies(movies) => Some(movies),
            _ => None,
        }
    }

    /// The `error` text carried by this response, if any.
    pub fn error(&self) -> Option<&str> {
        match &self.payload {
            Payload::Error { error } => Some(error),
            _ => None,
        }
    }
}

impl From<StoreError> for MovieResponse {
    fn from(err: StoreError) -> Self {
        Self {
            status: err.status(),
            payload: Payload::Error {
                error: err.to_string(),
            },
        }
    }
}
