//! The storage contract shared by every movie backend.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::response::MovieResponse;
use crate::types::{MoviePatch, NewMovie};

/// Which backend serves the process. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// JSON file loaded into memory.
    Local,
    /// MongoDB collection.
    Document,
    /// MySQL `movie` / `genre` / `movie_genre` tables.
    Relational,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::Local,
        BackendKind::Document,
        BackendKind::Relational,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Document => "document",
            BackendKind::Relational => "relational",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    /// Accepts the canonical names plus the driver names (`mongodb`, `mysql`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "json" => Ok(BackendKind::Local),
            "document" | "mongodb" | "mongo" => Ok(BackendKind::Document),
            "relational" | "mysql" => Ok(BackendKind::Relational),
            other => Err(format!(
                "Invalid backend '{other}'. Must be one of: local, document, relational"
            )),
        }
    }
}

/// CRUD over movies, uniform across backends.
///
/// Implementations never return a raw failure: each operation classifies
/// its own driver errors and answers with a [`MovieResponse`].
#[async_trait]
pub trait MovieStore: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Non-blocking readiness check used on the request path.
    fn is_ready(&self) -> bool;

    /// Resolve once the backend has finished its asynchronous setup.
    ///
    /// Polls; do not call from request handlers.
    async fn wait_until_ready(&self);

    /// All movies, or those whose genres contain `genre`.
    ///
    /// 200 with the list, 404 `No movies found` when the result is empty.
    async fn list(&self, genre: Option<&str>) -> MovieResponse;

    /// 200 with the movie, 404 `Movie not found` on a miss or malformed id.
    async fn get(&self, id: &str) -> MovieResponse;

    /// Persist a new movie and answer 201 with the stored record.
    async fn create(&self, movie: NewMovie) -> MovieResponse;

    /// Merge `patch` into an existing movie and answer 200 with the result.
    async fn update(&self, id: &str, patch: MoviePatch) -> MovieResponse;

    /// Hard-delete a movie; 200 `Movie deleted` or 404.
    async fn delete(&self, id: &str) -> MovieResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_driver_names() {
        assert_eq!("local".parse(), Ok(BackendKind::Local));
        assert_eq!("MongoDB".parse(), Ok(BackendKind::Document));
        assert_eq!("mysql".parse(), Ok(BackendKind::Relational));
        assert_eq!("relational".parse(), Ok(BackendKind::Relational));
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = "redis".parse::<BackendKind>().unwrap_err();
        assert!(err.contains("redis"));
    }

    #[test]
    fn display_round_trips() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.to_string().parse(), Ok(kind));
        }
    }
}
