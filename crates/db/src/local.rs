//! In-memory backend seeded from a JSON file.
//!
//! The file is read once, on a background task started by
//! [`LocalStore::load`]. Mutations only touch the in-memory list and are
//! lost when the process exits.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use movies_core::error::{StoreError, StoreResult};
use movies_core::readiness::Readiness;
use movies_core::response::{Deleted, MovieResponse, STATUS_CREATED, STATUS_OK};
use movies_core::store::{BackendKind, MovieStore};
use movies_core::types::{Movie, MoviePatch, NewMovie};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Failure to read the seed dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Movie list held in process memory.
pub struct LocalStore {
    movies: Readiness<RwLock<Vec<Movie>>>,
}

impl LocalStore {
    /// Start loading `path` in the background and return immediately.
    ///
    /// Must be called from within a Tokio runtime. If the file cannot be
    /// read the failure is logged and the store stays unavailable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let movies = Readiness::new();
        let slot = movies.clone();

        tokio::spawn(async move {
            match read_movies(&path).await {
                Ok(list) => {
                    tracing::info!(path = %path.display(), count = list.len(), "Local movie dataset loaded");
                    slot.mark_ready(RwLock::new(list));
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to load local movie dataset");
                }
            }
        });

        Self { movies }
    }

    /// A store that is ready immediately with `movies`.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        Self {
            movies: Readiness::ready(RwLock::new(movies)),
        }
    }

    async fn try_list(&self, genre: Option<&str>) -> StoreResult<Vec<Movie>> {
        let movies = self.movies.get()?.read().await;

        let found: Vec<Movie> = match genre {
            Some(genre) => {
                let wanted = normalize_genre_filter(genre);
                movies
                    .iter()
                    .filter(|m| m.genre.iter().any(|g| g.to_lowercase() == wanted))
                    .cloned()
                    .collect()
            }
            None => movies.clone(),
        };

        if found.is_empty() {
            return Err(StoreError::NoMovies);
        }
        Ok(found)
    }

    async fn try_get(&self, id: &str) -> StoreResult<Movie> {
        let movies = self.movies.get()?.read().await;
        movies
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn try_create(&self, input: NewMovie) -> StoreResult<Movie> {
        let mut movies = self.movies.get()?.write().await;
        let movie = input.into_movie(Uuid::new_v4().to_string());
        movies.push(movie.clone());
        Ok(movie)
    }

    async fn try_update(&self, id: &str, patch: MoviePatch) -> StoreResult<Movie> {
        let mut movies = self.movies.get()?.write().await;
        let movie = movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound)?;
        movie.apply(patch);
        Ok(movie.clone())
    }

    async fn try_delete(&self, id: &str) -> StoreResult<Deleted> {
        let mut movies = self.movies.get()?.write().await;
        let index = movies
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::NotFound)?;
        movies.remove(index);
        Ok(Deleted)
    }
}

#[async_trait]
impl MovieStore for LocalStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn is_ready(&self) -> bool {
        self.movies.is_ready()
    }

    async fn wait_until_ready(&self) {
        tracing::debug!("Waiting for local movie dataset");
        self.movies.wait().await;
    }

    async fn list(&self, genre: Option<&str>) -> MovieResponse {
        MovieResponse::from_result(STATUS_OK, self.try_list(genre).await)
    }

    async fn get(&self, id: &str) -> MovieResponse {
        MovieResponse::from_result(STATUS_OK, self.try_get(id).await)
    }

    async fn create(&self, movie: NewMovie) -> MovieResponse {
        MovieResponse::from_result(STATUS_CREATED, self.try_create(movie).await)
    }

    async fn update(&self, id: &str, patch: MoviePatch) -> MovieResponse {
        MovieResponse::from_result(STATUS_OK, self.try_update(id, patch).await)
    }

    async fn delete(&self, id: &str) -> MovieResponse {
        MovieResponse::from_result(STATUS_OK, self.try_delete(id).await)
    }
}

async fn read_movies(path: &Path) -> Result<Vec<Movie>, LoadError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Lowercase the filter and turn its first space into a hyphen, so
/// `"Sci Fi"` matches a stored `"Sci-Fi"`.
fn normalize_genre_filter(genre: &str) -> String {
    genre.to_lowercase().replacen(' ', "-", 1)
}
