//! MySQL backend.
//!
//! Schema (see `migrations/`):
//!
//! ```text
//! movie       (id BINARY(16), title, year, director, duration, poster, rate)
//! genre       (id INT, name)
//! movie_genre (movie_id -> movie.id, genre_id -> genre.id)
//! ```
//!
//! Multi-statement writes (movie row plus genre links, or relinking genres
//! on update) run without a transaction. A failure part-way through leaves
//! the rows written so far in place; in particular an unknown genre aborts
//! create/update with 400 after earlier links were already inserted.

use async_trait::async_trait;
use movies_core::error::{StoreError, StoreResult};
use movies_core::response::{Deleted, MovieResponse, STATUS_CREATED, STATUS_OK};
use movies_core::store::{BackendKind, MovieStore};
use movies_core::types::{Movie, MoviePatch, NewMovie};
use sqlx::mysql::MySqlDatabaseError;
use sqlx::FromRow;
use uuid::Uuid;

use crate::DbPool;

/// MySQL `ER_WRONG_VALUE_FOR_TYPE`, raised by `UUID_TO_BIN` on a malformed id.
const ER_WRONG_VALUE_FOR_TYPE: u16 = 1411;

/// Column list for `movie m` queries.
const MOVIE_COLUMNS: &str = "\
    BIN_TO_UUID(m.id) AS id, m.title, m.year, m.director, \
    m.duration, m.poster, m.rate";

/// A row from the `movie` table, without genres.
#[derive(Debug, Clone, FromRow)]
struct MovieRow {
    id: String,
    title: String,
    year: i32,
    director: String,
    duration: i32,
    poster: String,
    rate: f64,
}

impl MovieRow {
    fn into_movie(self, genre: Vec<String>) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            year: self.year,
            director: self.director,
            duration: self.duration,
            poster: self.poster,
            genre,
            rate: Some(self.rate),
        }
    }
}

/// Movie store backed by MySQL.
///
/// Always ready: the pool accepts queries immediately and connects on
/// demand.
pub struct RelationalStore {
    pool: DbPool,
}

impl RelationalStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List movies.
    ///
    /// Without a filter genres are not loaded and every movie carries an
    /// empty list. With a filter each movie carries only the matched
    /// (normalised) genre, not its full set.
    async fn try_list(&self, genre: Option<&str>) -> StoreResult<Vec<Movie>> {
        let movies: Vec<Movie> = match genre {
            Some(genre) => {
                let wanted = normalize_genre_filter(genre);
                let query = format!(
                    "SELECT {MOVIE_COLUMNS} FROM movie m \
                     JOIN movie_genre mg ON m.id = mg.movie_id \
                     JOIN genre g ON mg.genre_id = g.id \
                     WHERE LOWER(g.name) = ?"
                );
                sqlx::query_as::<_, MovieRow>(&query)
                    .bind(&wanted)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(classify)?
                    .into_iter()
                    .map(|row| row.into_movie(vec![wanted.clone()]))
                    .collect()
            }
            None => {
                let query = format!("SELECT {MOVIE_COLUMNS} FROM movie m");
                sqlx::query_as::<_, MovieRow>(&query)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(classify)?
                    .into_iter()
                    .map(|row| row.into_movie(Vec::new()))
                    .collect()
            }
        };

        if movies.is_empty() {
            return Err(StoreError::NoMovies);
        }
        Ok(movies)
    }

    /// Fetch one movie with its full genre list.
    async fn try_get(&self, id: &str) -> StoreResult<Movie> {
        if Uuid::parse_str(id).is_err() {
            return Err(StoreError::NotFound);
        }

        let query = format!("SELECT {MOVIE_COLUMNS} FROM movie m WHERE m.id = UUID_TO_BIN(?)");
        let row = sqlx::query_as::<_, MovieRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?
            .ok_or(StoreError::NotFound)?;

        let genre = sqlx::query_scalar::<_, String>(
            "SELECT g.name FROM movie_genre mg \
             JOIN genre g ON mg.genre_id = g.id \
             WHERE mg.movie_id = UUID_TO_BIN(?)",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.into_movie(genre))
    }

    async fn try_create(&self, input: NewMovie) -> StoreResult<Movie> {
        let id: String = sqlx::query_scalar("SELECT UUID()")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        sqlx::query(
            "INSERT INTO movie (id, title, year, director, duration, poster, rate) \
             VALUES (UUID_TO_BIN(?), ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&input.title)
        .bind(input.year)
        .bind(&input.director)
        .bind(input.duration)
        .bind(&input.poster)
        .bind(input.rate.unwrap_or(0.0))
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        self.link_genres(&id, &input.genre).await?;

        self.try_get(&id).await
    }

    /// Read, merge, write. Genre links are only rebuilt when `patch`
    /// carries a genre list.
    async fn try_update(&self, id: &str, patch: MoviePatch) -> StoreResult<Movie> {
        let mut movie = self.try_get(id).await?;
        let relink = patch.genre.is_some();
        movie.apply(patch);

        sqlx::query(
            "UPDATE movie SET title = ?, year = ?, director = ?, duration = ?, \
             poster = ?, rate = ? WHERE id = UUID_TO_BIN(?)",
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(&movie.director)
        .bind(movie.duration)
        .bind(&movie.poster)
        .bind(movie.rate.unwrap_or(0.0))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if relink {
            sqlx::query("DELETE FROM movie_genre WHERE movie_id = UUID_TO_BIN(?)")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(classify)?;
            self.link_genres(id, &movie.genre).await?;
        }

        self.try_get(id).await
    }

    async fn try_delete(&self, id: &str) -> StoreResult<Deleted> {
        self.try_get(id).await?;

        sqlx::query("DELETE FROM movie_genre WHERE movie_id = UUID_TO_BIN(?)")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        sqlx::query("DELETE FROM movie WHERE id = UUID_TO_BIN(?)")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(Deleted)
    }

    /// Insert one `movie_genre` row per genre name, in order. Stops with
    /// [`StoreError::InvalidGenre`] at the first unknown name.
    async fn link_genres(&self, movie_id: &str, genres: &[String]) -> StoreResult<()> {
        for name in genres {
            let genre_id: i32 = sqlx::query_scalar("SELECT id FROM genre WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(classify)?
                .ok_or_else(|| {
                    tracing::warn!(movie_id, genre = %name, "Unknown genre");
                    StoreError::InvalidGenre
                })?;

            sqlx::query("INSERT INTO movie_genre (movie_id, genre_id) VALUES (UUID_TO_BIN(?), ?)")
                .bind(movie_id)
                .bind(genre_id)
                .execute(&self.pool)
                .await
                .map_err(classify)?;
        }
        Ok(())
    }
}

#[async_trait]
impl MovieStore for RelationalStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Relational
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn wait_until_ready(&self) {}

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

/// Classify a sqlx error.
///
/// - MySQL 1411 (malformed UUID passed to `UUID_TO_BIN`) maps to not found.
/// - Everything else is logged and maps to internal.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err
            .try_downcast_ref::<MySqlDatabaseError>()
            .is_some_and(|e| e.number() == ER_WRONG_VALUE_FOR_TYPE)
        {
            return StoreError::NotFound;
        }
    }
    tracing::error!(error = %err, "Relational store query failed");
    StoreError::internal(err)
}

/// Lowercase the filter and turn its first space into a hyphen.
fn normalize_genre_filter(genre: &str) -> String {
    genre.to_lowercase().replacen(' ', "-", 1)
}
