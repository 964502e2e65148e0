//! MongoDB backend.
//!
//! Movies live in the `movies` collection. The native `_id` (an ObjectId)
//! is exposed to callers as the hex string `id`.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};
use movies_core::error::{StoreError, StoreResult};
use movies_core::readiness::Readiness;
use movies_core::response::{Deleted, MovieResponse, STATUS_CREATED, STATUS_OK};
use movies_core::store::{BackendKind, MovieStore};
use movies_core::types::{Movie, MoviePatch, NewMovie};
use serde::{Deserialize, Serialize};

/// Collection holding the movie documents.
pub const COLLECTION: &str = "movies";

/// Shape of a movie document as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    pub poster: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

impl From<NewMovie> for MovieDocument {
    fn from(movie: NewMovie) -> Self {
        Self {
            id: None,
            title: movie.title,
            year: movie.year,
            director: movie.director,
            duration: movie.duration,
            poster: movie.poster,
            genre: movie.genre,
            rate: movie.rate,
        }
    }
}

impl TryFrom<MovieDocument> for Movie {
    type Error = StoreError;

    fn try_from(doc: MovieDocument) -> StoreResult<Self> {
        let id = doc
            .id
            .ok_or_else(|| StoreError::internal("movie document without _id"))?;
        Ok(Movie {
            id: id.to_hex(),
            title: doc.title,
            year: doc.year,
            director: doc.director,
            duration: doc.duration,
            poster: doc.poster,
            genre: doc.genre,
            rate: doc.rate,
        })
    }
}

/// Movie store backed by a MongoDB collection.
pub struct DocumentStore {
    movies: Readiness<Collection<MovieDocument>>,
}

impl DocumentStore {
    /// Connect to `uri` in the background and return immediately.
    ///
    /// Must be called from within a Tokio runtime. The store answers 503
    /// until the server has answered a ping.
    pub fn connect(uri: &str, database: &str) -> Self {
        let movies = Readiness::new();
        let slot = movies.clone();
        let uri = uri.to_string();
        let database = database.to_string();

        tokio::spawn(async move {
            match open_collection(&uri, &database).await {
                Ok(collection) => {
                    tracing::info!(database = %database, collection = COLLECTION, "Document store connected");
                    slot.mark_ready(collection);
                }
                Err(e) => {
                    tracing::error!(database = %database, error = %e, "Error connecting to the document store");
                }
            }
        });

        Self { movies }
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Movie> {
        let collection = self.movies.get()?;
        let found = collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(internal)?;
        found.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn try_list(&self, genre: Option<&str>) -> StoreResult<Vec<Movie>> {
        let collection = self.movies.get()?;
        let filter = match genre {
            Some(genre) => doc! { "genre": normalize_genre_filter(genre) },
            None => doc! {},
        };

        let docs: Vec<MovieDocument> = collection
            .find(filter)
            .await
            .map_err(internal)?
            .try_collect()
            .await
            .map_err(internal)?;

        if docs.is_empty() {
            return Err(StoreError::NoMovies);
        }
        docs.into_iter().map(Movie::try_from).collect()
    }

    async fn try_get(&self, id: &str) -> StoreResult<Movie> {
        self.movies.get()?;
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::NotFound)?;
        self.find_by_id(oid).await
    }

    async fn try_create(&self, input: NewMovie) -> StoreResult<Movie> {
        let collection = self.movies.get()?;
        let inserted = collection
            .insert_one(MovieDocument::from(input))
            .await
            .map_err(internal)?;
        let oid = inserted
            .inserted_id
            .as_object_id()
            .ok_or_else(|| internal("insert returned a non-ObjectId _id"))?;
        self.find_by_id(oid).await
    }

    async fn try_update(&self, id: &str, patch: MoviePatch) -> StoreResult<Movie> {
        let collection = self.movies.get()?;
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId)?;

        // `$set` with no fields modifies nothing, which reads as a miss.
        if patch.is_empty() {
            return Err(StoreError::NotFound);
        }

        let fields: Document = mongodb::bson::to_document(&patch).map_err(internal)?;
        let result = collection
            .update_one(doc! { "_id": oid }, doc! { "$set": fields })
            .await
            .map_err(internal)?;

        // Counts modified, not matched: a patch equal to the stored values
        // also lands here.
        if result.modified_count == 0 {
            return Err(StoreError::NotFound);
        }
        self.find_by_id(oid).await
    }

    async fn try_delete(&self, id: &str) -> StoreResult<Deleted> {
        let collection = self.movies.get()?;
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId)?;
        let result = collection
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(internal)?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(Deleted)
    }
}

#[async_trait]
impl MovieStore for DocumentStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Document
    }

    fn is_ready(&self) -> bool {
        self.movies.is_ready()
    }

    async fn wait_until_ready(&self) {
        tracing::debug!("Waiting for document store connection");
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

async fn open_collection(
    uri: &str,
    database: &str,
) -> mongodb::error::Result<Collection<MovieDocument>> {
    let client = Client::with_uri_str(uri).await?;
    let db = client.database(database);
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(db.collection(COLLECTION))
}

fn internal(err: impl std::fmt::Display) -> StoreError {
    tracing::error!(error = %err, "Document store operation failed");
    StoreError::internal(err)
}

/// Capitalise every space- or hyphen-separated word and join them with
/// hyphens, so `"sci fi"` queries the stored `"Sci-Fi"`.
fn normalize_genre_filter(genre: &str) -> String {
    genre
        .split([' ', '-'])
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
