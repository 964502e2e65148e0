//! Storage backends for the movies service.
//!
//! Three interchangeable implementations of [`MovieStore`]:
//!
//! - [`LocalStore`]: JSON file loaded into memory at startup
//! - [`DocumentStore`]: MongoDB collection
//! - [`RelationalStore`]: MySQL tables with a movie/genre join table
//!
//! [`open_store`] builds the one selected for the process.

use std::path::PathBuf;
use std::sync::Arc;

use movies_core::store::{BackendKind, MovieStore};
use sqlx::mysql::MySqlPoolOptions;

pub mod document;
pub mod local;
pub mod relational;

pub use document::DocumentStore;
pub use local::LocalStore;
pub use relational::RelationalStore;

pub type DbPool = sqlx::MySqlPool;

/// Maximum connections held by the relational pool.
pub const MAX_CONNECTIONS: u32 = 10;

/// Path of the bundled sample dataset, relative to the workspace root.
pub const DEFAULT_MOVIES_FILE: &str = "crates/db/data/movies.json";

/// Connection settings for every backend. Only the fields of the selected
/// backend need to be set.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// JSON dataset read by the local backend.
    pub movies_file: PathBuf,
    /// MongoDB connection string.
    pub mongo_uri: Option<String>,
    /// MongoDB database holding the `movies` collection.
    pub mongo_db: Option<String>,
    /// MySQL connection string.
    pub database_url: Option<String>,
    /// Apply embedded migrations when opening the relational backend.
    pub run_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            movies_file: PathBuf::from(DEFAULT_MOVIES_FILE),
            mongo_uri: None,
            mongo_db: None,
            database_url: None,
            run_migrations: true,
        }
    }
}

/// Failure to set up the selected backend at startup.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("{0} must be set for the {1} backend")]
    MissingSetting(&'static str, BackendKind),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Create a MySQL pool from a database URL.
///
/// The pool connects lazily, so it accepts queries immediately; connection
/// failures surface on the first query.
pub fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_lazy(database_url)
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Build the backend selected for this process.
///
/// Local and document backends return immediately and finish their setup
/// on a background task; until then they answer 503.
pub async fn open_store(
    kind: BackendKind,
    config: &StoreConfig,
) -> Result<Arc<dyn MovieStore>, OpenError> {
    let store: Arc<dyn MovieStore> = match kind {
        BackendKind::Local => Arc::new(LocalStore::load(config.movies_file.clone())),
        BackendKind::Document => {
            let uri = config
                .mongo_uri
                .as_deref()
                .ok_or(OpenError::MissingSetting("MONGO_URI", kind))?;
            let db = config
                .mongo_db
                .as_deref()
                .ok_or(OpenError::MissingSetting("MONGO_DB", kind))?;
            Arc::new(DocumentStore::connect(uri, db))
        }
        BackendKind::Relational => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(OpenError::MissingSetting("DATABASE_URL", kind))?;
            let pool = create_pool(url)?;
            if config.run_migrations {
                run_migrations(&pool).await?;
                tracing::info!("Database migrations applied");
            }
            Arc::new(RelationalStore::new(pool))
        }
    };

    tracing::info!(backend = %kind, "Movie store opened");
    Ok(store)
}
