//! Domain layer for the movies service.
//!
//! Holds the movie types, the storage contract every backend implements,
//! the response envelope it answers with, and the readiness gate used by
//! backends that finish setup in the background. No database or HTTP
//! dependencies live here.

pub mod error;
pub mod readiness;
pub mod response;
pub mod store;
pub mod types;
