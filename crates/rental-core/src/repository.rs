//! Failure vocabulary shared by every persistence gateway trait.
//!
//! The concrete traits live next to the records they store (one per feature
//! module); they all speak this error type so the service layer can treat the
//! gateway uniformly. `Conflict` doubles as the storage-level uniqueness net:
//! services check preconditions first, and an adapter that still detects a
//! collision must reject the write without leaving a partial row behind.

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
