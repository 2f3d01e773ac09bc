//! Error types for store operations.

use std::fmt;

use meddash_model::ValidationError;
use thiserror::Error;

/// Failures reported by a remote collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The addressed document does not exist.
    #[error("document {id} not found in {collection}")]
    NotFound {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
    },

    /// The caller is not allowed to perform the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Network or service failure.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Result type for remote collaborator calls.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// The kind of write that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// Remote insert.
    Create,
    /// Remote partial write.
    Update,
    /// Remote delete.
    Delete,
    /// Image upload attached to a save.
    Upload,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Upload => "upload image for",
        })
    }
}

/// Errors surfaced by [`DoctorStore`](crate::DoctorStore) operations.
///
/// The in-memory collection is left at its pre-call value for every variant
/// except `Fetch`, which empties it unless stale contents are configured.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Loading the collection failed.
    #[error("failed to load doctors: {0}")]
    Fetch(#[source] RemoteError),

    /// A create, update, delete or upload call failed.
    #[error("failed to {op} doctor: {source}")]
    Write {
        /// Which write failed.
        op: WriteOp,
        /// The remote failure.
        #[source]
        source: RemoteError,
    },

    /// The remote collaborator has no doctor with this id.
    #[error("doctor not found: {0}")]
    NotFound(String),

    /// Input rejected before any remote call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An image was attached but no uploader is configured.
    #[error("no image uploader configured")]
    UploaderMissing,

    /// A record could not be converted to document fields.
    #[error("failed to encode doctor: {0}")]
    Codec(String),
}

impl StoreError {
    pub(crate) fn write(op: WriteOp) -> impl FnOnce(RemoteError) -> Self {
        move |source| Self::Write { op, source }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
