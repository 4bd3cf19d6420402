//! Error types for the client, the domain tree and the application root.
//!
//! # Design
//! `NotFound` and `Conflict` get dedicated variants because callers react to
//! them differently: a vanished resource means local state is stale, a
//! conflict means the server refused a structural change. All other non-2xx
//! responses land in `HttpError` with the raw status and body.

use thiserror::Error;
use uuid::Uuid;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the requested list or item does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 409 and refused the change.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The server returned a non-2xx status other than 404 or 409.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// The round trip itself failed before a response was available.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

/// Structural violations detected on the in-memory tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("list not found: {0}")]
    ListNotFound(Uuid),

    #[error("item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("item {0} is at the maximum nesting depth")]
    DepthLimit(Uuid),

    #[error("item {0} already has the maximum number of sub-items")]
    ChildLimit(Uuid),

    #[error("item {0} cannot be moved into itself or one of its sub-items")]
    Cycle(Uuid),
}

impl TreeError {
    /// True for depth, fan-out and cycle violations. The remaining variants
    /// only mean the local tree does not know an id, which may be stale.
    pub fn is_limit(&self) -> bool {
        matches!(self, Self::DepthLimit(_) | Self::ChildLimit(_) | Self::Cycle(_))
    }
}

/// Failure of a user-facing operation on the application root.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
