//! Token backend seam.
//!
//! # Responsibilities
//! - Define the data the API exposes (access tokens, delegated roles)
//! - Define the trait the HTTP handlers dispatch into
//! - Provide the in-memory implementation used by tests and development
//!
//! # Design Decisions
//! - The trait is the boundary of this crate: issuance, signature
//!   verification and durable storage live behind it, in the embedding
//!   service
//! - All operations are reads except revocation (delete)
//! - Listing tokens for an unknown user yields an empty collection, not an
//!   error; item lookups for unknown ids are errors

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

pub mod memory;

pub use memory::MemoryBackend;

/// A delegated-authorization credential held by a consumer on behalf of a
/// user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub id: String,

    /// The third-party consumer the token was issued to.
    pub consumer_id: String,

    /// Project the delegation is scoped to.
    pub project_id: String,

    /// User who authorized the delegation.
    pub authorizing_user_id: String,

    /// Expiry instant; `None` means the token does not expire.
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

/// A role delegated through an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedRole {
    pub id: String,
    pub name: String,
}

/// Failures surfaced by a backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("access token `{token_id}` not found for user `{user_id}`")]
    TokenNotFound { user_id: String, token_id: String },

    #[error("role `{role_id}` is not delegated by access token `{token_id}`")]
    RoleNotFound { token_id: String, role_id: String },

    #[error("backend failure: {0}")]
    Internal(String),
}

/// Storage and lookup of delegated access tokens.
///
/// Implementations must be safe to share across workers; the HTTP layer
/// holds one instance behind an `Arc` for the process lifetime.
#[async_trait]
pub trait TokenBackend: Send + Sync {
    /// Tokens authorized by the given user. Unknown users yield an empty
    /// list.
    async fn list_access_tokens(&self, user_id: &str) -> Result<Vec<AccessToken>, BackendError>;

    async fn get_access_token(
        &self,
        user_id: &str,
        token_id: &str,
    ) -> Result<AccessToken, BackendError>;

    /// Revoke a token. The token is gone afterwards; a second delete of
    /// the same id reports `TokenNotFound`.
    async fn delete_access_token(&self, user_id: &str, token_id: &str)
        -> Result<(), BackendError>;

    async fn list_access_token_roles(
        &self,
        user_id: &str,
        token_id: &str,
    ) -> Result<Vec<DelegatedRole>, BackendError>;

    async fn get_access_token_role(
        &self,
        user_id: &str,
        token_id: &str,
        role_id: &str,
    ) -> Result<DelegatedRole, BackendError>;
}
