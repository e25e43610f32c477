//! In-memory token backend.
//!
//! Backs development servers and the test suite. State lives in a
//! process-local map and is lost on restart; durable storage is the
//! embedding service's concern.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{AccessToken, BackendError, DelegatedRole, TokenBackend};

struct TokenRecord {
    token: AccessToken,
    roles: Vec<DelegatedRole>,
}

/// Map of user id → delegated tokens, guarded by a single lock. The lock
/// is never held across an await point.
#[derive(Default)]
pub struct MemoryBackend {
    tokens: RwLock<HashMap<String, Vec<TokenRecord>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token with its delegated roles. Intended for seeding test
    /// and development fixtures.
    pub fn seed_token(&self, user_id: &str, token: AccessToken, roles: Vec<DelegatedRole>) {
        let mut tokens = self.tokens.write().unwrap_or_else(|e| e.into_inner());
        tokens
            .entry(user_id.to_string())
            .or_default()
            .push(TokenRecord { token, roles });
    }

    fn not_found(user_id: &str, token_id: &str) -> BackendError {
        BackendError::TokenNotFound {
            user_id: user_id.to_string(),
            token_id: token_id.to_string(),
        }
    }
}

#[async_trait]
impl TokenBackend for MemoryBackend {
    async fn list_access_tokens(&self, user_id: &str) -> Result<Vec<AccessToken>, BackendError> {
        let tokens = self.tokens.read().unwrap_or_else(|e| e.into_inner());
        Ok(tokens
            .get(user_id)
            .map(|records| records.iter().map(|r| r.token.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_access_token(
        &self,
        user_id: &str,
        token_id: &str,
    ) -> Result<AccessToken, BackendError> {
        let tokens = self.tokens.read().unwrap_or_else(|e| e.into_inner());
        tokens
            .get(user_id)
            .and_then(|records| records.iter().find(|r| r.token.id == token_id))
            .map(|r| r.token.clone())
            .ok_or_else(|| Self::not_found(user_id, token_id))
    }

    async fn delete_access_token(
        &self,
        user_id: &str,
        token_id: &str,
    ) -> Result<(), BackendError> {
        let mut tokens = self.tokens.write().unwrap_or_else(|e| e.into_inner());
        let records = tokens
            .get_mut(user_id)
            .ok_or_else(|| Self::not_found(user_id, token_id))?;
        let before = records.len();
        records.retain(|r| r.token.id != token_id);
        if records.len() == before {
            return Err(Self::not_found(user_id, token_id));
        }
        Ok(())
    }

    async fn list_access_token_roles(
        &self,
        user_id: &str,
        token_id: &str,
    ) -> Result<Vec<DelegatedRole>, BackendError> {
        let tokens = self.tokens.read().unwrap_or_else(|e| e.into_inner());
        tokens
            .get(user_id)
            .and_then(|records| records.iter().find(|r| r.token.id == token_id))
            .map(|r| r.roles.clone())
            .ok_or_else(|| Self::not_found(user_id, token_id))
    }

    async fn get_access_token_role(
        &self,
        user_id: &str,
        token_id: &str,
        role_id: &str,
    ) -> Result<DelegatedRole, BackendError> {
        let tokens = self.tokens.read().unwrap_or_else(|e| e.into_inner());
        let record = tokens
            .get(user_id)
            .and_then(|records| records.iter().find(|r| r.token.id == token_id))
            .ok_or_else(|| Self::not_found(user_id, token_id))?;
        record
            .roles
            .iter()
            .find(|role| role.id == role_id)
            .cloned()
            .ok_or_else(|| BackendError::RoleNotFound {
                token_id: token_id.to_string(),
                role_id: role_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(id: &str, user: &str) -> AccessToken {
        AccessToken {
            id: id.to_string(),
            consumer_id: "consumer-1".to_string(),
            project_id: "project-1".to_string(),
            authorizing_user_id: user.to_string(),
            expires_at: None,
        }
    }

    fn role(id: &str, name: &str) -> DelegatedRole {
        DelegatedRole {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn listing_unknown_user_is_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.list_access_tokens("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_after_delete_reports_not_found() {
        let backend = MemoryBackend::new();
        backend.seed_token("u1", token("t1", "u1"), vec![role("r1", "reader")]);

        backend.delete_access_token("u1", "t1").await.unwrap();

        let err = backend.get_access_token("u1", "t1").await.unwrap_err();
        assert!(matches!(err, BackendError::TokenNotFound { .. }));

        let err = backend.delete_access_token("u1", "t1").await.unwrap_err();
        assert!(matches!(err, BackendError::TokenNotFound { .. }));
    }

    #[tokio::test]
    async fn roles_are_scoped_to_their_token() {
        let backend = MemoryBackend::new();
        backend.seed_token("u1", token("t1", "u1"), vec![role("r1", "reader")]);
        backend.seed_token("u1", token("t2", "u1"), vec![role("r2", "writer")]);

        let roles = backend.list_access_token_roles("u1", "t2").await.unwrap();
        assert_eq!(roles, vec![role("r2", "writer")]);

        let err = backend
            .get_access_token_role("u1", "t2", "r1")
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::RoleNotFound { .. }));
    }
}
