//! Bearer-token authentication.
//!
//! Tokens are opaque strings of the form `clt_<hex>`; the first
//! [`TOKEN_PREFIX_LEN`] characters are stored in clear for lookup and the
//! SHA-256 digest of the full token is compared in constant time. Token
//! issuance is an operational concern outside this service.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{AuthRepo, RepoError};
use crate::domain::types::UserRole;

/// Characters of the token stored in clear for indexed lookup.
pub const TOKEN_PREFIX_LEN: usize = 12;

/// Authenticated caller attached to the request by the auth middleware.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl Principal {
    /// Actor label used for audit entries.
    pub fn actor(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token not recognized")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("token revoked")]
    Revoked,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn AuthRepo>,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepo>) -> Self {
        Self { repo }
    }

    pub fn hash_token(token: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hasher.finalize().to_vec()
    }

    pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let token = token.trim();
        // Tokens are ASCII; anything short or multibyte cannot match a prefix.
        let Some(prefix) = token.get(..TOKEN_PREFIX_LEN) else {
            return Err(AuthError::Invalid);
        };
        let stored = self
            .repo
            .find_token_by_prefix(prefix)
            .await?
            .ok_or(AuthError::Invalid)?;

        let presented = Self::hash_token(token);
        if stored.token_hash.as_slice().ct_eq(presented.as_slice()).unwrap_u8() != 1 {
            return Err(AuthError::Invalid);
        }

        if stored.revoked_at.is_some() {
            return Err(AuthError::Revoked);
        }
        if let Some(expires_at) = stored.expires_at
            && expires_at <= OffsetDateTime::now_utc()
        {
            return Err(AuthError::Expired);
        }

        let user = self
            .repo
            .find_user(stored.user_id)
            .await?
            .ok_or(AuthError::Invalid)?;

        Ok(Principal {
            user_id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic_and_distinct() {
        let a = AuthService::hash_token("clt_0123456789abcdef");
        let b = AuthService::hash_token("clt_0123456789abcdef");
        let c = AuthService::hash_token("clt_fedcba9876543210");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 32);
    }
}
