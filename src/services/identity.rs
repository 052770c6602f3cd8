/*
 * Responsibility
 * - 呼び出し元の「解決済み identity」(Principal) と IdentityResolver trait
 * - 実ストア (DB/LDAP...) は collaborator 側の責務。ここは interface のみに依存する
 * - デモ用の in-memory 実装 (seed: admin / macro) を同梱
 */
use std::collections::HashSet;

use async_trait::async_trait;
use sha2::{Digest, Sha512};
use thiserror::Error;

/// Resolved identity of a caller. Supplied entirely by the resolver; this core
/// treats it as read-only.
#[derive(Debug, Clone)]
pub struct Principal {
    pub subject: String,
    /// Opaque credential digest owned by the identity store.
    pub credential_hash: String,
    pub authorities: HashSet<String>,
}

impl Principal {
    pub fn new<I, S>(subject: &str, credential_hash: &str, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.to_string(),
            credential_hash: credential_hash.to_string(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn password_matches(&self, raw: &str) -> bool {
        hash_credential(raw) == self.credential_hash
    }
}

/// Digest used by the demo store. Real deployments plug in whatever their
/// identity store uses; this core only ever compares the opaque string.
pub fn hash_credential(raw: &str) -> String {
    hex::encode(Sha512::digest(raw.as_bytes()))
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// External collaborator interface: subject → Principal or "not found".
///
/// Latency and failure modes belong to the implementor; the pipeline maps any
/// error to "context stays empty" and never aborts on a resolver fault.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, subject: &str) -> Result<Option<Principal>, ResolverError>;
}

/// In-memory resolver standing in for the external identity store.
#[derive(Debug, Default)]
pub struct InMemoryIdentityResolver {
    users: Vec<Principal>,
}

impl InMemoryIdentityResolver {
    pub fn new(users: Vec<Principal>) -> Self {
        Self { users }
    }

    /// Demo directory: admin/ROLE_ADMIN and macro/ROLE_USER, password 123456.
    pub fn seeded() -> Self {
        let hash = hash_credential("123456");
        Self::new(vec![
            Principal::new("admin", &hash, ["ROLE_ADMIN"]),
            Principal::new("macro", &hash, ["ROLE_USER"]),
        ])
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityResolver {
    async fn resolve(&self, subject: &str) -> Result<Option<Principal>, ResolverError> {
        Ok(self.users.iter().find(|u| u.subject == subject).cloned())
    }
}
