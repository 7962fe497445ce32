//! Server-side session storage backed by Redis

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Opaque session identifier carried by the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a fresh identifier for a visitor without a session
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept a cookie value only if it looks like an identifier we issued
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    fn redis_key(&self) -> String {
        format!("session:{}", self.0)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// EXPIRE argument for a session lifetime; zero or a negative value would
/// delete the session instead of keeping it.
fn expire_seconds(ttl_seconds: u64) -> AppResult<i64> {
    i64::try_from(ttl_seconds)
        .ok()
        .filter(|ttl| *ttl > 0)
        .ok_or_else(|| AppError::Internal(format!("Invalid session lifetime: {}s", ttl_seconds)))
}

/// Per-session key/value storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session: &SessionId, key: &str) -> AppResult<Option<Value>>;

    async fn set(&self, session: &SessionId, key: &str, value: Value) -> AppResult<()>;

    async fn ping(&self) -> AppResult<()>;
}

/// Each session is a Redis hash of JSON encoded values, expiring
/// `ttl_seconds` after its last write.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: Client,
    ttl_seconds: i64,
}

impl RedisSessionStore {
    /// Create a new Redis session store
    pub async fn new(url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let store = Self {
            client,
            ttl_seconds: expire_seconds(ttl_seconds)?,
        };
        store.ping().await?;
        Ok(store)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, session: &SessionId, key: &str) -> AppResult<Option<Value>> {
        let mut conn = self.connection().await?;

        let raw: Option<String> = conn.hget(session.redis_key(), key).await?;

        Ok(raw.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%session, key, "Discarding undecodable session value: {}", e);
                None
            }
        }))
    }

    async fn set(&self, session: &SessionId, key: &str, value: Value) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let redis_key = session.redis_key();

        redis::pipe()
            .atomic()
            .hset(&redis_key, key, value.to_string())
            .ignore()
            .expire(&redis_key, self.ttl_seconds)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        tracing::debug!(%session, key, "Session value stored");
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_only_accept_uuids() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
        assert_eq!(SessionId::parse("../../etc"), None);
        assert_eq!(SessionId::parse(""), None);
    }

    #[test]
    fn session_lifetime_must_fit_expire() {
        assert_eq!(expire_seconds(1_209_600).unwrap(), 1_209_600);
        assert!(expire_seconds(0).is_err());
        assert!(expire_seconds(u64::MAX).is_err());
        assert!(expire_seconds(i64::MAX as u64 + 1).is_err());
    }

    #[test]
    fn redis_keys_are_namespaced() {
        let id = SessionId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(id.redis_key(), "session:67e55044-10b1-426f-9247-bb680e5fe0c8");
    }
}
