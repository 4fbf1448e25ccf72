//! Persistence for the remember-token
//!
//! Exactly one string is persisted, under a fixed key. Workers KV backs it in
//! production; `MemoryTokenStore` is used by tests.

use std::cell::{Cell, RefCell};

use worker::kv::KvStore;

use crate::error::{DashboardError, Result};

/// Key-value store for the single remember-token
#[allow(async_fn_in_trait)]
pub trait TokenStore {
    async fn load(&self) -> Result<Option<String>>;
    async fn save(&self, token: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// Workers KV backed token store
pub struct KvTokenStore {
    kv: KvStore,
    key: String,
}

impl KvTokenStore {
    pub fn new(kv: KvStore, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }
}

/// KV value for a token: the token as a JSON string literal
fn encode_token(token: &str) -> Result<String> {
    Ok(serde_json::to_string(token)?)
}

/// Token from a raw KV value. Bare text (a value written without JSON
/// quoting) is taken as-is; an empty value means no token.
fn decode_token(raw: &str) -> Option<String> {
    let token = serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string());
    (!token.is_empty()).then_some(token)
}

impl TokenStore for KvTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        let raw = self
            .kv
            .get(&self.key)
            .text()
            .await
            .map_err(|e| DashboardError::Storage(e.to_string()))?;
        Ok(raw.as_deref().and_then(decode_token))
    }

    // `put` writes strings as raw text, so the JSON literal is stored verbatim
    async fn save(&self, token: &str) -> Result<()> {
        self.kv
            .put(&self.key, encode_token(token)?)
            .map_err(|e| DashboardError::Storage(e.to_string()))?
            .execute()
            .await
            .map_err(|e| DashboardError::Storage(e.to_string()))
    }

    async fn clear(&self) -> Result<()> {
        self.kv
            .delete(&self.key)
            .await
            .map_err(|e| DashboardError::Storage(e.to_string()))
    }
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
    writes: Cell<u32>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RefCell::new(Some(token.into())),
            writes: Cell::new(0),
        }
    }

    /// Current value, without going through the async API
    pub fn peek(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Number of `save` calls so far
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.token.borrow().clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.token.borrow_mut() = Some(token.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.borrow_mut() = None;
        Ok(())
    }
}
