//! Cache store trait definition.

use crate::error::CacheResult;
use async_trait::async_trait;
use std::time::Duration;

/// Key-value store that session drivers persist their payloads into.
///
/// Implementations must be safe to share between concurrent requests. Values
/// are opaque strings; callers are responsible for encoding them.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Check if a live (non-expired) entry exists for `key`.
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Read the value stored under `key`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(value))` if the key exists, `Ok(None)` if it is missing
    /// or expired, or an error if the backend fails.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Overwrite the value of an existing key, keeping its remaining TTL.
    ///
    /// Nothing is written when the key does not exist.
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the key existed and was updated.
    async fn update(&self, key: &str, value: String) -> CacheResult<bool>;

    /// Store `value` under `key` with an explicit time-to-live.
    ///
    /// Creates the key if needed and replaces both value and TTL otherwise.
    async fn put(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn forget(&self, key: &str) -> CacheResult<()>;

    /// Remaining lifetime of a key.
    ///
    /// Returns `Ok(None)` if the key has no expiration or doesn't exist.
    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>>;

    /// Clear all keys from the cache.
    ///
    /// **Warning:** This operation may be destructive and affect all keys.
    async fn clear(&self) -> CacheResult<()>;
}
