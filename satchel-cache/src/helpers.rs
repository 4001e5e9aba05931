//! Helper functions for typed cache access.

use crate::error::{CacheError, CacheResult};
use crate::traits::CacheStore;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Get a typed value from the cache.
pub async fn get_typed<S: CacheStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> CacheResult<Option<T>> {
    match store.get(key).await? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| CacheError::Deserialization(e.to_string())),
        None => Ok(None),
    }
}

/// Store a typed value in the cache with the given TTL.
pub async fn put_typed<S: CacheStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
    ttl: Duration,
) -> CacheResult<()> {
    let json =
        serde_json::to_string(value).map_err(|e| CacheError::Serialization(e.to_string()))?;
    store.put(key, json, ttl).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryCache;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        visits: u32,
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let cache = InMemoryCache::new();
        let profile = Profile {
            name: "alice".to_string(),
            visits: 3,
        };

        put_typed(&cache, "profile", &profile, Duration::from_secs(60))
            .await
            .unwrap();
        let loaded: Option<Profile> = get_typed(&cache, "profile").await.unwrap();

        assert_eq!(loaded, Some(profile));
    }

    #[tokio::test]
    async fn test_typed_decode_error() {
        let cache = InMemoryCache::new();
        cache
            .put("profile", "not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        let result: CacheResult<Option<Profile>> = get_typed(&cache, "profile").await;
        assert!(matches!(result, Err(CacheError::Deserialization(_))));
    }
}
