//! Cache collaborator for Satchel sessions.
//!
//! Sessions persist their payload as one JSON document per session in a
//! key-value store. This crate defines that store's contract, [`CacheStore`],
//! and ships two implementations.
//!
//! # Features
//!
//! - `redis` - Enable Redis cache support (enabled by default)
//!
//! # Examples
//!
//! ## In-memory Cache
//!
//! ```
//! use satchel_cache::*;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), CacheError> {
//! let cache = InMemoryCache::new();
//!
//! cache.put("C_S_abc", r#"{"user_id":1}"#.to_string(), Duration::from_secs(60)).await?;
//!
//! // Conditional write: only succeeds because the key already exists
//! assert!(cache.update("C_S_abc", r#"{"user_id":2}"#.to_string()).await?);
//! assert!(!cache.update("C_S_missing", "{}".to_string()).await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Redis Cache
//!
//! ```no_run
//! use satchel_cache::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CacheError> {
//!     let redis_config = CacheConfig::redis("redis://localhost:6379")?;
//!     let redis_cache = RedisCache::new(redis_config).await?;
//!
//!     redis_cache.put("key", "value".to_string(), Duration::from_secs(60)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod helpers;
pub mod memory;
pub mod traits;

#[cfg(feature = "redis")]
pub mod redis_cache;

pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use helpers::{get_typed, put_typed};
pub use memory::InMemoryCache;
pub use traits::CacheStore;

#[cfg(feature = "redis")]
pub use redis_cache::RedisCache;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::CacheConfig;
    pub use crate::error::{CacheError, CacheResult};
    pub use crate::memory::InMemoryCache;
    pub use crate::traits::CacheStore;

    #[cfg(feature = "redis")]
    pub use crate::redis_cache::RedisCache;
}
