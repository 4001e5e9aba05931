//! Server-side sessions for Satchel.
//!
//! A session is an opaque identifier carried by the client, either in a
//! cookie or in a request header, plus a JSON payload stored server-side in
//! a [`CacheStore`](satchel_cache::CacheStore) under `key_prefix + id`.
//!
//! Drivers are built per request from a [`SessionManager`], parsed once,
//! mutated by the handler and saved at the end:
//!
//! - [`CookieSession`] - id in a cookie; a fresh id is persisted right away
//!   with a `created_at` stamp
//! - [`HeaderSession`] - id in a header (default `X-SESSION-ID`); a fresh id
//!   reaches the cache on the first save
//!
//! # Features
//!
//! - `redis` - Redis cache backend from `satchel-cache` (enabled by default)
//!
//! # Examples
//!
//! ## Cookie Session
//!
//! ```
//! use http::{HeaderMap, HeaderValue, header::COOKIE};
//! use satchel_cache::InMemoryCache;
//! use satchel_session::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), SessionError> {
//! let manager = SessionManager::new(Arc::new(InMemoryCache::new()));
//!
//! // First request: no cookie, a new session is issued
//! let mut session = manager.cookie_session(HttpExchange::default());
//! session.parse().await?;
//! session.set("username", "alice".into());
//! session.save().await?;
//! let id = session.id().to_string();
//!
//! // Second request presents the cookie
//! let mut request = HeaderMap::new();
//! request.insert(COOKIE, HeaderValue::from_str(&format!("session={id}")).unwrap());
//! let mut session = manager.cookie_session(HttpExchange::new(request));
//! session.parse().await?;
//!
//! assert_eq!(session.id(), id);
//! assert_eq!(session.cast("username").as_str(), Some("alice"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Redis Backend
//!
//! ```no_run
//! use satchel_cache::{CacheConfig, RedisCache};
//! use satchel_session::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = RedisCache::new(CacheConfig::redis("redis://localhost:6379")?).await?;
//!
//!     let manager = SessionManager::builder()
//!         .cache(Arc::new(cache))
//!         .header_config(HeaderSessionConfig::from_env()?)
//!         .build()?;
//!
//!     let mut session = manager.header_session(HttpExchange::default());
//!     session.parse().await?;
//!     session.save().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cookie_session;
pub mod error;
pub mod header_session;
pub mod id;
pub mod lifecycle;
pub mod manager;
pub mod record;
pub mod traits;
pub mod transport;
pub mod value;

pub use config::{
    CookieSessionConfig, DEFAULT_COOKIE_NAME, DEFAULT_HEADER_NAME, DEFAULT_KEY_PREFIX,
    DEFAULT_TTL, HeaderSessionConfig, SameSite,
};
pub use cookie_session::CookieSession;
pub use error::{SessionError, SessionResult};
pub use header_session::HeaderSession;
pub use id::{IdGenerator, UuidGenerator, generate_session_id};
pub use lifecycle::{expose_header, with_session};
pub use manager::{SessionManager, SessionManagerBuilder};
pub use record::{CREATED_AT_KEY, SessionRecord};
pub use traits::Session;
pub use transport::{CookieTransport, HeaderTransport, HttpExchange, TransportError};
pub use value::{Caster, Payload, Value};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{CookieSessionConfig, HeaderSessionConfig, SameSite};
    pub use crate::cookie_session::CookieSession;
    pub use crate::error::{SessionError, SessionResult};
    pub use crate::header_session::HeaderSession;
    pub use crate::lifecycle::with_session;
    pub use crate::manager::SessionManager;
    pub use crate::traits::Session;
    pub use crate::transport::{CookieTransport, HeaderTransport, HttpExchange};
    pub use crate::value::Value;
}
