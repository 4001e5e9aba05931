//! Factory for per-request session drivers.

use crate::config::{CookieSessionConfig, HeaderSessionConfig};
use crate::cookie_session::CookieSession;
use crate::error::{SessionError, SessionResult};
use crate::header_session::HeaderSession;
use crate::id::{IdGenerator, UuidGenerator};
use crate::transport::{CookieTransport, HeaderTransport};
use satchel_cache::CacheStore;
use std::fmt;
use std::sync::Arc;

/// Shared session settings; cheap to clone into request handlers.
///
/// # Examples
///
/// ```
/// use satchel_cache::InMemoryCache;
/// use satchel_session::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let manager = SessionManager::builder()
///     .cache(Arc::new(InMemoryCache::new()))
///     .cookie_config(CookieSessionConfig::default().with_expiration(Duration::from_secs(3600)))
///     .build()
///     .unwrap();
///
/// assert_eq!(manager.cookie_config().name, "session");
/// ```
#[derive(Clone)]
pub struct SessionManager {
    cache: Arc<dyn CacheStore>,
    generator: Arc<dyn IdGenerator>,
    cookie_config: CookieSessionConfig,
    header_config: HeaderSessionConfig,
}

impl SessionManager {
    /// Manager with default configs and UUID ids.
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self {
            cache,
            generator: Arc::new(UuidGenerator),
            cookie_config: CookieSessionConfig::default(),
            header_config: HeaderSessionConfig::default(),
        }
    }

    pub fn builder() -> SessionManagerBuilder {
        SessionManagerBuilder::default()
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    pub fn cookie_config(&self) -> &CookieSessionConfig {
        &self.cookie_config
    }

    pub fn header_config(&self) -> &HeaderSessionConfig {
        &self.header_config
    }

    /// Cookie driver for one request. Call `parse` before use.
    pub fn cookie_session<T: CookieTransport>(&self, transport: T) -> CookieSession<T> {
        CookieSession::new(
            self.cache.clone(),
            transport,
            self.cookie_config.clone(),
            self.generator.clone(),
        )
    }

    /// Header driver for one request. Call `parse` before use.
    pub fn header_session<T: HeaderTransport>(&self, transport: T) -> HeaderSession<T> {
        HeaderSession::new(
            self.cache.clone(),
            transport,
            self.header_config.clone(),
            self.generator.clone(),
        )
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("cookie_config", &self.cookie_config)
            .field("header_config", &self.header_config)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct SessionManagerBuilder {
    cache: Option<Arc<dyn CacheStore>>,
    generator: Option<Arc<dyn IdGenerator>>,
    cookie_config: Option<CookieSessionConfig>,
    header_config: Option<HeaderSessionConfig>,
}

impl SessionManagerBuilder {
    pub fn cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn IdGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn cookie_config(mut self, config: CookieSessionConfig) -> Self {
        self.cookie_config = Some(config);
        self
    }

    pub fn header_config(mut self, config: HeaderSessionConfig) -> Self {
        self.header_config = Some(config);
        self
    }

    pub fn build(self) -> SessionResult<SessionManager> {
        let cache = self
            .cache
            .ok_or_else(|| SessionError::config("SessionBuilder", "a cache store is required"))?;

        Ok(SessionManager {
            cache,
            generator: self.generator.unwrap_or_else(|| Arc::new(UuidGenerator)),
            cookie_config: self.cookie_config.unwrap_or_default(),
            header_config: self.header_config.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Session;
    use crate::transport::HttpExchange;
    use satchel_cache::InMemoryCache;

    #[test]
    fn test_build_without_cache_fails() {
        let err = SessionManager::builder().build().unwrap_err();
        assert!(matches!(err, SessionError::Config { .. }));
        assert_eq!(err.component(), "SessionBuilder");
    }

    #[tokio::test]
    async fn test_custom_generator_and_prefix() {
        let cache = InMemoryCache::new();
        let manager = SessionManager::builder()
            .cache(Arc::new(cache.clone()))
            .generator(Arc::new(|| "fixed-id".to_string()))
            .cookie_config(CookieSessionConfig::default().with_key_prefix("app:"))
            .build()
            .unwrap();

        let mut session = manager.cookie_session(HttpExchange::default());
        session.parse().await.unwrap();

        assert_eq!(session.id(), "fixed-id");
        assert!(cache.exists("app:fixed-id").await.unwrap());
    }
}
