//! Cookie-carried sessions.

use crate::config::{CookieSessionConfig, MAX_EXPIRATION};
use crate::error::{SessionError, SessionResult};
use crate::id::IdGenerator;
use crate::record::{SessionRecord, finish_parse};
use crate::traits::Session;
use crate::transport::CookieTransport;
use async_trait::async_trait;
use cookie::Cookie;
use satchel_cache::CacheStore;
use std::sync::Arc;
use time::OffsetDateTime;

const COMPONENT: &str = "CookieSession";

/// Session whose identifier travels in a cookie.
///
/// Issuing an id sets the response cookie with the configured attributes.
/// With a zero expiration the cookie has no `Expires` and lives until the
/// browser closes, while the cache entry still gets the one-day default.
pub struct CookieSession<T> {
    record: SessionRecord,
    transport: T,
    config: CookieSessionConfig,
    generator: Arc<dyn IdGenerator>,
}

impl<T: CookieTransport> CookieSession<T> {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        transport: T,
        config: CookieSessionConfig,
        generator: Arc<dyn IdGenerator>,
    ) -> Self {
        let record = SessionRecord::new(
            COMPONENT,
            cache,
            config.key_prefix.clone(),
            config.expiration,
        );
        Self {
            record,
            transport,
            config,
            generator,
        }
    }

    pub fn config(&self) -> &CookieSessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Absolute cookie expiry, capped at [`MAX_EXPIRATION`]; `None` for a
    /// browser-session cookie.
    fn expires_at(&self) -> Option<OffsetDateTime> {
        if self.config.expiration.is_zero() {
            return None;
        }
        let expiration = time::Duration::try_from(self.config.expiration.min(MAX_EXPIRATION)).ok()?;
        OffsetDateTime::now_utc().checked_add(expiration)
    }

    fn session_cookie(&self) -> Cookie<'static> {
        let mut builder = Cookie::build((self.config.name.clone(), self.record.id().to_string()))
            .path(self.config.path.clone())
            .secure(self.config.secure)
            .http_only(self.config.http_only)
            .same_site(self.config.same_site.into());

        if let Some(domain) = &self.config.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(expires) = self.expires_at() {
            builder = builder.expires(expires);
        }

        builder.build()
    }
}

#[async_trait]
impl<T: CookieTransport> Session for CookieSession<T> {
    fn record(&self) -> &SessionRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut SessionRecord {
        &mut self.record
    }

    async fn parse(&mut self) -> SessionResult<()> {
        let candidate = self.transport.cookie(&self.config.name);
        let lookup = self.record.load(candidate).await?;
        finish_parse(self, lookup, COMPONENT).await
    }

    async fn regenerate(&mut self) -> SessionResult<()> {
        self.record
            .reissue(self.generator.as_ref(), self.config.persist_on_regenerate)
            .await?;

        let cookie = self.session_cookie();
        self.transport
            .set_cookie(cookie)
            .map_err(SessionError::transport(COMPONENT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SameSite;
    use crate::id::UuidGenerator;
    use crate::transport::HttpExchange;
    use http::header::SET_COOKIE;
    use satchel_cache::InMemoryCache;
    use std::time::Duration;

    fn session(cache: &InMemoryCache, config: CookieSessionConfig) -> CookieSession<HttpExchange> {
        CookieSession::new(
            Arc::new(cache.clone()),
            HttpExchange::default(),
            config,
            Arc::new(UuidGenerator),
        )
    }

    fn set_cookie(session: &CookieSession<HttpExchange>) -> Cookie<'static> {
        let header = session
            .transport()
            .response_headers()
            .get(SET_COOKIE)
            .expect("Set-Cookie header")
            .to_str()
            .unwrap()
            .to_string();
        Cookie::parse(header).unwrap()
    }

    #[tokio::test]
    async fn test_cookie_attributes() {
        let cache = InMemoryCache::new();
        let config = CookieSessionConfig::default()
            .with_name("sid")
            .with_secure(true)
            .with_domain("example.com")
            .with_same_site(SameSite::Strict);
        let mut session = session(&cache, config);

        session.parse().await.unwrap();
        let cookie = set_cookie(&session);

        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.value(), session.id());
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(cookie::SameSite::Strict));
    }

    #[tokio::test]
    async fn test_expiring_cookie() {
        let cache = InMemoryCache::new();
        let config = CookieSessionConfig::default().with_expiration(Duration::from_secs(3600));
        let mut session = session(&cache, config);

        session.parse().await.unwrap();
        let expires = set_cookie(&session)
            .expires_datetime()
            .expect("absolute expiry");

        let remaining = expires - OffsetDateTime::now_utc();
        assert!(remaining > time::Duration::minutes(59));
        assert!(remaining <= time::Duration::hours(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_expiration_does_not_panic() {
        let cache = InMemoryCache::new();
        let mut config = CookieSessionConfig::default();
        config.expiration = Duration::MAX;
        let mut session = session(&cache, config);

        session.parse().await.unwrap();

        let expires = set_cookie(&session)
            .expires_datetime()
            .expect("absolute expiry");
        let cap = time::Duration::try_from(MAX_EXPIRATION).unwrap();
        assert!(expires - OffsetDateTime::now_utc() <= cap);

        let ttl = cache
            .ttl(&format!("C_S_{}", session.id()))
            .await
            .unwrap();
        assert_eq!(ttl, Some(MAX_EXPIRATION));
    }

    #[tokio::test]
    async fn test_eager_persistence_can_be_disabled() {
        let cache = InMemoryCache::new();
        let config = CookieSessionConfig::default().with_persist_on_regenerate(false);
        let mut session = session(&cache, config);

        session.parse().await.unwrap();

        assert!(!session.id().is_empty());
        assert!(!session.exists("created_at"));
        assert!(cache.is_empty().await);
    }
}
