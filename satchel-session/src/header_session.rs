//! Header-carried sessions for API clients.

use crate::config::HeaderSessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::id::IdGenerator;
use crate::lifecycle::expose_header;
use crate::record::{SessionRecord, finish_parse};
use crate::traits::Session;
use crate::transport::HeaderTransport;
use async_trait::async_trait;
use satchel_cache::CacheStore;
use std::sync::Arc;

const COMPONENT: &str = "HeaderSession";

/// Session whose identifier travels in a request/response header.
///
/// A newly issued id is written to the response header but nothing reaches
/// the cache until the first [`save`](Session::save), unless
/// `persist_on_regenerate` is enabled.
pub struct HeaderSession<T> {
    record: SessionRecord,
    transport: T,
    config: HeaderSessionConfig,
    generator: Arc<dyn IdGenerator>,
}

impl<T: HeaderTransport> HeaderSession<T> {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        transport: T,
        config: HeaderSessionConfig,
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

    pub fn config(&self) -> &HeaderSessionConfig {
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
}

#[async_trait]
impl<T: HeaderTransport> Session for HeaderSession<T> {
    fn record(&self) -> &SessionRecord {
        &self.record
    }

    fn record_mut(&mut self) -> &mut SessionRecord {
        &mut self.record
    }

    async fn parse(&mut self) -> SessionResult<()> {
        let candidate = self.transport.header(&self.config.name);
        let lookup = self.record.load(candidate).await?;
        finish_parse(self, lookup, COMPONENT).await
    }

    async fn regenerate(&mut self) -> SessionResult<()> {
        self.record
            .reissue(self.generator.as_ref(), self.config.persist_on_regenerate)
            .await?;

        self.transport
            .set_header(&self.config.name, self.record.id())
            .map_err(SessionError::transport(COMPONENT))
    }

    /// Let browsers read and send the session header across origins.
    fn expose(&mut self) -> SessionResult<()> {
        expose_header(&mut self.transport, &self.config.name)
            .map_err(SessionError::transport(COMPONENT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpExchange;
    use http::{HeaderMap, HeaderValue};
    use satchel_cache::InMemoryCache;

    fn session(cache: &InMemoryCache, request: HeaderMap) -> HeaderSession<HttpExchange> {
        HeaderSession::new(
            Arc::new(cache.clone()),
            HttpExchange::new(request),
            HeaderSessionConfig::default(),
            Arc::new(|| "issued".to_string()),
        )
    }

    #[tokio::test]
    async fn test_issued_id_goes_to_response_header() {
        let cache = InMemoryCache::new();
        let mut session = session(&cache, HeaderMap::new());

        session.parse().await.unwrap();

        let headers = session.transport().response_headers();
        assert_eq!(headers.get("x-session-id").unwrap(), "issued");
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_known_id_is_not_reissued() {
        let cache = InMemoryCache::new();
        cache
            .put("C_S_known", r#"{"n":1}"#.to_string(), crate::config::DEFAULT_TTL)
            .await
            .unwrap();

        let mut request = HeaderMap::new();
        request.insert("x-session-id", HeaderValue::from_static("known"));
        let mut session = session(&cache, request);

        session.parse().await.unwrap();

        assert_eq!(session.id(), "known");
        assert_eq!(session.cast("n").int(), Some(1));
        assert!(session.transport().response_headers().is_empty());
    }

    #[tokio::test]
    async fn test_expose_lists_the_header() {
        let cache = InMemoryCache::new();
        let mut session = session(&cache, HeaderMap::new());

        session.expose().unwrap();

        let headers = session.transport().response_headers();
        assert_eq!(
            headers.get("access-control-expose-headers").unwrap(),
            "X-SESSION-ID"
        );
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "X-SESSION-ID"
        );
    }
}
