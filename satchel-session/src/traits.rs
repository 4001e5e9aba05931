//! Session facade trait definition.

use crate::error::SessionResult;
use crate::record::SessionRecord;
use crate::value::{Caster, Payload, Value};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Operations shared by every session driver.
///
/// A driver is built per request, [`parse`](Session::parse)d once before any
/// data access, mutated by the handler and [`save`](Session::save)d at the
/// end. Data operations (`set`, `get`, `delete`, `exists`, `cast`) only touch
/// the in-memory payload; cache I/O happens in `parse`, `regenerate`,
/// `destroy` and `save`.
///
/// Concurrent requests carrying the same id each hold their own copy of the
/// payload; the last `save` wins.
///
/// # Examples
///
/// ```
/// use satchel_cache::InMemoryCache;
/// use satchel_session::*;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), SessionError> {
/// let manager = SessionManager::new(Arc::new(InMemoryCache::new()));
/// let mut session = manager.header_session(HttpExchange::default());
///
/// session.parse().await?;
/// session.set("user_id", 42.into());
/// assert_eq!(session.cast("user_id").int_or(0), 42);
///
/// session.save().await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Session: Send {
    /// The underlying record.
    fn record(&self) -> &SessionRecord;

    /// Mutable access to the underlying record.
    fn record_mut(&mut self) -> &mut SessionRecord;

    /// Resolve the session from the incoming request.
    ///
    /// Loads the payload when the transport carries an id the cache knows,
    /// otherwise regenerates. A stored payload that fails to decode also
    /// regenerates and then returns the decode error.
    async fn parse(&mut self) -> SessionResult<()>;

    /// Destroy the current record, issue a new id and announce it on the
    /// transport.
    async fn regenerate(&mut self) -> SessionResult<()>;

    /// Delete the cache entry and clear the id and payload.
    ///
    /// Destroying a session that was never stored is not an error.
    async fn destroy(&mut self) -> SessionResult<()> {
        self.record_mut().destroy().await
    }

    /// Persist the payload; a no-op while no id is established.
    async fn save(&mut self) -> SessionResult<()> {
        self.record().save().await
    }

    /// Transport headers to attach to every response, beyond id issuance.
    fn expose(&mut self) -> SessionResult<()> {
        Ok(())
    }

    /// Current identifier, empty when none is established.
    fn id(&self) -> &str {
        self.record().id()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.record_mut().data_mut().insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.record().data().get(key)
    }

    fn delete(&mut self, key: &str) -> Option<Value> {
        self.record_mut().data_mut().remove(key)
    }

    fn exists(&self, key: &str) -> bool {
        self.record().data().contains_key(key)
    }

    /// Coercing accessor for a payload value.
    fn cast(&self, key: &str) -> Caster<'_> {
        Caster::new(self.get(key))
    }

    /// Decode a payload value into a concrete type.
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        self.cast(key).typed()
    }

    /// The whole payload.
    fn data(&self) -> &Payload {
        self.record().data()
    }

    fn keys(&self) -> Vec<&str> {
        self.record().data().keys().map(String::as_str).collect()
    }

    fn len(&self) -> usize {
        self.record().data().len()
    }

    fn is_empty(&self) -> bool {
        self.record().data().is_empty()
    }
}
