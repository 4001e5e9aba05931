//! Request-scoped session state shared by both drivers.

use crate::config::{DEFAULT_TTL, MAX_EXPIRATION};
use crate::error::{SessionError, SessionResult};
use crate::id::IdGenerator;
use crate::traits::Session;
use crate::value::{Payload, Value};
use satchel_cache::CacheStore;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Payload field stamped with the issuance time (nanoseconds since epoch).
pub const CREATED_AT_KEY: &str = "created_at";

/// One session's identifier and payload plus the cache it persists into.
///
/// The cache key is always `key_prefix + id` and is never stored on its own.
/// An empty id means no session has been established; such a record is
/// never written to the cache.
pub struct SessionRecord {
    component: &'static str,
    cache: Arc<dyn CacheStore>,
    key_prefix: String,
    expiration: Duration,
    id: String,
    data: Payload,
}

/// Outcome of looking up an incoming identifier.
pub(crate) enum Lookup {
    Loaded,
    Missing,
    Corrupt(serde_json::Error),
}

impl SessionRecord {
    pub fn new(
        component: &'static str,
        cache: Arc<dyn CacheStore>,
        key_prefix: impl Into<String>,
        expiration: Duration,
    ) -> Self {
        Self {
            component,
            cache,
            key_prefix: key_prefix.into(),
            expiration,
            id: String::new(),
            data: Payload::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cache_key(&self) -> String {
        format!("{}{}", self.key_prefix, self.id)
    }

    pub fn data(&self) -> &Payload {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Payload {
        &mut self.data
    }

    /// TTL applied when the cache entry is first created.
    pub fn ttl(&self) -> Duration {
        if self.expiration.is_zero() {
            DEFAULT_TTL
        } else {
            self.expiration.min(MAX_EXPIRATION)
        }
    }

    /// Adopt `candidate` as the id and load its payload if the cache has it.
    pub(crate) async fn load(&mut self, candidate: Option<String>) -> SessionResult<Lookup> {
        let candidate = candidate.unwrap_or_default();
        let candidate = candidate.trim();
        if candidate.is_empty() {
            trace!(component = self.component, "no incoming session id");
            return Ok(Lookup::Missing);
        }

        self.id = candidate.to_string();
        let key = self.cache_key();

        let exists = self
            .cache
            .exists(&key)
            .await
            .map_err(SessionError::storage(self.component))?;
        if !exists {
            debug!(component = self.component, cache_key = %key, "session not found in cache");
            return Ok(Lookup::Missing);
        }

        let Some(raw) = self
            .cache
            .get(&key)
            .await
            .map_err(SessionError::storage(self.component))?
        else {
            // expired between the two calls
            return Ok(Lookup::Missing);
        };

        match serde_json::from_str::<Payload>(&raw) {
            Ok(data) => {
                self.data = data;
                debug!(component = self.component, session_id = %self.id, "session loaded");
                Ok(Lookup::Loaded)
            }
            Err(source) => Ok(Lookup::Corrupt(source)),
        }
    }

    /// Destroy the current record and take a freshly generated id.
    pub(crate) async fn reissue(
        &mut self,
        generator: &dyn IdGenerator,
        persist: bool,
    ) -> SessionResult<()> {
        self.destroy().await?;

        self.id = generator.generate();
        if persist {
            let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
            self.data.insert(CREATED_AT_KEY.to_string(), Value::Int(now));
            self.save().await?;
        }

        debug!(component = self.component, session_id = %self.id, persisted = persist, "session id issued");
        Ok(())
    }

    /// Delete the cache entry and reset to the empty, id-less state.
    pub async fn destroy(&mut self) -> SessionResult<()> {
        if !self.id.is_empty() {
            let key = self.cache_key();
            self.cache
                .forget(&key)
                .await
                .map_err(SessionError::storage(self.component))?;
            debug!(component = self.component, cache_key = %key, "session destroyed");
        }

        self.id.clear();
        self.data.clear();
        Ok(())
    }

    /// Write the whole payload back.
    ///
    /// Updates the existing entry in place, keeping its TTL, and only creates
    /// it with [`ttl`](Self::ttl) when the update finds nothing.
    pub async fn save(&self) -> SessionResult<()> {
        if self.id.is_empty() {
            return Ok(());
        }

        let document =
            serde_json::to_string(&self.data).map_err(SessionError::serialization(self.component))?;
        let key = self.cache_key();

        let updated = self
            .cache
            .update(&key, document.clone())
            .await
            .map_err(SessionError::storage(self.component))?;

        if !updated {
            self.cache
                .put(&key, document, self.ttl())
                .await
                .map_err(SessionError::storage(self.component))?;
            debug!(component = self.component, cache_key = %key, ttl_secs = self.ttl().as_secs(), "session created in cache");
        } else {
            trace!(component = self.component, cache_key = %key, "session updated in cache");
        }

        Ok(())
    }
}

impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("component", &self.component)
            .field("key_prefix", &self.key_prefix)
            .field("expiration", &self.expiration)
            .field("id", &self.id)
            .field("data", &self.data)
            .finish()
    }
}

/// Shared tail of `parse`: regenerate when the id is unknown or unreadable.
///
/// A corrupt payload still leaves the session usable under a new id, but the
/// decode error is returned so the caller can report it.
pub(crate) async fn finish_parse<S: Session + ?Sized>(
    session: &mut S,
    lookup: Lookup,
    component: &'static str,
) -> SessionResult<()> {
    match lookup {
        Lookup::Loaded => Ok(()),
        Lookup::Missing => session.regenerate().await,
        Lookup::Corrupt(source) => {
            warn!(component, session_id = %session.id(), error = %source, "discarding unreadable session payload");
            session.regenerate().await?;
            Err(SessionError::serialization(component)(source))
        }
    }
}
