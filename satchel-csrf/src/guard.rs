use crate::{
    config::CsrfConfig,
    error::{CsrfError, Result},
    token::{check_csrf, ensure_token},
};
use http::{HeaderMap, Method, Request};
use satchel_session::Session;
use std::sync::Arc;
use tracing::{debug, warn};

/// Session-backed CSRF protection for incoming requests.
///
/// Every request gets a token stored in its session through
/// [`issue`](Self::issue). Requests with an unsafe method on a protected
/// path must echo that token back in the configured header or body field.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    config: Arc<CsrfConfig>,
}

impl CsrfGuard {
    pub fn new(config: CsrfConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    /// Check if a request needs CSRF protection
    pub fn needs_protection(&self, method: &Method, path: &str) -> bool {
        if self
            .config
            .safe_methods
            .iter()
            .any(|safe| safe.eq_ignore_ascii_case(method.as_str()))
        {
            return false;
        }

        !self
            .config
            .exclude_paths
            .iter()
            .any(|excluded| path.starts_with(excluded.as_str()))
    }

    /// Make sure the session carries a token and return it.
    pub fn issue<S: Session + ?Sized>(&self, session: Option<&mut S>) -> Result<String> {
        let session = session.ok_or(CsrfError::MissingSession("CsrfGuard"))?;
        Ok(ensure_token(session))
    }

    /// Validate the token presented by a request against its session.
    pub fn validate_request<S, B>(&self, session: Option<&S>, request: &Request<B>) -> Result<()>
    where
        S: Session + ?Sized,
        B: AsRef<[u8]>,
    {
        let path = request.uri().path();
        if !self.needs_protection(request.method(), path) {
            return Ok(());
        }

        let token = self
            .token_from_header(request.headers())
            .or_else(|| self.token_from_body(request.body().as_ref()))
            .ok_or_else(|| CsrfError::MissingToken {
                header: self.config.header_name.clone(),
                field: self.config.field_name.clone(),
            })?;

        if check_csrf(session, &token)? {
            debug!(path, "csrf token accepted");
            Ok(())
        } else {
            warn!(method = %request.method(), path, "csrf token rejected");
            Err(CsrfError::InvalidToken)
        }
    }

    fn token_from_header(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(self.config.header_name.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    fn token_from_body(&self, body: &[u8]) -> Option<String> {
        if body.is_empty() {
            return None;
        }

        if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
            return json
                .get(&self.config.field_name)
                .and_then(|token| token.as_str())
                .map(str::to_string);
        }

        serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .ok()?
            .into_iter()
            .find(|(key, _)| *key == self.config.field_name)
            .map(|(_, value)| value)
    }
}

impl Default for CsrfGuard {
    fn default() -> Self {
        Self::new(CsrfConfig::default())
    }
}
