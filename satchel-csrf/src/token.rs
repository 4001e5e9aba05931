use crate::error::{CsrfError, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use satchel_session::Session;
use tracing::debug;

/// Payload key holding the session's CSRF token.
pub const CSRF_TOKEN_KEY: &str = "csrf_token";

/// Generate a new random token (32 bytes, URL-safe base64).
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: [u8; 32] = rng.r#gen();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Store a fresh token in the session unless one is already there.
///
/// Returns the stored token. The session still has to be saved for a new
/// token to survive the request.
pub fn ensure_token<S: Session + ?Sized>(session: &mut S) -> String {
    if let Some(token) = session.cast(CSRF_TOKEN_KEY).as_str() {
        return token.to_string();
    }

    let token = generate_token();
    session.set(CSRF_TOKEN_KEY, token.as_str().into());
    debug!(session_id = %session.id(), "csrf token issued");
    token
}

/// The session's CSRF token, empty when none has been issued.
pub fn get_csrf<S: Session + ?Sized>(session: Option<&S>) -> Result<String> {
    let session = session.ok_or(CsrfError::MissingSession("GetCSRF"))?;
    Ok(session.cast(CSRF_TOKEN_KEY).string_or(""))
}

/// Whether `token` matches the session's CSRF token.
///
/// Always false while the session holds no token.
pub fn check_csrf<S: Session + ?Sized>(session: Option<&S>, token: &str) -> Result<bool> {
    let stored = get_csrf(session)?;
    Ok(!stored.is_empty() && constant_time_compare(&stored, token))
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
