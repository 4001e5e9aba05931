//! Per-request session lifecycle.

use crate::error::{SessionError, SessionResult};
use crate::traits::Session;
use crate::transport::{HeaderTransport, TransportError};
use tracing::{debug, warn};

pub const EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

/// Parse `session`, hand it to `handler`, then save it.
///
/// The session is returned alongside the handler output so the caller can
/// take the transport back and copy its headers onto the response.
///
/// An unreadable stored payload is logged and the request continues with the
/// freshly issued session, so the new id still reaches the client. Any other
/// parse error stops before the handler runs. The handler's own outcome is
/// part of `R` and never prevents the save.
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
/// let session = manager.cookie_session(HttpExchange::default());
///
/// let (visits, session) = with_session(session, async |s| {
///     let visits = s.cast("visits").int_or(0) + 1;
///     s.set("visits", visits.into());
///     visits
/// })
/// .await?;
///
/// assert_eq!(visits, 1);
/// let headers = session.into_transport().into_response_headers();
/// assert!(headers.contains_key("set-cookie"));
/// # Ok(())
/// # }
/// ```
pub async fn with_session<S, R>(
    mut session: S,
    handler: impl AsyncFnOnce(&mut S) -> R,
) -> SessionResult<(R, S)>
where
    S: Session,
{
    match session.parse().await {
        Ok(()) => {}
        Err(SessionError::Serialization { component, source }) => {
            warn!(component, session_id = %session.id(), error = %source, "continuing with a new session");
        }
        Err(err) => return Err(err),
    }
    session.expose()?;

    let output = handler(&mut session).await;

    session.save().await?;
    debug!(session_id = %session.id(), "request session saved");
    Ok((output, session))
}

/// List `name` in the CORS expose and allow headers of the response.
pub fn expose_header<T>(transport: &mut T, name: &str) -> Result<(), TransportError>
where
    T: HeaderTransport + ?Sized,
{
    transport.append_header(EXPOSE_HEADERS, name)?;
    transport.append_header(ALLOW_HEADERS, name)
}
