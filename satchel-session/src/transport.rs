//! Request/response transports that carry the session identifier.
//!
//! Drivers never touch a web framework directly. They read the incoming id
//! from, and write the issued id to, one of these traits. [`HttpExchange`]
//! implements both on top of `http` header maps.

use cookie::Cookie;
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

/// A header name or value that cannot be represented on the wire.
#[derive(Debug, Error)]
#[error("invalid header {name}: {reason}")]
pub struct TransportError {
    pub name: String,
    pub reason: String,
}

impl TransportError {
    fn new(name: &str, reason: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Cookie-carried identifier transport.
pub trait CookieTransport: Send {
    /// Value of the named request cookie.
    fn cookie(&self, name: &str) -> Option<String>;

    /// Add a cookie to the response.
    fn set_cookie(&mut self, cookie: Cookie<'static>) -> Result<(), TransportError>;
}

/// Header-carried identifier transport.
pub trait HeaderTransport: Send {
    /// Value of the named request header.
    fn header(&self, name: &str) -> Option<String>;

    /// Set a response header, replacing any previous value.
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), TransportError>;

    /// Add a response header value next to existing ones.
    fn append_header(&mut self, name: &str, value: &str) -> Result<(), TransportError>;
}

/// Incoming request headers paired with the outgoing response headers.
///
/// # Examples
///
/// ```
/// use http::{HeaderMap, HeaderValue, header::COOKIE};
/// use satchel_session::{CookieTransport, HttpExchange};
///
/// let mut request = HeaderMap::new();
/// request.insert(COOKIE, HeaderValue::from_static("theme=dark; session=abc"));
///
/// let exchange = HttpExchange::new(request);
/// assert_eq!(exchange.cookie("session").as_deref(), Some("abc"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HttpExchange {
    request: HeaderMap,
    response: HeaderMap,
}

impl HttpExchange {
    pub fn new(request: HeaderMap) -> Self {
        Self {
            request,
            response: HeaderMap::new(),
        }
    }

    /// Capture the headers of an incoming request.
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        Self::new(request.headers().clone())
    }

    pub fn request_headers(&self) -> &HeaderMap {
        &self.request
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response
    }

    pub fn into_response_headers(self) -> HeaderMap {
        self.response
    }

    /// Append the collected response headers onto a response.
    pub fn apply_to<B>(&self, response: &mut http::Response<B>) {
        let headers = response.headers_mut();
        for (name, value) in &self.response {
            headers.append(name.clone(), value.clone());
        }
    }
}

fn header_name(name: &str) -> Result<HeaderName, TransportError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::new(name, e))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value).map_err(|e| TransportError::new(name, e))
}

impl CookieTransport for HttpExchange {
    fn cookie(&self, name: &str) -> Option<String> {
        self.request
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string())
    }

    fn set_cookie(&mut self, cookie: Cookie<'static>) -> Result<(), TransportError> {
        let value = header_value(SET_COOKIE.as_str(), &cookie.to_string())?;
        self.response.append(SET_COOKIE, value);
        Ok(())
    }
}

impl HeaderTransport for HttpExchange {
    fn header(&self, name: &str) -> Option<String> {
        self.request
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    fn set_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        let value = header_value(name, value)?;
        self.response.insert(header_name(name)?, value);
        Ok(())
    }

    fn append_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        let value = header_value(name, value)?;
        self.response.append(header_name(name)?, value);
        Ok(())
    }
}
