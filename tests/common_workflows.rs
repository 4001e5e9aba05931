//! Integration tests for common Satchel workflows.
//!
//! These tests drive sessions across several simulated requests the way a
//! web handler would.

use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue, Method, Request, Response};
use satchel::prelude::*;
use std::sync::Arc;

// =============================================================================
// Helpers
// =============================================================================

/// Turn the `Set-Cookie` of a response into the `Cookie` of the next request.
///
/// Only the last cookie is kept, which is what a browser ends up with when the
/// session cookie was reissued within one response.
fn follow_cookies(response: &Response<()>) -> HeaderMap {
    let mut request = HeaderMap::new();
    for set_cookie in response.headers().get_all(SET_COOKIE) {
        let pair = set_cookie
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        request.insert(COOKIE, HeaderValue::from_str(&pair).unwrap());
    }
    request
}

// =============================================================================
// Cookie Sessions
// =============================================================================

#[tokio::test]
async fn test_login_and_logout_flow() {
    let manager = SessionManager::new(Arc::new(InMemoryCache::new()));

    // Login request: no cookie yet
    let session = manager.cookie_session(HttpExchange::default());
    let (_, session) = with_session(session, async |s| {
        s.regenerate().await.unwrap();
        s.set("user_id", 42.into());
    })
    .await
    .unwrap();

    let mut response = Response::new(());
    session.transport().apply_to(&mut response);
    let next = follow_cookies(&response);

    // Authenticated request reuses the last issued cookie
    let mut session = manager.cookie_session(HttpExchange::new(next));
    session.parse().await.unwrap();
    assert_eq!(session.cast("user_id").int(), Some(42));

    // Logout
    let old_id = session.id().to_string();
    session.destroy().await.unwrap();
    assert!(!manager.cache().exists(&format!("C_S_{old_id}")).await.unwrap());
}

// =============================================================================
// Header Sessions
// =============================================================================

#[tokio::test]
async fn test_api_client_counter() {
    let manager = SessionManager::new(Arc::new(InMemoryCache::new()));
    let mut id: Option<String> = None;

    for expected in 1..=3 {
        let mut request = HeaderMap::new();
        if let Some(id) = &id {
            request.insert("x-session-id", HeaderValue::from_str(id).unwrap());
        }

        let session = manager.header_session(HttpExchange::new(request));
        let (count, session) = with_session(session, async |s| {
            let count = s.cast("count").int_or(0) + 1;
            s.set("count", count.into());
            count
        })
        .await
        .unwrap();

        assert_eq!(count, expected);
        id = Some(session.id().to_string());
    }
}

// =============================================================================
// CSRF
// =============================================================================

#[tokio::test]
async fn test_form_post_with_csrf() {
    let manager = SessionManager::new(Arc::new(InMemoryCache::new()));
    let guard = CsrfGuard::default();

    // Render the form
    let session = manager.cookie_session(HttpExchange::default());
    let (token, session) = with_session(session, async |s| guard.issue(Some(s)).unwrap())
        .await
        .unwrap();
    let mut response = Response::new(());
    session.transport().apply_to(&mut response);
    let cookies = follow_cookies(&response);

    // Submit it
    let mut session = manager.cookie_session(HttpExchange::new(cookies));
    session.parse().await.unwrap();

    let body = format!("title=hello&csrf_token={token}");
    let request = Request::builder()
        .method(Method::POST)
        .uri("/posts")
        .body(body)
        .unwrap();
    assert!(guard.validate_request(Some(&session), &request).is_ok());

    let forged = Request::builder()
        .method(Method::POST)
        .uri("/posts")
        .body("title=hello&csrf_token=forged".to_string())
        .unwrap();
    assert!(guard.validate_request(Some(&session), &forged).is_err());
}

#[tokio::test]
async fn test_corrupt_session_recovers_with_new_id() {
    let cache = InMemoryCache::new();
    cache
        .put("C_S_stale", "{broken".to_string(), std::time::Duration::from_secs(60))
        .await
        .unwrap();
    let manager = SessionManager::new(Arc::new(cache.clone()));

    let mut request = HeaderMap::new();
    request.insert(COOKIE, HeaderValue::from_static("session=stale"));
    let session = manager.cookie_session(HttpExchange::new(request));

    let (_, session) = with_session(session, async |s| s.set("visits", 1.into()))
        .await
        .unwrap();

    let new_id = session.id().to_string();
    assert_ne!(new_id, "stale");
    assert!(!cache.exists("C_S_stale").await.unwrap());
    assert!(cache.exists(&format!("C_S_{new_id}")).await.unwrap());
    assert_eq!(cache.len().await, 1);

    let mut response = Response::new(());
    session.transport().apply_to(&mut response);
    let next = follow_cookies(&response);
    assert_eq!(
        next.get(COOKIE).unwrap().to_str().unwrap(),
        format!("session={new_id}")
    );

    // The next request sees the recovered payload
    let mut session = manager.cookie_session(HttpExchange::new(next));
    session.parse().await.unwrap();
    assert_eq!(session.cast("visits").int(), Some(1));
}
