//! # Satchel CSRF Protection
//!
//! Cross-Site Request Forgery protection using the synchronizer token
//! pattern: a random token lives in the session payload under
//! [`CSRF_TOKEN_KEY`] and unsafe requests must present it back.
//!
//! ## Token Helpers
//!
//! ```rust
//! use satchel_cache::InMemoryCache;
//! use satchel_csrf::*;
//! use satchel_session::{HttpExchange, Session, SessionManager};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let manager = SessionManager::new(Arc::new(InMemoryCache::new()));
//! let mut session = manager.cookie_session(HttpExchange::default());
//! session.parse().await?;
//!
//! let token = ensure_token(&mut session);
//! assert_eq!(get_csrf(Some(&session))?, token);
//! assert!(check_csrf(Some(&session), &token)?);
//! assert!(!check_csrf(Some(&session), "forged")?);
//!
//! session.save().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Request Guard
//!
//! ```rust
//! use satchel_csrf::{CsrfConfig, CsrfGuard};
//! use http::Method;
//!
//! let guard = CsrfGuard::new(
//!     CsrfConfig::default().with_exclude_paths(vec!["/webhooks".to_string()]),
//! );
//!
//! assert!(!guard.needs_protection(&Method::GET, "/profile"));
//! assert!(guard.needs_protection(&Method::POST, "/profile"));
//! assert!(!guard.needs_protection(&Method::POST, "/webhooks/stripe"));
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod token;

pub use config::CsrfConfig;
pub use error::{CsrfError, Result};
pub use guard::CsrfGuard;
pub use token::{CSRF_TOKEN_KEY, check_csrf, ensure_token, generate_token, get_csrf};
