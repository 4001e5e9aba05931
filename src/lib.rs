// Satchel - server-side sessions for Rust HTTP services
//
// Sessions are identified by an opaque id carried in a cookie or a header and
// stored as JSON documents in a key-value cache. CSRF tokens ride along in the
// session payload.

// Re-export core functionality
pub use satchel_session::*;

// Re-export member crates
pub use satchel_cache;
pub use satchel_session;

#[cfg(feature = "csrf")]
pub use satchel_csrf;

// Prelude for common imports
pub mod prelude {
    pub use satchel_cache::{CacheStore, InMemoryCache};
    pub use satchel_session::prelude::*;

    #[cfg(feature = "redis")]
    pub use satchel_cache::{CacheConfig, RedisCache};

    #[cfg(feature = "csrf")]
    pub use satchel_csrf::{CsrfConfig, CsrfGuard, check_csrf, ensure_token, get_csrf};
}
