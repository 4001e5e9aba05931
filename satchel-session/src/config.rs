//! Session configuration.

use crate::error::{SessionError, SessionResult};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Prefix prepended to a session id to form its cache key.
pub const DEFAULT_KEY_PREFIX: &str = "C_S_";

/// Default cookie name for cookie sessions.
pub const DEFAULT_COOKIE_NAME: &str = "session";

/// Default header name for header sessions.
pub const DEFAULT_HEADER_NAME: &str = "X-SESSION-ID";

/// Cache lifetime used when no expiration is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest accepted expiration, the lifetime cap browsers put on cookies.
pub const MAX_EXPIRATION: Duration = Duration::from_secs(400 * 24 * 60 * 60);

/// Prefix of the environment variables read by `from_env`.
pub const ENV_PREFIX: &str = "SATCHEL_SESSION";

const COMPONENT: &str = "SessionConfig";

/// Cookie `SameSite` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Lax,
    Strict,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" => Ok(SameSite::None),
            other => Err(SessionError::config(
                COMPONENT,
                format!("unknown SameSite policy: {other}"),
            )),
        }
    }
}

impl From<SameSite> for cookie::SameSite {
    fn from(value: SameSite) -> Self {
        match value {
            SameSite::Lax => cookie::SameSite::Lax,
            SameSite::Strict => cookie::SameSite::Strict,
            SameSite::None => cookie::SameSite::None,
        }
    }
}

/// Cookie session configuration.
#[derive(Debug, Clone)]
pub struct CookieSessionConfig {
    /// Cookie name
    pub name: String,
    /// Cache key prefix
    pub key_prefix: String,
    /// `Secure` cookie attribute
    pub secure: bool,
    /// `HttpOnly` cookie attribute
    pub http_only: bool,
    /// `Domain` cookie attribute
    pub domain: Option<String>,
    /// `Path` cookie attribute
    pub path: String,
    /// `SameSite` cookie attribute
    pub same_site: SameSite,
    /// Cookie and cache lifetime.
    ///
    /// Zero issues a browser-session cookie (no `Expires`) while the cache
    /// entry falls back to [`DEFAULT_TTL`].
    pub expiration: Duration,
    /// Stamp `created_at` and persist immediately when an id is issued
    pub persist_on_regenerate: bool,
}

impl Default for CookieSessionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            secure: false,
            http_only: true,
            domain: None,
            path: "/".to_string(),
            same_site: SameSite::Lax,
            expiration: Duration::ZERO,
            persist_on_regenerate: true,
        }
    }
}

impl CookieSessionConfig {
    /// Defaults overridden by `SATCHEL_SESSION_*` environment variables.
    ///
    /// Recognized: `NAME`, `PREFIX`, `SECURE`, `HTTP_ONLY`, `DOMAIN`, `PATH`,
    /// `SAME_SITE`, `EXPIRATION_SECS`, `PERSIST_ON_REGENERATE`.
    pub fn from_env() -> SessionResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SessionResult<Self> {
        let vars = EnvVars { lookup: &lookup };
        let mut config = Self::default();

        if let Some(name) = vars.string("NAME") {
            config.name = name;
        }
        if let Some(prefix) = vars.string("PREFIX") {
            config.key_prefix = prefix;
        }
        if let Some(secure) = vars.flag("SECURE")? {
            config.secure = secure;
        }
        if let Some(http_only) = vars.flag("HTTP_ONLY")? {
            config.http_only = http_only;
        }
        if let Some(domain) = vars.string("DOMAIN") {
            config.domain = Some(domain);
        }
        if let Some(path) = vars.string("PATH") {
            config.path = path;
        }
        if let Some(same_site) = vars.string("SAME_SITE") {
            config.same_site = same_site.parse()?;
        }
        if let Some(expiration) = vars.seconds("EXPIRATION_SECS")? {
            config.expiration = expiration;
        }
        if let Some(persist) = vars.flag("PERSIST_ON_REGENERATE")? {
            config.persist_on_regenerate = persist;
        }

        Ok(config)
    }

    /// Set the cookie name. A blank name keeps [`DEFAULT_COOKIE_NAME`].
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name_or(name.into(), DEFAULT_COOKIE_NAME);
        self
    }

    /// Set the cache key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the `Secure` flag.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the `HttpOnly` flag.
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set the cookie domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the cookie path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the `SameSite` policy.
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Set the cookie and cache lifetime. Zero means a browser-session cookie.
    ///
    /// Values above [`MAX_EXPIRATION`] are capped.
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration.min(MAX_EXPIRATION);
        self
    }

    /// Toggle eager persistence on id issuance.
    pub fn with_persist_on_regenerate(mut self, persist: bool) -> Self {
        self.persist_on_regenerate = persist;
        self
    }
}

/// Header session configuration.
#[derive(Debug, Clone)]
pub struct HeaderSessionConfig {
    /// Request/response header name
    pub name: String,
    /// Cache key prefix
    pub key_prefix: String,
    /// Cache lifetime; zero falls back to [`DEFAULT_TTL`]
    pub expiration: Duration,
    /// Stamp `created_at` and persist immediately when an id is issued
    pub persist_on_regenerate: bool,
}

impl Default for HeaderSessionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_HEADER_NAME.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            expiration: Duration::ZERO,
            persist_on_regenerate: false,
        }
    }
}

impl HeaderSessionConfig {
    /// Defaults overridden by `SATCHEL_SESSION_*` environment variables.
    ///
    /// Recognized: `HEADER`, `PREFIX`, `EXPIRATION_SECS`,
    /// `PERSIST_ON_REGENERATE`.
    pub fn from_env() -> SessionResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SessionResult<Self> {
        let vars = EnvVars { lookup: &lookup };
        let mut config = Self::default();

        if let Some(name) = vars.string("HEADER") {
            config.name = name;
        }
        if let Some(prefix) = vars.string("PREFIX") {
            config.key_prefix = prefix;
        }
        if let Some(expiration) = vars.seconds("EXPIRATION_SECS")? {
            config.expiration = expiration;
        }
        if let Some(persist) = vars.flag("PERSIST_ON_REGENERATE")? {
            config.persist_on_regenerate = persist;
        }

        Ok(config)
    }

    /// Set the header name. A blank name keeps [`DEFAULT_HEADER_NAME`].
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name_or(name.into(), DEFAULT_HEADER_NAME);
        self
    }

    /// Set the cache key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the cache lifetime, capped at [`MAX_EXPIRATION`].
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration.min(MAX_EXPIRATION);
        self
    }

    /// Toggle eager persistence on id issuance.
    pub fn with_persist_on_regenerate(mut self, persist: bool) -> Self {
        self.persist_on_regenerate = persist;
        self
    }
}

fn name_or(name: String, default: &str) -> String {
    if name.trim().is_empty() {
        default.to_string()
    } else {
        name
    }
}

struct EnvVars<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl EnvVars<'_> {
    fn string(&self, key: &str) -> Option<String> {
        (self.lookup)(&format!("{ENV_PREFIX}_{key}")).filter(|v| !v.trim().is_empty())
    }

    fn flag(&self, key: &str) -> SessionResult<Option<bool>> {
        self.string(key)
            .map(|v| match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(SessionError::config(
                    COMPONENT,
                    format!("{ENV_PREFIX}_{key} is not a boolean: {v}"),
                )),
            })
            .transpose()
    }

    fn seconds(&self, key: &str) -> SessionResult<Option<Duration>> {
        let Some(v) = self.string(key) else {
            return Ok(None);
        };

        let secs = v.trim().parse::<u64>().map_err(|_| {
            SessionError::config(
                COMPONENT,
                format!("{ENV_PREFIX}_{key} is not a number of seconds: {v}"),
            )
        })?;
        let duration = Duration::from_secs(secs);
        if duration > MAX_EXPIRATION {
            return Err(SessionError::config(
                COMPONENT,
                format!(
                    "{ENV_PREFIX}_{key} exceeds the maximum of {} seconds: {v}",
                    MAX_EXPIRATION.as_secs()
                ),
            ));
        }

        Ok(Some(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_cookie_defaults() {
        let config = CookieSessionConfig::default();
        assert_eq!(config.name, "session");
        assert_eq!(config.key_prefix, "C_S_");
        assert_eq!(config.same_site, SameSite::Lax);
        assert_eq!(config.expiration, Duration::ZERO);
        assert!(config.persist_on_regenerate);
    }

    #[test]
    fn test_header_defaults() {
        let config = HeaderSessionConfig::default();
        assert_eq!(config.name, "X-SESSION-ID");
        assert_eq!(config.key_prefix, "C_S_");
        assert!(!config.persist_on_regenerate);
    }

    #[test]
    fn test_cookie_builder() {
        let config = CookieSessionConfig::default()
            .with_name("sid")
            .with_secure(true)
            .with_domain("example.com")
            .with_same_site(SameSite::Strict)
            .with_expiration(Duration::from_secs(3600));

        assert_eq!(config.name, "sid");
        assert!(config.secure);
        assert_eq!(config.domain.as_deref(), Some("example.com"));
        assert_eq!(config.same_site, SameSite::Strict);
        assert_eq!(config.expiration, Duration::from_secs(3600));
    }

    #[test]
    fn test_same_site_parsing() {
        assert_eq!("lax".parse::<SameSite>().unwrap(), SameSite::Lax);
        assert_eq!("STRICT".parse::<SameSite>().unwrap(), SameSite::Strict);
        assert_eq!(" None ".parse::<SameSite>().unwrap(), SameSite::None);
        assert!("sometimes".parse::<SameSite>().is_err());
        assert_eq!(SameSite::Strict.to_string(), "Strict");
    }

    #[test]
    fn test_cookie_from_lookup() {
        let config = CookieSessionConfig::from_lookup(lookup(&[
            ("SATCHEL_SESSION_NAME", "app_session"),
            ("SATCHEL_SESSION_SECURE", "true"),
            ("SATCHEL_SESSION_SAME_SITE", "none"),
            ("SATCHEL_SESSION_EXPIRATION_SECS", "900"),
            ("SATCHEL_SESSION_DOMAIN", ""),
        ]))
        .unwrap();

        assert_eq!(config.name, "app_session");
        assert!(config.secure);
        assert_eq!(config.same_site, SameSite::None);
        assert_eq!(config.expiration, Duration::from_secs(900));
        assert_eq!(config.domain, None);
    }

    #[test]
    fn test_header_from_lookup() {
        let config = HeaderSessionConfig::from_lookup(lookup(&[
            ("SATCHEL_SESSION_HEADER", "X-Token"),
            ("SATCHEL_SESSION_PERSIST_ON_REGENERATE", "1"),
        ]))
        .unwrap();

        assert_eq!(config.name, "X-Token");
        assert!(config.persist_on_regenerate);
    }

    #[test]
    fn test_invalid_env_values_rejected() {
        let err = CookieSessionConfig::from_lookup(lookup(&[(
            "SATCHEL_SESSION_SECURE",
            "maybe",
        )]))
        .unwrap_err();
        assert!(matches!(err, SessionError::Config { .. }));

        let err = HeaderSessionConfig::from_lookup(lookup(&[(
            "SATCHEL_SESSION_EXPIRATION_SECS",
            "-5",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("EXPIRATION_SECS"));
    }

    #[test]
    fn test_oversized_expiration_rejected() {
        let err = CookieSessionConfig::from_lookup(lookup(&[(
            "SATCHEL_SESSION_EXPIRATION_SECS",
            "18446744073709551615",
        )]))
        .unwrap_err();
        assert!(matches!(err, SessionError::Config { .. }));
        assert!(err.to_string().contains("maximum"));

        let max = MAX_EXPIRATION.as_secs().to_string();
        let config = HeaderSessionConfig::from_lookup(lookup(&[(
            "SATCHEL_SESSION_EXPIRATION_SECS",
            max.as_str(),
        )]))
        .unwrap();
        assert_eq!(config.expiration, MAX_EXPIRATION);
    }

    #[test]
    fn test_builders_cap_expiration() {
        let cookie = CookieSessionConfig::default().with_expiration(Duration::MAX);
        assert_eq!(cookie.expiration, MAX_EXPIRATION);

        let header = HeaderSessionConfig::default().with_expiration(Duration::from_secs(u64::MAX));
        assert_eq!(header.expiration, MAX_EXPIRATION);
    }

    #[test]
    fn test_blank_names_keep_defaults() {
        assert_eq!(CookieSessionConfig::default().with_name("").name, "session");
        assert_eq!(
            HeaderSessionConfig::default().with_name("  ").name,
            "X-SESSION-ID"
        );
        assert_eq!(HeaderSessionConfig::default().with_name("X-Token").name, "X-Token");
    }
}
