use crate::token::CSRF_TOKEN_KEY;

/// CSRF guard configuration
#[derive(Debug, Clone)]
pub struct CsrfConfig {
    /// Header carrying the token on unsafe requests
    pub header_name: String,

    /// JSON or form body field carrying the token
    pub field_name: String,

    /// Safe HTTP methods (not checked for CSRF)
    pub safe_methods: Vec<String>,

    /// Path prefixes excluded from CSRF protection
    pub exclude_paths: Vec<String>,
}

impl CsrfConfig {
    pub fn new() -> Self {
        Self {
            header_name: "X-CSRF-Token".to_string(),
            field_name: CSRF_TOKEN_KEY.to_string(),
            safe_methods: vec![
                "GET".to_string(),
                "HEAD".to_string(),
                "OPTIONS".to_string(),
            ],
            exclude_paths: Vec::new(),
        }
    }

    /// Set header name
    pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    /// Set field name
    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = name.into();
        self
    }

    /// Replace safe methods
    pub fn with_safe_methods(mut self, methods: Vec<String>) -> Self {
        self.safe_methods = methods;
        self
    }

    /// Add excluded path prefixes
    pub fn with_exclude_paths(mut self, paths: Vec<String>) -> Self {
        self.exclude_paths = paths;
        self
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self::new()
    }
}
