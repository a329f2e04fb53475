//! CORS policy for the HTTP surface.
//!
//! Configured origins are either exact (`https://app.example.com`) or
//! any-port patterns ending in `:*` (`http://localhost:*`), which match the
//! same scheme and host followed by a numeric port.

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use cr_domain::config::CorsConfig;

use crate::api::chat::ID_TOKEN_HEADER;

const METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

fn allowed_headers() -> [HeaderName; 3] {
    [
        header::CONTENT_TYPE,
        HeaderName::from_static(ID_TOKEN_HEADER),
        header::AUTHORIZATION,
    ]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Origin matching
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parsed non-wildcard origin list.
#[derive(Debug, Clone, Default)]
pub struct OriginRules {
    exact: Vec<String>,
    /// `scheme://host:` prefixes that accept any numeric port.
    any_port: Vec<String>,
}

impl OriginRules {
    pub fn parse(origins: &[String]) -> Self {
        let mut rules = Self::default();
        for origin in origins {
            match origin.strip_suffix('*') {
                Some(prefix) if prefix.ends_with(':') => rules.any_port.push(prefix.to_owned()),
                _ if origin.parse::<HeaderValue>().is_ok() => rules.exact.push(origin.clone()),
                _ => tracing::warn!(origin = %origin, "invalid CORS origin, skipping"),
            }
        }
        rules
    }

    pub fn allows(&self, origin: &str) -> bool {
        if self.exact.iter().any(|e| e == origin) {
            return true;
        }
        self.any_port.iter().any(|prefix| {
            origin
                .strip_prefix(prefix.as_str())
                .is_some_and(|port| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Layer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build the [`CorsLayer`] for the configured origins. A lone `"*"`
/// allows every origin.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(METHODS)
        .allow_headers(allowed_headers());

    if cors.is_wildcard() {
        return layer.allow_origin(Any);
    }

    let rules = OriginRules::parse(&cors.allowed_origins);
    layer.allow_origin(AllowOrigin::predicate(move |origin, _| {
        origin.to_str().is_ok_and(|o| rules.allows(o))
    }))
}
