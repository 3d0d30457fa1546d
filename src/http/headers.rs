//! Fixed response header set
//!
//! Every response leaving the server carries the policy headers below so a
//! page served from it can load and frame the web playback SDK. Preflight
//! responses carry only the CORS subset.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};

pub const PERMISSIONS_POLICY: &str = "unload=*, microphone=*, camera=*, autoplay=*";

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Content-Security-Policy value, one directive per line joined with `; `
pub const CONTENT_SECURITY_POLICY: &str = concat!(
    "default-src 'self' 'unsafe-inline' 'unsafe-eval' data: blob: https: http:; ",
    "script-src 'self' 'unsafe-inline' 'unsafe-eval' https://sdk.scdn.co https://accounts.spotify.com; ",
    "style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; ",
    "font-src 'self' https://fonts.gstatic.com; ",
    "img-src 'self' data: https: http:; ",
    "frame-src 'self' https://accounts.spotify.com https://sdk.scdn.co; ",
    "connect-src 'self' https://accounts.spotify.com https://api.spotify.com https://sdk.scdn.co",
);

const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", ALLOW_ORIGIN),
    ("access-control-allow-methods", ALLOW_METHODS),
    ("access-control-allow-headers", ALLOW_HEADERS),
];

/// Attach the three CORS headers
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    for (name, value) in CORS_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// Attach the full policy header set: Permissions-Policy, CORS and CSP
///
/// Existing values are overwritten, so applying twice is harmless.
pub fn apply_policy_headers(headers: &mut HeaderMap) {
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(PERMISSIONS_POLICY),
    );
    apply_cors_headers(headers);
    headers.insert(
        HeaderName::from_static("content-security-policy"),
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_headers_exact_values() {
        let mut headers = HeaderMap::new();
        apply_policy_headers(&mut headers);

        assert_eq!(headers.len(), 5);
        assert_eq!(
            headers["permissions-policy"],
            "unload=*, microphone=*, camera=*, autoplay=*"
        );
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(
            headers["access-control-allow-headers"],
            "Content-Type, Authorization"
        );
        assert_eq!(
            headers["content-security-policy"],
            "default-src 'self' 'unsafe-inline' 'unsafe-eval' data: blob: https: http:; \
             script-src 'self' 'unsafe-inline' 'unsafe-eval' https://sdk.scdn.co https://accounts.spotify.com; \
             style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
             font-src 'self' https://fonts.gstatic.com; \
             img-src 'self' data: https: http:; \
             frame-src 'self' https://accounts.spotify.com https://sdk.scdn.co; \
             connect-src 'self' https://accounts.spotify.com https://api.spotify.com https://sdk.scdn.co"
        );
    }

    #[test]
    fn test_csp_is_single_line() {
        assert!(!CONTENT_SECURITY_POLICY.contains('\n'));
        assert!(!CONTENT_SECURITY_POLICY.ends_with(';'));
        assert_eq!(CONTENT_SECURITY_POLICY.split("; ").count(), 7);
    }

    #[test]
    fn test_cors_subset_only() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers);

        assert_eq!(headers.len(), 3);
        assert!(headers.get("permissions-policy").is_none());
        assert!(headers.get("content-security-policy").is_none());
    }

    #[test]
    fn test_apply_twice_does_not_duplicate() {
        let mut headers = HeaderMap::new();
        apply_policy_headers(&mut headers);
        apply_policy_headers(&mut headers);

        assert_eq!(headers.len(), 5);
        assert_eq!(headers.get_all("access-control-allow-origin").iter().count(), 1);
    }
}
