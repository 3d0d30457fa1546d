//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: answers preflight requests,
//! dispatches GET/HEAD to static file serving, and decorates every other
//! response with the policy header set.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger;
use hyper::header::{HeaderValue, SERVER};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

impl<'a> RequestContext<'a> {
    fn from_parts(parts: &'a Parts) -> Self {
        Self {
            path: parts.uri.path(),
            query: parts.uri.query(),
            is_head: parts.method == Method::HEAD,
            if_modified_since: parts
                .headers
                .get("if-modified-since")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            has_if_none_match: parts.headers.contains_key("if-none-match"),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type since the body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible> {
    // Preflight: CORS subset only, filesystem untouched
    if req.method() == Method::OPTIONS {
        return Ok(http::build_options_response());
    }

    // Only the head is needed; the body is dropped unread
    let (parts, _) = req.into_parts();

    let mut response = match &parts.method {
        &Method::GET | &Method::HEAD => {
            let ctx = RequestContext::from_parts(&parts);
            static_files::serve_path(&ctx, &state).await
        }
        method => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            http::build_501_response(method.as_str())
        }
    };

    decorate_response(&mut response, &state);
    Ok(response)
}

/// Attach the policy header set and `Server` to a non-preflight response
fn decorate_response(response: &mut Response<ResponseBody>, state: &AppState) {
    let headers = response.headers_mut();
    http::apply_policy_headers(headers);
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(SERVER, server);
    }
}
