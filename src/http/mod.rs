//! HTTP protocol layer module
//!
//! Protocol helpers shared by the request handler: the fixed policy header
//! set, MIME detection, date-based cache validation and response builders.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use headers::apply_policy_headers;
pub use response::{
    build_301_response, build_304_response, build_404_response, build_501_response,
    build_file_response, build_html_response, build_options_response, escape_html, ResponseBody,
};
