//! Request handler module
//!
//! Dispatches requests, serves files and directory listings from the served
//! root, and applies the policy header set.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
