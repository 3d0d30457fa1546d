//! HTTP cache validation module
//!
//! Provides `Last-Modified` formatting and `If-Modified-Since` handling.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use std::time::SystemTime;

/// IMF-fixdate layout, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Obsolete RFC 850 layout, e.g. `Sunday, 06-Nov-94 08:49:37 GMT`
const RFC850_DATE: &str = "%A, %d-%b-%y %H:%M:%S GMT";

/// Format a timestamp as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(IMF_FIXDATE).to_string()
}

/// Parse an HTTP date in IMF-fixdate (RFC 2822 compatible) or RFC 850 form
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, RFC850_DATE)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Check whether a conditional GET can be answered with 304
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; this server
/// emits no `ETag`, so its presence disables the date comparison entirely.
/// Unparseable dates are ignored.
///
/// # Arguments
/// * `if_modified_since` - Client-sent If-Modified-Since header
/// * `has_if_none_match` - Whether the request carried If-None-Match
/// * `modified` - File modification time
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let last_modified = DateTime::<Utc>::from(modified).trunc_subsecs(0);
    last_modified <= since
}
