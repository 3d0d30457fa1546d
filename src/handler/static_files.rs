//! Static file serving module
//!
//! Maps request paths onto the served root and builds file, redirect and
//! not-found responses.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, ResponseBody};
use crate::logger;
use hyper::Response;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Translate a URI path into a filesystem path under `root`
///
/// The path is percent-decoded and split on `/`. Empty and `.` segments are
/// dropped, `..` removes the previous segment and never climbs above `root`,
/// and any segment that is not a single plain path component is discarded.
pub fn translate_path(root: &Path, request_path: &str) -> PathBuf {
    let decoded = urlencoding::decode(request_path).unwrap_or(Cow::Borrowed(request_path));

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if is_plain_component(s) => segments.push(s),
            _ => {}
        }
    }

    segments
        .into_iter()
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// True when `segment` is exactly one normal component on this platform
fn is_plain_component(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Serve whatever the request path resolves to: a file, a directory index,
/// a generated listing, or 404
pub async fn serve_path(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let fs_path = translate_path(&state.root, ctx.path);

    let Ok(metadata) = fs::metadata(&fs_path).await else {
        return http::build_404_response("File not found");
    };

    if metadata.is_dir() {
        if !ctx.path.ends_with('/') {
            return http::build_301_response(&directory_location(ctx.path, ctx.query));
        }
        for index_file in &state.config.http.index_files {
            let index_path = fs_path.join(index_file);
            if let Ok(index_meta) = fs::metadata(&index_path).await {
                if index_meta.is_file() {
                    return serve_file(ctx, &index_path, &index_meta).await;
                }
            }
        }
        return listing::list_directory(ctx, &fs_path).await;
    }

    // A trailing slash names a directory; files never match it
    if ctx.path.ends_with('/') {
        return http::build_404_response("File not found");
    }

    serve_file(ctx, &fs_path, &metadata).await
}

/// Redirect target adding the trailing slash to a directory path
fn directory_location(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => format!("{path}/?{q}"),
        None => format!("{path}/"),
    }
}

/// Serve a single regular file
async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    metadata: &std::fs::Metadata,
) -> Response<ResponseBody> {
    let file = match fs::File::open(file_path).await {
        Ok(f) => f,
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to open file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response("File not found");
        }
    };

    let modified = metadata.modified().ok();
    if let Some(modified) = modified {
        if cache::is_not_modified(
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
            modified,
        ) {
            return http::build_304_response(&cache::format_http_date(modified));
        }
    }

    let last_modified = modified.map(cache::format_http_date);
    http::build_file_response(
        file,
        metadata.len(),
        mime::content_type_for(file_path),
        last_modified.as_deref(),
        ctx.is_head,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_plain_path() {
        let root = Path::new("/srv/site");
        assert_eq!(translate_path(root, "/"), PathBuf::from("/srv/site"));
        assert_eq!(
            translate_path(root, "/js/app.js"),
            PathBuf::from("/srv/site/js/app.js")
        );
        assert_eq!(
            translate_path(root, "//js/./app.js"),
            PathBuf::from("/srv/site/js/app.js")
        );
    }

    #[test]
    fn test_translate_percent_decodes() {
        let root = Path::new("/srv/site");
        assert_eq!(
            translate_path(root, "/my%20song.mp3"),
            PathBuf::from("/srv/site/my song.mp3")
        );
    }

    #[test]
    fn test_translate_never_escapes_root() {
        let root = Path::new("/srv/site");
        assert_eq!(
            translate_path(root, "/../../etc/passwd"),
            PathBuf::from("/srv/site/etc/passwd")
        );
        assert_eq!(
            translate_path(root, "/%2e%2e/%2E%2E/etc/passwd"),
            PathBuf::from("/srv/site/etc/passwd")
        );
        assert_eq!(
            translate_path(root, "/a/b/../c"),
            PathBuf::from("/srv/site/a/c")
        );
    }

    #[test]
    fn test_directory_location_keeps_query() {
        assert_eq!(directory_location("/music", None), "/music/");
        assert_eq!(directory_location("/music", Some("a=1")), "/music/?a=1");
    }
}
