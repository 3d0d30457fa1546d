//! Directory listing module
//!
//! Generates the HTML index shown for directories without an index file.

use crate::handler::router::RequestContext;
use crate::http::{self, escape_html, ResponseBody};
use hyper::Response;
use std::borrow::Cow;
use std::path::Path;
use tokio::fs;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown for the entry: `/` marks directories, `@` symlinks
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Percent-encoded relative link to the entry
    fn href(&self) -> String {
        let encoded = urlencoding::encode(&self.name);
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded.into_owned()
        }
    }
}

/// Serve a generated listing of `dir`
pub async fn list_directory(ctx: &RequestContext<'_>, dir: &Path) -> Response<ResponseBody> {
    let Ok(mut read_dir) = fs::read_dir(dir).await else {
        return http::build_404_response("No permission to list directory");
    };

    let mut entries = Vec::new();
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|t| t.is_symlink());
        // Follows symlinks so a link to a directory is linked as one
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    let display_path = urlencoding::decode(ctx.path).unwrap_or(Cow::Borrowed(ctx.path));
    http::build_html_response(render_listing(&display_path, entries), ctx.is_head)
}

/// Render listing HTML; entries are sorted case-insensitively
pub fn render_listing(display_path: &str, mut entries: Vec<ListingEntry>) -> String {
    entries.sort_by_cached_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&entry.href()),
            escape_html(&entry.display_name())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_sorted_case_insensitively() {
        let html = render_listing(
            "/",
            vec![
                entry("b.js", false, false),
                entry("Assets", true, false),
                entry("a.html", false, false),
            ],
        );
        let a = html.find("a.html").unwrap();
        let assets = html.find("Assets/").unwrap();
        let b = html.find("b.js").unwrap();
        assert!(a < assets && assets < b);
    }

    #[test]
    fn test_markers_and_links() {
        let html = render_listing(
            "/media/",
            vec![
                entry("songs", true, false),
                entry("latest", true, true),
                entry("my track.mp3", false, false),
            ],
        );
        assert!(html.contains("<title>Directory listing for /media/</title>"));
        assert!(html.contains("<li><a href=\"songs/\">songs/</a></li>"));
        assert!(html.contains("<li><a href=\"latest/\">latest@</a></li>"));
        assert!(html.contains("<li><a href=\"my%20track.mp3\">my track.mp3</a></li>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let html = render_listing("/<x>/", vec![entry("<b>&.txt", false, false)]);
        assert!(html.contains("Directory listing for /&lt;x&gt;/"));
        assert!(html.contains(">&lt;b&gt;&amp;.txt</a>"));
        assert!(html.contains("href=\"%3Cb%3E%26.txt\""));
    }
}
