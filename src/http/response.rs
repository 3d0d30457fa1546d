//! HTTP response building module
//!
//! Builders for the statuses a static file server produces. None of these
//! attach the policy header set; that happens once, after dispatch.

use super::headers;
use futures::stream;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::{Response, StatusCode};
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Body type shared by every response the server produces
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Read size for streamed file bodies
const FILE_CHUNK_SIZE: usize = 64 * 1024;

/// Body holding `data` in memory
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body with no content
pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body that reads `file` in chunks as the client consumes it
///
/// A read error ends the stream after being yielded once.
pub fn file_body(file: File) -> ResponseBody {
    let chunks = stream::unfold(Some(file), |state| async move {
        let mut file = state?;
        let mut buf = vec![0u8; FILE_CHUNK_SIZE];
        match file.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(Frame::data(Bytes::from(buf))), Some(file)))
            }
            Err(e) => Some((Err(e), None)),
        }
    });
    StreamBody::new(chunks).boxed_unsync()
}

/// Build an HTML error page for `status`
pub fn build_error_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let body = format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         \x20   <head>\n\
         \x20       <meta charset=\"utf-8\">\n\
         \x20       <title>Error response</title>\n\
         \x20   </head>\n\
         \x20   <body>\n\
         \x20       <h1>Error response</h1>\n\
         \x20       <p>Error code: {code}</p>\n\
         \x20       <p>Message: {message}.</p>\n\
         \x20       <p>Error code explanation: {code} - {reason}.</p>\n\
         \x20   </body>\n\
         </html>\n",
        code = status.as_u16(),
        message = escape_html(message),
    );

    Response::builder()
        .status(status)
        .header("Content-Type", "text/html;charset=utf-8")
        .header("Content-Length", body.len())
        .body(full_body(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(empty_body())
        })
}

/// Build 404 Not Found response
pub fn build_404_response(message: &str) -> Response<ResponseBody> {
    build_error_response(StatusCode::NOT_FOUND, message)
}

/// Build 501 Not Implemented response for a method the server does not handle
pub fn build_501_response(method: &str) -> Response<ResponseBody> {
    build_error_response(
        StatusCode::NOT_IMPLEMENTED,
        &format!("Unsupported method ('{method}')"),
    )
}

/// Build 301 redirect used to add the trailing slash to directory paths
pub fn build_301_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(empty_body())
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(304)
        .header("Last-Modified", last_modified)
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(empty_body())
        })
}

/// Build OPTIONS response (preflight request)
///
/// Carries the CORS subset and nothing else from the policy header set.
pub fn build_options_response() -> Response<ResponseBody> {
    let mut response = Response::builder()
        .status(200)
        .header("Content-Length", 0)
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(empty_body())
        });
    headers::apply_cors_headers(response.headers_mut());
    response
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        empty_body()
    } else {
        full_body(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(empty_body())
        })
}

/// Build 200 response streaming an opened file of `content_length` bytes
///
/// HEAD requests get the same headers and an empty body.
pub fn build_file_response(
    file: File,
    content_length: u64,
    content_type: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<ResponseBody> {
    let body = if is_head {
        empty_body()
    } else {
        file_body(file)
    };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);
    if let Some(last_modified) = last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(empty_body())
    })
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response<ResponseBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_404_page() {
        let response = build_404_response("File not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["content-type"], "text/html;charset=utf-8");

        let body = body_string(response).await;
        assert!(body.contains("<p>Error code: 404</p>"));
        assert!(body.contains("<p>Message: File not found.</p>"));
        assert!(body.contains("404 - Not Found."));
    }

    #[tokio::test]
    async fn test_501_names_method() {
        let response = build_501_response("POST");
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        let body = body_string(response).await;
        assert!(body.contains("Unsupported method (&#x27;POST&#x27;)"));
    }

    #[test]
    fn test_options_has_only_cors_headers() {
        let response = build_options_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(response.headers().get("content-security-policy").is_none());
        assert!(response.headers().get("permissions-policy").is_none());
    }

    async fn open_fixture(dir: &tempfile::TempDir, contents: &[u8]) -> File {
        let path = dir.path().join("fixture.bin");
        std::fs::write(&path, contents).unwrap();
        File::open(path).await.unwrap()
    }

    #[tokio::test]
    async fn test_head_file_response_keeps_length() {
        let dir = tempfile::tempdir().unwrap();
        let file = open_fixture(&dir, b"hello").await;
        let response = build_file_response(file, 5, "text/plain", None, true);
        assert_eq!(response.headers()["content-length"], "5");
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_file_body_streams_in_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let contents: Vec<u8> = (0..FILE_CHUNK_SIZE * 2 + 17)
            .map(|i| u8::try_from(i % 251).unwrap())
            .collect();
        let file = open_fixture(&dir, &contents).await;

        let mut body = file_body(file);
        let mut frames = 0;
        let mut received = Vec::new();
        while let Some(frame) = body.frame().await {
            let data = frame.unwrap().into_data().unwrap();
            assert!(data.len() <= FILE_CHUNK_SIZE);
            received.extend_from_slice(&data);
            frames += 1;
        }
        assert!(frames >= 3);
        assert_eq!(received, contents);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
