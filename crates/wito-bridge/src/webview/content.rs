//! App content served over the `wito://` custom protocol.
//!
//! Pages load from a local directory without a local HTTP server.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::warn;
use wry::http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use wry::http::{Request, Response, StatusCode};

/// Scheme of the app content protocol.
pub const CONTENT_SCHEME: &str = "wito";

/// URL of the app's entry page.
pub fn entry_url(entry: &str) -> String {
    format!("{CONTENT_SCHEME}://localhost/{}", entry.trim_start_matches('/'))
}

/// Serves files from a content directory.
///
/// `wito://localhost/index.html` resolves to `{base_dir}/index.html`.
pub struct ContentProvider {
    base_dir: PathBuf,
    entry: String,
}

impl ContentProvider {
    /// `entry` is served for the bare root.
    pub fn new(base_dir: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            entry: entry.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a request path to its MIME type and bytes.
    ///
    /// Paths escaping the base directory, including through symlinks,
    /// resolve to nothing.
    pub fn resolve(&self, path: &str) -> Option<(&'static str, Vec<u8>)> {
        let clean = path.trim_start_matches('/');
        let clean = if clean.is_empty() {
            self.entry.as_str()
        } else {
            clean
        };

        let file_path = self.base_dir.join(clean);
        let canonical_base = std::fs::canonicalize(&self.base_dir).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) || !canonical_file.is_file() {
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        Some((mime_from_extension(&canonical_file), data))
    }

    /// Answer a custom-protocol request.
    pub fn respond(&self, request: &Request<Vec<u8>>) -> Response<Cow<'static, [u8]>> {
        let uri = request.uri();
        let path = uri.path();
        match self.resolve(path) {
            Some((mime, data)) => {
                let mut response = Response::new(Cow::Owned(data));
                let headers = response.headers_mut();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(mime));
                headers.insert(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("wito://localhost"),
                );
                response
            }
            None => {
                warn!(path = %path, "content not found");
                let mut response = Response::new(Cow::Borrowed(&b"Not Found"[..]));
                *response.status_mut() = StatusCode::NOT_FOUND;
                response
            }
        }
    }
}

/// Guess MIME type from file extension.
fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("wasm") => "application/wasm",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> (tempfile::TempDir, ContentProvider) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        std::fs::create_dir_all(root.join("js")).unwrap();
        std::fs::write(root.join("index.html"), "<html>home</html>").unwrap();
        std::fs::write(root.join("js/app.js"), "console.log(1)").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "nope").unwrap();
        let provider = ContentProvider::new(root, "index.html");
        (dir, provider)
    }

    fn request(uri: &str) -> Request<Vec<u8>> {
        Request::builder().uri(uri).body(Vec::new()).unwrap()
    }

    #[test]
    fn resolves_files_with_mime() {
        let (_dir, cp) = site();
        let (mime, data) = cp.resolve("js/app.js").unwrap();
        assert_eq!(mime, "application/javascript");
        assert_eq!(data, b"console.log(1)");

        let (mime, _) = cp.resolve("/index.html").unwrap();
        assert_eq!(mime, "text/html");
    }

    #[test]
    fn root_serves_entry() {
        let (_dir, cp) = site();
        let (_, data) = cp.resolve("/").unwrap();
        assert_eq!(data, b"<html>home</html>");
    }

    #[test]
    fn traversal_is_blocked() {
        let (_dir, cp) = site();
        assert!(cp.resolve("../secret.txt").is_none());
        assert!(cp.resolve("js/../../secret.txt").is_none());
        assert!(cp.resolve("/etc/passwd").is_none());
    }

    #[test]
    fn directories_and_missing_files_resolve_to_nothing() {
        let (_dir, cp) = site();
        assert!(cp.resolve("js").is_none());
        assert!(cp.resolve("missing.html").is_none());
    }

    #[test]
    fn respond_sets_headers_and_status() {
        let (_dir, cp) = site();
        let ok = cp.respond(&request("wito://localhost/index.html"));
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(ok.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(ok.body().as_ref(), b"<html>home</html>");

        let missing = cp.respond(&request("wito://localhost/nope.css"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn entry_url_format() {
        assert_eq!(entry_url("index.html"), "wito://localhost/index.html");
        assert_eq!(entry_url("/app/main.html"), "wito://localhost/app/main.html");
    }

    #[test]
    fn mime_fallback() {
        assert_eq!(mime_from_extension(Path::new("a.xyz")), "application/octet-stream");
        assert_eq!(mime_from_extension(Path::new("a.css")), "text/css");
    }
}
