//! Site routes module
//!
//! The root document and the catch-all redirect back to it.

use crate::config::SiteConfig;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Shown when the configured index document cannot be read
const BUILTIN_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Users API</title></head>
<body>
<h1>Users API</h1>
<ul>
<li><code>GET /api/users</code> list all users</li>
<li><code>GET /api/user/:id</code> fetch one user</li>
<li><code>POST /api/user</code> create a user</li>
<li><code>POST /api/user/:id</code> update a user</li>
</ul>
</body>
</html>
"#;

/// Serve the index document at `/`
pub async fn serve_index(site: &SiteConfig, is_head: bool) -> Response<Full<Bytes>> {
    let content = match tokio::fs::read(&site.index_file).await {
        Ok(data) => Bytes::from(data),
        Err(e) => {
            logger::log_warning(&format!(
                "Index document '{}' unavailable ({e}), serving built-in page",
                site.index_file
            ));
            Bytes::from_static(BUILTIN_INDEX.as_bytes())
        }
    };

    http::build_html_response(content, is_head)
}

/// Answer for a path no route matched
pub fn fallback(site: &SiteConfig, is_get: bool) -> Response<Full<Bytes>> {
    if site.enabled && is_get {
        http::build_redirect_response("/")
    } else {
        http::build_status_response(StatusCode::NOT_FOUND)
    }
}
