//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight, API routes, then the
//! site routes as fallback.

use crate::api;
use crate::config::AppState;
use crate::handler::site;
use crate::http;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut response = route_request(req, &state).await;
    apply_common_headers(&mut response, &state);
    Ok(response)
}

async fn route_request<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();

    if method == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    if let Some(route) = api::match_route(&method, req.uri().path()) {
        return api::dispatch(route, req, Arc::clone(state)).await;
    }

    let site_config = &state.config.site;
    let is_get = method == Method::GET || method == Method::HEAD;
    if site_config.enabled && is_get && req.uri().path() == "/" {
        return site::serve_index(site_config, method == Method::HEAD).await;
    }

    site::fallback(site_config, is_get)
}

/// Headers every response carries
fn apply_common_headers(response: &mut Response<Full<Bytes>>, state: &AppState) {
    let headers = response.headers_mut();
    if let Ok(name) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(SERVER, name);
    }
    if state.config.http.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}
