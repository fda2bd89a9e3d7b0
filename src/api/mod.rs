// API module entry
// Users REST routes over the flat-file collection

mod handlers;
mod response;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::sync::Arc;

use crate::config::AppState;

/// A matched API route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute {
    /// `GET /api/users`
    ListUsers,
    /// `GET /api/user/:id`
    GetUser(UserId),
    /// `POST /api/user`
    CreateUser,
    /// `POST /api/user/:id`
    UpdateUser(UserId),
}

/// The `:id` path segment.
///
/// A segment that is not a base-10 integer cannot name any record, so it is
/// kept as `Unparsable` and answered with 404 rather than 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserId {
    Id(i64),
    Unparsable,
}

impl UserId {
    fn parse(segment: &str) -> Self {
        segment.parse().map_or(Self::Unparsable, Self::Id)
    }
}

/// Match method and path against the API routes.
///
/// One trailing slash is ignored. Anything else returns `None` and falls
/// through to the site routes.
pub fn match_route(method: &Method, path: &str) -> Option<ApiRoute> {
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);

    let user_segment = path
        .strip_prefix("/api/user/")
        .filter(|segment| !segment.is_empty() && !segment.contains('/'));

    match (method, path, user_segment) {
        (&Method::GET | &Method::HEAD, "/api/users", _) => Some(ApiRoute::ListUsers),
        (&Method::POST, "/api/user", _) => Some(ApiRoute::CreateUser),
        (&Method::GET | &Method::HEAD, _, Some(segment)) => {
            Some(ApiRoute::GetUser(UserId::parse(segment)))
        }
        (&Method::POST, _, Some(segment)) => Some(ApiRoute::UpdateUser(UserId::parse(segment))),
        _ => None,
    }
}

/// Run the handler for a matched route
pub async fn dispatch<B>(
    route: ApiRoute,
    req: Request<B>,
    state: Arc<AppState>,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match route {
        ApiRoute::ListUsers => handlers::handle_list(&state).await,
        ApiRoute::GetUser(id) => handlers::handle_get(&state, id).await,
        ApiRoute::CreateUser => handlers::handle_create(req, &state).await,
        ApiRoute::UpdateUser(id) => handlers::handle_update(req, &state, id).await,
    };

    crate::logger::log_api_request(method.as_str(), &path, response.status().as_u16());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_collection_routes() {
        assert_eq!(match_route(&Method::GET, "/api/users"), Some(ApiRoute::ListUsers));
        assert_eq!(match_route(&Method::GET, "/api/users/"), Some(ApiRoute::ListUsers));
        assert_eq!(match_route(&Method::POST, "/api/user"), Some(ApiRoute::CreateUser));
        assert_eq!(match_route(&Method::POST, "/api/user/"), Some(ApiRoute::CreateUser));
        assert_eq!(match_route(&Method::HEAD, "/api/users"), Some(ApiRoute::ListUsers));
    }

    #[test]
    fn test_match_user_routes() {
        assert_eq!(
            match_route(&Method::GET, "/api/user/12"),
            Some(ApiRoute::GetUser(UserId::Id(12)))
        );
        assert_eq!(
            match_route(&Method::POST, "/api/user/-3/"),
            Some(ApiRoute::UpdateUser(UserId::Id(-3)))
        );
        assert_eq!(
            match_route(&Method::GET, "/api/user/abc"),
            Some(ApiRoute::GetUser(UserId::Unparsable))
        );
        assert_eq!(
            match_route(&Method::HEAD, "/api/user/7"),
            Some(ApiRoute::GetUser(UserId::Id(7)))
        );
    }

    #[test]
    fn test_id_segment_is_strict_integer() {
        assert_eq!(UserId::parse("01"), UserId::Id(1));
        assert_eq!(UserId::parse("+1"), UserId::Id(1));
        assert_eq!(UserId::parse("1.0"), UserId::Unparsable);
        assert_eq!(UserId::parse("1abc"), UserId::Unparsable);
        assert_eq!(UserId::parse(""), UserId::Unparsable);
    }

    #[test]
    fn test_unmatched_routes() {
        assert_eq!(match_route(&Method::POST, "/api/users"), None);
        assert_eq!(match_route(&Method::GET, "/api/user"), None);
        assert_eq!(match_route(&Method::PUT, "/api/user/1"), None);
        assert_eq!(match_route(&Method::HEAD, "/api/user"), None);
        assert_eq!(match_route(&Method::DELETE, "/api/user/1"), None);
        assert_eq!(match_route(&Method::GET, "/api/user/1/extra"), None);
        assert_eq!(match_route(&Method::GET, "/"), None);
        assert_eq!(match_route(&Method::GET, "/users"), None);
    }
}
