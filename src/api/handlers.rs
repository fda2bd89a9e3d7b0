// Users API handlers
// One handler per route; storage failures end here as status codes

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde_json::{Map, Value};

use super::response::{mutation_response, operation_error};
use super::UserId;
use crate::config::AppState;
use crate::http::{build_json_response, build_status_response, read_json_object};
use crate::logger;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `GET /api/users`
pub async fn handle_list(state: &AppState) -> Response<Full<Bytes>> {
    match state.users.list().await {
        Ok(users) => build_json_response(StatusCode::OK, &users),
        Err(e) => operation_error("list users", &e),
    }
}

/// `GET /api/user/:id`
pub async fn handle_get(state: &AppState, id: UserId) -> Response<Full<Bytes>> {
    let UserId::Id(id) = id else {
        return build_status_response(StatusCode::NOT_FOUND);
    };

    match state.users.get(id).await {
        Ok(user) => build_json_response(StatusCode::OK, &user),
        Err(e) => operation_error("get user", &e),
    }
}

/// `POST /api/user`
pub async fn handle_create<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let payload = match read_payload(req, state).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match state.users.create(payload).await {
        Ok(created) => mutation_response("create user", created, state),
        Err(e) => operation_error("create user", &e),
    }
}

/// `POST /api/user/:id`
pub async fn handle_update<B>(
    req: Request<B>,
    state: &AppState,
    id: UserId,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let payload = match read_payload(req, state).await {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let UserId::Id(id) = id else {
        return build_status_response(StatusCode::NOT_FOUND);
    };

    match state.users.update(id, payload).await {
        Ok(updated) => mutation_response("update user", updated, state),
        Err(e) => operation_error("update user", &e),
    }
}

/// Decode the JSON object body, or the error response to send instead
async fn read_payload<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Map<String, Value>, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    read_json_object(req, state.config.http.max_body_size)
        .await
        .map_err(|e| {
            logger::log_warning(&format!("Rejected request body: {e}"));
            build_status_response(e.status())
        })
}
