// API response utility functions module
// Maps operation outcomes to status codes

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::AppState;
use crate::http::{build_json_response, build_status_response};
use crate::logger;
use crate::users::{Mutation, UserError};

/// Status-only response for a failed operation
pub fn operation_error(operation: &str, err: &UserError) -> Response<Full<Bytes>> {
    match err {
        UserError::NotFound { .. } => build_status_response(StatusCode::NOT_FOUND),
        UserError::Storage(e) => {
            logger::log_store_error(operation, e);
            build_status_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Response for a create/update whose record was computed.
///
/// A failed save is always logged. Whether the client hears about it
/// depends on `storage.report_write_errors`.
pub fn mutation_response(
    operation: &str,
    mutation: Mutation,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let report = state.config.storage.report_write_errors;

    if let Err(e) = &mutation.persisted {
        logger::log_write_failed(operation, e, report);
        if report {
            return build_status_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    build_json_response(StatusCode::OK, &mutation.record)
}
