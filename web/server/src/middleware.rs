use std::time::Instant;

use warp::Filter;
use warp::http::{Method, StatusCode};
use warp::path::FullPath;
use warp::reject::Rejection;
use warp::reply::{Reply, Response};

struct RequestStart {
    method: Method,
    path: FullPath,
    at: Instant,
}

/// Wraps `filter` with one log line per request and one per response.
pub fn with_request_logging<F, T>(
    filter: F,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone
where
    F: Filter<Extract = (T,), Error = Rejection> + Clone + Send + Sync + 'static,
    T: Reply,
{
    warp::any()
        .and(warp::path::full())
        .and(warp::method())
        .map(|path: FullPath, method: Method| {
            tracing::debug!(path = %path.as_str(), method = %method, "incoming request");
            RequestStart {
                method,
                path,
                at: Instant::now(),
            }
        })
        .and(filter)
        .map(|start: RequestStart, reply: T| {
            let response = reply.into_response();
            log_response(
                response.status(),
                start.path.as_str(),
                &start.method,
                start.at.elapsed().as_millis(),
            );
            response
        })
}

/// Logs a finished response at a level matching its status class.
pub fn log_response(status: StatusCode, path: &str, method: &Method, duration_ms: u128) {
    let status_code = status.as_u16();
    if status.is_server_error() {
        tracing::error!(status = status_code, path, %method, duration_ms, "server error");
    } else if status.is_client_error() {
        tracing::warn!(status = status_code, path, %method, duration_ms, "client error");
    } else {
        tracing::info!(status = status_code, path, %method, duration_ms, "response sent");
    }
}
