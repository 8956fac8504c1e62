use crate::{
    handlers::{
        best_colleges, get_college, issue_token, list_colleges, my_college, readiness_handler,
        root_handler, submit_candidate,
    },
    state::AppState,
};
use axum::{
    extract::Request,
    http::Method,
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info_span, Span};
use uuid::Uuid;

/// CORS policy: any origin and any request header, mirrored so credentials
/// can be allowed.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Builds the Axum router hosting the StudyCamp REST API.
///
/// None of these routes requires a session token; see
/// [`crate::middleware::require_token`] for the verification layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(readiness_handler))
        // Session tokens
        .route("/jwt", post(issue_token))
        // College catalogue
        .route("/colleges", get(list_colleges))
        .route("/best-colleges", get(best_colleges))
        .route("/users/colleges/:id", get(get_college))
        // Candidate submissions
        .route("/candidate", post(submit_candidate))
        .route("/mycollege", get(my_college))
        .with_state(state)
        .layer(cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    let request_id = Uuid::new_v4();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|_request: &Request, _span: &Span| {
                    tracing::debug!("started processing request");
                })
                .on_response(|response: &Response, latency: std::time::Duration, _span: &Span| {
                    let status = response.status();
                    let latency_ms = latency.as_millis();

                    if status.is_server_error() {
                        tracing::error!(status = %status, latency_ms = latency_ms, "request failed with server error");
                    } else if status.is_client_error() {
                        tracing::warn!(status = %status, latency_ms = latency_ms, "request failed with client error");
                    } else {
                        tracing::info!(status = %status, latency_ms = latency_ms, "request completed");
                    }
                })
                .on_failure(|failure_class: ServerErrorsFailureClass, latency: std::time::Duration, _span: &Span| {
                    tracing::error!(failure_class = ?failure_class, latency_ms = latency.as_millis(), "request failed");
                }),
        )
}
