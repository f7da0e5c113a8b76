//! Hooks for `tower_http::trace::TraceLayer`.
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
};
use tower_http::classify::ServerErrorsFailureClass;
use tracing::Span;
use uuid::Uuid;

pub fn make_span_with(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http-request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %Uuid::new_v4(),
        status = tracing::field::Empty,
    )
}

pub fn on_request(request: &Request<Body>, _span: &Span) {
    tracing::debug!("started {} {}", request.method(), request.uri().path());
}

pub fn on_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    tracing::info!(latency_ms = millis(latency), "finished");
}

pub fn on_failure(error: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    tracing::error!(
        error = %error,
        latency_ms = millis(latency),
        "request failed"
    );
}

fn millis(latency: Duration) -> u64 {
    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1_250)), 1_250);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
