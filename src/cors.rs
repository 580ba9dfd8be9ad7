//! Permissive cross-origin handling wrapped around the API routes.

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use http::{header, HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::debug;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
pub const ALLOW_HEADERS: &str = "Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token";
pub const ALLOW_CREDENTIALS: &str = "true";

/// Every response from a route of `router` carries the CORS headers, and
/// `OPTIONS` requests to those routes are answered with a bare 200 before
/// reaching any handler. Unmatched paths fall through to the plain 404.
///
/// `tower_http::cors::CorsLayer` refuses a wildcard origin together with
/// credentials, so the headers are set directly.
pub fn permissive<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(middleware::from_fn(preflight))
        .route_layer(always(header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .route_layer(always(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
        .route_layer(always(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
        .route_layer(always(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, ALLOW_CREDENTIALS))
}

fn always(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        debug!("Answering CORS preflight for {}", request.uri().path());
        return StatusCode::OK.into_response();
    }

    next.run(request).await
}
