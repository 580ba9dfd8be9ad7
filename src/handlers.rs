use axum::{
    body::{to_bytes, Body},
    extract::RawQuery,
    http::{header, Method},
    response::{IntoResponse, Response},
};
use std::collections::BTreeMap;
use tracing::debug;

use crate::{
    codec,
    error::AppError,
    ortb::{BidRequest, SummaryResponse},
};

/// Query flag that marks the request body as gzip-compressed.
pub const GZIP_PARAM: &str = "gzip";

pub async fn handle_bid_request(
    method: Method,
    RawQuery(query): RawQuery,
    body: Body,
) -> Result<Response, AppError> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let query_params = first_query_values(query.as_deref());
    let gzipped = query_params.get(GZIP_PARAM).is_some_and(|v| v == "1");

    let raw = to_bytes(body, usize::MAX)
        .await
        .map_err(AppError::BodyRead)?;
    debug!("Request body size: {} bytes, gzipped={}", raw.len(), gzipped);

    let payload = if gzipped {
        codec::gunzip(&raw)?
    } else {
        raw.to_vec()
    };

    let bid_request = BidRequest::from_slice(&payload).map_err(AppError::InvalidPayload)?;
    debug!(
        "Parsed bid request: id={}, imps={}, tmax={}",
        bid_request.id,
        bid_request.imp.len(),
        bid_request.tmax
    );

    let summary = SummaryResponse::acknowledge(&bid_request, query_params);
    let compressed = codec::gzip_json(&summary)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CONTENT_ENCODING, "gzip"),
        ],
        compressed,
    )
        .into_response())
}

/// Collects the query string into a map, keeping only the first value of a
/// repeated key.
pub fn first_query_values(query: Option<&str>) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}
