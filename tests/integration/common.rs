use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::io::{Read, Write};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Boots the gateway on an ephemeral port and returns its base URL.
pub async fn spawn_gateway() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no local address");

    tokio::spawn(async move {
        axum::serve(listener, ortb_ack_gateway::app())
            .await
            .expect("Gateway stopped unexpectedly");
    });

    format!("http://{}", addr)
}

/// Helper function to generate a unique request ID for tracking
pub fn generate_request_id() -> String {
    format!("test-{}", Uuid::new_v4())
}

/// A bid request with one banner impression per floor price.
pub fn create_bid_request(request_id: &str, floors: &[f64]) -> Value {
    let imps: Vec<Value> = floors
        .iter()
        .enumerate()
        .map(|(i, floor)| {
            json!({
                "id": (i + 1).to_string(),
                "banner": {"w": 300, "h": 250, "pos": 1},
                "tagid": format!("slot-{}", i + 1),
                "bidfloor": floor,
                "bidfloorcur": "USD"
            })
        })
        .collect();

    json!({
        "id": request_id,
        "at": 1,
        "tmax": 150,
        "imp": imps,
        "site": {"domain": "x.com", "page": "https://x.com/articles/1", "cat": ["IAB1"]},
        "device": {"ua": "Mozilla/5.0", "ip": "203.0.113.7", "devicetype": 2},
        "user": {"id": "user-42", "buyeruid": "b-7"}
    })
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// POSTs `body` to `/api` with the given raw query string.
pub async fn post_api(base_url: &str, query: &str, body: Vec<u8>) -> Response {
    let url = if query.is_empty() {
        format!("{}/api", base_url)
    } else {
        format!("{}/api?{}", base_url, query)
    };

    Client::new()
        .post(url)
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to send request to gateway")
}

/// Checks the success headers and returns the decompressed JSON summary.
pub async fn read_summary(response: Response) -> Value {
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(header(&response, "content-type"), "application/json");
    assert_eq!(header(&response, "content-encoding"), "gzip");

    let compressed = response.bytes().await.expect("Failed to read response body");
    let mut text = String::new();
    GzDecoder::new(compressed.as_ref())
        .read_to_string(&mut text)
        .expect("Response body is not valid gzip");
    println!("Summary: {}", text.trim_end());

    serde_json::from_str(&text).expect("Response body is not valid JSON")
}

pub fn header<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_else(|| panic!("Missing {} header", name))
}

pub fn assert_cors_headers(response: &Response) {
    assert_eq!(header(response, "access-control-allow-origin"), "*");
    assert_eq!(
        header(response, "access-control-allow-methods"),
        "POST, GET, OPTIONS, PUT, DELETE"
    );
    assert_eq!(
        header(response, "access-control-allow-headers"),
        "Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token"
    );
    assert_eq!(header(response, "access-control-allow-credentials"), "true");
}
