use std::time::Duration;

use axum::{
    http::{HeaderMap, HeaderValue, Method},
    middleware,
    response::{Redirect, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const REQUEST_ID: &str = "x-request-id";

/// Body of `/lines`: two lines, an empty line, then a fourth line.
pub const LINES_BODY: &str = "line1\r\nline2\r\n\r\nline4";

/// Body of `/binary`: ASCII followed by bytes that are not valid UTF-8.
pub const BINARY_BODY: &[u8] = b"ok\xff\xfe";

/// Size of the `/large` body, past ureq's default 10 MiB read limit.
pub const LARGE_BODY_LEN: usize = 11 * 1024 * 1024;

/// What `/echo` saw on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Echo {
    /// Every value received for `name`, in order.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/lines", get(lines))
        .route("/binary", get(binary))
        .route("/large", get(large))
        .route("/slow", get(slow))
        .route("/redirect", get(redirect))
        .layer(middleware::map_response(stamp_request_id))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn stamp_request_id(mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
        response.headers_mut().insert(REQUEST_ID, value);
    }
    response
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    tracing::debug!(%method, body_len = body.len(), "echo");
    Json(Echo {
        method: method.to_string(),
        headers,
        body,
    })
}

async fn lines() -> &'static str {
    LINES_BODY
}

async fn binary() -> &'static [u8] {
    BINARY_BODY
}

async fn large() -> Vec<u8> {
    vec![b'a'; LARGE_BODY_LEN]
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3)).await;
    "done"
}

async fn redirect() -> Redirect {
    Redirect::temporary("/echo")
}
