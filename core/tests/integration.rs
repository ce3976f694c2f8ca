//! Dispatch real requests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then sends every supported
//! method through `UreqTransport`. The echo route reports what arrived on
//! the wire, so these tests check both the request shaping and the parsing
//! of the raw response that came back.

use std::net::SocketAddr;

use dispatch_core::{dispatch, Body, Dispatcher, OptionOverrides, Response};
use mock_server::Echo;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn echoed(response: &Response) -> Echo {
    serde_json::from_str(response.content.trim_end()).unwrap()
}

fn no_overrides() -> OptionOverrides {
    OptionOverrides::default()
}

#[test]
fn get_returns_status_headers_and_content() {
    let addr = start_server();
    let response = dispatch(&format!("http://{addr}/echo"), "get", None, &[], &no_overrides()).unwrap();

    assert!(response.error.is_empty(), "{}", response.error);
    assert!(response.headers[0].starts_with("HTTP/1.1 200"), "{:?}", response.headers);
    assert!(response
        .headers
        .iter()
        .any(|h| h.starts_with("x-request-id: ")));
    assert!(response.raw.starts_with("HTTP/1.1 200 OK\r\n"));

    let echo = echoed(&response);
    assert_eq!(echo.method, "GET");
    assert!(echo.body.is_empty());
}

#[test]
fn post_sends_body_and_headers() {
    let addr = start_server();
    let body = Body::from(r#"{"title":"Buy milk"}"#);
    let headers = vec!["Content-Type: application/json".to_string()];
    let response = dispatch(
        &format!("http://{addr}/echo"),
        " Post ",
        Some(&body),
        &headers,
        &no_overrides(),
    )
    .unwrap();

    let echo = echoed(&response);
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.body, r#"{"title":"Buy milk"}"#);
    assert_eq!(echo.header_values("content-type"), vec!["application/json"]);
}

#[test]
fn put_goes_out_as_custom_verb() {
    let addr = start_server();
    let body = Body::from("replacement");
    let response = dispatch(&format!("http://{addr}/echo"), "PUT", Some(&body), &[], &no_overrides()).unwrap();

    let echo = echoed(&response);
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.body, "replacement");
}

#[test]
fn delete_sends_no_payload() {
    let addr = start_server();
    let body = Body::from("ignored");
    let response = dispatch(&format!("http://{addr}/echo"), "delete", Some(&body), &[], &no_overrides()).unwrap();

    let echo = echoed(&response);
    assert_eq!(echo.method, "DELETE");
    assert!(echo.body.is_empty());
}

#[test]
fn default_and_user_headers_are_all_sent() {
    let addr = start_server();
    let dispatcher = Dispatcher::new().with_default_headers(vec!["X-Trace: default".to_string()]);
    let headers = vec!["X-Trace: a".to_string(), "X-Trace: b".to_string()];
    let response = dispatcher
        .dispatch(&format!("http://{addr}/echo"), "GET", None, &headers, &no_overrides())
        .unwrap();

    let echo = echoed(&response);
    assert_eq!(echo.header_values("x-trace"), vec!["default", "a", "b"]);
}

#[test]
fn multi_line_body_keeps_inner_empty_line() {
    let addr = start_server();
    let response = dispatch(&format!("http://{addr}/lines"), "GET", None, &[], &no_overrides()).unwrap();

    assert_eq!(response.content, "line1\nline2\n\nline4\n");
    assert!(response.raw.ends_with("line4"));
}

#[test]
fn without_header_inclusion_raw_is_the_body() {
    let addr = start_server();
    let overrides = OptionOverrides {
        include_header: Some(false),
        ..OptionOverrides::default()
    };
    let response = dispatch(&format!("http://{addr}/lines"), "GET", None, &[], &overrides).unwrap();

    assert_eq!(response.raw, "line1\r\nline2\r\n\r\nline4");
    // The body is scanned as if it were a header block.
    assert_eq!(response.headers, vec!["line1", "line2"]);
    assert_eq!(response.content, "line4\n");
}

#[test]
fn non_utf8_body_is_kept_with_replacement_characters() {
    let addr = start_server();
    let response = dispatch(&format!("http://{addr}/binary"), "GET", None, &[], &no_overrides()).unwrap();

    assert!(response.error.is_empty(), "{}", response.error);
    assert!(response.headers[0].starts_with("HTTP/1.1 200"));
    assert_eq!(response.content, "ok\u{FFFD}\u{FFFD}\n");
}

#[test]
fn body_larger_than_ten_mib_is_read_in_full() {
    let addr = start_server();
    let response = dispatch(&format!("http://{addr}/large"), "GET", None, &[], &no_overrides()).unwrap();

    assert!(response.error.is_empty(), "{}", response.error);
    assert!(response.headers[0].starts_with("HTTP/1.1 200"));
    assert_eq!(response.content.len(), mock_server::LARGE_BODY_LEN + 1);
}

#[test]
fn zero_timeout_means_no_timeout() {
    let addr = start_server();
    let overrides = OptionOverrides {
        timeout_secs: Some(0),
        ..OptionOverrides::default()
    };
    let response = dispatch(&format!("http://{addr}/echo"), "GET", None, &[], &overrides).unwrap();

    assert!(response.error.is_empty(), "{}", response.error);
    assert_eq!(echoed(&response).method, "GET");
}

#[test]
fn structured_body_is_rejected_before_sending() {
    let body = Body::from(serde_json::json!({"title": "x"}));
    let err = dispatch("http://nonexistent.invalid/", "GET", Some(&body), &[], &no_overrides()).unwrap_err();
    assert!(matches!(err, dispatch_core::DispatchError::InvalidBody { .. }));
}

#[test]
fn unresolvable_host_is_reported_in_error() {
    let response = dispatch("http://nonexistent.invalid/", "GET", None, &[], &no_overrides()).unwrap();

    assert!(!response.error.is_empty());
    assert!(response.raw.is_empty());
    assert!(response.headers.is_empty());
    assert!(response.content.is_empty());
}

#[test]
fn refused_connection_is_reported_in_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let response = dispatch(&format!("http://{addr}/echo"), "GET", None, &[], &no_overrides()).unwrap();

    assert!(!response.error.is_empty());
    assert!(response.raw.is_empty());
}

#[test]
fn user_timeout_overrides_default() {
    let addr = start_server();
    let overrides = OptionOverrides {
        timeout_secs: Some(1),
        ..OptionOverrides::default()
    };
    let started = std::time::Instant::now();
    let response = dispatch(&format!("http://{addr}/slow"), "GET", None, &[], &overrides).unwrap();

    assert!(!response.error.is_empty());
    assert!(started.elapsed() < std::time::Duration::from_secs(3));
}

#[test]
fn redirects_are_returned_unless_following_is_enabled() {
    let addr = start_server();
    let uri = format!("http://{addr}/redirect");

    let response = dispatch(&uri, "GET", None, &[], &no_overrides()).unwrap();
    assert!(response.headers[0].contains("307"), "{:?}", response.headers);
    assert!(response.headers.iter().any(|h| h == "location: /echo"));

    let follow = OptionOverrides {
        follow_location: Some(true),
        ..OptionOverrides::default()
    };
    let response = dispatch(&uri, "GET", None, &[], &follow).unwrap();
    assert!(response.headers[0].starts_with("HTTP/1.1 200"));
    assert_eq!(echoed(&response).method, "GET");
}
