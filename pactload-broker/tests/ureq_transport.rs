//! `UreqTransport` against a one-shot local HTTP stub.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use pactload_broker::{AuthDescriptor, BrokerError, HalTransport, UreqTransport};
use url::Url;

/// Serve a single response and return the request head lines.
fn serve_once(status: &str, content_type: &str, body: &str) -> (Url, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut head = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read");
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            head.push(line);
        }
        stream.write_all(response.as_bytes()).expect("write");
        stream.flush().expect("flush");
        head
    });
    let url = Url::parse(&format!("http://{addr}/")).expect("url");
    (url, handle)
}

fn transport() -> UreqTransport {
    UreqTransport::with_timeout(Duration::from_secs(5))
}

#[test]
fn fetches_hal_json_with_basic_auth() {
    let (url, server) = serve_once("200 OK", "application/hal+json", r#"{"_links":{}}"#);
    let auth = AuthDescriptor::Basic {
        username: "user".into(),
        password: "pass".into(),
    };

    let doc = transport().get_json(&url, &auth).expect("get");
    assert!(doc.get("_links").is_some());

    let head = server.join().expect("server");
    assert!(head[0].starts_with("GET / "), "got: {head:?}");
    assert!(
        head.iter()
            .any(|h| h.eq_ignore_ascii_case("authorization: Basic dXNlcjpwYXNz")),
        "got: {head:?}"
    );
}

#[test]
fn not_found_maps_to_not_found() {
    let (url, server) = serve_once("404 Not Found", "application/json", "{}");
    let err = transport().get_json(&url, &AuthDescriptor::None).unwrap_err();
    assert!(matches!(err, BrokerError::NotFound { .. }), "got: {err}");
    server.join().expect("server");
}

#[test]
fn server_error_reports_status() {
    let (url, server) = serve_once("500 Internal Server Error", "application/json", "{}");
    let err = transport().get_json(&url, &AuthDescriptor::None).unwrap_err();
    assert!(matches!(err, BrokerError::RequestFailed { status: 500, .. }), "got: {err}");
    server.join().expect("server");
}

#[test]
fn html_response_is_rejected() {
    let (url, server) = serve_once("200 OK", "text/html", "<html></html>");
    let err = transport().get_json(&url, &AuthDescriptor::None).unwrap_err();
    assert!(err.to_string().contains("text/html"), "got: {err}");
    server.join().expect("server");
}
