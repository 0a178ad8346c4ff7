use deployw::client::HttpCiClient;
use deployw::error::TriggerError;
use deployw::traits::CiClient;
use deployw::trigger::{self, TriggerRequest};
use pretty_assertions::assert_eq;

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

mod fixtures;
use fixtures::{form_env, url_env};

/// What the fake CI server saw.
#[derive(Debug)]
struct Captured {
    request_line: String,
    content_type: Option<String>,
    body: String,
}

/// Serve exactly one request with the given status and body.
async fn serve_once(status: u16, body: &'static str) -> (String, oneshot::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let header = |name: &str| {
            head.lines().find_map(|line| {
                let (k, v) = line.split_once(':')?;
                k.trim()
                    .eq_ignore_ascii_case(name)
                    .then(|| v.trim().to_string())
            })
        };
        let content_length: usize = header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let captured = Captured {
            request_line: head.lines().next().unwrap_or_default().to_string(),
            content_type: header("content-type"),
            body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
        };

        let response = format!(
            "HTTP/1.1 {status} X\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        let _ = tx.send(captured);
    });

    (format!("http://{addr}"), rx)
}

fn client() -> HttpCiClient {
    HttpCiClient::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn form_trigger_posts_url_encoded_fields() {
    let (base, captured) = serve_once(201, "{}").await;
    let mut env = form_env("preprod", "develop", Some("PREVIEW=0"));
    if let deployw::config::TriggerTarget::Form { base_url, .. } = &mut env.target {
        *base_url = format!("{base}/api/v4/");
    }
    let request = trigger::build_request(&env).unwrap();

    client().trigger_pipeline(&request).await.unwrap();

    let captured = captured.await.unwrap();
    assert_eq!(
        captured.request_line,
        "POST /api/v4/projects/42/trigger/pipeline HTTP/1.1"
    );
    assert_eq!(
        captured.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        captured.body,
        "ref=develop&token=trigger-token&variables%5BPREVIEW%5D=0"
    );
}

#[tokio::test]
async fn url_trigger_posts_without_body() {
    let (base, captured) = serve_once(200, "").await;
    let request = TriggerRequest {
        environment: "staging".to_string(),
        url: format!("{base}/hooks/staging?token=t"),
        form: None,
    };

    client().trigger_pipeline(&request).await.unwrap();

    let captured = captured.await.unwrap();
    assert_eq!(captured.request_line, "POST /hooks/staging?token=t HTTP/1.1");
    assert_eq!(captured.body, "");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (base, _captured) = serve_once(500, "boom").await;
    let mut env = url_env("production");
    env.target = deployw::config::TriggerTarget::Url {
        url: format!("{base}/trigger"),
    };
    let request = trigger::build_request(&env).unwrap();

    let err = client().trigger_pipeline(&request).await.unwrap_err();
    assert!(matches!(err, TriggerError::Status(500)), "got {err:?}");
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let request = TriggerRequest {
        environment: "staging".to_string(),
        url: format!("http://{addr}/trigger"),
        form: None,
    };
    let err = client().trigger_pipeline(&request).await.unwrap_err();
    assert!(matches!(err, TriggerError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn badge_body_is_returned_as_text() {
    let (base, captured) = serve_once(200, "<svg><text>passed</text></svg>").await;
    let url = deployw::badge::refresh_url(&format!("{base}/badge.svg"));

    let svg = client().fetch_badge(&url).await.unwrap();
    assert_eq!(deployw::badge::parse_status(&svg).as_deref(), Some("passed"));

    let captured = captured.await.unwrap();
    assert!(captured.request_line.starts_with("GET /badge.svg?date="));
}

#[tokio::test]
async fn badge_http_error_is_an_error() {
    let (base, _captured) = serve_once(404, "").await;
    assert!(client().fetch_badge(&format!("{base}/missing.svg")).await.is_err());
}
