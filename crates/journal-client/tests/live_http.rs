// crates/journal-client/tests/live_http.rs
//
// The live source against a one-shot HTTP responder on localhost.

use std::time::Duration;

use journal_client::{ClientError, DataSource, LiveApiSource};
use journal_core::{AccessState, DateRange, Role, TradeFilters, TradeQuery, Pagination};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one connection, answer with `status` and `body`, and hand back
/// the request head that was received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        String::from_utf8_lossy(&head).into_owned()
    });

    (base, handle)
}

fn source(base: &str) -> LiveApiSource {
    LiveApiSource::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn listing_sends_identity_and_query() {
    let (base, server) = serve_once("200 OK", r#"{"items": [], "count": 41}"#).await;
    let query = TradeQuery::new(
        TradeFilters::new()
            .with(journal_core::FilterField::Symbol, "BTCUSDT")
            .unwrap(),
        &Pagination::default(),
    );

    let page = source(&base)
        .list_trades(&AccessState::new(Role::Admin, 7), &query)
        .await
        .unwrap();
    assert_eq!(page.total, 41);

    let head = server.await.unwrap().to_ascii_lowercase();
    assert!(head.starts_with("get /trades?limit=20&offset=0&symbol=btcusdt http/1.1"));
    assert!(head.contains("x-role: admin\r\n"));
    assert!(head.contains("x-telegram-user-id: 7\r\n"));
}

#[tokio::test]
async fn non_success_is_request_failed_with_status() {
    let (base, server) = serve_once("403 Forbidden", r#"{"detail": "Forbidden"}"#).await;

    let err = source(&base)
        .list_users(&AccessState::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::RequestFailed { status: 403 }));
    assert!(err.is_denied_or_missing());
    server.await.unwrap();
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let (base, server) = serve_once("500 Internal Server Error", "{}").await;

    let err = source(&base)
        .get_metrics(&AccessState::default(), &DateRange::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(!err.is_denied_or_missing());

    // The responder only accepts once; a retry would have hung or failed
    // to connect, so reaching here with a 500 is the single attempt.
    let head = server.await.unwrap();
    assert!(head.starts_with("GET /metrics HTTP/1.1"));
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let (base, server) = serve_once("200 OK", r#"{"items": "nope"}"#).await;

    let err = source(&base)
        .get_trade(&AccessState::default(), "1")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_api_is_a_transport_error() {
    // Bind and drop to get a port nobody listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = source(&format!("http://127.0.0.1:{}", port))
        .health()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
