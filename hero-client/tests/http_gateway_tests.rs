use std::time::Duration;

use hero_client::gateway::ping;
use hero_client::{ActionGateway, HttpGateway, RemoteAuthority};
use hero_core::HeroError;
use hero_types::{Action, FailureKind};
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const TIMEOUT: Duration = Duration::from_secs(5);
const MAX_URL: usize = 8000;

/// Serves a single HTTP request with the given status and body, returning
/// the raw request head once it has been answered.
async fn serve_once(status: &'static str, body: String, delay: Duration) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/exec", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = socket.read(&mut buf).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
        }

        tokio::time::sleep(delay).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        // The client may already have given up.
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

fn gateway(base_url: &str) -> HttpGateway {
    HttpGateway::new(base_url, TIMEOUT, MAX_URL).unwrap()
}

#[tokio::test]
async fn test_query_string_protocol() {
    let (url, server) = serve_once("200 OK", json!({"success": true, "rewards": []}).to_string(), Duration::ZERO).await;

    let body = gateway(&url)
        .call(Action::GetShopRewards, json!({"userId": "s-1"}))
        .await
        .unwrap();
    assert_eq!(body["rewards"], json!([]));

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert!(request_line.starts_with("GET /exec?action=getShopRewards&payload="));
    assert!(request_line.contains("&v="));
}

#[tokio::test]
async fn test_jsonp_wrapped_response() {
    let (url, _server) = serve_once(
        "200 OK",
        format!("callback_17({})", json!({"success": true, "card": {"id": "c1"}})),
        Duration::ZERO,
    )
    .await;

    let body = gateway(&url).call(Action::AwardRandomCard, json!({})).await.unwrap();
    assert_eq!(body["card"]["id"], "c1");
}

#[tokio::test]
async fn test_remote_failure_message() {
    let (url, _server) = serve_once(
        "200 OK",
        json!({"success": false, "message": "Not enough coins"}).to_string(),
        Duration::ZERO,
    )
    .await;

    let err = gateway(&url).call(Action::RedeemReward, json!({})).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Remote);
    assert_eq!(err.user_message(), "Not enough coins");
}

#[tokio::test]
async fn test_http_error_status_is_transport() {
    let (url, _server) = serve_once("500 Internal Server Error", "oops".to_string(), Duration::ZERO).await;

    let err = gateway(&url).call(Action::GetQuizPool, json!({})).await.unwrap_err();
    assert!(matches!(err, HeroError::Transport { action: Action::GetQuizPool, .. }));
}

#[tokio::test]
async fn test_non_json_body_is_protocol_error() {
    let (url, _server) = serve_once("200 OK", "<html>login</html>".to_string(), Duration::ZERO).await;

    let err = gateway(&url).call(Action::GetQuizPool, json!({})).await.unwrap_err();
    assert!(matches!(err, HeroError::Protocol { .. }));
    assert_eq!(err.kind(), FailureKind::Transport);
}

#[tokio::test]
async fn test_refused_connection_is_transport() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/exec", listener.local_addr().unwrap());
    drop(listener);

    let err = gateway(&url).call(Action::Ping, json!({})).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Transport);
    assert!(err.user_message().contains("ad or script blockers"));
}

#[tokio::test]
async fn test_slow_authority_times_out() {
    let (url, _server) = serve_once("200 OK", json!({"success": true}).to_string(), Duration::from_secs(2)).await;

    let gateway = HttpGateway::new(&url, Duration::from_millis(100), MAX_URL).unwrap();
    let err = gateway.call(Action::GetAvatarData, json!({})).await.unwrap_err();
    assert_eq!(
        err,
        HeroError::Timeout {
            action: Action::GetAvatarData,
            after: Duration::from_millis(100)
        }
    );
    assert_eq!(err.kind(), FailureKind::Timeout);
}

#[tokio::test]
async fn test_oversized_payload_never_sent() {
    let gateway = HttpGateway::new("http://127.0.0.1:9/exec", TIMEOUT, 200).unwrap();
    let questions = vec!["a long question text"; 20];

    let err = gateway
        .call(Action::SaveBulkQuiz, json!({ "questions": questions }))
        .await
        .unwrap_err();
    assert!(matches!(err, HeroError::PayloadTooLarge { limit: 200, .. }));
}

#[tokio::test]
async fn test_invalid_base_url_is_config_error() {
    let result = HttpGateway::new("not a url", TIMEOUT, MAX_URL);
    assert!(matches!(result, Err(HeroError::Config(_))));
}

#[tokio::test]
async fn test_ping_reports_reachability() {
    let (url, _server) = serve_once("200 OK", json!({"success": true}).to_string(), Duration::ZERO).await;
    assert!(ping(&gateway(&url)).await);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/exec", listener.local_addr().unwrap());
    drop(listener);
    assert!(!ping(&gateway(&url)).await);
}

#[tokio::test]
async fn test_authority_over_http() {
    let (url, _server) = serve_once(
        "200 OK",
        json!({"success": true, "level": "", "exp": "40", "coin": 25, "base_emoji": "🐯"}).to_string(),
        Duration::ZERO,
    )
    .await;

    let authority = RemoteAuthority::new(Arc::new(gateway(&url)));
    let avatar = authority.get_avatar_data("s-9").await.unwrap();
    assert_eq!(avatar.user_id, "s-9");
    assert_eq!(avatar.level, 1, "blank level reads as level one");
    assert_eq!(avatar.experience, 40);
    assert_eq!(avatar.currency, 25);
}
