//! Geminiクライアントテスト
//!
//! ローカルの1回限りHTTPサーバーに対して送受信を検証

use depth_estimator_common::Interpretation;
use hole_depth_estimator::config::Config;
use hole_depth_estimator::error::DepthError;
use hole_depth_estimator::estimator::estimate_depth;
use hole_depth_estimator::image_source::UploadedImage;
use hole_depth_estimator::vision::{GeminiClient, VisionModelClient};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

fn sample_image() -> UploadedImage {
    UploadedImage {
        file_name: "trench.jpg".into(),
        mime_type: "image/jpeg",
        data: vec![0xff, 0xd8, 0xff],
        width: 640,
        height: 480,
    }
}

fn client_for(base_url: &str, timeout_seconds: u64) -> GeminiClient {
    let config = Config {
        api_key: Some("test-key".into()),
        api_base_url: base_url.to_string(),
        timeout_seconds,
        ..Default::default()
    };
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .unwrap();
    GeminiClient::with_http_client(&config, http).unwrap()
}

/// 1回だけ応答するサーバー。受信したリクエスト全文を返す
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{}/v1beta", addr), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn candidate_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ], "role": "model" }, "finishReason": "STOP" }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn generate_sends_prompt_and_image() {
    let (base_url, server) = serve_once("200 OK", candidate_body("{\"reasoning\": \"r\"}")).await;
    let client = client_for(&base_url, 10);

    let text = client.generate("measure the pit", &sample_image()).await.unwrap();
    assert_eq!(text, "{\"reasoning\": \"r\"}");

    let request = server.await.unwrap();
    let lower = request.to_lowercase();
    assert!(request.starts_with("POST /v1beta/models/gemini-2.0-flash:generateContent"));
    assert!(lower.contains("x-goog-api-key: test-key"));
    assert!(!request.contains("key=test-key"));
    assert!(request.contains("measure the pit"));
    assert!(request.contains("\"inline_data\""));
    assert!(request.contains("\"mime_type\":\"image/jpeg\""));
    assert!(request.contains("\"data\":\"/9j/\""));
}

#[tokio::test]
async fn estimate_depth_through_http() {
    let answer = "```json\n{\"estimated_depth_meters\": \"2.5 m (approx. 8.2 ft)\", \"reasoning\": \"Worker waist-height used as scale reference.\", \"assumptions\": \"Worker height assumed 1.7m.\"}\n```";
    let (base_url, server) = serve_once("200 OK", candidate_body(answer)).await;
    let client = client_for(&base_url, 10);

    let interpretation = estimate_depth(&client, &sample_image()).await.unwrap();
    server.await.unwrap();

    let estimate = interpretation.estimate().expect("parsed estimate");
    assert_eq!(estimate.estimated_depth(), Some("2.5 m (approx. 8.2 ft)"));
    assert_eq!(estimate.assumptions(), Some("Worker height assumed 1.7m."));
}

#[tokio::test]
async fn malformed_answer_is_unparsed_not_error() {
    let (base_url, server) = serve_once("200 OK", candidate_body("The hole looks deep.")).await;
    let client = client_for(&base_url, 10);

    let interpretation = estimate_depth(&client, &sample_image()).await.unwrap();
    server.await.unwrap();

    match interpretation {
        Interpretation::Unparsed(failure) => assert_eq!(failure.raw(), "The hole looks deep."),
        Interpretation::Estimate(_) => panic!("Expected Unparsed"),
    }
}

#[tokio::test]
async fn service_error_is_api_call() {
    let body = r#"{"error":{"code":403,"message":"Permission denied.","status":"PERMISSION_DENIED"}}"#;
    let (base_url, server) = serve_once("403 Forbidden", body.to_string()).await;
    let client = client_for(&base_url, 10);

    let err = client.generate("p", &sample_image()).await.unwrap_err();
    server.await.unwrap();

    match err {
        DepthError::ApiCall(msg) => {
            assert!(msg.contains("403"));
            assert!(msg.contains("PERMISSION_DENIED"));
        }
        other => panic!("Expected ApiCall, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_envelope_is_api_call() {
    let (base_url, server) = serve_once("200 OK", "not json".to_string()).await;
    let client = client_for(&base_url, 10);

    let err = client.generate("p", &sample_image()).await.unwrap_err();
    server.await.unwrap();
    assert!(matches!(err, DepthError::ApiCall(ref msg) if msg.contains("invalid response envelope")));
}

#[tokio::test]
async fn connection_refused_is_api_call() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{}/v1beta", addr), 5);
    let err = client.generate("p", &sample_image()).await.unwrap_err();
    assert!(matches!(err, DepthError::ApiCall(_)));
}

#[tokio::test]
async fn timeout_is_api_call() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        drop(socket);
    });

    let client = client_for(&format!("http://{}/v1beta", addr), 1);
    let err = client.generate("p", &sample_image()).await.unwrap_err();
    assert!(matches!(err, DepthError::ApiCall(_)));

    server.abort();
}
