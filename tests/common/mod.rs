//! Mock answer service for integration tests

#![allow(dead_code)]

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::sync::oneshot;

/// How the mock reacts to the `text` it receives:
/// - `slow:<x>` waits 300ms, then answers `slow <x>`
/// - `garbage` answers with an HTML body
/// - `missing` answers JSON without an `answer` field
/// - `teapot` answers status 418 with a JSON answer
/// - `abc` answers `A\nB\nC`
/// - `long` answers 30 numbered paragraphs
/// - anything else answers `You asked: <text>\nThat is all.`
async fn answer(Json(body): Json<Value>) -> impl IntoResponse {
    let text = body["text"].as_str().unwrap_or_default().to_string();

    if let Some(rest) = text.strip_prefix("slow:") {
        tokio::time::sleep(Duration::from_millis(300)).await;
        return (StatusCode::OK, Json(json!({ "answer": format!("slow {}", rest) })))
            .into_response();
    }

    match text.as_str() {
        "garbage" => (StatusCode::OK, "<html>Internal Server Error</html>").into_response(),
        "missing" => Json(json!({ "detail": "no answer here" })).into_response(),
        "teapot" => (
            StatusCode::IM_A_TEAPOT,
            Json(json!({ "answer": "short and stout" })),
        )
            .into_response(),
        "abc" => Json(json!({ "answer": "A\nB\nC" })).into_response(),
        "long" => {
            let paragraphs: Vec<String> = (0..30).map(|i| format!("paragraph {}", i)).collect();
            Json(json!({ "answer": paragraphs.join("\n") })).into_response()
        }
        _ => Json(json!({ "answer": format!("You asked: {}\nThat is all.", text) }))
            .into_response(),
    }
}

/// Start the mock on an ephemeral port and return its `/query` URL
pub async fn spawn_answer_service() -> String {
    let app = Router::new().route("/query", post(answer));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/query", addr)
}

/// Start a service that reads one request and never answers it.
///
/// Returns its URL, a receiver that fires once the request has arrived, and
/// a receiver telling whether the client hung up within two seconds.
pub async fn spawn_silent_service() -> (String, oneshot::Receiver<()>, oneshot::Receiver<bool>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (received_tx, received_rx) = oneshot::channel();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let mut request = Vec::new();
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let _ = received_tx.send(());

        // Drain the body and wait for EOF
        let hung_up = async {
            loop {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
        };
        let closed = tokio::time::timeout(Duration::from_secs(2), hung_up)
            .await
            .is_ok();
        let _ = closed_tx.send(closed);
    });

    (format!("http://{}/query", addr), received_rx, closed_rx)
}

/// A URL nothing is listening on
pub fn unreachable_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/query", port)
}
