//! Tests for the JSON surface handlers and rejection mapping

use std::sync::Arc;

use http_body_util::BodyExt;
use serde_json::{Value, json};
use warp::Reply;
use warp::http::StatusCode;

use crate::error::ChatError;
use crate::handlers::{self, CarouselMove};
use crate::http::HttpReply;
use crate::orchestrator::Orchestrator;
use crate::server::handle_rejection;
use crate::tests::{MockBackend, chat_success};

async fn body_json(response: warp::reply::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn rejected(err: ChatError) -> (StatusCode, Value) {
    let response = handle_rejection(warp::reject::custom(err))
        .await
        .expect("rejection handler is infallible")
        .into_response();
    (response.status(), body_json(response).await)
}

fn orchestrator(backend: MockBackend) -> Arc<Orchestrator<MockBackend>> {
    Arc::new(Orchestrator::new(backend, false))
}

#[tokio::test]
async fn state_starts_in_checking() {
    let response = handlers::handle_session_state(orchestrator(MockBackend::new()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let state = body_json(response).await;
    assert_eq!(state["api_status"], "checking");
    assert_eq!(state["busy"], false);
    assert_eq!(state["history_len"], 0);
    assert_eq!(state["current"], Value::Null);
    assert_eq!(state["parameters"]["top_k"], 40);
}

#[tokio::test]
async fn chat_submit_returns_record() {
    let o = orchestrator(MockBackend::new().with_chat(Ok(chat_success("hello there"))));

    let response = handlers::handle_chat_submit(o.clone(), json!({ "prompt": "hi" }))
        .await
        .unwrap();

    let record = body_json(response).await;
    assert_eq!(record["content"], "hello there");
    assert_eq!(record["isError"], false);
    assert_eq!(o.history().await.len(), 1);
}

#[tokio::test]
async fn blank_chat_prompt_maps_to_bad_request() {
    let o = orchestrator(MockBackend::new());

    let err = handlers::handle_chat_submit(o.clone(), json!({ "prompt": "   " }))
        .await
        .unwrap_err();
    let (status, body) = rejected(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "prompt is empty");
    assert!(o.history().await.is_empty());
}

#[tokio::test]
async fn chat_body_without_prompt_is_rejected() {
    let err = handlers::handle_chat_submit(
        orchestrator(MockBackend::new()),
        json!({ "text": "hi" }),
    )
    .await
    .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn busy_maps_to_conflict() {
    let (status, body) = rejected(ChatError::busy()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn upstream_api_error_keeps_its_status() {
    let (status, body) = rejected(ChatError::api("model not loaded".to_string(), 500)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "model not loaded");

    let (status, _) = rejected(ChatError::network("connection refused")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn set_parameter_clamps_value() {
    let o = orchestrator(MockBackend::new());

    let response = handlers::handle_set_parameter(
        o.clone(),
        "temperature".to_string(),
        json!({ "value": 5 }),
    )
    .await
    .unwrap();

    let set = body_json(response).await;
    assert_eq!(set["temperature"], 2.0);
}

#[tokio::test]
async fn unknown_parameter_maps_to_bad_request() {
    let err = handlers::handle_set_parameter(
        orchestrator(MockBackend::new()),
        "seed".to_string(),
        json!({ "value": 1 }),
    )
    .await
    .unwrap_err();
    let (status, body) = rejected(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("seed"));
}

#[tokio::test]
async fn failed_reset_maps_to_bad_gateway() {
    let o = orchestrator(
        MockBackend::new().with_defaults(Ok(HttpReply::new(503, json!({ "error": "down" })))),
    );

    let err = handlers::handle_reset_parameters(o).await.unwrap_err();
    let (status, _) = rejected(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn ranges_describe_every_parameter() {
    let ranges = body_json(handlers::handle_parameter_ranges()).await;

    assert_eq!(ranges.as_object().unwrap().len(), 6);
    assert_eq!(ranges["top_k"]["min"], 1.0);
    assert_eq!(ranges["max_tokens"]["max"], 4096.0);
    assert_eq!(ranges["temperature"]["step"], 0.1);
    assert!(ranges["top_p"]["description"].is_string());
}

#[tokio::test]
async fn carousel_moves_report_position() {
    let o = orchestrator(MockBackend::new());
    o.submit("one").await.unwrap();
    o.submit("two").await.unwrap();

    let response = handlers::handle_carousel_move(o.clone(), CarouselMove::Previous)
        .await
        .unwrap();
    let position = body_json(response).await;
    assert_eq!(position["current_index"], 1);
    assert_eq!(position["current"]["prompt"], "one");

    let err = handlers::handle_carousel_move(o.clone(), CarouselMove::Jump(5))
        .await
        .unwrap_err();
    assert!(err.is_index());
    assert_eq!(o.current_index().await, 1);
}

#[tokio::test]
async fn clear_history_returns_empty_state() {
    let o = orchestrator(MockBackend::new());
    o.submit("one").await.unwrap();

    let state = body_json(handlers::handle_clear_history(o).await.unwrap()).await;
    assert_eq!(state["history_len"], 0);
    assert_eq!(state["current_index"], 0);
}

#[tokio::test]
async fn models_are_listed_by_id() {
    let o = orchestrator(
        MockBackend::new().with_models(Ok(HttpReply::new(
            200,
            json!({ "data": [{ "id": "llama-3.2-3b" }] }),
        ))),
    );

    let body = body_json(handlers::handle_list_models(o).await.unwrap()).await;
    assert_eq!(body["models"], json!(["llama-3.2-3b"]));
}
