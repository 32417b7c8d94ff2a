//! Integration tests for the judge against stand-in LLM endpoints.
//!
//! Each test binds an Axum server on an ephemeral port that answers
//! `POST /v1/chat/completions` the way an OpenAI-compatible API would and
//! `POST /v1/messages` the way the Anthropic Messages API would, then
//! points a real [`Judge`] at it.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use arena_judge::{
    ActionContext, BackendType, ClashContext, ClashSide, Judge, JudgeError, LlmBackendConfig,
    Pricing, PromptEngine, create_backend,
};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{Value, json};

#[derive(Clone)]
struct MockLlm {
    content: String,
    status: StatusCode,
    delay: Duration,
    requests: Arc<Mutex<Vec<Value>>>,
    api_keys: Arc<Mutex<Vec<String>>>,
}

async fn chat_completions(
    State(mock): State<MockLlm>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.requests.lock().unwrap().push(body);
    tokio::time::sleep(mock.delay).await;
    (
        mock.status,
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": mock.content}}],
            "usage": {"prompt_tokens": 400, "completion_tokens": 60}
        })),
    )
}

async fn messages(
    State(mock): State<MockLlm>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if let Some(key) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        mock.api_keys.lock().unwrap().push(key.to_owned());
    }
    mock.requests.lock().unwrap().push(body);
    (
        mock.status,
        Json(json!({
            "content": [{"type": "text", "text": mock.content}],
            "usage": {"input_tokens": 300, "output_tokens": 45}
        })),
    )
}

async fn spawn_llm(mock: MockLlm) -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/messages", post(messages))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{addr}/v1")
}

fn mock(content: &str) -> MockLlm {
    MockLlm {
        content: content.to_owned(),
        status: StatusCode::OK,
        delay: Duration::ZERO,
        requests: Arc::new(Mutex::new(Vec::new())),
        api_keys: Arc::new(Mutex::new(Vec::new())),
    }
}

fn judge_for(api_url: String, timeout: Duration) -> Judge {
    let config = LlmBackendConfig {
        backend_type: BackendType::OpenAi,
        api_url,
        api_key: "test-key".to_owned(),
        model: "glm-4-flash".to_owned(),
        temperature: None,
        max_tokens: 256,
    };
    Judge::new(
        create_backend(&config),
        PromptEngine::builtin().unwrap(),
        Pricing::GPT_4O_MINI,
        timeout,
    )
}

fn clash_context() -> ClashContext {
    ClashContext {
        turn: 1,
        context: "A neon-lit cyberpunk rooftop in continuous rain.".to_owned(),
        agent_a: ClashSide {
            name: "Zero-K (Hacker)".to_owned(),
            kind: "ATTACK".to_owned(),
            narrative: "Zero-K executes a recursive script.".to_owned(),
        },
        agent_b: ClashSide {
            name: "Eldric (Mage)".to_owned(),
            kind: "ATTACK".to_owned(),
            narrative: "Eldric casts a burning spell of mana.".to_owned(),
        },
        max_damage: 30,
    }
}

#[tokio::test]
async fn judge_action_parses_verdict_and_sends_json_mode() {
    let llm = mock(r#"{"damage": 21, "description": "The logic bomb tears through the firewall."}"#);
    let requests = Arc::clone(&llm.requests);
    let judge = judge_for(spawn_llm(llm).await, Duration::from_secs(5));

    let verdict = judge
        .judge_action(&ActionContext::new("Agent A", "Agent B", "deploys a logic bomb."))
        .await
        .unwrap();

    assert_eq!(verdict.damage, 21);
    assert!(verdict.description.contains("firewall"));

    let sent = requests.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    let body = &sent[0];
    assert_eq!(body["model"], "glm-4-flash");
    assert_eq!(body["response_format"]["type"], "json_object");
    assert!(body.get("temperature").is_none());
    assert_eq!(body["messages"][0]["role"], "system");
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("Action: deploys a logic bomb."));

    assert_eq!(judge.cost_summary().total_calls, 1);
}

#[tokio::test]
async fn judge_action_fills_defaults() {
    let judge = judge_for(spawn_llm(mock("{}")).await, Duration::from_secs(5));
    let verdict = judge
        .judge_action(&ActionContext::new("Agent B", "Agent A", "overloads the neural buffer."))
        .await
        .unwrap();
    assert_eq!(verdict.damage, 10);
    assert_eq!(verdict.description, "The attack lands!");
}

#[tokio::test]
async fn unparseable_response_is_a_parse_error() {
    let judge = judge_for(spawn_llm(mock("no json here")).await, Duration::from_secs(5));
    let result = judge
        .judge_action(&ActionContext::new("Agent A", "Agent B", "x"))
        .await;
    assert!(matches!(result, Err(JudgeError::Parse(_))));
}

#[tokio::test]
async fn backend_error_status_surfaces() {
    let mut llm = mock("{}");
    llm.status = StatusCode::TOO_MANY_REQUESTS;
    let judge = judge_for(spawn_llm(llm).await, Duration::from_secs(5));
    let result = judge
        .judge_action(&ActionContext::new("Agent A", "Agent B", "x"))
        .await;
    assert!(matches!(result, Err(JudgeError::LlmBackend(ref msg)) if msg.contains("429")));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let mut llm = mock(r#"{"damage": 1}"#);
    llm.delay = Duration::from_secs(5);
    let judge = judge_for(spawn_llm(llm).await, Duration::from_millis(100));
    let result = judge
        .judge_action(&ActionContext::new("Agent A", "Agent B", "x"))
        .await;
    assert!(matches!(result, Err(JudgeError::Timeout(100))));
}

#[tokio::test]
async fn judge_clash_reports_cost_and_tokens() {
    let llm = mock(
        r#"{
            "agent_a_score": {"creativity": 85, "plausibility": 70, "style": 75},
            "agent_b_score": {"creativity": 60, "plausibility": 80, "style": 65},
            "damage_to_a": 8,
            "damage_to_b": 19,
            "summary": "The script outpaces the spell."
        }"#,
    );
    let judge = judge_for(spawn_llm(llm).await, Duration::from_secs(5));

    let judged = judge.judge_clash(&clash_context()).await.unwrap();

    assert_eq!(judged.verdict.damage_to_a, 8);
    assert_eq!(judged.verdict.damage_to_b, 19);
    assert_eq!(judged.verdict.agent_a_score.creativity, 85);
    assert_eq!(judged.meta.tokens, 460);
    // 400 * 0.15 / 1M + 60 * 0.60 / 1M
    assert_eq!(judged.meta.cost, Decimal::new(96, 6));
}

#[tokio::test]
async fn anthropic_backend_speaks_the_messages_api() {
    let llm = mock(r#"{"damage": 14, "description": "The rune flares and bites."}"#);
    let requests = Arc::clone(&llm.requests);
    let api_keys = Arc::clone(&llm.api_keys);
    let config = LlmBackendConfig {
        backend_type: BackendType::Anthropic,
        api_url: spawn_llm(llm).await,
        api_key: "sk-ant-test".to_owned(),
        model: "claude-haiku".to_owned(),
        temperature: Some(0.2),
        max_tokens: 300,
    };
    let judge = Judge::new(
        create_backend(&config),
        PromptEngine::builtin().unwrap(),
        Pricing::GPT_4O_MINI,
        Duration::from_secs(5),
    );

    let verdict = judge
        .judge_action(&ActionContext::new("Agent B", "Agent A", "carves a binding rune."))
        .await
        .unwrap();

    assert_eq!(verdict.damage, 14);
    assert_eq!(*api_keys.lock().unwrap(), ["sk-ant-test"]);

    let sent = requests.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    let body = &sent[0];
    assert_eq!(body["model"], "claude-haiku");
    assert_eq!(body["max_tokens"], 300);
    assert!(body["system"].as_str().unwrap().contains("Output JSON only"));
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert!(messages[0]["content"].as_str().unwrap().contains("carves a binding rune."));
    assert!(body.get("response_format").is_none());

    let costs = judge.cost_summary();
    assert_eq!(costs.total_input_tokens, 300);
    assert_eq!(costs.total_output_tokens, 45);
}
