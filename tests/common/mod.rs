// tests/common/mod.rs

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use quiz_gateway::{
    config::Config,
    routes,
    session::registry::SessionRegistry,
    state::AppState,
    upstream::{HttpQuizApi, QuizApi},
};
use serde_json::{Value, json};

pub const TOKEN: &str = "test-token";

/// In-process stand-in for the communities API.
#[derive(Default)]
pub struct MockUpstream {
    /// Every grading body received, in arrival order.
    pub submissions: Mutex<Vec<Value>>,
    /// When set, the next grading call fails with a 500.
    pub fail_next_submit: AtomicBool,
}

pub struct TestApp {
    pub address: String,
    pub upstream: Arc<MockUpstream>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("Cookie", format!("auth_token={}", TOKEN))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", TOKEN))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", TOKEN))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Opens a session on `quiz_id` and returns its rendered view.
    pub async fn open(&self, quiz_id: &str) -> Value {
        let response = self
            .post(
                "/api/sessions",
                json!({ "communityId": "c1", "courseId": "k1", "quizId": quiz_id }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse session view")
    }
}

fn question(id: &str, time: u32) -> Value {
    json!({
        "_id": id,
        "question": format!("Prompt of {}", id),
        "options": ["A", "B", "Paris", "London"],
        "time": time,
    })
}

/// Quiz fixtures keyed by id: "quick" has short timers, "empty" has no questions.
fn quiz(id: &str) -> Value {
    let questions = match id {
        "quick" => vec![question("q1", 1), question("q2", 2)],
        "empty" => Vec::new(),
        _ => vec![question("q1", 10), question("q2", 15)],
    };

    json!({
        "_id": id,
        "topic": "Capitals",
        "difficulty": "MEDIUM",
        "creator": { "_id": "u1", "firstName": "Ada", "lastName": "Lovelace", "bio": "ignored" },
        "participators": [],
        "questions": questions,
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains(&format!("auth_token={}", TOKEN)))
}

async fn get_quiz(
    headers: HeaderMap,
    Path((_community, _course, quiz_id)): Path<(String, String, String)>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(quiz(&quiz_id)).into_response()
}

async fn grade(
    State(upstream): State<Arc<MockUpstream>>,
    headers: HeaderMap,
    Path((_community, _course, quiz_id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    upstream.submissions.lock().unwrap().push(body.clone());

    if upstream.fail_next_submit.swap(false, Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if quiz_id == "noresults" {
        return Json(json!({ "message": "graded" })).into_response();
    }

    let results: Vec<Value> = body["answers"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            json!({
                "answer": entry["answer"],
                "isCorrect": entry["answer"] == "A",
                "time": 4,
                "correctAnswer": "A",
            })
        })
        .collect();

    Json(json!({ "results": results })).into_response()
}

async fn list_quizzes(
    Path((_community, course_id)): Path<(String, String)>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "quizzes": [quiz("quiz-1")],
        "page": page,
        "pages": 3,
        "count": 7,
        "course": { "title": "Rust", "description": "Ownership", "_id": course_id },
    }))
}

async fn generate_quiz() -> Json<Value> {
    Json(json!({ "quiz": quiz("fresh") }))
}

async fn leaderboard() -> Json<Value> {
    Json(json!({
        "leaderboard": [
            { "_id": "u1", "firstName": "Ada", "lastName": "Lovelace", "avatar": "", "email": "ada@example.com",
              "score": 42, "accuracy": 0.8, "count": 5, "isMe": true }
        ]
    }))
}

async fn spawn_upstream(upstream: Arc<MockUpstream>) -> SocketAddr {
    let app = Router::new()
        .route("/quiz/{community}/{course}/{quiz}", get(get_quiz).post(grade))
        .route("/quiz/{community}/{course}", get(list_quizzes).post(generate_quiz))
        .route("/community/leaderboard/{community}", get(leaderboard))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Spawns the gateway on a random port, wired to a fresh mock upstream.
/// `tick_millis` is the countdown period.
pub async fn spawn_app(tick_millis: u64) -> TestApp {
    let upstream = Arc::new(MockUpstream::default());
    let upstream_addr = spawn_upstream(Arc::clone(&upstream)).await;

    let config = Config {
        upstream_url: format!("http://{}/", upstream_addr).parse().unwrap(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        rust_log: "error".to_string(),
        log_dir: "logs".to_string(),
        tick_millis,
        session_ttl_secs: 600,
        allowed_origins: vec!["http://localhost:5173".to_string()],
    };

    let api: Arc<dyn QuizApi> = Arc::new(
        HttpQuizApi::new(config.upstream_url.clone(), std::time::Duration::from_secs(2)).unwrap(),
    );
    let state = AppState {
        sessions: Arc::new(SessionRegistry::new()),
        api,
        config,
    };

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        upstream,
        client: reqwest::Client::new(),
    }
}
