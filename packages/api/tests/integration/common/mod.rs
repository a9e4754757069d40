use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use common::GradingJob;
use reqwest::Client;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;

use api::config::{AppConfig, CorsConfig, DatabaseConfig, GraderConfig, ServerConfig};
use api::coordinator::SubmissionCoordinator;
use api::entity::assignment;
use api::events::StatusEventHub;
use api::grader::HttpGraderDispatch;
use api::state::AppState;

/// A running test server, wired to an in-memory database and a stub grading
/// service that records every dispatched job.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    /// Jobs received by the stub grading service, in dispatch order.
    pub dispatched: Arc<Mutex<Vec<GradingJob>>>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

#[derive(Clone)]
struct StubGraderState {
    dispatched: Arc<Mutex<Vec<GradingJob>>>,
}

async fn stub_enqueue(
    State(state): State<StubGraderState>,
    Json(job): Json<GradingJob>,
) -> Json<Value> {
    state.dispatched.lock().unwrap().push(job);
    Json(serde_json::json!({"status": "Enqueued"}))
}

/// Spawn a stub grading service and return its address.
async fn spawn_stub_grader(dispatched: Arc<Mutex<Vec<GradingJob>>>) -> SocketAddr {
    let app = Router::new()
        .route("/", post(stub_enqueue))
        .with_state(StubGraderState { dispatched });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub grader");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db = api::database::init_db("sqlite::memory:")
            .await
            .expect("Failed to initialize test database");
        api::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let dispatched: Arc<Mutex<Vec<GradingJob>>> = Arc::default();
        let grader_addr = spawn_stub_grader(Arc::clone(&dispatched)).await;

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
            },
            grader: GraderConfig {
                url: format!("http://{grader_addr}"),
            },
        };

        let hub = StatusEventHub::new();
        let dispatcher = Arc::new(HttpGraderDispatch::new(config.grader.url.clone()));
        let coordinator = Arc::new(SubmissionCoordinator::new(
            db.clone(),
            hub.clone(),
            dispatcher,
        ));

        let state = AppState {
            db: db.clone(),
            config,
            hub,
            coordinator,
        };

        let app = api::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            dispatched,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(res).await
    }

    /// Insert an assignment and return its ordering index.
    pub async fn seed_assignment(&self, order: i32) -> i32 {
        assignment::ActiveModel {
            title: Set(format!("Assignment {order}")),
            assignment_order: Set(order),
            handout: Set("Implement the function described in the prompt.".into()),
            test_code: Set("assert solution() == 'Hello world'".into()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed assignment");
        order
    }

    pub fn dispatched_jobs(&self) -> Vec<GradingJob> {
        self.dispatched.lock().unwrap().clone()
    }
}

pub mod routes {
    pub fn assignment(order: i32) -> String {
        format!("/assignments/{order}")
    }

    pub fn submissions(order: i32) -> String {
        format!("/submissions/{order}")
    }

    pub fn current_submission(order: i32, user_uuid: &str) -> String {
        format!("/submissions/{order}/{user_uuid}")
    }

    pub fn grading(user_uuid: &str) -> String {
        format!("/grading/{user_uuid}")
    }
}
