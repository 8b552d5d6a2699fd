#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use project_manager_api::config::AppConfig;
use project_manager_api::database::{RoutineCall, RoutineError, RoutineExecutor};
use project_manager_api::types::RawJson;
use project_manager_api::{app, AppState};

/// Text of the database error every failing reply produces. Must never
/// reach a client.
pub const LEAKY_ERROR: &str = "relation \"project_manager.secret\" does not exist";

/// What the stub answers to the next routine call.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(&'static str),
    Id(i64),
    Done,
    Fail,
}

/// Records every routine call and answers from a queue of replies.
/// With an empty queue, reads return `[]`, ids are `1` and procedures succeed.
pub struct StubRoutines {
    calls: Mutex<Vec<RoutineCall>>,
    replies: Mutex<VecDeque<Reply>>,
    healthy: bool,
}

impl StubRoutines {
    pub fn new() -> Arc<Self> {
        Self::with_replies([])
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into_iter().collect()),
            healthy: true,
        })
    }

    pub fn unhealthy() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            healthy: false,
        })
    }

    pub fn calls(&self) -> Vec<RoutineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(|c| c.name()).collect()
    }

    fn record(&self, call: &RoutineCall) -> Option<Reply> {
        self.calls.lock().unwrap().push(call.clone());
        self.replies.lock().unwrap().pop_front()
    }
}

fn failure() -> RoutineError {
    RoutineError::Sqlx(sqlx::Error::Protocol(LEAKY_ERROR.to_string()))
}

#[async_trait]
impl RoutineExecutor for StubRoutines {
    async fn fetch_json(&self, call: &RoutineCall) -> Result<RawJson, RoutineError> {
        match self.record(call) {
            None => Ok(RawJson::new("[]")),
            Some(Reply::Json(text)) => Ok(RawJson::new(text)),
            Some(Reply::Fail) => Err(failure()),
            Some(other) => panic!("{} expected a JSON reply, got {:?}", call.name(), other),
        }
    }

    async fn fetch_id(&self, call: &RoutineCall) -> Result<i64, RoutineError> {
        match self.record(call) {
            None => Ok(1),
            Some(Reply::Id(id)) => Ok(id),
            Some(Reply::Fail) => Err(failure()),
            Some(other) => panic!("{} expected an id reply, got {:?}", call.name(), other),
        }
    }

    async fn execute(&self, call: &RoutineCall) -> Result<(), RoutineError> {
        match self.record(call) {
            None | Some(Reply::Done) => Ok(()),
            Some(Reply::Fail) => Err(failure()),
            Some(other) => panic!("{} expected a procedure reply, got {:?}", call.name(), other),
        }
    }

    async fn ping(&self) -> Result<(), RoutineError> {
        if self.healthy {
            Ok(())
        } else {
            Err(failure())
        }
    }
}

pub fn test_app(stub: Arc<StubRoutines>) -> Router {
    app(AppState::new(stub), &AppConfig::development().security)
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, Body::empty()).await
}

pub async fn send_json(app: Router, method: Method, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response {
    let request = Request::builder().method(method).uri(uri).body(body).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let text = body_string(response).await;
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("invalid JSON body {:?}: {}", text, e))
}
