// Shared test fixtures: a stub classification service, in-process
// classifiers, and a popup view that records what it was told to do.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::sync::Notify;

use scamwatch::classifier::ScamClassifier;
use scamwatch::popup::{PopupView, ResultStyle};
use scamwatch::protocol::Classification;

// ============================================================
// Stub classification service
// ============================================================

/// One request the stub service received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct StubService {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubService {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `POST /api/detect` on an ephemeral port, always answering with
/// `status` and the raw `body`.
pub async fn spawn_stub(status: StatusCode, body: &str) -> StubService {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status,
        body: body.to_string(),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/api/detect", post(detect))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubService {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// Stub that answers 200 with the given JSON value.
pub async fn spawn_json_stub(body: Value) -> StubService {
    spawn_stub(StatusCode::OK, &body.to_string()).await
}

async fn detect(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest { content_type, body });

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        state.body.clone(),
    )
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ============================================================
// In-process classifiers
// ============================================================

/// Classifier that answers immediately and counts its calls.
pub struct FakeClassifier {
    outcome: Result<Classification, String>,
    calls: AtomicUsize,
}

impl FakeClassifier {
    pub fn answering(result: &str, message: &str) -> Self {
        Self {
            outcome: Ok(classification(result, message)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScamClassifier for FakeClassifier {
    async fn classify(&self, _url: &str) -> anyhow::Result<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(c) => Ok(c.clone()),
            Err(reason) => Err(anyhow::anyhow!(reason.clone())),
        }
    }
}

/// Classifier that blocks until released, for overlapping-request tests.
pub struct GatedClassifier {
    pub gate: Arc<Notify>,
    pub started: Arc<Notify>,
}

impl GatedClassifier {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            started: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl ScamClassifier for GatedClassifier {
    async fn classify(&self, url: &str) -> anyhow::Result<Classification> {
        self.started.notify_one();
        self.gate.notified().await;
        Ok(classification("Legitimate", &format!("checked {url}")))
    }
}

/// Classifier whose call panics instead of returning.
pub struct PanickingClassifier;

#[async_trait]
impl ScamClassifier for PanickingClassifier {
    async fn classify(&self, _url: &str) -> anyhow::Result<Classification> {
        panic!("classifier blew up");
    }
}

pub fn classification(result: &str, message: &str) -> Classification {
    Classification::new(result, message)
}

// ============================================================
// Recording popup view
// ============================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    TriggerEnabled(bool),
    TriggerLabel(String),
    HideResult,
    ShowResult(String, ResultStyle),
    Alert,
}

#[derive(Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn trigger_enabled(&self) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::TriggerEnabled(enabled) => Some(*enabled),
            _ => None,
        })
    }

    pub fn trigger_label(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::TriggerLabel(label) => Some(label.as_str()),
            _ => None,
        })
    }

    pub fn shown_result(&self) -> Option<(&str, ResultStyle)> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::ShowResult(text, style) => Some((text.as_str(), *style)),
            _ => None,
        })
    }

    pub fn alert_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ViewEvent::Alert))
            .count()
    }
}

impl PopupView for RecordingView {
    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.events.push(ViewEvent::TriggerEnabled(enabled));
    }

    fn set_trigger_label(&mut self, label: &str) {
        self.events.push(ViewEvent::TriggerLabel(label.to_string()));
    }

    fn hide_result(&mut self) {
        self.events.push(ViewEvent::HideResult);
    }

    fn show_result(&mut self, text: &str, style: ResultStyle) {
        self.events.push(ViewEvent::ShowResult(text.to_string(), style));
    }

    fn play_alert(&mut self) {
        self.events.push(ViewEvent::Alert);
    }
}
