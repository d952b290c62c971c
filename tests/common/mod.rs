//! Shared fakes for integration tests: a scripted transport, a counting
//! identity provider, and recording host/surface implementations.

// Each test binary uses its own subset of these fakes.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mermaid_companion::error::{CompanionError, Result};
use mermaid_companion::host::{HostIdentity, HostShell};
use mermaid_companion::panel::{PanelResponse, PanelSurface};
use mermaid_companion::transport::{ApiRequest, ApiResponse, ApiTransport};
use mermaid_companion::types::{Diagram, DocumentId};
use mermaid_companion::{CompanionContext, Settings};

/// Transport that replays a scripted sequence of outcomes and logs every
/// request it saw.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(ApiResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_network_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(CompanionError::Network(message.to_string())));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Number of requests whose URL contains `fragment`
    pub fn requests_to(&self, fragment: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url.contains(fragment))
            .count()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.log.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted transport ran out of responses")
    }
}

/// Identity provider that mints sequential tokens and counts acquisitions
#[derive(Default)]
pub struct CountingIdentity {
    plain: AtomicUsize,
    forced: AtomicUsize,
    issued: AtomicUsize,
}

impl CountingIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain_acquisitions(&self) -> usize {
        self.plain.load(Ordering::SeqCst)
    }

    pub fn forced_acquisitions(&self) -> usize {
        self.forced.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostIdentity for CountingIdentity {
    async fn acquire_session(&self, force_new: bool) -> Result<String> {
        if force_new {
            self.forced.fetch_add(1, Ordering::SeqCst);
        } else {
            self.plain.fetch_add(1, Ordering::SeqCst);
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("token-{}", n))
    }
}

/// Shell that records notifications and answers confirmations with a preset
pub struct RecordingShell {
    pub confirm_answer: bool,
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub opened: Mutex<Vec<String>>,
}

impl RecordingShell {
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            confirm_answer,
            infos: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
        }
    }
}

impl HostShell for RecordingShell {
    fn confirm(&self, _message: &str) -> bool {
        self.confirm_answer
    }

    fn open_external(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }

    fn notify_info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn notify_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Surface that counts reveals/disposals and records posted responses
#[derive(Default)]
pub struct FakeSurface {
    pub revealed: AtomicUsize,
    pub disposed: AtomicUsize,
    pub posted: Mutex<Vec<PanelResponse>>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PanelSurface for FakeSurface {
    fn reveal(&self) {
        self.revealed.fetch_add(1, Ordering::SeqCst);
    }

    fn post_message(&self, response: &PanelResponse) {
        self.posted.lock().unwrap().push(response.clone());
    }

    fn dispose(&self) {
        self.disposed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn test_settings() -> Settings {
    Settings {
        base_url: "https://companion.invalid".to_string(),
        client_id: "test-client".to_string(),
    }
}

pub fn test_context(
    identity: Arc<CountingIdentity>,
    transport: Arc<ScriptedTransport>,
) -> CompanionContext {
    CompanionContext::new(test_settings(), identity, transport).expect("valid test settings")
}

pub fn test_diagram(document_id: DocumentId) -> Diagram {
    Diagram {
        id: "row-1".to_string(),
        document_id,
        project_id: "proj-1".to_string(),
        major: 0,
        minor: 1,
        title: "Flow".to_string(),
        code: "graph TD; A-->B;".to_string(),
        svg_code_dark: Some("<svg>dark</svg>".to_string()),
        svg_code_light: None,
    }
}

pub fn diagram_json(diagram: &Diagram) -> String {
    serde_json::to_string(diagram).expect("diagram serializes")
}
