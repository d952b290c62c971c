//! Panel lifecycle and the editing-surface message protocol
//!
//! [`PanelRegistry`] guarantees at most one live panel per remote diagram
//! identity: `open_or_reveal` either foregrounds the existing surface or
//! constructs a new controller, and disposal removes the registry entry and
//! frees the surface handle in one step. [`PanelController`] runs the
//! request/response protocol between one editing surface and the client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::DiagramClient;
use crate::error::Result;
use crate::events::EventEmitter;
use crate::host::HostShell;
use crate::types::{Diagram, DiagramTheme, DocumentId};

/// Request from the rendering surface to the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelRequest {
    GetDiagramData,
    UpdateDiagram { data: UpdatePayload },
}

/// Payload of an `updateDiagram` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Response posted back to the rendering surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelResponse {
    DiagramData { data: DiagramData },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramData {
    pub code: String,
    pub title: String,

    /// Self-contained data URI wrapping the rendered vector output
    #[serde(rename = "diagramImage")]
    pub diagram_image: String,
}

/// Wrap rendered SVG in a self-contained data URI.
///
/// The base64 payload is percent-encoded so the URI survives embedding in an
/// iframe `src` attribute (matching the original wire format).
pub fn image_data_url(svg: &str) -> String {
    let encoded = BASE64.encode(svg.as_bytes());
    let mut escaped = String::with_capacity(encoded.len());
    for ch in encoded.chars() {
        match ch {
            '+' => escaped.push_str("%2B"),
            '/' => escaped.push_str("%2F"),
            '=' => escaped.push_str("%3D"),
            other => escaped.push(other),
        }
    }
    format!("data:image/svg+xml;base64,{}", escaped)
}

/// One detached rendering surface in the host
pub trait PanelSurface: Send + Sync {
    /// Bring the surface to the foreground
    fn reveal(&self);

    /// Post a protocol response to the surface
    fn post_message(&self, response: &PanelResponse);

    /// Free the underlying handle; it is unusable afterwards
    fn dispose(&self);
}

/// Protocol driver for a single open diagram
pub struct PanelController {
    diagram: Mutex<Diagram>,
    client: Arc<DiagramClient>,
    surface: Arc<dyn PanelSurface>,
    shell: Arc<dyn HostShell>,
    refresh: EventEmitter<DocumentId>,
    theme: DiagramTheme,
}

impl PanelController {
    pub fn new(
        diagram: Diagram,
        client: Arc<DiagramClient>,
        surface: Arc<dyn PanelSurface>,
        shell: Arc<dyn HostShell>,
        refresh: EventEmitter<DocumentId>,
        theme: DiagramTheme,
    ) -> Self {
        Self {
            diagram: Mutex::new(diagram),
            client,
            surface,
            shell,
            refresh,
            theme,
        }
    }

    /// The remote diagram identity this panel is bound to; never changes
    pub fn document_id(&self) -> DocumentId {
        self.working_copy().document_id
    }

    /// Snapshot of the panel-local working copy
    pub fn working_copy(&self) -> Diagram {
        self.diagram.lock().expect("working copy poisoned").clone()
    }

    pub fn surface(&self) -> &Arc<dyn PanelSurface> {
        &self.surface
    }

    /// Handle one protocol request, returning the response to post, if any.
    ///
    /// Update failures leave the working copy unchanged; their only
    /// observable effect is a failure notification.
    pub async fn handle_request(&self, request: PanelRequest) -> Option<PanelResponse> {
        match request {
            PanelRequest::GetDiagramData => {
                // Served from the working copy, no network call
                Some(self.diagram_data(&self.working_copy()))
            }
            PanelRequest::UpdateDiagram { data } => match self.update(data).await {
                Ok(response) => {
                    self.shell.notify_info("Diagram updated");
                    // One-way signal so list/tree views stay consistent
                    self.refresh.emit(&self.document_id());
                    Some(response)
                }
                Err(e) => {
                    warn!("diagram update failed: {}", e);
                    self.shell.notify_error("Failed to update diagram");
                    None
                }
            },
        }
    }

    async fn update(&self, payload: UpdatePayload) -> Result<PanelResponse> {
        let mut updated = self.working_copy();
        updated.code = payload.code;
        if let Some(title) = payload.title {
            updated.title = title;
        }

        self.client.update_document(&updated).await?;
        let refreshed = self.client.get_document(&updated.document_id).await?;
        let svg = self.client.get_rendered_output(&refreshed, self.theme).await?;

        let response = PanelResponse::DiagramData {
            data: DiagramData {
                code: refreshed.code.clone(),
                title: refreshed.title.clone(),
                diagram_image: image_data_url(&svg),
            },
        };

        // Commit only after the whole update/refresh/render chain succeeded;
        // the server copy is replaced wholesale, never merged.
        *self.diagram.lock().expect("working copy poisoned") = refreshed;
        Ok(response)
    }

    fn diagram_data(&self, diagram: &Diagram) -> PanelResponse {
        let image = diagram
            .svg_for(self.theme)
            .map(image_data_url)
            .unwrap_or_default();
        PanelResponse::DiagramData {
            data: DiagramData {
                code: diagram.code.clone(),
                title: diagram.title.clone(),
                diagram_image: image,
            },
        }
    }
}

/// Keyed store of at most one live panel per diagram identity
#[derive(Default)]
pub struct PanelRegistry {
    panels: Mutex<HashMap<DocumentId, Arc<PanelController>>>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal the existing panel for this diagram, or construct, register
    /// and show a new one via `factory`.
    pub fn open_or_reveal<F>(&self, document_id: DocumentId, factory: F) -> Arc<PanelController>
    where
        F: FnOnce() -> Arc<PanelController>,
    {
        let mut panels = self.panels.lock().expect("panel registry poisoned");
        if let Some(existing) = panels.get(&document_id) {
            debug!("revealing existing panel for {}", document_id);
            existing.surface().reveal();
            return Arc::clone(existing);
        }

        info!("opening panel for {}", document_id);
        let controller = factory();
        controller.surface().reveal();
        panels.insert(document_id, Arc::clone(&controller));
        controller
    }

    /// Remove the registry entry and free the surface handle, in that order.
    ///
    /// Every path that destroys the visual panel must run through here, or
    /// the registry leaks a stale entry pointing at a dead surface.
    pub fn dispose(&self, document_id: &DocumentId) {
        let removed = self
            .panels
            .lock()
            .expect("panel registry poisoned")
            .remove(document_id);
        if let Some(controller) = removed {
            info!("disposing panel for {}", document_id);
            controller.surface().dispose();
        }
    }

    pub fn contains(&self, document_id: &DocumentId) -> bool {
        self.panels
            .lock()
            .expect("panel registry poisoned")
            .contains_key(document_id)
    }

    pub fn len(&self) -> usize {
        self.panels.lock().expect("panel registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Route a surface request to its controller and post the response.
    ///
    /// A response produced after the panel was disposed mid-flight is
    /// dropped rather than posted to a dead surface.
    pub async fn dispatch(
        &self,
        document_id: &DocumentId,
        request: PanelRequest,
    ) -> Option<PanelResponse> {
        let controller = self
            .panels
            .lock()
            .expect("panel registry poisoned")
            .get(document_id)
            .cloned()?;

        let response = controller.handle_request(request).await?;
        if !self.contains(document_id) {
            debug!("dropping response for disposed panel {}", document_id);
            return None;
        }
        controller.surface().post_message(&response);
        Some(response)
    }
}
