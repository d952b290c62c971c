//! Process-wide companion context
//!
//! Constructed once at startup and passed explicitly to everything that
//! needs credential, client or registry access; there are no module-level
//! singletons. Host change notifications enter the core through the `on_*`
//! methods here.

use std::sync::Arc;

use tracing::info;

use crate::client::DiagramClient;
use crate::config::Settings;
use crate::error::Result;
use crate::events::EventEmitter;
use crate::host::{HostEditor, HostIdentity};
use crate::overlay::OverlayController;
use crate::panel::PanelRegistry;
use crate::session::{CredentialStore, SessionManager};
use crate::transport::{ApiTransport, HttpTransport};
use crate::types::{DiagramReference, DocumentId};

pub struct CompanionContext {
    pub settings: Settings,
    pub store: Arc<CredentialStore>,
    pub session: Arc<SessionManager>,
    pub client: Arc<DiagramClient>,
    pub panels: Arc<PanelRegistry>,
    pub overlay: OverlayController,

    /// Fire-and-forget refresh signal for list/tree views, emitted after
    /// every successful server-side mutation
    pub refresh: EventEmitter<DocumentId>,
}

impl CompanionContext {
    /// Wire the core together with an explicit transport (tests inject a
    /// scripted one here)
    pub fn new(
        settings: Settings,
        identity: Arc<dyn HostIdentity>,
        transport: Arc<dyn ApiTransport>,
    ) -> Result<Self> {
        settings.validate()?;

        let store = Arc::new(CredentialStore::new(settings.base_url.clone()));
        let session = Arc::new(SessionManager::new(
            Arc::clone(&store),
            identity,
            Arc::clone(&transport),
        ));
        let client = Arc::new(DiagramClient::new(Arc::clone(&session), transport));

        Ok(Self {
            settings,
            store,
            session,
            client,
            panels: Arc::new(PanelRegistry::new()),
            overlay: OverlayController::new(),
            refresh: EventEmitter::new(),
        })
    }

    /// Wire the core together with the production HTTP transport
    pub fn with_http(settings: Settings, identity: Arc<dyn HostIdentity>) -> Result<Self> {
        let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::new()?);
        Self::new(settings, identity, transport)
    }

    /// The active document switched; rescan it and replace the overlay
    pub fn on_active_document_change(
        &self,
        editor: &dyn HostEditor,
        document_text: &str,
    ) -> Vec<DiagramReference> {
        self.overlay.refresh(editor, document_text)
    }

    /// The active document's text mutated; rescan it and replace the overlay
    pub fn on_document_change(
        &self,
        editor: &dyn HostEditor,
        document_text: &str,
    ) -> Vec<DiagramReference> {
        self.overlay.refresh(editor, document_text)
    }

    /// The host reported a session change for this provider
    pub async fn on_session_change(&self) -> Result<()> {
        self.session.on_external_session_change().await
    }

    /// The host configuration changed
    pub fn on_configuration_change(&mut self, settings: Settings) {
        if settings.base_url != self.settings.base_url {
            info!("base URL changed, updating endpoint");
            self.session.on_endpoint_config_change(&settings.base_url);
        }
        self.settings = settings;
    }
}
