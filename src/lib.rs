//! Mermaid Companion - editor companion core for the Mermaid Chart service
//!
//! Lets a host editor embed diagram references inside arbitrary text
//! documents, keep those references highlighted and actionable as the
//! document is edited, and create/view/edit/delete diagrams through panels
//! that talk to the remote API behind an expiring-token authentication
//! scheme.
//!
//! # Architecture
//!
//! Three coupled subsystems over a thin host-collaborator seam:
//! - **Session**: credential acquisition, caching and transparent refresh,
//!   with forced re-authentication on rejection (`session`)
//! - **Token sync**: pure document scanning plus wholesale overlay
//!   replacement, independent of the auth path (`scanner`, `overlay`)
//! - **Panels**: at most one live editing surface per remote diagram, driven
//!   by a strict request/response protocol (`panel`, `client`)
//!
//! The host editor is consumed through the traits in `host`; everything is
//! wired together by a single [`CompanionContext`] constructed at startup.
//!
//! # Example
//!
//! ```ignore
//! use mermaid_companion::{CompanionContext, Settings};
//!
//! #[tokio::main]
//! async fn main() -> mermaid_companion::Result<()> {
//!     let settings = Settings::load()?;
//!     let ctx = CompanionContext::with_http(settings, identity)?;
//!
//!     // Scan the active document and refresh the overlay
//!     let references = ctx.on_document_change(&editor, &document_text);
//!
//!     // Talk to the remote API; re-auth on rejection is transparent
//!     let projects = ctx.client.list_projects().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod host;
pub mod overlay;
pub mod panel;
pub mod scanner;
pub mod session;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::DiagramClient;
pub use config::Settings;
pub use context::CompanionContext;
pub use error::{CompanionError, Result};
pub use events::{EventEmitter, Subscription};
pub use overlay::OverlayController;
pub use panel::{PanelController, PanelRegistry, PanelRequest, PanelResponse};
pub use session::{AuthState, CredentialStore, SessionManager};
pub use types::{
    Credential, Diagram, DiagramReference, DiagramTheme, DocumentId, Project, User,
};
