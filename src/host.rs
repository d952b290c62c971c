//! Host collaborator traits
//!
//! The surrounding editor is an external collaborator: the core consumes
//! "acquire a session", "replace the highlight overlay", "show a modal
//! confirmation" and the like through these traits, and never assumes a
//! particular UI framework behind them.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::DiagramReference;

/// The host identity system that mints access tokens
///
/// Acquisition may suspend for an externally-bounded duration while the host
/// walks the user through an interactive flow; the host is expected to
/// surface its own progress UI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostIdentity: Send + Sync {
    /// Acquire an access token.
    ///
    /// With `force_new` set, any silently cached session on the host side is
    /// bypassed and a fresh interactive flow is started. Without it, the host
    /// may serve a cached session, creating one only if none exists.
    async fn acquire_session(&self, force_new: bool) -> Result<String>;
}

/// One open text editor surface in the host
pub trait HostEditor: Send + Sync {
    /// Declared language of the open document (`"markdown"`, `"python"`, ...)
    fn language_id(&self) -> String;

    /// Replace the full set of token highlight ranges
    fn set_token_highlights(&self, references: &[DiagramReference]);

    /// Replace the full set of inline actionable affordances, one per token
    fn set_inline_actions(&self, references: &[DiagramReference]);

    /// Insert a line of text at the start of the given zero-based line
    fn insert_line(&self, line: u32, text: &str);
}

/// Host-level chrome: modals, notifications, external URLs
pub trait HostShell: Send + Sync {
    /// Blocking yes/no confirmation; returns true when the user accepts
    fn confirm(&self, message: &str) -> bool;

    /// Open a URL in the user's external browser
    fn open_external(&self, url: &str);

    fn notify_info(&self, message: &str);

    fn notify_error(&self, message: &str);
}
