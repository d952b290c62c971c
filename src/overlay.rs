//! Highlight and inline-action overlay
//!
//! Keeps the visible overlay equal to `render(references)` after every call:
//! both the highlight set and the inline-action set are replaced wholesale,
//! with no diffing against the previous state. Triggered on active-document
//! switch and on document mutation; every trigger is a full rescan. The cost
//! is O(document size) per keystroke, accepted for simplicity (see
//! DESIGN.md).

use tracing::debug;

use crate::host::HostEditor;
use crate::scanner;
use crate::types::DiagramReference;

/// Replaces the overlay of one editor surface from the latest scan result
#[derive(Debug, Default)]
pub struct OverlayController;

impl OverlayController {
    pub fn new() -> Self {
        Self
    }

    /// Replace the full highlight and inline-action sets atomically.
    ///
    /// Idempotent: applying the same references twice produces the same
    /// visible state.
    pub fn apply(&self, editor: &dyn HostEditor, references: &[DiagramReference]) {
        editor.set_token_highlights(references);
        editor.set_inline_actions(references);
    }

    /// Full rescan-and-reapply for the active document.
    ///
    /// Independent of the auth path; a stalled network call never blocks
    /// this. Returns the scan result so callers can reuse it.
    pub fn refresh(&self, editor: &dyn HostEditor, document_text: &str) -> Vec<DiagramReference> {
        let references = scanner::scan(document_text);
        debug!("overlay refresh: {} reference(s)", references.len());
        self.apply(editor, &references);
        references
    }
}
