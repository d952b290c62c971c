//! User-facing command boundary
//!
//! Commands are the outermost callers of the core: they catch every error,
//! convert it to a host notification, and never let a failure escape into
//! the host process. Anything below this boundary propagates errors
//! normally.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::context::CompanionContext;
use crate::host::{HostEditor, HostShell};
use crate::panel::{image_data_url, PanelController, PanelSurface};
use crate::scanner;
use crate::types::{DiagramTheme, DocumentId};

/// Fetch the themed rendering of a diagram and return a self-contained HTML
/// page for the host to display. `None` means the failure was already
/// reported to the user.
pub async fn view_diagram(
    ctx: &CompanionContext,
    shell: &dyn HostShell,
    document_id: &DocumentId,
    theme: DiagramTheme,
) -> Option<String> {
    let result = async {
        let diagram = ctx.client.get_document(document_id).await?;
        let svg = ctx.client.get_rendered_output(&diagram, theme).await?;
        Ok::<_, crate::error::CompanionError>(view_page(&image_data_url(&svg)))
    }
    .await;

    match result {
        Ok(page) => Some(page),
        Err(e) => {
            warn!("view failed for {}: {}", document_id, e);
            shell.notify_error("Failed to load diagram");
            None
        }
    }
}

/// Open the hosted diagram editor for a document in the external browser
pub async fn edit_diagram(ctx: &CompanionContext, shell: &dyn HostShell, document_id: &DocumentId) {
    let result = async {
        let diagram = ctx.client.get_document(document_id).await?;
        ctx.client.get_edit_url(&diagram).await
    }
    .await;

    match result {
        Ok(url) => shell.open_external(&url),
        Err(e) => {
            warn!("edit failed for {}: {}", document_id, e);
            shell.notify_error("Failed to open diagram editor");
        }
    }
}

/// Insert a diagram reference comment at the given line of the active editor
pub fn insert_reference(editor: &dyn HostEditor, line: u32, id: &Uuid) {
    let comment = scanner::comment_line_for(&editor.language_id(), id);
    editor.insert_line(line, &comment);
}

/// Delete a diagram after a blocking confirmation, then signal list views
pub async fn delete_diagram(
    ctx: &CompanionContext,
    shell: &dyn HostShell,
    document_id: &DocumentId,
    title: &str,
) {
    let prompt = format!("Are you sure you want to delete the item: {}?", title);
    if !shell.confirm(&prompt) {
        return;
    }

    match ctx.client.delete_document(document_id).await {
        Ok(()) => {
            shell.notify_info("Item deleted successfully.");
            ctx.refresh.emit(document_id);
        }
        Err(e) => {
            warn!("delete failed for {}: {}", document_id, e);
            shell.notify_error("Failed to delete item, please try again");
        }
    }
}

/// Open (or reveal) the editing panel for an existing diagram
pub async fn open_diagram_panel(
    ctx: &CompanionContext,
    shell: Arc<dyn HostShell>,
    document_id: &DocumentId,
    theme: DiagramTheme,
    surface_factory: impl FnOnce() -> Arc<dyn PanelSurface>,
) -> Option<Arc<PanelController>> {
    let diagram = match ctx.client.get_document(document_id).await {
        Ok(diagram) => diagram,
        Err(e) => {
            warn!("open panel failed for {}: {}", document_id, e);
            shell.notify_error("Failed to load diagram");
            return None;
        }
    };

    let controller = ctx.panels.open_or_reveal(*document_id, || {
        Arc::new(PanelController::new(
            diagram,
            Arc::clone(&ctx.client),
            surface_factory(),
            shell,
            ctx.refresh.clone(),
            theme,
        ))
    });
    Some(controller)
}

/// Create an empty diagram in a project and open its editing panel
pub async fn create_diagram_panel(
    ctx: &CompanionContext,
    shell: Arc<dyn HostShell>,
    project_id: &str,
    theme: DiagramTheme,
    surface_factory: impl FnOnce() -> Arc<dyn PanelSurface>,
) -> Option<Arc<PanelController>> {
    let diagram = match ctx.client.create_document(project_id).await {
        Ok(diagram) => diagram,
        Err(e) => {
            warn!("create failed in project {}: {}", project_id, e);
            shell.notify_error("Failed to create diagram");
            return None;
        }
    };

    let document_id = diagram.document_id;
    let controller = ctx.panels.open_or_reveal(document_id, || {
        Arc::new(PanelController::new(
            diagram,
            Arc::clone(&ctx.client),
            surface_factory(),
            shell,
            ctx.refresh.clone(),
            theme,
        ))
    });
    Some(controller)
}

fn view_page(image_data_uri: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en" style="height: 100%;">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="height: 100%; margin: 0; padding: 0; overflow: hidden;">
    <iframe sandbox="allow-same-origin" src="{}" style="width: 100%; height: 100%; border: none;"></iframe>
</body>
</html>"#,
        image_data_uri
    )
}
