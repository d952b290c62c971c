//! Command-boundary behavior: confirmations, notifications, and the rule
//! that errors never escape a command.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{diagram_json, test_context, test_diagram, CountingIdentity, RecordingShell, ScriptedTransport};
use mermaid_companion::commands;
use mermaid_companion::{DiagramTheme, DocumentId};

#[tokio::test]
async fn delete_requires_confirmation() {
    let transport = Arc::new(ScriptedTransport::new());
    let ctx = test_context(Arc::new(CountingIdentity::new()), Arc::clone(&transport));
    let shell = RecordingShell::new(false);

    commands::delete_diagram(&ctx, &shell, &DocumentId::new(), "Flow").await;

    // Declined: no network call, no notification
    assert!(transport.requests().is_empty());
    assert!(shell.infos.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_notifies_and_signals_views_on_success() {
    let transport = Arc::new(ScriptedTransport::new());
    let ctx = test_context(Arc::new(CountingIdentity::new()), Arc::clone(&transport));
    let shell = RecordingShell::new(true);
    transport.push_status(204, "");

    let refreshes = Arc::new(AtomicUsize::new(0));
    let signals = Arc::clone(&refreshes);
    let _subscription = ctx.refresh.subscribe(move |_| {
        signals.fetch_add(1, Ordering::SeqCst);
    });

    commands::delete_diagram(&ctx, &shell, &DocumentId::new(), "Flow").await;

    assert_eq!(
        shell.infos.lock().unwrap().as_slice(),
        ["Item deleted successfully."]
    );
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn delete_failure_becomes_a_notification_not_a_panic() {
    let transport = Arc::new(ScriptedTransport::new());
    let ctx = test_context(Arc::new(CountingIdentity::new()), Arc::clone(&transport));
    let shell = RecordingShell::new(true);
    transport.push_status(404, "");

    commands::delete_diagram(&ctx, &shell, &DocumentId::new(), "Flow").await;

    assert_eq!(
        shell.errors.lock().unwrap().as_slice(),
        ["Failed to delete item, please try again"]
    );
}

#[tokio::test]
async fn edit_opens_the_hosted_editor_url() {
    let transport = Arc::new(ScriptedTransport::new());
    let ctx = test_context(Arc::new(CountingIdentity::new()), Arc::clone(&transport));
    let shell = RecordingShell::new(true);

    let document_id = DocumentId::new();
    transport.push_status(200, &diagram_json(&test_diagram(document_id)));

    commands::edit_diagram(&ctx, &shell, &document_id).await;

    let opened = shell.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(
        opened[0],
        format!(
            "https://companion.invalid/app/projects/proj-1/diagrams/{}/version/v0.1/edit",
            document_id
        )
    );
}

#[tokio::test]
async fn view_returns_a_self_contained_page() {
    let transport = Arc::new(ScriptedTransport::new());
    let ctx = test_context(Arc::new(CountingIdentity::new()), Arc::clone(&transport));
    let shell = RecordingShell::new(true);

    let document_id = DocumentId::new();
    // The fixture carries a dark SVG, so no render round-trip is needed
    transport.push_status(200, &diagram_json(&test_diagram(document_id)));

    let page = commands::view_diagram(&ctx, &shell, &document_id, DiagramTheme::Dark)
        .await
        .expect("view page");
    assert!(page.contains("data:image/svg+xml;base64,"));
    assert_eq!(transport.requests_to("/rest-api/documents/"), 1);
}

#[tokio::test]
async fn open_diagram_panel_reveals_instead_of_duplicating() {
    let transport = Arc::new(ScriptedTransport::new());
    let ctx = test_context(Arc::new(CountingIdentity::new()), Arc::clone(&transport));
    let shell = Arc::new(RecordingShell::new(true));
    let surface = Arc::new(common::FakeSurface::new());

    let document_id = DocumentId::new();
    transport.push_status(200, &diagram_json(&test_diagram(document_id)));
    transport.push_status(200, &diagram_json(&test_diagram(document_id)));

    let surface_a: Arc<dyn mermaid_companion::panel::PanelSurface> =
        Arc::clone(&surface) as Arc<dyn mermaid_companion::panel::PanelSurface>;
    let first = commands::open_diagram_panel(
        &ctx,
        Arc::clone(&shell) as Arc<dyn mermaid_companion::host::HostShell>,
        &document_id,
        DiagramTheme::Dark,
        move || surface_a,
    )
    .await
    .expect("panel opened");

    let surface_b: Arc<dyn mermaid_companion::panel::PanelSurface> =
        Arc::clone(&surface) as Arc<dyn mermaid_companion::panel::PanelSurface>;
    let second = commands::open_diagram_panel(
        &ctx,
        Arc::clone(&shell) as Arc<dyn mermaid_companion::host::HostShell>,
        &document_id,
        DiagramTheme::Dark,
        move || surface_b,
    )
    .await
    .expect("panel revealed");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(ctx.panels.len(), 1);
}

#[tokio::test]
async fn view_failure_is_reported_to_the_user() {
    let transport = Arc::new(ScriptedTransport::new());
    let ctx = test_context(Arc::new(CountingIdentity::new()), Arc::clone(&transport));
    let shell = RecordingShell::new(true);
    transport.push_network_error("connection reset");

    let page = commands::view_diagram(&ctx, &shell, &DocumentId::new(), DiagramTheme::Dark).await;
    assert!(page.is_none());
    assert_eq!(
        shell.errors.lock().unwrap().as_slice(),
        ["Failed to load diagram"]
    );
}
