//! Typed façade over the Mermaid Chart remote API
//!
//! Every operation attaches the current credential from the store. On an
//! authorization-rejected response the client delegates to
//! [`SessionManager::validate`] and retries the single failed operation
//! exactly once with the refreshed credential; a second rejection propagates
//! as [`CompanionError::Authorization`]. Non-auth failures propagate as
//! distinct error kinds without retry; generic backoff is out of scope.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::error::{CompanionError, Result};
use crate::session::SessionManager;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport, HttpMethod};
use crate::types::{Diagram, DiagramTheme, DocumentId, Project, User};

pub struct DiagramClient {
    session: Arc<SessionManager>,
    transport: Arc<dyn ApiTransport>,
}

impl DiagramClient {
    pub fn new(session: Arc<SessionManager>, transport: Arc<dyn ApiTransport>) -> Self {
        Self { session, transport }
    }

    /// The authenticated user (also the session validation probe target)
    pub async fn get_user(&self) -> Result<User> {
        self.send_authorized(HttpMethod::Get, "/rest-api/users/me", None)
            .await?
            .json()
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.send_authorized(HttpMethod::Get, "/rest-api/projects", None)
            .await?
            .json()
    }

    pub async fn list_documents(&self, project_id: &str) -> Result<Vec<Diagram>> {
        let path = format!("/rest-api/projects/{}/documents", project_id);
        self.send_authorized(HttpMethod::Get, &path, None)
            .await?
            .json()
    }

    pub async fn get_document(&self, document_id: &DocumentId) -> Result<Diagram> {
        let path = format!("/rest-api/documents/{}", document_id);
        self.send_authorized(HttpMethod::Get, &path, None)
            .await?
            .json()
    }

    /// Create an empty diagram document in a project
    pub async fn create_document(&self, project_id: &str) -> Result<Diagram> {
        let path = format!("/rest-api/projects/{}/documents", project_id);
        self.send_authorized(HttpMethod::Post, &path, None)
            .await?
            .json()
    }

    /// Replace the server copy of a diagram with this one
    pub async fn update_document(&self, diagram: &Diagram) -> Result<()> {
        let path = format!("/rest-api/documents/{}", diagram.document_id);
        let body = serde_json::to_value(diagram)?;
        self.send_authorized(HttpMethod::Put, &path, Some(body))
            .await?;
        Ok(())
    }

    pub async fn delete_document(&self, document_id: &DocumentId) -> Result<()> {
        let path = format!("/rest-api/documents/{}", document_id);
        self.send_authorized(HttpMethod::Delete, &path, None)
            .await?;
        Ok(())
    }

    /// Rendered SVG for a theme.
    ///
    /// Served from the diagram's own rendered outputs when the server already
    /// included them, otherwise fetched from the raw render endpoint.
    pub async fn get_rendered_output(
        &self,
        diagram: &Diagram,
        theme: DiagramTheme,
    ) -> Result<String> {
        if let Some(svg) = diagram.svg_for(theme) {
            return Ok(svg.to_string());
        }
        let path = format!(
            "/raw/{}?version={}&theme={}&format=svg",
            diagram.document_id,
            diagram.version(),
            theme.as_str()
        );
        Ok(self
            .send_authorized(HttpMethod::Get, &path, None)
            .await?
            .body)
    }

    /// Browser URL of the hosted diagram editor for this document
    pub async fn get_edit_url(&self, diagram: &Diagram) -> Result<String> {
        let credential = self.session.ensure_session().await?;
        Ok(format!(
            "{}/app/projects/{}/diagrams/{}/version/{}/edit",
            credential.endpoint,
            diagram.project_id,
            diagram.document_id,
            diagram.version()
        ))
    }

    async fn send(&self, method: HttpMethod, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        let credential = self.session.ensure_session().await?;
        self.transport
            .execute(ApiRequest {
                method,
                url: format!("{}{}", credential.endpoint, path),
                token: Some(credential.token),
                body,
            })
            .await
    }

    /// The single retry-after-reauthentication path shared by every operation
    async fn send_authorized(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse> {
        let response = self.send(method, path, body.clone()).await?;
        if !response.is_unauthorized() {
            return check(response, path);
        }

        warn!("authorization rejected for {}, revalidating session", path);
        self.session.validate().await?;

        let retried = self.send(method, path, body).await?;
        if retried.is_unauthorized() {
            return Err(CompanionError::Authorization);
        }
        check(retried, path)
    }
}

/// Map non-auth HTTP failures to their error kinds
fn check(response: ApiResponse, path: &str) -> Result<ApiResponse> {
    match response.status {
        status if (200..300).contains(&status) => Ok(response),
        404 => Err(CompanionError::NotFound(path.to_string())),
        400 | 422 => Err(CompanionError::Validation(format!(
            "{}: {}",
            path, response.body
        ))),
        401 => Err(CompanionError::Authorization),
        status => Err(CompanionError::Network(format!(
            "{} returned status {}",
            path, status
        ))),
    }
}
