//! Authenticated session management
//!
//! [`CredentialStore`] holds the current access token and base endpoint; it
//! performs no network calls itself. [`SessionManager`] obtains sessions from
//! the host identity system, installs them into the store, and validates them
//! against the remote API. A rejected credential is transparently replaced
//! exactly once per rejection; a second consecutive rejection is fatal for
//! the attempt.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::error::{CompanionError, Result};
use crate::host::HostIdentity;
use crate::transport::{ApiRequest, ApiTransport, HttpMethod};
use crate::types::Credential;

/// Path of the lightweight authenticated probe used by `validate`
const VALIDATE_PATH: &str = "/rest-api/users/me";

struct StoreInner {
    token: Option<String>,
    endpoint: String,
}

/// Holder of the current credential; mutated only by [`SessionManager`]
///
/// Token and endpoint are independent: an endpoint change alone does not
/// invalidate the token.
pub struct CredentialStore {
    inner: Mutex<StoreInner>,
}

impl CredentialStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                token: None,
                endpoint: endpoint.into(),
            }),
        }
    }

    /// Current credential, if a token is installed
    pub fn credential(&self) -> Option<Credential> {
        let inner = self.inner.lock().expect("credential store poisoned");
        inner.token.as_ref().map(|token| Credential {
            token: token.clone(),
            endpoint: inner.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        self.inner
            .lock()
            .expect("credential store poisoned")
            .endpoint
            .clone()
    }

    pub fn install(&self, token: String) {
        self.inner.lock().expect("credential store poisoned").token = Some(token);
    }

    pub fn clear(&self) {
        self.inner.lock().expect("credential store poisoned").token = None;
    }

    /// Swap the endpoint, keeping any installed token
    pub fn set_endpoint(&self, endpoint: impl Into<String>) {
        self.inner
            .lock()
            .expect("credential store poisoned")
            .endpoint = endpoint.into();
    }
}

/// Session lifecycle states
///
/// `Failed` is terminal for the current attempt only; a subsequent
/// `ensure_session` starts fresh from `NoSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NoSession,
    Pending,
    Authenticated,
    Reauthenticating,
    Failed,
}

/// Orchestrates session acquisition, installation and validation
pub struct SessionManager {
    store: Arc<CredentialStore>,
    identity: Arc<dyn HostIdentity>,
    transport: Arc<dyn ApiTransport>,
    state: Mutex<AuthState>,
}

impl SessionManager {
    pub fn new(
        store: Arc<CredentialStore>,
        identity: Arc<dyn HostIdentity>,
        transport: Arc<dyn ApiTransport>,
    ) -> Self {
        Self {
            store,
            identity,
            transport,
            state: Mutex::new(AuthState::NoSession),
        }
    }

    pub fn state(&self) -> AuthState {
        *self.state.lock().expect("session state poisoned")
    }

    fn set_state(&self, state: AuthState) {
        *self.state.lock().expect("session state poisoned") = state;
    }

    /// Return the cached credential, acquiring and installing one if absent
    pub async fn ensure_session(&self) -> Result<Credential> {
        if let Some(credential) = self.store.credential() {
            return Ok(credential);
        }

        self.set_state(AuthState::Pending);
        let token = match self.identity.acquire_session(false).await {
            Ok(token) => token,
            Err(e) => {
                self.set_state(AuthState::NoSession);
                return Err(e);
            }
        };
        self.store.install(token.clone());
        self.set_state(AuthState::Authenticated);
        info!("session installed");

        Ok(Credential {
            token,
            endpoint: self.store.endpoint(),
        })
    }

    /// Validate the current credential with a lightweight authenticated call.
    ///
    /// On rejection the credential is cleared and a forced session is
    /// acquired and re-checked, once. A second consecutive rejection clears
    /// the store, marks the attempt `Failed` and surfaces
    /// [`CompanionError::Authorization`].
    pub async fn validate(&self) -> Result<()> {
        let credential = self.ensure_session().await?;
        if !self.probe(&credential).await?.is_unauthorized() {
            self.set_state(AuthState::Authenticated);
            return Ok(());
        }

        warn!("credential rejected, forcing re-authentication");
        let credential = self.reauthenticate().await?;
        if self.probe(&credential).await?.is_unauthorized() {
            self.store.clear();
            self.set_state(AuthState::Failed);
            return Err(CompanionError::Authorization);
        }

        self.set_state(AuthState::Authenticated);
        Ok(())
    }

    /// Discard the rejected credential and install a forced fresh session
    async fn reauthenticate(&self) -> Result<Credential> {
        self.set_state(AuthState::Reauthenticating);
        self.store.clear();

        let token = match self.identity.acquire_session(true).await {
            Ok(token) => token,
            Err(e) => {
                self.set_state(AuthState::Failed);
                return Err(e);
            }
        };
        self.store.install(token.clone());
        info!("forced session installed");

        Ok(Credential {
            token,
            endpoint: self.store.endpoint(),
        })
    }

    async fn probe(&self, credential: &Credential) -> Result<crate::transport::ApiResponse> {
        self.transport
            .execute(ApiRequest {
                method: HttpMethod::Get,
                url: format!("{}{}", credential.endpoint, VALIDATE_PATH),
                token: Some(credential.token.clone()),
                body: None,
            })
            .await
    }

    /// The host reported that sessions for this provider changed
    /// (user-initiated sign-out/sign-in elsewhere)
    pub async fn on_external_session_change(&self) -> Result<()> {
        debug!("external session change, revalidating");
        self.validate().await
    }

    /// The configured endpoint changed; the token stays installed
    pub fn on_endpoint_config_change(&self, endpoint: &str) {
        debug!("endpoint changed to {}", endpoint);
        self.store.set_endpoint(endpoint);
    }
}
