// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Auth REST client.
//!
//! Handles:
//! - Account creation and password sign-in
//! - Password reset messages
//! - Session persistence on disk and restore at startup
//! - Mapping provider error codes onto [`CredentialError`]

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::session::{
    CredentialError, Identity, IdentityChange, IdentityEvents, IdentityProvider, SessionError,
};

const IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Firebase Auth client implementing [`IdentityProvider`].
///
/// The client owns the device's single session: sign-in persists the
/// tokens to a JSON file so a restart can restore the session, and
/// every identity change is emitted on the notification stream.
pub struct FirebaseAuthClient {
    http: reqwest::Client,
    identity_url: String,
    api_key: String,
    session_file: PathBuf,
    events: IdentityEvents,
}

impl FirebaseAuthClient {
    /// Create a new client with the project's web API key.
    pub fn new(api_key: String, session_file: PathBuf) -> Self {
        Self {
            http: reqwest::Client::new(),
            identity_url: IDENTITY_BASE_URL.to_string(),
            api_key,
            session_file,
            events: IdentityEvents::new(),
        }
    }

    /// Restore the persisted session, if any, and emit the result.
    ///
    /// Exactly one notification is emitted: the restored identity, or
    /// `None` when nothing is persisted or the provider rejected the
    /// stored refresh token. A transient refresh failure keeps the
    /// persisted identity; the session simply has not been revalidated.
    pub async fn restore_session(&self) {
        let stored = match self.load_persisted().await {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                tracing::debug!("no persisted session");
                self.events.emit(None);
                return;
            }
            Err(error) => {
                tracing::warn!(error = %error, "failed to read persisted session");
                self.events.emit(None);
                return;
            }
        };

        match self.refresh(&stored.refresh_token).await {
            Ok(tokens) => {
                let renewed = PersistedSession {
                    identity: stored.identity.clone(),
                    id_token: tokens.id_token,
                    refresh_token: tokens.refresh_token,
                };
                if let Err(error) = self.persist(&renewed).await {
                    tracing::warn!(error = %error, "failed to persist renewed session");
                }
                tracing::info!(uid = %stored.identity.uid, "session restored");
                self.events.emit(Some(stored.identity));
            }
            Err(RefreshError::Rejected(reason)) => {
                tracing::info!(reason = %reason, "persisted session rejected, clearing");
                if let Err(error) = self.clear_persisted().await {
                    tracing::warn!(error = %error, "failed to clear rejected session");
                }
                self.events.emit(None);
            }
            Err(RefreshError::Transient(reason)) => {
                // Provider unreachable. Stay signed in from disk; the
                // profile fetch will surface any deeper problem.
                tracing::warn!(reason = %reason, "session refresh failed, keeping persisted identity");
                self.events.emit(Some(stored.identity));
            }
        }
    }

    /// Exchange a refresh token for fresh tokens.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .timeout(REQUEST_TIMEOUT)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| RefreshError::Transient(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| RefreshError::Transient(format!("JSON parse error: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            Err(RefreshError::Rejected(format!("HTTP {}: {}", status, body)))
        } else {
            Err(RefreshError::Transient(format!("HTTP {}: {}", status, body)))
        }
    }

    /// POST a JSON body to an identitytoolkit endpoint.
    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, CredentialError> {
        let url = format!("{}/{}", self.identity_url, endpoint);
        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| CredentialError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_api_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| CredentialError::Provider(format!("JSON parse error: {}", e)))
    }

    /// Persist tokens and emit the sign-in notification.
    async fn store_session(&self, identity: Identity, id_token: String, refresh_token: String) {
        let session = PersistedSession {
            identity: identity.clone(),
            id_token,
            refresh_token,
        };
        if let Err(error) = self.persist(&session).await {
            tracing::warn!(error = %error, "failed to persist session, sign-in will not survive a restart");
        }
        self.events.emit(Some(identity));
    }

    async fn persist(&self, session: &PersistedSession) -> anyhow::Result<()> {
        if let Some(parent) = self.session_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.session_file, json).await?;
        Ok(())
    }

    async fn load_persisted(&self) -> anyhow::Result<Option<PersistedSession>> {
        let bytes = match tokio::fs::read(&self.session_file).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn clear_persisted(&self) -> anyhow::Result<()> {
        match tokio::fs::remove_file(&self.session_file).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, CredentialError> {
        let auth: AuthResponse = self
            .post_json(
                "accounts:signUp",
                &serde_json::json!({
                    "email": email,
                    "password": password,
                    "displayName": display_name,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let identity = Identity {
            uid: auth.local_id,
            email: Some(auth.email.unwrap_or_else(|| email.to_string())),
            display_name: Some(display_name.to_string()),
        };
        tracing::info!(uid = %identity.uid, "account created");
        self.store_session(identity.clone(), auth.id_token, auth.refresh_token)
            .await;
        Ok(identity)
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, CredentialError> {
        let auth: AuthResponse = self
            .post_json(
                "accounts:signInWithPassword",
                &serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let identity = Identity {
            uid: auth.local_id,
            email: Some(auth.email.unwrap_or_else(|| email.to_string())),
            display_name: auth.display_name,
        };
        tracing::info!(uid = %identity.uid, "credentials verified");
        self.store_session(identity.clone(), auth.id_token, auth.refresh_token)
            .await;
        Ok(identity)
    }

    async fn end_session(&self) -> Result<(), SessionError> {
        // Non-optimistic: the notification goes out only once the
        // persisted credentials are confirmed gone.
        self.clear_persisted()
            .await
            .map_err(|e| SessionError::Unconfirmed(e.to_string()))?;
        self.events.emit(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), CredentialError> {
        let _: ResetResponse = self
            .post_json(
                "accounts:sendOobCode",
                &serde_json::json!({
                    "requestType": "PASSWORD_RESET",
                    "email": email,
                }),
            )
            .await?;
        tracing::info!("password reset message requested");
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<IdentityChange> {
        self.events.subscribe()
    }
}

/// Map an identitytoolkit error body onto [`CredentialError`].
///
/// Error messages look like `{"error": {"message": "EMAIL_EXISTS"}}`,
/// sometimes with a reason suffix (`"WEAK_PASSWORD : Password should
/// be at least 6 characters"`).
fn map_api_error(status: reqwest::StatusCode, body: &str) -> CredentialError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_default();

    match message.split_whitespace().next().unwrap_or("") {
        "EMAIL_EXISTS" => CredentialError::EmailInUse,
        "INVALID_EMAIL" | "MISSING_EMAIL" => CredentialError::InvalidEmail,
        "WEAK_PASSWORD" => CredentialError::WeakPassword(
            message
                .split(" : ")
                .nth(1)
                .unwrap_or("password rejected")
                .to_string(),
        ),
        "EMAIL_NOT_FOUND" => CredentialError::UnknownEmail,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => CredentialError::InvalidCredentials,
        "USER_DISABLED" => CredentialError::Disabled,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => CredentialError::RateLimited,
        _ => CredentialError::Provider(format!("HTTP {}: {}", status, body)),
    }
}

/// Session state persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    identity: Identity,
    id_token: String,
    refresh_token: String,
}

/// Refresh failure categories. Rejections clear the persisted session;
/// transient failures keep it.
enum RefreshError {
    Rejected(String),
    Transient(String),
}

/// Sign-up / sign-in response from identitytoolkit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
    email: Option<String>,
    display_name: Option<String>,
}

/// Response from `accounts:sendOobCode`.
#[derive(Debug, Clone, Deserialize)]
struct ResetResponse {
    #[allow(dead_code)]
    email: Option<String>,
}

/// Token refresh response from securetoken.
#[derive(Debug, Clone, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

/// Error body returned by both Google endpoints.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
