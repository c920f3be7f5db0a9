// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider seam.
//!
//! The [`SessionManager`](super::SessionManager) talks to whatever
//! backs authentication through this trait. Production uses the
//! Firebase Auth REST client; tests substitute an in-memory fake.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::Identity;

/// One notification on the identity stream: `Some` on sign-in (or a
/// restored session), `None` on sign-out.
pub type IdentityChange = Option<Identity>;

/// Authentication backend.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and signs it in. Attaches the display name
    /// to the provider account. Emits a notification on success.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, CredentialError>;

    /// Verifies credentials and signs in. Emits a notification on
    /// success; on failure nothing is emitted and the current session
    /// (if any) is untouched.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, CredentialError>;

    /// Ends the current session. Emits a `None` notification only
    /// after termination is confirmed; on error nothing changes.
    async fn end_session(&self) -> Result<(), SessionError>;

    /// Asks the provider to send a password-reset message.
    async fn send_password_reset(&self, email: &str) -> Result<(), CredentialError>;

    /// Subscribes to identity notifications. Notifications are
    /// delivered in order, and the current value (once known) is
    /// replayed to late subscribers.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<IdentityChange>;
}

/// Rejected account input or an unreachable provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("email is already registered")]
    EmailInUse,

    #[error("email address is malformed")]
    InvalidEmail,

    #[error("password rejected by provider policy: {0}")]
    WeakPassword(String),

    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("no account exists for this email")]
    UnknownEmail,

    #[error("account is disabled")]
    Disabled,

    #[error("too many attempts, try again later")]
    RateLimited,

    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Sign-out could not be confirmed. The session is left intact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("sign-out not confirmed: {0}")]
    Unconfirmed(String),
}

/// Fan-out for identity notifications.
///
/// Providers hold one of these and call [`emit`](Self::emit) on every
/// identity change. Each subscriber gets its own ordered channel, and
/// the most recent value is replayed on subscribe so a late subscriber
/// still observes the current identity.
#[derive(Default)]
pub struct IdentityEvents {
    inner: Mutex<EventsInner>,
}

#[derive(Default)]
struct EventsInner {
    subscribers: Vec<mpsc::UnboundedSender<IdentityChange>>,
    last: Option<IdentityChange>,
}

impl IdentityEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<IdentityChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap();
        if let Some(last) = &inner.last {
            let _ = tx.send(last.clone());
        }
        inner.subscribers.push(tx);
        rx
    }

    pub fn emit(&self, change: IdentityChange) {
        let mut inner = self.inner.lock().unwrap();
        inner.last = Some(change.clone());
        inner
            .subscribers
            .retain(|tx| tx.send(change.clone()).is_ok());
    }
}
