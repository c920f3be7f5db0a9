// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session manager: reconciles identity notifications into published
//! session snapshots and exposes the account operations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use crate::models::UserProfile;

use super::provider::{CredentialError, IdentityChange, IdentityProvider, SessionError};
use super::store::{ProfileStore, StoreError};
use super::{Identity, ProfileState, Session};

/// Bound on how long an operation waits for its transition to appear
/// in the published snapshot.
const CONVERGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Registration failure. `ProfileWrite` means the account exists and
/// is signed in, but the default record could not be stored; the
/// session is then authenticated with the profile unavailable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("account created but profile write failed: {0}")]
    ProfileWrite(#[from] StoreError),
}

/// Result of one profile fetch.
#[derive(Debug, Clone)]
enum FetchOutcome {
    Loaded(UserProfile),
    Missing,
    Failed(StoreError),
}

enum Command {
    /// Fetch a profile without touching the identity. Used by register
    /// (reload after the default write) and the profile routes.
    LoadProfile {
        uid: String,
        reply: Option<oneshot::Sender<FetchOutcome>>,
    },
    /// A fetch finished. Applied under stale-result suppression; the
    /// reply (if any) fires after the snapshot is updated.
    FetchResolved {
        generation: u64,
        uid: String,
        outcome: FetchOutcome,
        reply: Option<oneshot::Sender<FetchOutcome>>,
    },
}

/// Handle to the per-process session. Cheap to clone; all clones share
/// the single reconciliation task spawned by [`SessionManager::spawn`].
#[derive(Clone)]
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn ProfileStore>,
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<Session>,
}

impl SessionManager {
    /// Subscribes to the provider and spawns the reconciliation task.
    /// The snapshot starts `Initializing` and leaves it on the first
    /// notification, never to return.
    pub fn spawn(provider: Arc<dyn IdentityProvider>, store: Arc<dyn ProfileStore>) -> Self {
        let (publish, snapshot) = watch::channel(Session::Initializing);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let notifications = provider.subscribe();
        let reconciler = Reconciler {
            store: store.clone(),
            publish,
            internal: commands.clone(),
            session: Session::Initializing,
            generation: 0,
        };
        tokio::spawn(reconciler.run(notifications, command_rx));
        Self {
            provider,
            store,
            commands,
            snapshot,
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Session {
        self.snapshot.borrow().clone()
    }

    /// Subscription to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.snapshot.clone()
    }

    /// Creates an account, writes the default profile record, and
    /// resolves with the session authenticated and the fresh record
    /// loaded.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, RegisterError> {
        let identity = self
            .provider
            .create_account(email, password, display_name)
            .await?;
        self.converge_on(Some(&identity.uid)).await;
        let profile = UserProfile::with_defaults(&identity.uid, email, display_name);
        self.store.write_profile(&profile).await?;
        // The automatic fetch may have raced the write and missed the
        // record; load again so the session settles on the stored copy.
        if let Err(error) = self.load_profile(&identity.uid).await {
            tracing::warn!(uid = %identity.uid, error = %error, "profile reload after registration failed");
        }
        tracing::info!(uid = %identity.uid, "account registered");
        Ok(identity)
    }

    /// Signs in. On failure the session is left exactly as it was.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, CredentialError> {
        let identity = self.provider.verify_credentials(email, password).await?;
        self.converge_on(Some(&identity.uid)).await;
        tracing::info!(uid = %identity.uid, "signed in");
        Ok(identity)
    }

    /// Signs out. Local state is cleared only after the provider
    /// confirms; on error identity and profile stay in place.
    pub async fn terminate(&self) -> Result<(), SessionError> {
        self.provider.end_session().await?;
        self.converge_on(None).await;
        tracing::info!("signed out");
        Ok(())
    }

    /// Asks the provider to send a reset message. Never changes state.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), CredentialError> {
        self.provider.send_password_reset(email).await
    }

    /// Reads the profile for `uid` through the reconciliation task, so
    /// the snapshot picks the result up when it concerns the current
    /// identity. An explicit load does not flap the sub-state back to
    /// loading.
    pub async fn load_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::LoadProfile {
                uid: uid.to_string(),
                reply: Some(tx),
            })
            .map_err(|_| StoreError::Backend("session task stopped".to_string()))?;
        match rx.await {
            Ok(FetchOutcome::Loaded(profile)) => Ok(Some(profile)),
            Ok(FetchOutcome::Missing) => Ok(None),
            Ok(FetchOutcome::Failed(error)) => Err(error),
            Err(_) => Err(StoreError::Backend("session task stopped".to_string())),
        }
    }

    /// Waits (bounded) until the published snapshot carries the target
    /// identity, so operations return only once their transition is
    /// observable to every consumer.
    async fn converge_on(&self, target: Option<&str>) {
        let mut rx = self.snapshot.clone();
        let converged = tokio::time::timeout(CONVERGE_TIMEOUT, async {
            loop {
                let matched = {
                    let session = rx.borrow_and_update();
                    match (session.identity(), target) {
                        (None, None) => !session.loading(),
                        (Some(identity), Some(uid)) => identity.uid == uid,
                        _ => false,
                    }
                };
                if matched {
                    return;
                }
                if rx.changed().await.is_err() {
                    return;
                }
            }
        })
        .await;
        if converged.is_err() {
            tracing::warn!(?target, "session did not converge on expected identity");
        }
    }
}

/// State owned by the reconciliation task.
struct Reconciler {
    store: Arc<dyn ProfileStore>,
    publish: watch::Sender<Session>,
    internal: mpsc::UnboundedSender<Command>,
    session: Session,
    generation: u64,
}

impl Reconciler {
    async fn run(
        mut self,
        mut notifications: mpsc::UnboundedReceiver<IdentityChange>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        loop {
            tokio::select! {
                change = notifications.recv() => match change {
                    Some(change) => self.on_identity_change(change),
                    None => break,
                },
                command = commands.recv() => match command {
                    Some(command) => self.on_command(command),
                    None => break,
                },
            }
        }
        tracing::debug!("identity stream closed, session task exiting");
    }

    fn on_identity_change(&mut self, change: IdentityChange) {
        match change {
            None => {
                tracing::info!("identity cleared, session now anonymous");
                self.set(Session::Anonymous);
            }
            Some(identity) => {
                tracing::info!(uid = %identity.uid, "identity reported, loading profile");
                let uid = identity.uid.clone();
                self.set(Session::Authenticated {
                    identity,
                    profile: ProfileState::Loading,
                });
                self.start_fetch(uid, None);
            }
        }
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::LoadProfile { uid, reply } => self.start_fetch(uid, reply),
            Command::FetchResolved {
                generation,
                uid,
                outcome,
                reply,
            } => {
                self.apply_fetch(generation, &uid, outcome.clone());
                if let Some(reply) = reply {
                    let _ = reply.send(outcome);
                }
            }
        }
    }

    /// Starts an asynchronous fetch. Each start supersedes every
    /// earlier one; superseded results are discarded at apply time.
    fn start_fetch(&mut self, uid: String, reply: Option<oneshot::Sender<FetchOutcome>>) {
        self.generation += 1;
        let generation = self.generation;
        let store = self.store.clone();
        let results = self.internal.clone();
        tokio::spawn(async move {
            let outcome = match store.read_profile(&uid).await {
                Ok(Some(profile)) => FetchOutcome::Loaded(profile),
                Ok(None) => FetchOutcome::Missing,
                Err(error) => FetchOutcome::Failed(error),
            };
            let _ = results.send(Command::FetchResolved {
                generation,
                uid,
                outcome,
                reply,
            });
        });
    }

    /// Stale-result suppression: a result is applied only when it is
    /// the newest fetch and its uid still matches the current identity.
    fn apply_fetch(&mut self, generation: u64, uid: &str, outcome: FetchOutcome) {
        if generation != self.generation {
            tracing::debug!(uid, generation, current = self.generation, "discarding superseded profile result");
            return;
        }
        let Session::Authenticated { identity, .. } = &self.session else {
            tracing::debug!(uid, "discarding profile result, session not authenticated");
            return;
        };
        if identity.uid != uid {
            tracing::debug!(uid, current = %identity.uid, "discarding profile result for a different identity");
            return;
        }
        let identity = identity.clone();
        let profile = match outcome {
            FetchOutcome::Loaded(profile) => ProfileState::Ready(profile),
            FetchOutcome::Missing => {
                tracing::warn!(uid, "no profile record, session stays authenticated without one");
                ProfileState::Unavailable
            }
            FetchOutcome::Failed(error) => {
                tracing::warn!(uid, error = %error, "profile fetch failed, session stays authenticated without one");
                ProfileState::Unavailable
            }
        };
        self.set(Session::Authenticated { identity, profile });
    }

    fn set(&mut self, session: Session) {
        self.session = session.clone();
        self.publish.send_replace(session);
    }
}
