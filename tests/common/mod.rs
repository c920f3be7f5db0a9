// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test fixtures: in-memory identity and profile fakes wired
//! into the real router.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

use learnsphere::config::Config;
use learnsphere::models::UserProfile;
use learnsphere::routes::create_router;
use learnsphere::services::{CatalogService, TutorService};
use learnsphere::session::{
    CredentialError, Identity, IdentityChange, IdentityEvents, IdentityProvider, ProfileStore,
    Session, SessionError, SessionManager, StoreError,
};
use learnsphere::AppState;

/// The shipped catalog, compiled in so HTTP tests run over real data.
#[allow(dead_code)]
pub const CATALOG_JSON: &str = include_str!("../../data/catalog.json");

/// Check if the Firestore emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

// ─── Identity Provider Fake ──────────────────────────────────

struct FakeAccount {
    password: String,
    identity: Identity,
}

/// In-memory identity provider with a seedable account table.
pub struct FakeIdentity {
    events: IdentityEvents,
    accounts: Mutex<HashMap<String, FakeAccount>>,
    next_uid: AtomicU32,
    /// When set, `end_session` fails without emitting anything.
    pub fail_end_session: AtomicBool,
}

#[allow(dead_code)]
impl FakeIdentity {
    pub fn new() -> Self {
        Self {
            events: IdentityEvents::new(),
            accounts: Mutex::new(HashMap::new()),
            next_uid: AtomicU32::new(1),
            fail_end_session: AtomicBool::new(false),
        }
    }

    /// Seed an account without emitting a notification.
    pub fn seed_account(&self, email: &str, password: &str, display_name: &str) -> Identity {
        let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::SeqCst));
        let identity = Identity {
            uid,
            email: Some(email.to_string()),
            display_name: Some(display_name.to_string()),
        };
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            FakeAccount {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );
        identity
    }

    /// Emit a notification directly, as the restore path would.
    pub fn emit(&self, change: IdentityChange) {
        self.events.emit(change);
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Identity, CredentialError> {
        if !email.contains('@') {
            return Err(CredentialError::InvalidEmail);
        }
        if password.chars().count() < 6 {
            return Err(CredentialError::WeakPassword(
                "Password should be at least 6 characters".to_string(),
            ));
        }

        let identity = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(CredentialError::EmailInUse);
            }
            let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::SeqCst));
            let identity = Identity {
                uid,
                email: Some(email.to_string()),
                display_name: Some(display_name.to_string()),
            };
            accounts.insert(
                email.to_string(),
                FakeAccount {
                    password: password.to_string(),
                    identity: identity.clone(),
                },
            );
            identity
        };

        self.events.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, CredentialError> {
        let identity = {
            let accounts = self.accounts.lock().unwrap();
            let account = accounts
                .get(email)
                .ok_or(CredentialError::InvalidCredentials)?;
            if account.password != password {
                return Err(CredentialError::InvalidCredentials);
            }
            account.identity.clone()
        };

        self.events.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn end_session(&self) -> Result<(), SessionError> {
        if self.fail_end_session.load(Ordering::SeqCst) {
            return Err(SessionError::Unconfirmed("injected failure".to_string()));
        }
        self.events.emit(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), CredentialError> {
        if self.accounts.lock().unwrap().contains_key(email) {
            Ok(())
        } else {
            Err(CredentialError::UnknownEmail)
        }
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<IdentityChange> {
        self.events.subscribe()
    }
}

// ─── Profile Store Fake ──────────────────────────────────────

/// In-memory profile store. Reads can be held open per uid to control
/// fetch completion order.
pub struct MemoryProfiles {
    records: Mutex<HashMap<String, UserProfile>>,
    holds: Mutex<HashMap<String, Arc<Semaphore>>>,
    /// When set, reads fail after any hold clears.
    pub fail_reads: AtomicBool,
}

#[allow(dead_code)]
impl MemoryProfiles {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            holds: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn seed_profile(&self, profile: UserProfile) {
        self.records
            .lock()
            .unwrap()
            .insert(profile.uid.clone(), profile);
    }

    /// Block reads for `uid` until the returned gate gets a permit
    /// (`gate.add_permits(1)` releases them).
    pub fn hold_reads(&self, uid: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.holds
            .lock()
            .unwrap()
            .insert(uid.to_string(), gate.clone());
        gate
    }

    pub fn stored(&self, uid: &str) -> Option<UserProfile> {
        self.records.lock().unwrap().get(uid).cloned()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn write_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(profile.uid.clone(), profile.clone());
        Ok(())
    }

    async fn read_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        let gate = self.holds.lock().unwrap().get(uid).cloned();
        if let Some(gate) = gate {
            let _ = gate.acquire().await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected read failure".to_string()));
        }
        Ok(self.records.lock().unwrap().get(uid).cloned())
    }
}

// ─── App Fixture ─────────────────────────────────────────────

/// A complete app over in-memory fakes, plus handles to drive them.
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub provider: Arc<FakeIdentity>,
    pub store: Arc<MemoryProfiles>,
}

/// Create a test app. The session starts initializing; emit a
/// notification (or sign in) to move it on.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let provider = Arc::new(FakeIdentity::new());
    let store = Arc::new(MemoryProfiles::new());
    let session = SessionManager::spawn(
        provider.clone() as Arc<dyn IdentityProvider>,
        store.clone() as Arc<dyn ProfileStore>,
    );
    let catalog = CatalogService::load_from_json(CATALOG_JSON).expect("catalog fixture");

    let state = Arc::new(AppState {
        config: Config::default(),
        session,
        store: store.clone() as Arc<dyn ProfileStore>,
        catalog,
        tutor: TutorService::new(),
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        provider,
        store,
    }
}

/// Wait (bounded) until the published session satisfies `pred`.
#[allow(dead_code)]
pub async fn wait_until<F>(session: &SessionManager, mut pred: F)
where
    F: FnMut(&Session) -> bool,
{
    let mut rx = session.subscribe();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let current = rx.borrow_and_update();
                if pred(&current) {
                    return;
                }
            }
            if rx.changed().await.is_err() {
                panic!("session channel closed");
            }
        }
    })
    .await
    .expect("session did not reach the expected state in time");
}

/// Deserialize a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("parse body")
}
