// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state machine.
//!
//! One [`SessionManager`] exists per process. It subscribes to the
//! identity provider's notification stream, reconciles every
//! notification into a [`Session`] snapshot, and publishes snapshots
//! over a watch channel for the HTTP layer to read.

pub mod manager;
pub mod provider;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

pub use manager::{RegisterError, SessionManager};
pub use provider::{CredentialError, IdentityChange, IdentityEvents, IdentityProvider, SessionError};
pub use store::{ProfileStore, StoreError};

/// Authenticated principal as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned stable user ID
    pub uid: String,
    /// Email address, when the provider shares it
    pub email: Option<String>,
    /// Display name attached to the account
    pub display_name: Option<String>,
}

/// Profile sub-state while authenticated.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileState {
    /// A fetch for the current identity is in flight.
    Loading,
    /// The profile record was fetched.
    Ready(UserProfile),
    /// The fetch failed or found no record. The session stays
    /// authenticated without a usable profile.
    Unavailable,
}

/// Point-in-time view of the session, published on every transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    /// Startup, before the provider's first notification.
    Initializing,
    /// No identity.
    Anonymous,
    /// Signed in, with a profile sub-state.
    Authenticated {
        identity: Identity,
        profile: ProfileState,
    },
}

impl Session {
    /// True only before the first notification has been reconciled.
    pub fn loading(&self) -> bool {
        matches!(self, Session::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    /// The signed-in identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }

    /// The loaded profile. Present only when authenticated with the
    /// profile sub-state ready, so a profile always implies an identity.
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Session::Authenticated {
                profile: ProfileState::Ready(profile),
                ..
            } => Some(profile),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_only_while_initializing() {
        assert!(Session::Initializing.loading());
        assert!(!Session::Anonymous.loading());
        let session = Session::Authenticated {
            identity: Identity {
                uid: "u1".into(),
                email: None,
                display_name: None,
            },
            profile: ProfileState::Loading,
        };
        assert!(!session.loading());
    }

    #[test]
    fn test_profile_requires_ready_substate() {
        let identity = Identity {
            uid: "u1".into(),
            email: None,
            display_name: None,
        };
        let loading = Session::Authenticated {
            identity: identity.clone(),
            profile: ProfileState::Loading,
        };
        assert!(loading.profile().is_none());
        assert!(loading.identity().is_some());

        let unavailable = Session::Authenticated {
            identity,
            profile: ProfileState::Unavailable,
        };
        assert!(unavailable.profile().is_none());
        assert!(unavailable.is_authenticated());
    }
}
