// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile store seam.

use async_trait::async_trait;

use crate::models::UserProfile;

/// Persistence for user profile records. Production is Firestore;
/// tests substitute an in-memory map.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Writes (creates or replaces) the record keyed by its uid.
    async fn write_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    /// Reads the record for `uid`. A missing record is a normal
    /// outcome (`Ok(None)`), not an error.
    async fn read_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError>;
}

/// Profile read/write failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("profile store not connected (offline mode)")]
    Offline,

    #[error("profile store error: {0}")]
    Backend(String),
}
