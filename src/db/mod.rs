//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreProfiles;

/// Collection names as constants.
pub mod collections {
    /// User profile documents (keyed by uid)
    pub const USERS: &str = "users";
}
