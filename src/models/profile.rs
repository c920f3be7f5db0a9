//! User profile model for storage and API.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Points awarded when a course is completed.
pub const COURSE_COMPLETION_POINTS: u32 = 100;

/// Points needed per level beyond the first.
pub const POINTS_PER_LEVEL: u32 = 250;

/// User profile document stored in Firestore (`users` collection,
/// document ID = uid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity provider uid (also used as document ID)
    pub uid: String,
    /// Email address
    pub email: String,
    /// Display name shown in the app
    pub display_name: String,
    /// When the account was created (RFC 3339)
    pub created_at: String,
    /// Accumulated learning points
    pub points: u32,
    /// Level derived from points
    pub level: u32,
    /// Earned badge identifiers
    #[serde(default)]
    pub badges: BTreeSet<String>,
    /// Course IDs the user is enrolled in
    #[serde(default)]
    pub enrolled_courses: BTreeSet<u32>,
    /// Course IDs the user has completed
    #[serde(default)]
    pub completed_courses: BTreeSet<u32>,
    /// UI and notification preferences
    #[serde(default)]
    pub preferences: Preferences,
}

impl UserProfile {
    /// Default record written when an account is registered.
    pub fn with_defaults(uid: &str, email: &str, display_name: &str) -> Self {
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            points: 0,
            level: 1,
            badges: BTreeSet::new(),
            enrolled_courses: BTreeSet::new(),
            completed_courses: BTreeSet::new(),
            preferences: Preferences::default(),
        }
    }

    /// Adds a course to the enrolled set. Returns false if already
    /// enrolled or already completed.
    pub fn enroll(&mut self, course_id: u32) -> bool {
        if self.completed_courses.contains(&course_id) {
            return false;
        }
        self.enrolled_courses.insert(course_id)
    }

    /// Moves a course from enrolled to completed and awards points.
    /// Returns false if the course was not enrolled or is already
    /// completed.
    pub fn complete(&mut self, course_id: u32) -> bool {
        if !self.enrolled_courses.remove(&course_id) {
            return false;
        }
        self.completed_courses.insert(course_id);
        self.award_points(COURSE_COMPLETION_POINTS);
        true
    }

    /// Adds points and re-derives the level.
    pub fn award_points(&mut self, points: u32) {
        self.points += points;
        self.level = self.points / POINTS_PER_LEVEL + 1;
    }
}

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Whether the user wants course notifications
    pub notifications: bool,
    /// UI theme
    pub theme: Theme,
    /// BCP 47 language tag (e.g. "en")
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            theme: Theme::Light,
            language: "en".to_string(),
        }
    }
}

/// UI theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}
