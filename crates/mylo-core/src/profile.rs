//! Per-user profile record (name, age, city).

use serde::{Deserialize, Serialize};

/// Persisted profile, keyed 1:1 by user id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Absent when the submitted age was not an integer.
    pub age: Option<i32>,
    pub city: String,
}

impl Profile {
    /// Age as shown in the read-only summary (empty when absent).
    pub fn age_display(&self) -> String {
        self.age.map(|age| age.to_string()).unwrap_or_default()
    }
}

/// Raw form input for a profile, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub age: String,
    pub city: String,
}

impl ProfileDraft {
    /// Converts the draft into a storable profile.
    ///
    /// Non-numeric age input is stored as absent, never as a number.
    pub fn to_profile(&self) -> Profile {
        Profile {
            name: self.name.clone(),
            age: parse_age(&self.age),
            city: self.city.clone(),
        }
    }

    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            age: profile.age_display(),
            city: profile.city.clone(),
        }
    }
}

/// Parses an age field, returning `None` for anything that is not a 32-bit integer.
///
/// Surrounding whitespace is not accepted.
pub fn parse_age(input: &str) -> Option<i32> {
    input.parse().ok()
}
