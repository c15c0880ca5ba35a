//! Stored user preferences and sign-out
//!
//! Besides the session collection, the persistence backend holds the theme
//! preference and the signed-in user's profile. Both fall back to defaults
//! when absent or unreadable. Sign-out removes every key.

use crate::error::Result;
use crate::session::SessionStore;
use crate::storage::{KeyValueStore, CHAT_SESSIONS_KEY, CURRENT_USER_KEY, THEME_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark background
    Dark,
    /// Light background
    #[default]
    Light,
}

impl Theme {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("Unknown theme: {} (expected dark or light)", other)),
        }
    }
}

/// Profile of the signed-in user, shown in the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Role label
    pub role: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Demo User".to_string(),
            email: "demo@thinktank.ai".to_string(),
            role: "User".to_string(),
        }
    }
}

/// Read the stored theme, defaulting to light
///
/// # Errors
///
/// Returns error only if the backend fails
pub fn load_theme(backend: &impl KeyValueStore) -> Result<Theme> {
    let theme = match backend.get(THEME_KEY)? {
        Some(raw) => raw.parse().unwrap_or_else(|e: String| {
            tracing::warn!("Ignoring stored theme: {}", e);
            Theme::default()
        }),
        None => Theme::default(),
    };
    Ok(theme)
}

/// Store the theme preference
///
/// # Errors
///
/// Returns error if the backend write fails
pub fn save_theme(backend: &impl KeyValueStore, theme: Theme) -> Result<()> {
    backend.set(THEME_KEY, theme.as_str())
}

/// Read the stored user profile, defaulting to the demo user
///
/// # Errors
///
/// Returns error only if the backend fails
pub fn load_profile(backend: &impl KeyValueStore) -> Result<UserProfile> {
    let profile = match backend.get(CURRENT_USER_KEY)? {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed stored user profile: {}", e);
            UserProfile::default()
        }),
        None => UserProfile::default(),
    };
    Ok(profile)
}

/// Store the user profile
///
/// # Errors
///
/// Returns error if serialization or the backend write fails
pub fn save_profile(backend: &impl KeyValueStore, profile: &UserProfile) -> Result<()> {
    let raw = serde_json::to_string(profile)?;
    backend.set(CURRENT_USER_KEY, &raw)
}

/// Remove all stored data and reset the session store to empty
///
/// # Errors
///
/// Returns error if any backend removal fails
pub fn sign_out<B: KeyValueStore>(store: &mut SessionStore<B>) -> Result<()> {
    for key in [CURRENT_USER_KEY, CHAT_SESSIONS_KEY, THEME_KEY] {
        store.backend().remove(key)?;
    }
    store.clear();
    tracing::info!("Signed out and cleared stored data");
    Ok(())
}
