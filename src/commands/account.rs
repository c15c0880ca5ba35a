//! Preference, profile, sign-out, and health commands

use crate::assistant::{AssistantClient, HttpAssistant};
use crate::commands::open_backend;
use crate::config::Config;
use crate::error::{Result, ThinktankError};
use crate::preferences::{self, Theme, UserProfile};
use crate::session::SessionStore;
use colored::Colorize;

/// Show the stored theme, or store a new one
pub fn handle_theme(config: &Config, value: Option<String>) -> Result<()> {
    let backend = open_backend(config)?;

    match value {
        Some(value) if value.eq_ignore_ascii_case("toggle") => {
            let theme = preferences::load_theme(&backend)?.toggled();
            preferences::save_theme(&backend, theme)?;
            println!("{}", format!("Theme set to {}", theme).green());
        }
        Some(value) => {
            let theme: Theme = value.parse().map_err(ThinktankError::Config)?;
            preferences::save_theme(&backend, theme)?;
            println!("{}", format!("Theme set to {}", theme).green());
        }
        None => {
            println!("{}", preferences::load_theme(&backend)?);
        }
    }

    Ok(())
}

/// Show the stored profile, applying any field updates first
pub fn handle_whoami(
    config: &Config,
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
) -> Result<()> {
    let backend = open_backend(config)?;
    let mut profile: UserProfile = preferences::load_profile(&backend)?;

    let updating = name.is_some() || email.is_some() || role.is_some();
    if let Some(name) = name {
        profile.name = name;
    }
    if let Some(email) = email {
        profile.email = email;
    }
    if let Some(role) = role {
        profile.role = role;
    }
    if updating {
        preferences::save_profile(&backend, &profile)?;
    }

    println!("{} <{}>", profile.name.bold(), profile.email);
    println!("Role: {}", profile.role);

    Ok(())
}

/// Clear every stored key
pub fn handle_sign_out(config: &Config) -> Result<()> {
    let mut store = SessionStore::new(open_backend(config)?);
    preferences::sign_out(&mut store)?;
    println!("{}", "Signed out successfully!".green());
    Ok(())
}

/// Probe the assistant service
pub async fn handle_health(config: &Config) -> Result<()> {
    let assistant = HttpAssistant::new(config.assistant.clone())?;
    let health = assistant.health().await?;

    if health.is_healthy() {
        println!("{} {}", "healthy".green().bold(), health.message);
    } else {
        println!("{} {}", health.status.yellow().bold(), health.message);
    }
    println!("Chat endpoint: {}", assistant.endpoint().cyan());

    Ok(())
}
