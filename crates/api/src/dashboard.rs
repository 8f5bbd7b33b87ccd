//! Dashboard welcome panel. Pure rendering: the clock instant is an
//! argument, so the GraphQL resolver decides what "now" means and tests
//! pin it.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Greeting fallback when no display name is available.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WelcomePanel {
    pub greeting: String,
    pub date_display: String,
    pub time_display: String,
}

/// Render the panel for an optional display name at the given instant.
///
/// Blank or whitespace-only names fall back to [`DEFAULT_DISPLAY_NAME`];
/// the date line is long-form ("Thursday, March 5, 2026") and the time
/// line short-form ("3:04 PM").
pub fn render<Tz: TimeZone>(first_name: Option<&str>, now: DateTime<Tz>) -> WelcomePanel
where
    Tz::Offset: Display,
{
    let name = first_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME);
    WelcomePanel {
        greeting: format!("Welcome back, {name}!"),
        date_display: now.format("%A, %B %-d, %Y").to_string(),
        time_display: now.format("%-I:%M %p").to_string(),
    }
}
