//! Presentation preferences
//!
//! Read once at startup from the page query string (`?lang=de&hitboxes=1`).
//! Nothing here is stored between visits.

use serde::{Deserialize, Serialize};

/// Language for landmark descriptions and overlay text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    German,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "de" | "german" | "deutsch" => Some(Language::German),
            _ => None,
        }
    }

    /// Caption of the popup's continue button
    pub fn continue_label(&self) -> &'static str {
        match self {
            Language::English => "Continue",
            Language::German => "Weiter",
        }
    }

    pub fn game_over_title(&self) -> &'static str {
        match self {
            Language::English => "Game Over",
            Language::German => "Spiel vorbei",
        }
    }

    pub fn win_title(&self) -> &'static str {
        match self {
            Language::English => "Tour complete!",
            Language::German => "Tour geschafft!",
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub language: Language,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Outline collision boxes
    pub show_hitboxes: bool,

    // === Accessibility ===
    /// Reduced motion (no invincibility blinking)
    pub reduced_motion: bool,
    /// Start in demo mode with the autopilot playing
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::English,
            show_fps: false,
            show_hitboxes: false,
            reduced_motion: false,
            autopilot: false,
        }
    }
}

impl Settings {
    /// Parse `key=value` pairs from a URL query string. Unknown keys and
    /// malformed values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "1"));
            match key {
                "lang" => {
                    if let Some(language) = Language::from_str(value) {
                        settings.language = language;
                    }
                }
                "fps" => settings.show_fps = parse_flag(value),
                "hitboxes" => settings.show_hitboxes = parse_flag(value),
                "reduced-motion" => settings.reduced_motion = parse_flag(value),
                "demo" => settings.autopilot = parse_flag(value),
                _ => {}
            }
        }
        settings
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
