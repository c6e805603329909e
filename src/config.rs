//! User settings persisted in localStorage, plus gesture constants.
//! The overlay transform itself is never persisted.

use serde::{Deserialize, Serialize};

pub const SETTINGS_KEY: &str = "to_settings";

/// Bounds applied to every transform the engine produces.
pub struct GestureLimits;

impl GestureLimits {
    pub const MIN_SCALE: f64 = 0.1;
    pub const MAX_SCALE: f64 = 10.0;
    /// Fraction of the frame an image fills after an initial fit.
    pub const FIT_MARGIN: f64 = 0.9;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacingMode {
    #[default]
    Environment,
    User,
}

impl FacingMode {
    pub fn as_constraint(self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overlay opacity in `[0, 1]`.
    pub opacity: f64,
    pub panel_visible: bool,
    pub facing_mode: FacingMode,
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opacity: 0.5,
            panel_visible: true,
            facing_mode: FacingMode::Environment,
            log_level: LogLevel::Info,
        }
    }
}

impl Settings {
    /// Parses stored JSON; anything unreadable falls back to defaults.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Settings>(raw) {
            Ok(s) => s.sanitized(),
            Err(e) => {
                log::warn!("ignoring stored settings: {e}");
                Settings::default()
            }
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            Settings::default().opacity
        };
        self
    }

    pub fn load() -> Self {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(Some(raw)) = store.get_item(SETTINGS_KEY) {
                    return Settings::from_json(&raw);
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self) {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(s) = serde_json::to_string(self) {
                    let _ = store.set_item(SETTINGS_KEY, &s);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let s = Settings::from_json(r#"{"opacity":0.8}"#);
        assert_eq!(s.opacity, 0.8);
        assert!(s.panel_visible);
        assert_eq!(s.facing_mode, FacingMode::Environment);
    }

    #[test]
    fn garbage_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(Settings::from_json(r#"{"opacity":3.0}"#).opacity, 1.0);
        assert_eq!(Settings::from_json(r#"{"opacity":-1.0}"#).opacity, 0.0);
    }

    #[test]
    fn facing_flips() {
        assert_eq!(FacingMode::Environment.flipped(), FacingMode::User);
        assert_eq!(FacingMode::User.as_constraint(), "user");
    }
}
