use serde::{Deserialize, Serialize};

use crate::signal::Signal;

/// Per-user alert filter, as stored alongside the user's integrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPreferences {
    /// Signals below this multiplier are not announced. Kept as text like
    /// `Signal::numero`.
    pub min_multiplier: String,
    pub enable_notifications: bool,
    /// Client-side only; carried so the record round-trips.
    pub enable_sound: bool,
}

impl Default for AlertPreferences {
    fn default() -> Self {
        Self {
            min_multiplier: "0".to_string(),
            enable_notifications: true,
            enable_sound: true,
        }
    }
}

impl AlertPreferences {
    /// Whether `signal` should be announced to this user.
    ///
    /// A multiplier that doesn't parse on either side never filters.
    pub fn admits(&self, signal: &Signal) -> bool {
        if !self.enable_notifications {
            return false;
        }
        match (parse_decimal(&signal.numero), parse_decimal(&self.min_multiplier)) {
            (Some(value), Some(min)) => value >= min,
            _ => true,
        }
    }
}

fn parse_decimal(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
