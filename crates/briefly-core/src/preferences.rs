//! Read-aloud preferences: last chosen speech rate and voice.
//!
//! Values are stored as strings under fixed keys so any
//! [`PreferenceStore`] can hold them.

use serde::{Deserialize, Serialize};

use crate::ports::PreferenceStore;

/// Store key for the speech rate.
pub const RATE_KEY: &str = "tts_rate";

/// Store key for the selected voice id.
pub const VOICE_KEY: &str = "tts_voice";

/// Speed choices offered by the player UI.
pub const RATE_PRESETS: [f32; 4] = [0.75, 1.0, 1.25, 1.5];

/// Persisted read-aloud preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub rate: Option<f32>,
    pub voice_id: Option<String>,
}

impl Preferences {
    /// Load preferences from a store.
    ///
    /// A saved rate that is not a finite positive number is ignored.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let rate = store.get(RATE_KEY).and_then(|raw| {
            let parsed = parse_rate(&raw);
            if parsed.is_none() {
                tracing::warn!(value = %raw, "Ignoring invalid saved speech rate");
            }
            parsed
        });

        let voice_id = store
            .get(VOICE_KEY)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Self { rate, voice_id }
    }
}

/// Parse a stored rate string. Only finite values above zero are accepted.
pub fn parse_rate(raw: &str) -> Option<f32> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|rate| is_valid_rate(*rate))
}

/// Whether `rate` is usable as a speed multiplier.
pub fn is_valid_rate(rate: f32) -> bool {
    rate.is_finite() && rate > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PreferenceError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, String>>);

    impl MapStore {
        fn with(entries: &[(&str, &str)]) -> Self {
            let map = entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect();
            Self(Mutex::new(map))
        }
    }

    impl PreferenceStore for MapStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
            self.0.lock().unwrap().insert(key.into(), value.into());
            Ok(())
        }
    }

    #[test]
    fn empty_store_loads_nothing() {
        let prefs = Preferences::load(&MapStore::default());
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn loads_rate_and_voice() {
        let store = MapStore::with(&[(RATE_KEY, "1.25"), (VOICE_KEY, "urn:voice:samantha")]);
        let prefs = Preferences::load(&store);
        assert_eq!(prefs.rate, Some(1.25));
        assert_eq!(prefs.voice_id.as_deref(), Some("urn:voice:samantha"));
    }

    #[test]
    fn invalid_rates_are_ignored() {
        for raw in ["fast", "0", "-1.5", "NaN", "inf", ""] {
            let store = MapStore::with(&[(RATE_KEY, raw)]);
            assert_eq!(Preferences::load(&store).rate, None, "rate {raw:?}");
        }
    }

    #[test]
    fn blank_voice_is_ignored() {
        let store = MapStore::with(&[(VOICE_KEY, "  ")]);
        assert!(Preferences::load(&store).voice_id.is_none());
    }

    #[test]
    fn presets_are_valid_rates() {
        assert!(RATE_PRESETS.iter().all(|r| is_valid_rate(*r)));
    }
}
