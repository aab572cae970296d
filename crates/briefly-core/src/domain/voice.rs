//! Voice descriptors and the cached voice catalog.

use serde::{Deserialize, Serialize};

/// A selectable synthetic voice as enumerated by the speech engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDescriptor {
    /// Stable voice identifier (the platform's voice URI).
    pub id: String,

    /// Human-readable display name.
    pub name: String,

    /// BCP-47 language tag, e.g. `"en-US"`.
    pub lang: String,

    /// Whether the platform marks this as its default voice.
    #[serde(default)]
    pub is_default: bool,
}

impl VoiceDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lang: lang.into(),
            is_default: false,
        }
    }

    /// Mark this voice as the platform default.
    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Whether the language tag is English (`en`, `en-US`, `en_GB`, ...).
    pub fn is_english(&self) -> bool {
        self.lang
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("en"))
    }
}

/// Ordered voice list as last reported by the engine.
///
/// Engines may enumerate voices lazily, so the catalog is replaced wholesale
/// on every refresh rather than merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceCatalog {
    voices: Vec<VoiceDescriptor>,
}

impl VoiceCatalog {
    pub const fn new(voices: Vec<VoiceDescriptor>) -> Self {
        Self { voices }
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> &[VoiceDescriptor] {
        &self.voices
    }

    /// Look a voice up by id.
    pub fn find(&self, id: &str) -> Option<&VoiceDescriptor> {
        self.voices.iter().find(|v| v.id == id)
    }

    /// English voices only, in catalog order.
    pub fn english(&self) -> impl Iterator<Item = &VoiceDescriptor> {
        self.voices.iter().filter(|v| v.is_english())
    }

    /// Voice to use when the user has no (valid) saved choice.
    ///
    /// Preference order: English platform default, any platform default,
    /// first English voice, first voice. `None` only for an empty catalog.
    pub fn fallback_voice(&self) -> Option<&VoiceDescriptor> {
        self.voices
            .iter()
            .find(|v| v.is_default && v.is_english())
            .or_else(|| self.voices.iter().find(|v| v.is_default))
            .or_else(|| self.english().next())
            .or_else(|| self.voices.first())
    }
}

impl From<Vec<VoiceDescriptor>> for VoiceCatalog {
    fn from(voices: Vec<VoiceDescriptor>) -> Self {
        Self::new(voices)
    }
}
