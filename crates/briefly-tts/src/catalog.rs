//! Voice selection and how it is refined as the catalog fills in.

use briefly_core::{VoiceCatalog, VoiceDescriptor};

/// Where the current voice selection came from.
///
/// Ordered by authority: a selection is only ever replaced by one of equal or
/// higher rank during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VoiceSource {
    /// Nothing chosen yet.
    Unresolved,
    /// Picked by the default-voice rule.
    Fallback,
    /// Restored from saved preferences.
    Preference,
    /// Chosen explicitly by the user in this session.
    User,
}

/// The selected voice and its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelection {
    voice: Option<VoiceDescriptor>,
    source: VoiceSource,
}

impl Default for VoiceSelection {
    fn default() -> Self {
        Self {
            voice: None,
            source: VoiceSource::Unresolved,
        }
    }
}

impl VoiceSelection {
    pub fn user(voice: VoiceDescriptor) -> Self {
        Self {
            voice: Some(voice),
            source: VoiceSource::User,
        }
    }

    pub const fn voice(&self) -> Option<&VoiceDescriptor> {
        self.voice.as_ref()
    }

    pub const fn source(&self) -> VoiceSource {
        self.source
    }

    pub fn voice_id(&self) -> Option<&str> {
        self.voice.as_ref().map(|v| v.id.as_str())
    }
}

/// Outcome of resolving against a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the current selection.
    Keep,
    /// Switch to a new selection.
    Select(VoiceSelection),
    /// The catalog is empty and nothing is selected; the engine default will
    /// be used.
    NoVoiceAvailable,
}

/// Resolve the voice to use given the catalog, the saved voice id, and the
/// current selection.
///
/// A saved id present in the catalog wins; otherwise the catalog's fallback
/// rule applies. A user choice is never overridden. A lower-ranked candidate
/// only replaces the current selection once the catalog no longer lists it.
pub fn resolve(
    catalog: &VoiceCatalog,
    saved_id: Option<&str>,
    current: &VoiceSelection,
) -> Resolution {
    if current.source == VoiceSource::User {
        return Resolution::Keep;
    }

    let candidate = saved_id
        .and_then(|id| catalog.find(id))
        .map(|voice| (voice, VoiceSource::Preference))
        .or_else(|| catalog.fallback_voice().map(|v| (v, VoiceSource::Fallback)));

    let Some((voice, source)) = candidate else {
        return if current.voice.is_none() {
            Resolution::NoVoiceAvailable
        } else {
            Resolution::Keep
        };
    };

    let current_listed = current
        .voice
        .as_ref()
        .is_some_and(|v| catalog.find(&v.id).is_some());
    if source < current.source && current_listed {
        return Resolution::Keep;
    }
    if current.source == source && current.voice.as_ref() == Some(voice) {
        return Resolution::Keep;
    }

    Resolution::Select(VoiceSelection {
        voice: Some(voice.clone()),
        source,
    })
}
