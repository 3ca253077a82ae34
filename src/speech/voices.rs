//! Voice catalog
//!
//! A snapshot of the engine's selectable voices, filtered to those usable
//! offline, taken once when the engine becomes ready. Indices are stable
//! only within one snapshot; the catalog is rebuilt, never edited in place.

use crate::platform::VoiceData;
use log::debug;

/// Ordered snapshot of locally usable voices
pub struct VoiceCatalog {
    entries: Vec<VoiceData>,
    current: usize,
}

impl VoiceCatalog {
    /// An empty catalog, used while the engine is not ready
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            current: 0,
        }
    }

    /// Build a snapshot from the engine's full voice set
    ///
    /// Keeps a voice iff it needs no network connection and is installed,
    /// preserving the engine's enumeration order. The current index points
    /// at the engine's active voice when that voice survives the filter,
    /// else 0.
    pub fn build(all: &[VoiceData], active: Option<&VoiceData>) -> Self {
        let entries: Vec<VoiceData> = all
            .iter()
            .filter(|voice| !voice.network_required && voice.installed)
            .cloned()
            .collect();
        let current = active
            .and_then(|voice| entries.iter().position(|entry| entry.name == voice.name))
            .unwrap_or(0);
        debug!(
            "voice catalog built: {} of {} voices usable, current index {}",
            entries.len(),
            all.len(),
            current
        );
        Self { entries, current }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Voice name at `index`, if in range
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|voice| voice.name.as_str())
    }

    /// Lowercase `language` or `language-region` tag at `index`
    ///
    /// Empty string when the index is out of range or the locale is unknown.
    pub fn language_tag(&self, index: usize) -> String {
        let Some(voice) = self.entries.get(index) else {
            return String::new();
        };
        if voice.language.is_empty() {
            return String::new();
        }
        if voice.region.is_empty() {
            voice.language.to_lowercase()
        } else {
            format!("{}-{}", voice.language, voice.region).to_lowercase()
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Record a confirmed index-based selection
    pub fn set_current(&mut self, index: usize) {
        if index < self.entries.len() {
            self.current = index;
        }
    }
}
