//! Platform service seam
//!
//! Everything platform-specific sits behind the traits in this module. An
//! implementation is a thin wrapper over the host OS services; the protocol
//! logic in the rest of the crate assumes only the contracts documented
//! here. All observer callbacks may arrive on threads owned by the wrapper,
//! never the thread that submitted the request.

pub mod null;

#[cfg(feature = "native-tts")]
pub mod native;

use crate::sync::Completer;
use crate::Result;
use std::path::Path;
use std::sync::Arc;

/// Outcome of an engine initialization request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Ready,
    Failed,
}

/// Raw audio format reported by the engine for one synthesis request
///
/// `audio_format` is the platform's opaque encoding code and is passed
/// through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub audio_format: i32,
    pub channels: u32,
}

/// One voice as enumerated by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceData {
    pub name: String,
    /// ISO language code, e.g. "en". Empty when the locale is unknown.
    pub language: String,
    /// Region code, e.g. "US". May be empty.
    pub region: String,
    /// Voice needs a network connection to synthesize.
    pub network_required: bool,
    /// Voice data is present on the device.
    pub installed: bool,
}

impl VoiceData {
    pub fn new(name: &str, language: &str, region: &str) -> Self {
        Self {
            name: name.to_string(),
            language: language.to_string(),
            region: region.to_string(),
            network_required: false,
            installed: true,
        }
    }
}

/// Per-utterance synthesis parameters
///
/// The platform has no persistent notion of volume or pan; both are injected
/// into each request.
#[derive(Debug, Clone, Copy)]
pub struct UtteranceParams {
    pub volume: f32,
    pub pan: f32,
}

impl Default for UtteranceParams {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pan: 0.0,
        }
    }
}

/// Receives the single init outcome callback
pub trait InitObserver: Send + Sync {
    /// Called exactly once per init request, possibly from another thread.
    fn engine_ready(&self, status: EngineStatus);
}

/// Receives synthesis progress callbacks
///
/// Every callback carries the utterance tag the request was submitted with.
/// A conforming wrapper delivers zero or more `on_synthesis_start` /
/// `on_audio_chunk` calls followed by exactly one terminal call
/// (`on_done` or `on_error`) per request, but the protocol layer tolerates
/// missing, repeated, and stale-tagged callbacks.
pub trait UtteranceObserver: Send + Sync {
    fn on_synthesis_start(&self, utterance: &str, format: PcmFormat);
    fn on_audio_chunk(&self, utterance: &str, chunk: &[u8]);
    fn on_done(&self, utterance: &str);
    fn on_error(&self, utterance: &str);
}

/// Thin wrapper over the platform speech engine
///
/// Submission methods return `Err` only for synchronous rejection; accepted
/// requests report their fate through the observers.
pub trait SpeechEngine: Send + Sync {
    /// Begin asynchronous initialization, optionally selecting a specific
    /// engine by identifier. An unknown identifier must resolve to the
    /// default engine or a `Failed` callback, never a hang.
    fn begin_init(&self, engine_id: Option<&str>, observer: Arc<dyn InitObserver>);

    /// Register the receiver for synthesis progress callbacks.
    fn set_utterance_observer(&self, observer: Arc<dyn UtteranceObserver>);

    /// Queue spoken playback. `flush` empties the queue first.
    fn speak(&self, text: &str, flush: bool, params: UtteranceParams) -> Result<()>;

    /// Submit a synthesis-to-sink request tagged with `utterance`. The
    /// scratch path is wrapper-private; audio reaches the caller through
    /// `on_audio_chunk`.
    fn synthesize(
        &self,
        text: &str,
        params: UtteranceParams,
        utterance: &str,
        scratch: &Path,
    ) -> Result<()>;

    /// Stop playback and empty the queue.
    fn stop(&self) -> Result<()>;

    fn is_speaking(&self) -> bool;

    fn set_rate(&self, rate: f32) -> Result<()>;

    fn set_pitch(&self, pitch: f32) -> Result<()>;

    /// Full voice set, unfiltered.
    fn voices(&self) -> Vec<VoiceData>;

    /// The currently active voice, if the engine reports one.
    fn current_voice(&self) -> Option<VoiceData>;

    /// Select a voice by exact name from the full voice set.
    fn set_voice(&self, name: &str) -> Result<()>;

    /// Maximum accepted input length in characters.
    fn max_input_length(&self) -> usize;

    /// Installed engine packages, empty when the platform cannot enumerate.
    fn engine_packages(&self) -> Vec<String>;

    /// Release the underlying engine resource. Must be safe to call
    /// regardless of init outcome, and idempotent.
    fn shutdown(&self);
}

/// Thin wrapper over the platform accessibility (screen reader) service
pub trait AccessibilityHost: Send + Sync {
    /// A connection to the accessibility service exists at all.
    fn is_reachable(&self) -> bool;

    /// The accessibility framework is enabled.
    fn is_enabled(&self) -> bool;

    /// Touch-exploration / spoken-feedback mode is on.
    fn is_touch_exploration_enabled(&self) -> bool;

    /// Identifiers of enabled services declaring spoken-feedback capability,
    /// in platform enumeration order.
    fn spoken_feedback_services(&self) -> Vec<String>;

    /// Dispatch a one-shot announcement event. Fire and forget.
    fn announce(&self, text: &str) -> Result<()>;

    /// Interrupt any in-flight announcement.
    fn interrupt(&self) -> Result<()>;
}

/// Request payload for a one-shot text-entry dialog
#[derive(Debug, Clone)]
pub struct InputDialogSpec {
    pub title: String,
    pub message: String,
    pub default_text: String,
}

/// Request payload for a one-shot information dialog
#[derive(Debug, Clone)]
pub struct InfoDialogSpec {
    pub title: String,
    pub message: String,
    pub body: String,
}

/// Thin wrapper over the platform's modal dialog surface
///
/// A host shows the dialog on its UI context and resolves the completer
/// exactly once from whichever user action ends the dialog. Dropping the
/// completer unresolved counts as a dismissal.
pub trait DialogHost: Send + Sync {
    fn show_input(&self, spec: &InputDialogSpec, reply: Completer<String>);
    fn show_info(&self, spec: &InfoDialogSpec, reply: Completer<()>);
}
