//! Speech engine handle
//!
//! [`SpeechBridge`] owns one connection to a platform speech engine. The
//! engine initializes asynchronously; construction blocks on a single-fire
//! latch until the platform reports ready or failed, bounded by a timeout so
//! an engine that never calls back leaves a cleanly degraded handle instead
//! of a hung thread. Every subsequent operation checks readiness and fails
//! soft: speech is an augmentation, never a correctness-critical path.

use crate::config::Config;
use crate::platform::{EngineStatus, InitObserver, SpeechEngine, UtteranceParams, VoiceData};
use crate::speech::capture::UtteranceTracker;
use crate::speech::voices::VoiceCatalog;
use crate::sync::{lock, Latch};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Bound on the init handshake. Early revisions used 1 second and raced
/// cold-starting engines on slow devices; 10 seconds is the widened bound.
pub const INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bound on one raw-audio synthesis request.
pub const SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(10);

/// Construction-time choices for [`SpeechBridge::connect_with`]
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Specific engine to connect to; None means the platform default.
    pub engine_id: Option<String>,
    pub init_timeout: Duration,
    pub synthesis_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            engine_id: None,
            init_timeout: INIT_TIMEOUT,
            synthesis_timeout: SYNTHESIS_TIMEOUT,
        }
    }
}

/// Receives the init outcome and releases the constructor
struct InitGate {
    status: Mutex<Option<EngineStatus>>,
    latch: Latch,
}

impl InitGate {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(None),
            latch: Latch::new(),
        })
    }

    fn wait(&self, timeout: Duration) -> Option<EngineStatus> {
        if !self.latch.wait_timeout(timeout) {
            return None;
        }
        *lock(&self.status)
    }
}

impl InitObserver for InitGate {
    fn engine_ready(&self, status: EngineStatus) {
        let mut slot = lock(&self.status);
        // Write-once; a duplicate callback cannot flip the outcome.
        if slot.is_none() {
            *slot = Some(status);
        }
        self.latch.fire();
    }
}

/// One connection to a platform speech engine
pub struct SpeechBridge {
    engine: Arc<dyn SpeechEngine>,
    ready: bool,
    engine_id: Option<String>,
    rate: f32,
    pitch: f32,
    pan: f32,
    volume: f32,
    catalog: VoiceCatalog,
    tracker: Arc<UtteranceTracker>,
    synthesis_timeout: Duration,
}

impl SpeechBridge {
    /// Connect to the platform default engine with default bounds
    pub fn connect(engine: Arc<dyn SpeechEngine>) -> Self {
        Self::connect_with(engine, ConnectOptions::default())
    }

    /// Connect with explicit options
    ///
    /// Blocks up to `init_timeout` for the platform's init callback. A
    /// timeout leaves the handle not ready, which behaves identically to a
    /// failed initialization for every subsequent call.
    pub fn connect_with(engine: Arc<dyn SpeechEngine>, options: ConnectOptions) -> Self {
        let gate = InitGate::new();
        engine.begin_init(options.engine_id.as_deref(), gate.clone());

        let ready = match gate.wait(options.init_timeout) {
            Some(EngineStatus::Ready) => true,
            Some(EngineStatus::Failed) => {
                warn!("speech engine reported failed initialization");
                false
            }
            None => {
                warn!(
                    "speech engine did not initialize within {:?}",
                    options.init_timeout
                );
                false
            }
        };

        let tracker = UtteranceTracker::new();
        let catalog = if ready {
            // Normalize the engine's persistent parameters before taking
            // the voice snapshot.
            if let Err(e) = engine.set_rate(1.0) {
                debug!("initial rate reset failed: {}", e);
            }
            if let Err(e) = engine.set_pitch(1.0) {
                debug!("initial pitch reset failed: {}", e);
            }
            engine.set_utterance_observer(tracker.clone());
            let voices = engine.voices();
            let active = engine.current_voice();
            info!("speech engine ready with {} voices", voices.len());
            VoiceCatalog::build(&voices, active.as_ref())
        } else {
            VoiceCatalog::empty()
        };

        Self {
            engine,
            ready,
            engine_id: options.engine_id,
            rate: 1.0,
            pitch: 1.0,
            pan: 0.0,
            volume: 1.0,
            catalog,
            tracker,
            synthesis_timeout: options.synthesis_timeout,
        }
    }

    /// Connect using settings from the configuration file
    pub fn connect_with_config(engine: Arc<dyn SpeechEngine>, config: &Config) -> Self {
        let options = ConnectOptions {
            engine_id: config.engine(),
            init_timeout: config.init_timeout(),
            synthesis_timeout: config.synthesis_timeout(),
        };
        let mut bridge = Self::connect_with(engine, options);
        if let Some(rate) = config.rate() {
            if bridge.set_rate(rate) {
                info!("speech rate set to {}", rate);
            }
        }
        if let Some(pitch) = config.pitch() {
            if bridge.set_pitch(pitch) {
                info!("speech pitch set to {}", pitch);
            }
        }
        if let Some(volume) = config.volume() {
            bridge.set_volume(volume);
        }
        if let Some(pan) = config.pan() {
            bridge.set_pan(pan);
        }
        bridge
    }

    /// The engine finished initialization successfully
    pub fn is_active(&self) -> bool {
        self.ready
    }

    /// Identifier the connection was requested with, if any
    pub fn engine_id(&self) -> Option<&str> {
        self.engine_id.as_deref()
    }

    pub fn is_speaking(&self) -> bool {
        self.ready && self.engine.is_speaking()
    }

    /// Maximum accepted input length in characters; 0 when not ready
    pub fn max_input_length(&self) -> usize {
        if self.ready {
            self.engine.max_input_length()
        } else {
            0
        }
    }

    fn utterance_params(&self) -> UtteranceParams {
        UtteranceParams {
            volume: self.volume,
            pan: self.pan,
        }
    }

    /// Queue spoken playback
    ///
    /// `interrupt` flushes the platform queue first; otherwise the
    /// utterance is appended. Returns true iff the platform accepted the
    /// request for queuing; acceptance is not completion and nothing is
    /// awaited.
    pub fn speak(&self, text: &str, interrupt: bool) -> bool {
        if !self.ready {
            return false;
        }
        if text.chars().count() > self.engine.max_input_length() {
            debug!("speak rejected: input exceeds engine maximum");
            return false;
        }
        match self.engine.speak(text, interrupt, self.utterance_params()) {
            Ok(()) => true,
            Err(e) => {
                debug!("speak rejected by engine: {}", e);
                false
            }
        }
    }

    /// Stop playback and empty the queue
    pub fn silence(&self) -> bool {
        self.ready && self.engine.stop().is_ok()
    }

    /// Synthesize text to a raw PCM buffer, blocking until done
    ///
    /// Returns None when the text is empty or overlong, the engine is not
    /// ready, the platform rejects the request, the synthesis errors, or no
    /// terminal callback arrives within the bound.
    pub fn speak_pcm(&self, text: &str) -> Option<Vec<u8>> {
        if !self.ready || text.is_empty() {
            return None;
        }
        if text.chars().count() > self.engine.max_input_length() {
            debug!("speak_pcm rejected: input exceeds engine maximum");
            return None;
        }
        self.tracker.synthesize(
            self.engine.as_ref(),
            text,
            self.utterance_params(),
            self.synthesis_timeout,
        )
    }

    /// Sample rate of the last successful capture
    pub fn pcm_sample_rate(&self) -> u32 {
        self.tracker.last_format().sample_rate
    }

    /// Platform encoding code of the last successful capture
    pub fn pcm_audio_format(&self) -> i32 {
        self.tracker.last_format().audio_format
    }

    /// Channel count of the last successful capture
    pub fn pcm_channel_count(&self) -> u32 {
        self.tracker.last_format().channels
    }

    // ========== Speech parameters ==========

    /// Set the speech rate; the cache updates only on confirmed success
    pub fn set_rate(&mut self, rate: f32) -> bool {
        if !self.ready {
            return false;
        }
        match self.engine.set_rate(rate) {
            Ok(()) => {
                self.rate = rate;
                true
            }
            Err(e) => {
                debug!("set_rate rejected: {}", e);
                false
            }
        }
    }

    /// Set the voice pitch; the cache updates only on confirmed success
    pub fn set_pitch(&mut self, pitch: f32) -> bool {
        if !self.ready {
            return false;
        }
        match self.engine.set_pitch(pitch) {
            Ok(()) => {
                self.pitch = pitch;
                true
            }
            Err(e) => {
                debug!("set_pitch rejected: {}", e);
                false
            }
        }
    }

    /// Purely local; injected into each utterance at speak time
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan;
    }

    /// Purely local; injected into each utterance at speak time
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    // ========== Voice selection ==========

    /// Name of the engine's active voice, if available
    pub fn current_voice_name(&self) -> Option<String> {
        if !self.ready {
            return None;
        }
        self.engine.current_voice().map(|voice| voice.name)
    }

    /// Number of locally usable voices
    pub fn voice_count(&self) -> usize {
        if self.ready {
            self.catalog.len()
        } else {
            0
        }
    }

    /// Catalog voice name at `index`; empty string when invalid
    pub fn voice_name(&self, index: usize) -> String {
        if !self.ready {
            return String::new();
        }
        self.catalog.name(index).unwrap_or("").to_string()
    }

    /// Lowercase language tag of the catalog voice at `index`
    pub fn voice_language(&self, index: usize) -> String {
        if !self.ready {
            return String::new();
        }
        self.catalog.language_tag(index)
    }

    /// Select a catalog voice by index
    pub fn set_voice_by_index(&mut self, index: usize) -> bool {
        if !self.ready {
            return false;
        }
        let Some(name) = self.catalog.name(index).map(str::to_string) else {
            return false;
        };
        match self.engine.set_voice(&name) {
            Ok(()) => {
                self.catalog.set_current(index);
                true
            }
            Err(e) => {
                debug!("set_voice_by_index rejected: {}", e);
                false
            }
        }
    }

    /// Index of the catalog entry matching the active voice at build time
    pub fn current_voice_index(&self) -> usize {
        self.catalog.current_index()
    }

    /// Select a voice by exact, case-sensitive name
    ///
    /// Searches the engine's full voice set, not the filtered catalog, so
    /// voices outside the catalog stay selectable by name.
    pub fn set_voice(&mut self, name: &str) -> bool {
        if !self.ready {
            return false;
        }
        let known = self
            .engine
            .voices()
            .iter()
            .any(|voice| voice.name == name);
        if !known {
            debug!("set_voice: no voice named '{}'", name);
            return false;
        }
        match self.engine.set_voice(name) {
            Ok(()) => true,
            Err(e) => {
                debug!("set_voice rejected: {}", e);
                false
            }
        }
    }

    /// Names of the engine's full voice set, unfiltered
    pub fn voice_names(&self) -> Vec<String> {
        if !self.ready {
            return Vec::new();
        }
        self.engine
            .voices()
            .into_iter()
            .map(|voice: VoiceData| voice.name)
            .collect()
    }
}

impl Drop for SpeechBridge {
    fn drop(&mut self) {
        // Release the engine resource exactly once; the wrapper contract
        // makes shutdown safe regardless of init outcome.
        debug!("releasing speech engine (ready={})", self.ready);
        self.engine.shutdown();
    }
}

/// Installed engine packages, empty when the platform cannot enumerate
pub fn list_engine_packages(engine: &dyn SpeechEngine) -> Vec<String> {
    engine.engine_packages()
}
