//! Scripted platform fakes shared by the integration tests
//!
//! `ScriptedEngine` plays back a configured sequence of synthesis callbacks
//! when a request is submitted, from the submitting thread or from its own,
//! which is exactly the latitude the platform wrapper contract gives a real
//! engine.
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use ttsbridge::platform::{
    EngineStatus, InitObserver, PcmFormat, SpeechEngine, UtteranceObserver, UtteranceParams,
    VoiceData,
};
use ttsbridge::{BridgeError, Result};

/// How the fake engine answers an init request
pub enum InitBehavior {
    /// Fire the callback before `begin_init` returns
    Immediate(EngineStatus),
    /// Fire the callback from another thread after a delay
    Delayed(Duration, EngineStatus),
    /// Never call back; the handshake must time out
    Never,
}

/// One scripted synthesis callback
#[derive(Clone)]
pub enum SynthesisStep {
    Format(PcmFormat),
    Chunk(Vec<u8>),
    /// Chunk tagged with the previous request's token (or a bogus token if
    /// there was none); must be discarded by the protocol layer
    StaleChunk(Vec<u8>),
    Done,
    Error,
    /// Terminal done fired from another thread after a delay
    DelayedDone(Duration),
}

/// One recorded spoken-playback submission
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakCall {
    pub text: String,
    pub flush: bool,
    pub volume: f32,
    pub pan: f32,
}

struct Inner {
    init: InitBehavior,
    voices: Vec<VoiceData>,
    active_voice: Option<String>,
    observer: Option<Arc<dyn UtteranceObserver>>,
    script: Vec<SynthesisStep>,
    accept_speak: bool,
    accept_synthesize: bool,
    accept_rate: bool,
    accept_pitch: bool,
    max_len: usize,
    packages: Vec<String>,
    speak_log: Vec<SpeakCall>,
    last_utterance: Option<String>,
    synthesize_count: u32,
    stop_count: u32,
    shutdown_count: u32,
}

pub struct ScriptedEngine {
    inner: Mutex<Inner>,
}

impl ScriptedEngine {
    pub fn new(init: InitBehavior) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                init,
                voices: Vec::new(),
                active_voice: None,
                observer: None,
                script: Vec::new(),
                accept_speak: true,
                accept_synthesize: true,
                accept_rate: true,
                accept_pitch: true,
                max_len: 4000,
                packages: Vec::new(),
                speak_log: Vec::new(),
                last_utterance: None,
                synthesize_count: 0,
                stop_count: 0,
                shutdown_count: 0,
            }),
        })
    }

    pub fn ready() -> Arc<Self> {
        Self::new(InitBehavior::Immediate(EngineStatus::Ready))
    }

    pub fn with_voices(self: Arc<Self>, voices: Vec<VoiceData>) -> Arc<Self> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.active_voice.is_none() {
                inner.active_voice = voices.first().map(|voice| voice.name.clone());
            }
            inner.voices = voices;
        }
        self
    }

    pub fn with_active_voice(self: Arc<Self>, name: &str) -> Arc<Self> {
        self.inner.lock().unwrap().active_voice = Some(name.to_string());
        self
    }

    pub fn with_max_len(self: Arc<Self>, max_len: usize) -> Arc<Self> {
        self.inner.lock().unwrap().max_len = max_len;
        self
    }

    pub fn with_packages(self: Arc<Self>, packages: Vec<String>) -> Arc<Self> {
        self.inner.lock().unwrap().packages = packages;
        self
    }

    pub fn reject_speak(self: Arc<Self>) -> Arc<Self> {
        self.inner.lock().unwrap().accept_speak = false;
        self
    }

    /// Script the callbacks for the next synthesis request
    pub fn set_script(&self, script: Vec<SynthesisStep>) {
        self.inner.lock().unwrap().script = script;
    }

    pub fn accept_synthesize(&self, accept: bool) {
        self.inner.lock().unwrap().accept_synthesize = accept;
    }

    pub fn accept_rate(&self, accept: bool) {
        self.inner.lock().unwrap().accept_rate = accept;
    }

    pub fn speak_log(&self) -> Vec<SpeakCall> {
        self.inner.lock().unwrap().speak_log.clone()
    }

    pub fn synthesize_count(&self) -> u32 {
        self.inner.lock().unwrap().synthesize_count
    }

    pub fn stop_count(&self) -> u32 {
        self.inner.lock().unwrap().stop_count
    }

    pub fn shutdown_count(&self) -> u32 {
        self.inner.lock().unwrap().shutdown_count
    }

    /// The registered observer, for injecting out-of-band callbacks
    pub fn observer(&self) -> Option<Arc<dyn UtteranceObserver>> {
        self.inner.lock().unwrap().observer.clone()
    }
}

impl SpeechEngine for ScriptedEngine {
    fn begin_init(&self, _engine_id: Option<&str>, observer: Arc<dyn InitObserver>) {
        let inner = self.inner.lock().unwrap();
        match &inner.init {
            InitBehavior::Immediate(status) => {
                let status = *status;
                drop(inner);
                observer.engine_ready(status);
            }
            InitBehavior::Delayed(delay, status) => {
                let (delay, status) = (*delay, *status);
                drop(inner);
                thread::spawn(move || {
                    thread::sleep(delay);
                    observer.engine_ready(status);
                });
            }
            InitBehavior::Never => {}
        }
    }

    fn set_utterance_observer(&self, observer: Arc<dyn UtteranceObserver>) {
        self.inner.lock().unwrap().observer = Some(observer);
    }

    fn speak(&self, text: &str, flush: bool, params: UtteranceParams) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.accept_speak {
            return Err(BridgeError::Engine("speak rejected".to_string()));
        }
        inner.speak_log.push(SpeakCall {
            text: text.to_string(),
            flush,
            volume: params.volume,
            pan: params.pan,
        });
        Ok(())
    }

    fn synthesize(
        &self,
        _text: &str,
        _params: UtteranceParams,
        utterance: &str,
        _scratch: &Path,
    ) -> Result<()> {
        let (observer, script, stale_token) = {
            let mut inner = self.inner.lock().unwrap();
            inner.synthesize_count += 1;
            if !inner.accept_synthesize {
                return Err(BridgeError::Engine("synthesize rejected".to_string()));
            }
            let stale_token = inner
                .last_utterance
                .replace(utterance.to_string())
                .unwrap_or_else(|| "utt-bogus".to_string());
            (
                inner.observer.clone(),
                std::mem::take(&mut inner.script),
                stale_token,
            )
        };
        let Some(observer) = observer else {
            return Err(BridgeError::Engine("no observer registered".to_string()));
        };
        for step in script {
            match step {
                SynthesisStep::Format(format) => observer.on_synthesis_start(utterance, format),
                SynthesisStep::Chunk(chunk) => observer.on_audio_chunk(utterance, &chunk),
                SynthesisStep::StaleChunk(chunk) => {
                    observer.on_audio_chunk(&stale_token, &chunk)
                }
                SynthesisStep::Done => observer.on_done(utterance),
                SynthesisStep::Error => observer.on_error(utterance),
                SynthesisStep::DelayedDone(delay) => {
                    let observer = observer.clone();
                    let utterance = utterance.to_string();
                    thread::spawn(move || {
                        thread::sleep(delay);
                        observer.on_done(&utterance);
                    });
                }
            }
        }
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.inner.lock().unwrap().stop_count += 1;
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        false
    }

    fn set_rate(&self, _rate: f32) -> Result<()> {
        if self.inner.lock().unwrap().accept_rate {
            Ok(())
        } else {
            Err(BridgeError::Engine("rate rejected".to_string()))
        }
    }

    fn set_pitch(&self, _pitch: f32) -> Result<()> {
        if self.inner.lock().unwrap().accept_pitch {
            Ok(())
        } else {
            Err(BridgeError::Engine("pitch rejected".to_string()))
        }
    }

    fn voices(&self) -> Vec<VoiceData> {
        self.inner.lock().unwrap().voices.clone()
    }

    fn current_voice(&self) -> Option<VoiceData> {
        let inner = self.inner.lock().unwrap();
        let name = inner.active_voice.as_deref()?;
        inner.voices.iter().find(|voice| voice.name == name).cloned()
    }

    fn set_voice(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.voices.iter().any(|voice| voice.name == name) {
            inner.active_voice = Some(name.to_string());
            Ok(())
        } else {
            Err(BridgeError::Engine(format!("no voice named '{}'", name)))
        }
    }

    fn max_input_length(&self) -> usize {
        self.inner.lock().unwrap().max_len
    }

    fn engine_packages(&self) -> Vec<String> {
        self.inner.lock().unwrap().packages.clone()
    }

    fn shutdown(&self) {
        self.inner.lock().unwrap().shutdown_count += 1;
    }
}
