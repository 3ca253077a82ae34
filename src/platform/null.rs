//! No-op platform hosts
//!
//! Used on hosts without speech or accessibility services. Initialization
//! resolves to `Failed` immediately rather than hanging, announcements are
//! unreachable, and every submission is rejected synchronously, so callers
//! see the same degraded values they would for a broken platform service.

use crate::platform::{
    AccessibilityHost, EngineStatus, InitObserver, SpeechEngine, UtteranceObserver,
    UtteranceParams, VoiceData,
};
use crate::{BridgeError, Result};
use log::debug;
use std::path::Path;
use std::sync::Arc;

/// Speech engine stand-in that fails initialization immediately
pub struct NullEngine;

impl SpeechEngine for NullEngine {
    fn begin_init(&self, engine_id: Option<&str>, observer: Arc<dyn InitObserver>) {
        debug!("null engine: failing init (requested engine {:?})", engine_id);
        observer.engine_ready(EngineStatus::Failed);
    }

    fn set_utterance_observer(&self, _observer: Arc<dyn UtteranceObserver>) {}

    fn speak(&self, _text: &str, _flush: bool, _params: UtteranceParams) -> Result<()> {
        Err(BridgeError::Engine("no speech engine available".to_string()))
    }

    fn synthesize(
        &self,
        _text: &str,
        _params: UtteranceParams,
        _utterance: &str,
        _scratch: &Path,
    ) -> Result<()> {
        Err(BridgeError::Engine("no speech engine available".to_string()))
    }

    fn stop(&self) -> Result<()> {
        Err(BridgeError::Engine("no speech engine available".to_string()))
    }

    fn is_speaking(&self) -> bool {
        false
    }

    fn set_rate(&self, _rate: f32) -> Result<()> {
        Err(BridgeError::Engine("no speech engine available".to_string()))
    }

    fn set_pitch(&self, _pitch: f32) -> Result<()> {
        Err(BridgeError::Engine("no speech engine available".to_string()))
    }

    fn voices(&self) -> Vec<VoiceData> {
        Vec::new()
    }

    fn current_voice(&self) -> Option<VoiceData> {
        None
    }

    fn set_voice(&self, _name: &str) -> Result<()> {
        Err(BridgeError::Engine("no speech engine available".to_string()))
    }

    fn max_input_length(&self) -> usize {
        0
    }

    fn engine_packages(&self) -> Vec<String> {
        Vec::new()
    }

    fn shutdown(&self) {}
}

/// Accessibility host stand-in with no service connection
pub struct NullAccessibility;

impl AccessibilityHost for NullAccessibility {
    fn is_reachable(&self) -> bool {
        false
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn is_touch_exploration_enabled(&self) -> bool {
        false
    }

    fn spoken_feedback_services(&self) -> Vec<String> {
        Vec::new()
    }

    fn announce(&self, _text: &str) -> Result<()> {
        Err(BridgeError::Accessibility(
            "no accessibility service available".to_string(),
        ))
    }

    fn interrupt(&self) -> Result<()> {
        Err(BridgeError::Accessibility(
            "no accessibility service available".to_string(),
        ))
    }
}
