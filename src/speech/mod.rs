//! Speech synthesis bridge
//!
//! [`SpeechBridge`] is the synchronous handle over one platform engine;
//! [`VoiceCatalog`] and [`UtteranceTracker`] carry the voice snapshot and
//! the raw-audio correlation protocol behind it.

pub mod capture;
pub mod engine;
pub mod voices;

pub use capture::{PcmCapture, UtteranceTracker};
pub use engine::{list_engine_packages, ConnectOptions, SpeechBridge, INIT_TIMEOUT, SYNTHESIS_TIMEOUT};
pub use voices::VoiceCatalog;
