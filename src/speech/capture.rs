//! Raw-audio synthesis with utterance-token correlation
//!
//! The engine delivers synthesis progress through a single process-wide
//! observer, so each blocking request tags itself with a fresh token and
//! every callback is matched against the current token before it may touch
//! the capture. A callback for a superseded or abandoned request matches
//! nothing and is discarded.

use crate::platform::{PcmFormat, SpeechEngine, UtteranceObserver, UtteranceParams};
use crate::sync::{lock, Latch};
use log::{debug, warn};
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Monotonic base for utterance-token derivation
static TOKEN_EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Per-process counter so tokens minted within one millisecond stay unique
static TOKEN_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_token() -> String {
    let millis = TOKEN_EPOCH.elapsed().as_millis();
    let seq = TOKEN_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("utt-{}-{}", millis, seq)
}

/// Wrapper-private scratch sink for synthesis-to-file requests
///
/// Deterministically named; removed when each request concludes.
fn scratch_path() -> PathBuf {
    std::env::temp_dir().join(format!("{}-synth.wav", crate::APP_NAME))
}

/// Accumulated result of one raw-audio synthesis request
#[derive(Debug, Default)]
pub struct PcmCapture {
    pub format: PcmFormat,
    pub buffer: Vec<u8>,
    pub succeeded: bool,
}

struct CaptureState {
    /// Correlation key of the outstanding request; None when idle.
    token: Option<String>,
    /// Completion signal for the outstanding request; fresh per request so
    /// a late terminal callback cannot release a future caller.
    latch: Option<Arc<Latch>>,
    capture: PcmCapture,
}

/// Tracks the one in-flight synthesis request and its capture
pub struct UtteranceTracker {
    state: Mutex<CaptureState>,
}

impl UtteranceTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(CaptureState {
                token: None,
                latch: None,
                capture: PcmCapture::default(),
            }),
        })
    }

    /// Synthesize `text` to a PCM buffer, blocking up to `timeout`
    ///
    /// Returns the accumulated audio on success; None on synchronous
    /// rejection, error completion, or timeout. At most one request may be
    /// outstanding; a concurrent call is rejected without disturbing the
    /// in-flight capture.
    pub fn synthesize(
        &self,
        engine: &dyn SpeechEngine,
        text: &str,
        params: UtteranceParams,
        timeout: Duration,
    ) -> Option<Vec<u8>> {
        let (token, latch) = {
            let mut state = lock(&self.state);
            if state.token.is_some() {
                warn!("synthesis already in flight, rejecting request");
                return None;
            }
            let token = next_token();
            let latch = Arc::new(Latch::new());
            state.token = Some(token.clone());
            state.latch = Some(latch.clone());
            state.capture = PcmCapture::default();
            (token, latch)
        };

        let scratch = scratch_path();
        // The lock is not held across the submission, so an engine that
        // delivers callbacks synchronously from the submitting thread works
        // the same as one that uses its own threads.
        if let Err(e) = engine.synthesize(text, params, &token, &scratch) {
            debug!("synthesis submission rejected: {}", e);
            let mut state = lock(&self.state);
            state.token = None;
            state.latch = None;
            return None;
        }

        let completed = latch.wait_timeout(timeout);

        let mut state = lock(&self.state);
        state.token = None;
        state.latch = None;
        let _ = fs::remove_file(&scratch);
        if !completed {
            debug!("synthesis timed out after {:?}", timeout);
            // A terminal callback racing the timeout lost; the caller never
            // receives this capture, so it must not read as successful.
            state.capture.succeeded = false;
            return None;
        }
        if state.capture.succeeded {
            Some(std::mem::take(&mut state.capture.buffer))
        } else {
            debug!("synthesis reported failure");
            None
        }
    }

    /// Format of the most recent successful capture
    ///
    /// Valid after a successful [`UtteranceTracker::synthesize`] until the
    /// next request resets it.
    pub fn last_format(&self) -> PcmFormat {
        lock(&self.state).capture.format
    }

    fn finish(&self, utterance: &str, succeeded: bool) {
        let mut state = lock(&self.state);
        if state.token.as_deref() != Some(utterance) {
            debug!("ignoring stale terminal callback for '{}'", utterance);
            return;
        }
        state.capture.succeeded = succeeded;
        if let Some(latch) = &state.latch {
            latch.fire();
        }
    }
}

impl UtteranceObserver for UtteranceTracker {
    fn on_synthesis_start(&self, utterance: &str, format: PcmFormat) {
        let mut state = lock(&self.state);
        if state.token.as_deref() != Some(utterance) {
            debug!("ignoring stale format callback for '{}'", utterance);
            return;
        }
        state.capture.format = format;
    }

    fn on_audio_chunk(&self, utterance: &str, chunk: &[u8]) {
        let mut state = lock(&self.state);
        if state.token.as_deref() != Some(utterance) {
            debug!("ignoring stale audio chunk for '{}'", utterance);
            return;
        }
        state.capture.buffer.extend_from_slice(chunk);
    }

    fn on_done(&self, utterance: &str) {
        self.finish(utterance, true);
    }

    fn on_error(&self, utterance: &str) {
        self.finish(utterance, false);
    }
}
