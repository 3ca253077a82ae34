//! Blocking modal prompts
//!
//! Each prompt is one UI action resolved exactly once by user interaction,
//! exposed as a blocking call over the [`DialogHost`] completion contract.
//! Cancellation, dismissal, and host failure all resolve to the same
//! sentinel so the caller never distinguishes how a dialog went away.

use crate::platform::{DialogHost, InfoDialogSpec, InputDialogSpec};
use crate::sync::{Completer, Completion};
use log::debug;
use std::time::Duration;

/// Reserved result for a cancelled or dismissed text prompt
pub const CANCEL_SENTINEL: &str = "\u{00FF}";

/// Show a one-shot editable text prompt and block for the outcome
///
/// Resolves to the edited text on confirmation, or to
/// [`CANCEL_SENTINEL`] on cancel, dismissal, or host failure. Waits
/// indefinitely; human input has no natural bound.
pub fn prompt_text(host: &dyn DialogHost, title: &str, message: &str, default_text: &str) -> String {
    let completion = Completion::new();
    let spec = InputDialogSpec {
        title: title.to_string(),
        message: message.to_string(),
        default_text: default_text.to_string(),
    };
    host.show_input(&spec, Completer::new(completion.clone()));
    match completion.wait() {
        Some(text) => text,
        None => {
            debug!("text prompt cancelled or dismissed");
            CANCEL_SENTINEL.to_string()
        }
    }
}

/// Bounded variant of [`prompt_text`]; timeout resolves to the sentinel
pub fn prompt_text_timeout(
    host: &dyn DialogHost,
    title: &str,
    message: &str,
    default_text: &str,
    timeout: Duration,
) -> String {
    let completion = Completion::new();
    let spec = InputDialogSpec {
        title: title.to_string(),
        message: message.to_string(),
        default_text: default_text.to_string(),
    };
    host.show_input(&spec, Completer::new(completion.clone()));
    completion
        .wait_timeout(timeout)
        .unwrap_or_else(|| CANCEL_SENTINEL.to_string())
}

/// Show a one-shot scrollable information dialog and block until closed
///
/// Close and dismissal are equivalent completions; there is nothing to
/// cancel, so the call always returns unit.
pub fn prompt_info(host: &dyn DialogHost, title: &str, message: &str, body: &str) {
    let completion = Completion::new();
    let spec = InfoDialogSpec {
        title: title.to_string(),
        message: message.to_string(),
        body: body.to_string(),
    };
    host.show_info(&spec, Completer::new(completion.clone()));
    completion.wait();
}

/// Bounded variant of [`prompt_info`]
pub fn prompt_info_timeout(
    host: &dyn DialogHost,
    title: &str,
    message: &str,
    body: &str,
    timeout: Duration,
) {
    let completion = Completion::new();
    let spec = InfoDialogSpec {
        title: title.to_string(),
        message: message.to_string(),
        body: body.to_string(),
    };
    host.show_info(&spec, Completer::new(completion.clone()));
    completion.wait_timeout(timeout);
}
