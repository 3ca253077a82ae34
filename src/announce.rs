//! Screen reader announcements
//!
//! A stateless facade over the platform accessibility service, independent
//! of any speech engine connection. Some screen readers suppress an
//! announcement that repeats the previous one verbatim, so every outgoing
//! message carries a process-wide suffix of spaces that changes on each
//! call; the suffix is shared by all announcement call sites on purpose.

use crate::platform::AccessibilityHost;
use crate::sync::lock;
use log::debug;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

/// Longest suffix appended before the cycle resets to empty
const SUFFIX_LIMIT: usize = 20;

/// The changing whitespace suffix that defeats duplicate suppression
pub(crate) struct SuffixCycle {
    suffix: String,
}

impl SuffixCycle {
    pub(crate) fn new() -> Self {
        Self {
            suffix: String::new(),
        }
    }

    /// Return the suffix for this call and advance the cycle
    ///
    /// Grows one space per call; once the stored suffix exceeds
    /// [`SUFFIX_LIMIT`] it resets to empty.
    pub(crate) fn advance(&mut self) -> String {
        let current = self.suffix.clone();
        self.suffix.push(' ');
        if self.suffix.len() > SUFFIX_LIMIT {
            self.suffix.clear();
        }
        current
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.suffix.len()
    }
}

/// Process-wide cycle state, mutated only by [`ScreenReader::speak`]
static SUFFIX: Lazy<Mutex<SuffixCycle>> = Lazy::new(|| Mutex::new(SuffixCycle::new()));

fn next_suffix() -> String {
    lock(&SUFFIX).advance()
}

/// One-shot spoken announcements through the accessibility service
pub struct ScreenReader {
    host: Arc<dyn AccessibilityHost>,
}

impl ScreenReader {
    pub fn new(host: Arc<dyn AccessibilityHost>) -> Self {
        Self { host }
    }

    /// A spoken-feedback screen reader is running
    ///
    /// Requires the service to be enabled with touch exploration on AND at
    /// least one enabled service declaring spoken-feedback capability; the
    /// extra checks keep password managers and similar accessibility tools
    /// from reading as screen readers.
    pub fn is_active(&self) -> bool {
        self.host.is_reachable()
            && self.host.is_enabled()
            && self.host.is_touch_exploration_enabled()
            && !self.host.spoken_feedback_services().is_empty()
    }

    /// Identifier of the first spoken-feedback service
    ///
    /// Best-effort diagnostic: platform enumeration order, empty string
    /// when none qualifies.
    pub fn detect(&self) -> String {
        if !self.host.is_reachable()
            || !self.host.is_enabled()
            || !self.host.is_touch_exploration_enabled()
        {
            return String::new();
        }
        self.host
            .spoken_feedback_services()
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// Dispatch a one-shot announcement
    ///
    /// Fails only when no accessibility connection exists. `interrupt`
    /// silences any in-flight announcement first. The call does not wait
    /// for the announcement to be rendered.
    pub fn speak(&self, text: &str, interrupt: bool) -> bool {
        if !self.host.is_reachable() {
            return false;
        }
        if interrupt {
            if let Err(e) = self.host.interrupt() {
                debug!("announcement interrupt failed: {}", e);
            }
        }
        let message = format!("{}{}", text, next_suffix());
        if let Err(e) = self.host.announce(&message) {
            debug!("announcement dispatch failed: {}", e);
        }
        true
    }

    /// Silence any in-flight announcement
    pub fn silence(&self) -> bool {
        self.host.is_reachable() && self.host.interrupt().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_grows_one_space_per_call() {
        let mut cycle = SuffixCycle::new();
        for expected in 0..=SUFFIX_LIMIT {
            assert_eq!(cycle.advance().len(), expected);
        }
    }

    #[test]
    fn test_suffix_resets_past_limit() {
        let mut cycle = SuffixCycle::new();
        // Drain one full cycle: the call that would store 21 spaces resets.
        for _ in 0..=SUFFIX_LIMIT {
            cycle.advance();
        }
        assert_eq!(cycle.len(), 0);
        assert_eq!(cycle.advance(), "");
        assert_eq!(cycle.len(), 1);
    }

    #[test]
    fn test_suffix_cycle_is_deterministic() {
        let mut a = SuffixCycle::new();
        let mut b = SuffixCycle::new();
        for _ in 0..100 {
            assert_eq!(a.advance(), b.advance());
        }
    }
}
