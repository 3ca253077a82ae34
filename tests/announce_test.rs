//! Integration tests for screen reader announcements
//!
//! The anti-duplication suffix is process-wide state, so the one test that
//! drives it through the public `speak` path lives in this binary alone and
//! owns the whole cycle; the other tests here never dispatch announcements.

use std::sync::{Arc, Mutex};
use ttsbridge::announce::ScreenReader;
use ttsbridge::platform::null::NullAccessibility;
use ttsbridge::platform::AccessibilityHost;
use ttsbridge::{BridgeError, Result};

struct FakeAccessibility {
    reachable: bool,
    enabled: bool,
    touch_exploration: bool,
    services: Vec<String>,
    announcements: Mutex<Vec<String>>,
    interrupts: Mutex<u32>,
}

impl FakeAccessibility {
    fn screen_reader() -> Arc<Self> {
        Arc::new(Self {
            reachable: true,
            enabled: true,
            touch_exploration: true,
            services: vec!["com.example.talkback/.Service".to_string()],
            announcements: Mutex::new(Vec::new()),
            interrupts: Mutex::new(0),
        })
    }

    fn announcements(&self) -> Vec<String> {
        self.announcements.lock().unwrap().clone()
    }

    fn interrupts(&self) -> u32 {
        *self.interrupts.lock().unwrap()
    }
}

impl AccessibilityHost for FakeAccessibility {
    fn is_reachable(&self) -> bool {
        self.reachable
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_touch_exploration_enabled(&self) -> bool {
        self.touch_exploration
    }

    fn spoken_feedback_services(&self) -> Vec<String> {
        self.services.clone()
    }

    fn announce(&self, text: &str) -> Result<()> {
        if !self.reachable {
            return Err(BridgeError::Accessibility("unreachable".to_string()));
        }
        self.announcements.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn interrupt(&self) -> Result<()> {
        if !self.reachable {
            return Err(BridgeError::Accessibility("unreachable".to_string()));
        }
        *self.interrupts.lock().unwrap() += 1;
        Ok(())
    }
}

fn trailing_spaces(text: &str) -> usize {
    text.len() - text.trim_end_matches(' ').len()
}

#[test]
fn test_active_requires_spoken_feedback_service() {
    // Enabled alone is not enough: password managers and similar tools
    // enable accessibility without being screen readers.
    let enabled_only = Arc::new(FakeAccessibility {
        reachable: true,
        enabled: true,
        touch_exploration: false,
        services: Vec::new(),
        announcements: Mutex::new(Vec::new()),
        interrupts: Mutex::new(0),
    });
    assert!(!ScreenReader::new(enabled_only).is_active());

    let no_services = Arc::new(FakeAccessibility {
        reachable: true,
        enabled: true,
        touch_exploration: true,
        services: Vec::new(),
        announcements: Mutex::new(Vec::new()),
        interrupts: Mutex::new(0),
    });
    assert!(!ScreenReader::new(no_services).is_active());

    assert!(ScreenReader::new(FakeAccessibility::screen_reader()).is_active());
}

#[test]
fn test_detect_returns_first_service_id() {
    let host = Arc::new(FakeAccessibility {
        reachable: true,
        enabled: true,
        touch_exploration: true,
        services: vec!["first/.Service".to_string(), "second/.Service".to_string()],
        announcements: Mutex::new(Vec::new()),
        interrupts: Mutex::new(0),
    });
    assert_eq!(ScreenReader::new(host).detect(), "first/.Service");

    let silent = Arc::new(FakeAccessibility {
        reachable: true,
        enabled: true,
        touch_exploration: true,
        services: Vec::new(),
        announcements: Mutex::new(Vec::new()),
        interrupts: Mutex::new(0),
    });
    assert_eq!(ScreenReader::new(silent).detect(), "");
}

#[test]
fn test_null_host_degrades_everything() {
    let reader = ScreenReader::new(Arc::new(NullAccessibility));
    assert!(!reader.is_active());
    assert_eq!(reader.detect(), "");
    assert!(!reader.speak("hello", false));
    assert!(!reader.silence());
}

#[test]
fn test_silence_interrupts() {
    let host = FakeAccessibility::screen_reader();
    let reader = ScreenReader::new(host.clone());
    assert!(reader.silence());
    assert_eq!(host.interrupts(), 1);
}

#[test]
fn test_suffix_cycle_through_public_speak() {
    let host = FakeAccessibility::screen_reader();
    let reader = ScreenReader::new(host.clone());

    // First call interrupts; the rest append. Either way the suffix
    // advances one space per dispatched announcement.
    assert!(reader.speak("msg", true));
    assert_eq!(host.interrupts(), 1);
    for _ in 0..21 {
        assert!(reader.speak("msg", false));
    }

    let announcements = host.announcements();
    assert_eq!(announcements.len(), 22);
    for (call, text) in announcements.iter().enumerate() {
        // Lengths 0..=20, then the cycle resets to 0.
        let expected = if call <= 20 { call } else { 0 };
        assert_eq!(
            trailing_spaces(text),
            expected,
            "wrong suffix on call {}",
            call
        );
        assert!(text.starts_with("msg"));
    }
}
