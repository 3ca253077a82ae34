//! ttsbridge - synchronous bridge to platform speech services
//!
//! Presents blocking, per-call APIs over platform text-to-speech and
//! screen-reader announcement services that are natively asynchronous and
//! callback-driven. The platform services live behind the traits in
//! [`platform`]; everything else is the synchronization and correlation
//! protocol that makes their callbacks usable from a synchronous call site.

pub mod announce;
pub mod config;
pub mod dialog;
pub mod error;
pub mod platform;
pub mod speech;
pub mod sync;

pub use error::{BridgeError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "ttsbridge";
