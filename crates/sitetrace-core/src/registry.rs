//! # Process-Wide Config Registry
//!
//! The composition-boundary holder for the active [`CaptureConfig`].
//!
//! The core itself takes configs by explicit argument; this registry exists
//! only so application entry points and test harnesses have one place to
//! install a config that [`crate::AssemblyTrace::create_current`] reads.
//!
//! ## Replacement Policy
//!
//! Replacement is a whole-value atomic swap. Every individual read observes
//! either the old or the new config, never a torn mix, but in-flight trace
//! constructions during a swap may observe either side. Install the config
//! before the first pipeline is assembled; steady-state replacement is not
//! a supported pattern.

use crate::config::CaptureConfig;
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::sync::Arc;

static GLOBAL_CONFIG: Lazy<ArcSwap<CaptureConfig>> =
    Lazy::new(|| ArcSwap::from_pointee(CaptureConfig::disabled()));

/// The currently installed config.
///
/// Starts as [`CaptureConfig::disabled`] until something is installed.
#[must_use]
pub fn config() -> Arc<CaptureConfig> {
    GLOBAL_CONFIG.load_full()
}

/// Replace the process-wide config.
pub fn set_config(config: CaptureConfig) {
    GLOBAL_CONFIG.store(Arc::new(config));
}

/// Install a capture config at startup.
///
/// Readable alias of [`set_config`] for application entry points.
pub fn enable(config: CaptureConfig) {
    set_config(config);
}

/// Restore the inert config; subsequent traces capture nothing.
pub fn disable() {
    set_config(CaptureConfig::disabled());
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::AssemblyTrace;
    use crate::types::LogLevel;

    // Single test for the whole install/read/disable sequence: the registry
    // is process-global state and unit tests share one process.
    #[test]
    fn install_read_disable_roundtrip() {
        assert_eq!(config().log_level(), LogLevel::None);

        enable(CaptureConfig::new(true).with_log_level(LogLevel::ShowAll));
        let active = config();
        assert_eq!(active.log_level(), LogLevel::ShowAll);
        assert!(active.should_filter_frames());

        let trace = AssemblyTrace::create_current();
        assert_eq!(trace.log_level(), LogLevel::ShowAll);
        assert!(!trace.frames().is_empty());

        disable();
        assert_eq!(config().log_level(), LogLevel::None);

        let inert = AssemblyTrace::create_current();
        assert!(inert.frames().is_empty());
    }
}
