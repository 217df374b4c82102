//! # Capture Configuration
//!
//! Process-wide capture settings as an immutable value.
//!
//! A `CaptureConfig` is read-mostly: pipeline stages read it once at
//! construction time and snapshot the fields they need. Replacing the
//! process-wide value (see [`crate::registry`]) never mutates an existing
//! config in place; the whole value is swapped.

use crate::chain::Chained;
use crate::types::{ErrorListener, LogLevel};
use std::fmt;
use std::sync::Arc;

/// Configuration for assembly-site capture.
///
/// Pure value holder: no validation, no side effects. All inputs are
/// accepted as-is. Safe to read from any number of concurrent pipeline
/// constructions.
#[derive(Clone)]
pub struct CaptureConfig {
    /// Whether instrumentation-owned frames are removed from captures.
    filter_frames: bool,
    /// Capture verbosity, snapshotted into every trace at construction.
    log_level: LogLevel,
    /// Optional error-observation hook.
    listener: Option<ErrorListener>,
}

impl CaptureConfig {
    /// Create a config with the given frame filtering.
    ///
    /// The level defaults to [`LogLevel::ShowAll`] and no listener is
    /// installed.
    #[must_use]
    pub fn new(filter_frames: bool) -> Self {
        Self {
            filter_frames,
            log_level: LogLevel::ShowAll,
            listener: None,
        }
    }

    /// The inert config: nothing is captured, chains are never touched.
    ///
    /// This is the initial process-wide value.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            filter_frames: false,
            log_level: LogLevel::None,
            listener: None,
        }
    }

    /// Set the capture verbosity.
    #[must_use]
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Install an error-observation hook.
    ///
    /// The hook is invoked once per `annotate` call, on every branch of the
    /// injection algorithm. Panics it raises are caught and logged.
    #[must_use]
    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&(dyn Chained + 'static)) + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Whether instrumentation frames are removed from captures.
    #[must_use]
    pub fn should_filter_frames(&self) -> bool {
        self.filter_frames
    }

    /// The capture verbosity.
    #[must_use]
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// The installed error listener, if any.
    #[must_use]
    pub fn listener(&self) -> Option<&ErrorListener> {
        self.listener.as_ref()
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for CaptureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureConfig")
            .field("filter_frames", &self.filter_frames)
            .field("log_level", &self.log_level)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_show_all_without_listener() {
        let config = CaptureConfig::new(true);
        assert!(config.should_filter_frames());
        assert_eq!(config.log_level(), LogLevel::ShowAll);
        assert!(config.listener().is_none());
    }

    #[test]
    fn disabled_captures_nothing() {
        let config = CaptureConfig::disabled();
        assert!(!config.should_filter_frames());
        assert_eq!(config.log_level(), LogLevel::None);
        assert!(config.listener().is_none());
    }

    #[test]
    fn default_is_disabled() {
        let config = CaptureConfig::default();
        assert_eq!(config.log_level(), LogLevel::None);
    }

    #[test]
    fn builder_sets_level_and_listener() {
        let config = CaptureConfig::new(false)
            .with_log_level(LogLevel::ShowOnlyFirst)
            .with_listener(|_error| {});

        assert_eq!(config.log_level(), LogLevel::ShowOnlyFirst);
        assert!(config.listener().is_some());
    }

    #[test]
    fn debug_does_not_require_debug_listener() {
        let config = CaptureConfig::new(true).with_listener(|_error| {});
        let rendered = format!("{config:?}");
        assert!(rendered.contains("listener: true"));
    }
}
