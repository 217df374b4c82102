//! # Frame Capture
//!
//! Stack-frame records and the pluggable capture capability.
//!
//! - `FrameRecord`: one frame of a captured call stack, innermost first
//! - noise filtering: a pure predicate over originating-unit identifiers
//! - `StackWalker`: the injected capability that produces captures, so
//!   tests can supply synthetic stacks instead of walking the real one

use serde::{Deserialize, Serialize};

/// Identifiers that mark a frame as instrumentation noise.
///
/// A filtered capture removes frames originating from:
/// - this crate itself (capture, registry and splicing machinery)
/// - pipeline-stage wrappers following the `on_assembly` naming convention
/// - the backtrace machinery that produced the capture
///
/// Everything between the user's call site and the capture point matches one
/// of these markers; the user's own frames match none of them.
const NOISE_MARKERS: &[&str] = &["sitetrace_core::", "on_assembly", "backtrace::"];

// =============================================================================
// FRAME RECORD
// =============================================================================

/// One frame of a captured call stack.
///
/// The `symbol` is the originating-unit identifier that noise filtering
/// inspects. File and line are best effort; unresolved frames keep `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Fully qualified symbol name of the frame.
    pub symbol: String,
    /// Source file, when debug info could resolve it.
    pub file: Option<String>,
    /// Line number, when debug info could resolve it.
    pub line: Option<u32>,
}

impl FrameRecord {
    /// Create a frame record with no source location.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            file: None,
            line: None,
        }
    }

    /// Create a frame record with a resolved source location.
    #[must_use]
    pub fn located(symbol: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            symbol: symbol.into(),
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// True when this frame belongs to the instrumentation machinery
    /// rather than the user's code.
    ///
    /// Pure predicate over the symbol name; no depth limit, no truncation
    /// beyond this removal.
    #[must_use]
    pub fn is_noise(&self) -> bool {
        NOISE_MARKERS
            .iter()
            .any(|marker| self.symbol.contains(marker))
    }
}

// =============================================================================
// STACK WALKER CAPABILITY
// =============================================================================

/// Capability that captures the calling thread's stack.
///
/// # Extension Point
///
/// Injected into [`crate::AssemblyTrace::create_with`] so embedders and
/// tests can supply deterministic stacks. Implementations must be
/// synchronous and read only the calling thread's own execution stack.
/// A platform that cannot produce a stack returns an empty sequence;
/// capture never fails.
pub trait StackWalker: Send + Sync {
    /// Capture the current call stack, innermost frame first.
    fn capture(&self) -> Vec<FrameRecord>;
}

/// Production walker over the real execution stack.
pub struct BacktraceWalker;

impl StackWalker for BacktraceWalker {
    fn capture(&self) -> Vec<FrameRecord> {
        let backtrace = backtrace::Backtrace::new();
        let mut frames = Vec::new();

        for frame in backtrace.frames() {
            for symbol in frame.symbols() {
                let name = symbol
                    .name()
                    .map_or_else(|| String::from("<unresolved>"), |name| name.to_string());
                frames.push(FrameRecord {
                    symbol: name,
                    file: symbol.filename().map(|path| path.display().to_string()),
                    line: symbol.lineno(),
                });
            }
        }

        frames
    }
}

/// Deterministic walker over a fixed frame sequence.
///
/// Intended for tests and embedder test harnesses that need reproducible
/// captures independent of the real execution stack.
pub struct StaticWalker {
    frames: Vec<FrameRecord>,
}

impl StaticWalker {
    /// Create a walker that always reports the given frames.
    #[must_use]
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self { frames }
    }
}

impl StackWalker for StaticWalker {
    fn capture(&self) -> Vec<FrameRecord> {
        self.frames.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
