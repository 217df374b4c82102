//! # Assembly Traces
//!
//! Capture at construction time, injection at error time.
//!
//! An [`AssemblyTrace`] is created exactly once when a pipeline stage is
//! assembled. It snapshots the capture config and walks the constructing
//! thread's stack. When an error later flows through the owning stage,
//! [`AssemblyTrace::annotate`] splices an [`AssemblySite`] into the error's
//! cause chain so the construction call site survives into diagnostics.
//!
//! ## Lifecycle
//!
//! - One trace per stage construction; immutable afterwards
//! - One trace annotates arbitrarily many distinct errors
//! - Traces share no mutable state; `annotate` on different error objects
//!   is freely concurrent

use crate::chain::Chained;
use crate::config::CaptureConfig;
use crate::frames::{BacktraceWalker, FrameRecord, StackWalker};
use crate::types::{Annotation, ErrorListener, LogLevel};
use std::error::Error;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Fixed diagnostic line carried by every spliced assembly site.
pub const SITE_MESSAGE: &str = "assembly trace generated at call site";

/// Process-unique site identities, stamped at capture time.
///
/// Identity is an id rather than a pointer: the capture is shared through
/// an `Arc` and spliced into many chains, so spliced values never compare
/// equal by address.
static NEXT_SITE_ID: AtomicU64 = AtomicU64::new(1);

/// The captured stack shared between a trace and every site it splices.
#[derive(Debug)]
struct SiteCapture {
    id: u64,
    frames: Vec<FrameRecord>,
}

// =============================================================================
// ASSEMBLY TRACE
// =============================================================================

/// Capture token created once per pipeline-stage construction.
///
/// Config fields are snapshotted at creation; replacing the process-wide
/// config afterwards does not affect this trace.
pub struct AssemblyTrace {
    log_level: LogLevel,
    filter_frames: bool,
    listener: Option<ErrorListener>,
    capture: Arc<SiteCapture>,
}

impl AssemblyTrace {
    /// Capture the current call stack under the given config.
    ///
    /// With [`LogLevel::None`] the stack walk is skipped entirely and the
    /// capture stays empty; this is the performance fast path.
    #[must_use]
    pub fn create(config: &CaptureConfig) -> Self {
        Self::create_with(config, &BacktraceWalker)
    }

    /// Capture through an injected [`StackWalker`].
    ///
    /// Tests and embedder harnesses supply deterministic walkers here; the
    /// algorithm is otherwise identical to [`AssemblyTrace::create`].
    #[must_use]
    pub fn create_with(config: &CaptureConfig, walker: &dyn StackWalker) -> Self {
        let frames = if config.log_level() == LogLevel::None {
            Vec::new()
        } else {
            let raw = walker.capture();
            if config.should_filter_frames() {
                raw.into_iter().filter(|frame| !frame.is_noise()).collect()
            } else {
                raw
            }
        };

        Self {
            log_level: config.log_level(),
            filter_frames: config.should_filter_frames(),
            listener: config.listener().cloned(),
            capture: Arc::new(SiteCapture {
                id: NEXT_SITE_ID.fetch_add(1, Ordering::Relaxed),
                frames,
            }),
        }
    }

    /// Capture under the process-wide config (see [`crate::registry`]).
    #[must_use]
    pub fn create_current() -> Self {
        Self::create(&crate::registry::config())
    }

    /// The process-unique identity of this capture.
    #[must_use]
    pub fn site_id(&self) -> u64 {
        self.capture.id
    }

    /// The captured frames; empty when the level was [`LogLevel::None`].
    #[must_use]
    pub fn frames(&self) -> &[FrameRecord] {
        &self.capture.frames
    }

    /// The verbosity snapshotted at creation.
    #[must_use]
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Whether noise filtering was applied at creation.
    #[must_use]
    pub fn should_filter_frames(&self) -> bool {
        self.filter_frames
    }

    /// A fresh chain entry sharing this trace's capture.
    #[must_use]
    pub fn site(&self) -> AssemblySite {
        AssemblySite {
            capture: Arc::clone(&self.capture),
            cause: None,
        }
    }

    /// Splice this trace into the error's cause chain.
    ///
    /// Walks the chain from `error` downward and appends a fresh
    /// [`AssemblySite`] at the tail, unless:
    /// - the level is [`LogLevel::None`]: the chain is never walked;
    /// - a site produced by *this* trace is already present: duplicate work
    ///   and self-referential cycles are both no-ops;
    /// - the level is [`LogLevel::ShowOnlyFirst`] and *any* site is already
    ///   present: only the innermost assembly site is recorded.
    ///
    /// Existing entries are never removed or reordered. The listener is
    /// notified exactly once per call, after any structural mutation, with
    /// the original error, on every branch. Never fails.
    ///
    /// # Precondition
    ///
    /// At most one in-flight `annotate` per error object. Calls on distinct
    /// error objects are freely concurrent.
    pub fn annotate(&self, error: &mut (dyn Chained + 'static)) -> Annotation {
        let outcome = self.splice(error);
        self.notify(&*error);
        outcome
    }

    fn splice(&self, error: &mut (dyn Chained + 'static)) -> Annotation {
        if self.log_level == LogLevel::None {
            return Annotation::Disabled;
        }

        let mut slot = error.cause_link_mut();
        while let Some(link) = slot {
            if let Some(site) = link.as_site() {
                if site.site_id() == self.capture.id {
                    return Annotation::AlreadyAnnotated;
                }
                if self.log_level == LogLevel::ShowOnlyFirst {
                    return Annotation::FirstAlreadyRecorded;
                }
            }
            slot = link.cause_link_mut();
        }

        *slot = Some(Box::new(self.site()));
        Annotation::Appended
    }

    /// Invoke the listener, swallowing panics.
    ///
    /// The observability side channel must never destabilize the primary
    /// error path: a panicking listener is recorded on the diagnostic sink
    /// and discarded.
    fn notify(&self, error: &(dyn Chained + 'static)) {
        if let Some(listener) = self.listener.as_deref() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| listener(error))) {
                let message = panic_message(payload.as_ref());
                warn!("error listener panicked during notification: {message}");
            }
        }
    }
}

impl fmt::Debug for AssemblyTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssemblyTrace")
            .field("site_id", &self.capture.id)
            .field("log_level", &self.log_level)
            .field("filter_frames", &self.filter_frames)
            .field("frames", &self.capture.frames.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

// =============================================================================
// ASSEMBLY SITE
// =============================================================================

/// The terminal chain entry a trace splices into an error.
///
/// A site is a data object for later human inspection: it is only ever
/// *returned* inside a chain, never raised by the core itself. Its cause
/// slot starts empty so outer stages can append after it.
#[derive(Debug)]
pub struct AssemblySite {
    capture: Arc<SiteCapture>,
    cause: Option<Box<dyn Chained + 'static>>,
}

impl AssemblySite {
    /// Identity of the trace that produced this site.
    #[must_use]
    pub fn site_id(&self) -> u64 {
        self.capture.id
    }

    /// The frames captured when the owning stage was assembled.
    #[must_use]
    pub fn frames(&self) -> &[FrameRecord] {
        &self.capture.frames
    }
}

impl fmt::Display for AssemblySite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SITE_MESSAGE)
    }
}

impl Error for AssemblySite {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let cause: &(dyn Error + 'static) = self.cause.as_deref()?;
        Some(cause)
    }
}

impl Chained for AssemblySite {
    fn cause_link(&self) -> Option<&(dyn Chained + 'static)> {
        self.cause.as_deref()
    }

    fn cause_link_mut(&mut self) -> &mut Option<Box<dyn Chained + 'static>> {
        &mut self.cause
    }

    fn as_site(&self) -> Option<&AssemblySite> {
        Some(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
