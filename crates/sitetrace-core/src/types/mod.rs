//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the sitetrace core:
//! - Capture verbosity (`LogLevel`)
//! - The error-observation callback (`ErrorListener`)
//! - Per-call annotation outcomes (`Annotation`)
//! - Error types (`ChainError`)
//!
//! ## Exhaustiveness
//!
//! Verbosity and outcomes are explicit sum types, never sentinel values,
//! so every branch of the injection algorithm is statically checked.

use crate::chain::Chained;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// LOG LEVEL
// =============================================================================

/// How much assembly-site information is captured and chained.
///
/// The level is snapshotted into every [`crate::AssemblyTrace`] at
/// construction; replacing the process-wide config later does not affect
/// traces that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// Capture nothing and never touch error chains.
    /// This is the fast path: no stack walk happens at all.
    None,
    /// Only the innermost assembly site in a chain is recorded.
    /// Outer stages observing the same error leave the chain alone.
    ShowOnlyFirst,
    /// Every stage records its own assembly site, producing a full
    /// chain of construction call sites.
    ShowAll,
}

// =============================================================================
// ERROR LISTENER
// =============================================================================

/// Side-channel notification hook.
///
/// Invoked exactly once per [`crate::AssemblyTrace::annotate`] call with the
/// error being observed, on every branch of the algorithm. Panics raised by
/// the hook are caught and logged, never propagated.
pub type ErrorListener = Arc<dyn Fn(&(dyn Chained + 'static)) + Send + Sync>;

// =============================================================================
// ANNOTATION OUTCOME
// =============================================================================

/// Outcome of a single `annotate` call.
///
/// All variants are success paths; `annotate` never fails. The variant only
/// reports which branch of the injection algorithm was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// An assembly site was appended at the chain tail.
    Appended,
    /// This exact trace was already present in the chain.
    /// Guards both duplicate work and self-referential cycles.
    AlreadyAnnotated,
    /// Level is `ShowOnlyFirst` and some other trace already
    /// recorded the innermost site.
    FirstAlreadyRecorded,
    /// Level is `None`; the chain was never walked.
    Disabled,
}

impl Annotation {
    /// True when the call structurally mutated the chain.
    #[must_use]
    pub fn appended(self) -> bool {
        self == Self::Appended
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while manipulating a cause chain.
///
/// - No silent failures
/// - The core never panics; all errors are recoverable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    /// Attempted to initialise a cause slot that already holds a cause.
    /// Cause slots are set-once; existing entries are never replaced.
    #[error("cause slot already occupied")]
    CauseOccupied,
}

// =============================================================================
// TESTS
// =============================================================================
