//! # Cause Chains
//!
//! The externally-owned error cause chain as an intrusive abstraction.
//!
//! Each chained error holds at most one nested cause in a set-once slot.
//! The core only ever walks a chain and appends at its tail; existing
//! entries are never removed, replaced or reordered.
//!
//! ## Mutation Precondition
//!
//! A chain has a single owner at a time: at most one in-flight mutation per
//! error object. Concurrent `annotate` calls on *different* error objects
//! are always safe; concurrent calls on the *same* object are a caller
//! error. This is documented, not enforced.

use crate::trace::AssemblySite;
use crate::types::ChainError;
use std::error::Error;
use std::fmt;

// =============================================================================
// CHAINED TRAIT
// =============================================================================

/// An error that carries an intrusive optional-cause slot.
///
/// # Extension Point
///
/// Pipeline-stage collaborators implement this on their error types to make
/// them annotatable. The crate ships [`StageError`] as a ready-made
/// implementation and [`AssemblySite`] implements it so later stages can
/// append after an already-spliced site.
pub trait Chained: Error + Send + Sync + 'static {
    /// The nested cause, if any.
    fn cause_link(&self) -> Option<&(dyn Chained + 'static)>;

    /// The cause slot itself, for tail insertion.
    fn cause_link_mut(&mut self) -> &mut Option<Box<dyn Chained + 'static>>;

    /// Identify instrumentation-produced chain entries.
    ///
    /// Returns `Some` only for assembly sites; the injection algorithm uses
    /// this to detect chains that are already annotated.
    fn as_site(&self) -> Option<&AssemblySite> {
        None
    }

    /// Set the cause slot, once.
    ///
    /// Returns [`ChainError::CauseOccupied`] if a cause is already present.
    /// Existing entries are never replaced.
    fn init_cause(&mut self, cause: Box<dyn Chained + 'static>) -> Result<(), ChainError> {
        let slot = self.cause_link_mut();
        if slot.is_some() {
            return Err(ChainError::CauseOccupied);
        }
        *slot = Some(cause);
        Ok(())
    }
}

// =============================================================================
// CHAIN WALKING
// =============================================================================

/// Read-only iterator over an error and its causes, head first.
pub struct CauseIter<'a> {
    next: Option<&'a (dyn Chained + 'static)>,
}

impl<'a> Iterator for CauseIter<'a> {
    type Item = &'a (dyn Chained + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.cause_link();
        Some(current)
    }
}

/// Iterate an error and every cause below it, head first.
pub fn causes<'a>(error: &'a (dyn Chained + 'static)) -> CauseIter<'a> {
    CauseIter { next: Some(error) }
}

/// Total number of links in a chain, including the head error.
#[must_use]
pub fn chain_len(error: &(dyn Chained + 'static)) -> usize {
    causes(error).count()
}

// =============================================================================
// STAGE ERROR
// =============================================================================

/// Chain-capable error for pipeline stages.
///
/// Minimal concrete implementation of [`Chained`] for embedders that do not
/// bring their own chained error type, and for tests.
#[derive(Debug)]
pub struct StageError {
    message: String,
    cause: Option<Box<dyn Chained + 'static>>,
}

impl StageError {
    /// Create an error with no cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create an error with a pre-existing cause.
    #[must_use]
    pub fn with_cause(message: impl Into<String>, cause: Box<dyn Chained + 'static>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause),
        }
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for StageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let cause: &(dyn Error + 'static) = self.cause.as_deref()?;
        Some(cause)
    }
}

impl Chained for StageError {
    fn cause_link(&self) -> Option<&(dyn Chained + 'static)> {
        self.cause.as_deref()
    }

    fn cause_link_mut(&mut self) -> &mut Option<Box<dyn Chained + 'static>> {
        &mut self.cause
    }
}

// =============================================================================
// TESTS
// =============================================================================
