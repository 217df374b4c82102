//! # sitetrace-core
//!
//! Assembly-site trace capture for asynchronous pipelines - THE LOGIC.
//!
//! An error surfacing deep inside an async pipeline carries a stack trace
//! that points at dispatch machinery, not at the code that built the
//! failing stage. This crate captures a filtered call stack when a stage is
//! constructed and, when an error later flows through that stage, splices
//! the capture into the error's cause chain so the construction site
//! becomes diagnosable.
//!
//! ## Consumers
//!
//! The pipeline-stage wrapper that decides *when* to capture and annotate
//! lives outside this crate. Its contract is narrow:
//! - at stage construction: [`AssemblyTrace::create`] (or
//!   [`AssemblyTrace::create_current`] against the process-wide registry)
//! - on error: [`AssemblyTrace::annotate`], then forward the error
//!
//! ## Architectural Constraints
//!
//! - Pure synchronous Rust: no async, no tasks, no blocking, no timers
//! - Capture reads only the calling thread's own stack
//! - Chains are walked and appended to, never rewritten
//! - `annotate` never fails and never raises

// =============================================================================
// MODULES
// =============================================================================

pub mod chain;
pub mod config;
pub mod frames;
pub mod registry;
pub mod report;
pub mod trace;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Annotation, ChainError, ErrorListener, LogLevel};

// =============================================================================
// RE-EXPORTS: Configuration
// =============================================================================

pub use config::CaptureConfig;

// =============================================================================
// RE-EXPORTS: Capture
// =============================================================================

pub use frames::{BacktraceWalker, FrameRecord, StackWalker, StaticWalker};
pub use trace::{AssemblySite, AssemblyTrace, SITE_MESSAGE};

// =============================================================================
// RE-EXPORTS: Cause Chains
// =============================================================================

pub use chain::{CauseIter, Chained, StageError, causes, chain_len};
pub use report::render_chain;
