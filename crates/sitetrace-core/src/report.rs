//! # Chain Rendering
//!
//! Human-readable rendering of an annotated cause chain.
//!
//! Output shape: the head error on the first line, each cause indented
//! under a `Caused by:` prefix, and the captured frames of assembly sites
//! listed one per line. Intended for the embedder's logging boundary.

use crate::chain::{Chained, causes};

/// Render an error and its full cause chain.
///
/// Deterministic: output depends only on chain contents and order.
#[must_use]
pub fn render_chain(error: &(dyn Chained + 'static)) -> String {
    let mut out = String::new();

    for (depth, link) in causes(error).enumerate() {
        if depth == 0 {
            out.push_str(&format!("{link}\n"));
        } else {
            out.push_str(&format!("Caused by: {link}\n"));
        }

        if let Some(site) = link.as_site() {
            for frame in site.frames() {
                match (&frame.file, frame.line) {
                    (Some(file), Some(line)) => {
                        out.push_str(&format!("    at {} ({file}:{line})\n", frame.symbol));
                    }
                    _ => out.push_str(&format!("    at {}\n", frame.symbol)),
                }
            }
        }
    }

    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::StageError;
    use crate::config::CaptureConfig;
    use crate::frames::{FrameRecord, StaticWalker};
    use crate::trace::{AssemblyTrace, SITE_MESSAGE};

    #[test]
    fn renders_plain_chain() {
        let error = StageError::with_cause("outer", Box::new(StageError::new("inner")));
        let rendered = render_chain(&error);

        assert_eq!(rendered, "outer\nCaused by: inner\n");
    }

    #[test]
    fn renders_site_frames_with_locations() {
        let walker = StaticWalker::new(vec![
            FrameRecord::located("myapp::build", "src/build.rs", 9),
            FrameRecord::new("myapp::main"),
        ]);
        let trace = AssemblyTrace::create_with(&CaptureConfig::new(true), &walker);
        let mut error = StageError::new("boom");
        trace.annotate(&mut error);

        let rendered = render_chain(&error);

        assert!(rendered.starts_with("boom\n"));
        assert!(rendered.contains(&format!("Caused by: {SITE_MESSAGE}\n")));
        assert!(rendered.contains("    at myapp::build (src/build.rs:9)\n"));
        assert!(rendered.contains("    at myapp::main\n"));
    }
}
