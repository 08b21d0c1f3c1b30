//! Console presenter — progress lines, colorized diff, correction summary.
//!
//! Output is for humans at a terminal; nothing parses it downstream. Rendering
//! is split from printing so tests can assert on the rendered strings.

pub mod diff;

pub use diff::{chunk_sentences, unified_diff};

use crate::service::CorrectionReport;

const RED: &str = "\x1b[91m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

/// Unchanged context chunks shown around each diff hunk.
const DIFF_CONTEXT: usize = 3;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a colorized sentence-level unified diff.
///
/// Removed sentences are red, added ones green, headers and context plain.
/// Returns an empty string when the texts chunk identically.
pub fn render_diff(original: &str, corrected: &str) -> String {
    let old = chunk_sentences(original);
    let new = chunk_sentences(corrected);

    let mut out = String::new();
    for line in unified_diff(&old, &new, DIFF_CONTEXT) {
        if line.starts_with('+') && !line.starts_with("+++") {
            out.push_str(GREEN);
            out.push_str(&line);
            out.push_str(RESET);
        } else if line.starts_with('-') && !line.starts_with("---") {
            out.push_str(RED);
            out.push_str(&line);
            out.push_str(RESET);
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }
    out
}

/// Render the one-line-per-field correction summary.
pub fn render_summary(report: &CorrectionReport) -> String {
    format!(
        "\n + Original text strength: {}\n + Original text tone: {}\n + Summary of corrections: {}\n",
        report.strength, report.tone, report.summary
    )
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/// Prints pipeline progress and results to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// A ` + ` progress line.
    pub fn progress(&self, message: &str) {
        println!(" + {message}");
    }

    /// A ` - ` failure line.
    pub fn failure(&self, message: &str) {
        println!(" - {message}");
    }

    /// Echo the captured selection.
    pub fn captured(&self, text: &str) {
        println!("\n + Copied text:\n{text}\n");
    }

    /// Print the full result block: corrected text, diff, summary.
    pub fn corrected(&self, original: &str, report: &CorrectionReport) {
        println!(" + Received corrected content:\n{}\n", report.corrected_text);
        print!("{}", render_diff(original, &report.corrected_text));
        print!("{}", render_summary(report));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
