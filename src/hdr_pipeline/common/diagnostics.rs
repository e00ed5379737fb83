//! Non-fatal diagnostics.
//!
//! Soft errors never unwind a batch. They shrink the working set and are
//! reported here, with the identifier of the offending item, and mirrored to
//! the `tracing` log.

use std::fmt;
use std::path::Path;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An item was dropped from the working set.
    Skipped,
    /// The operation went ahead with reduced effect.
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The offending item, usually a file path or a group label.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn skipped(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::emit(DiagnosticKind::Skipped, subject.into(), message.into())
    }

    pub fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::emit(DiagnosticKind::Warning, subject.into(), message.into())
    }

    pub fn skipped_path(path: &Path, message: impl Into<String>) -> Self {
        Self::skipped(path.display().to_string(), message)
    }

    fn emit(kind: DiagnosticKind, subject: String, message: String) -> Self {
        warn!(subject = %subject, kind = ?kind, "{}", message);
        Self {
            kind,
            subject,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            DiagnosticKind::Skipped => "skipped",
            DiagnosticKind::Warning => "warning",
        };
        write!(f, "{} [{}]: {}", label, self.subject, self.message)
    }
}
