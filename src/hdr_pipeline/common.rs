//! Common utilities module
//!
//! This module contains the error type and the diagnostic channel shared by
//! every stage of the HDR pipeline.

pub mod diagnostics;
pub mod error;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{PipelineError, Result};
