//! Non-fatal problems collected during a generation run.
//!
//! The generator never aborts on ambiguous or incomplete descriptors. Instead it
//! picks a documented default (a warning) or skips the affected unit (an error)
//! and records what happened here, so callers can decide whether the resulting
//! document is good enough. Every entry is mirrored to the `log` facade.

use log::{error, warn};
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Resolved through a safe default; generation continued as usual
    Warning,
    /// A unit (operation, field) could not be completed and was skipped
    Error,
}

/// A single reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Operation being built when the problem occurred, e.g. `GET /items/{id}`
    pub context: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        match &self.context {
            Some(context) => write!(f, "{} [{}]: {}", label, context, self.message),
            None => write!(f, "{}: {}", label, self.message),
        }
    }
}

/// Run-scoped diagnostics sink
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    context: Option<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation context attached to subsequent entries
    pub fn set_context(&mut self, context: Option<String>) {
        self.context = context;
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    fn push(&mut self, severity: Severity, message: String) {
        let diagnostic = Diagnostic {
            severity,
            message,
            context: self.context.clone(),
        };
        match severity {
            Severity::Warning => warn!("{}", diagnostic),
            Severity::Error => error!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
