//! Diagnostics returned alongside generated cases
//!
//! Generation tolerates partially specified inputs: a decision rule whose
//! references do not resolve is skipped, an invalid pattern skips one field.
//! Each such event is recorded here so the caller can see what was left out.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A problem found while building models or generating cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,

    /// Rule position, condition id, variable or field the diagnostic is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Severity {
    Error,
    Warning,
}

/// Kind of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DiagnosticCode {
    /// A decision rule references a condition or action that does not exist
    UnresolvedReference,
    /// A decision node matches neither the single-level nor the nested shape
    UnrecognizedRule,
    /// Two conditions share an id
    DuplicateConditionId,
    /// A range condition with min >= max
    InvertedRange,
    /// Two range conditions of one variable overlap
    OverlappingRanges,
    /// A syntax pattern failed to parse or generate
    InvalidPattern,
    /// An input declares a scale other than Range, Nominal or Ordinal
    UnknownScale,
}

impl Diagnostic {
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            subject: None,
        }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Emit this diagnostic through `tracing`
    pub(crate) fn log(&self) {
        match self.severity {
            Severity::Error => tracing::error!(code = ?self.code, subject = ?self.subject, "{}", self.message),
            Severity::Warning => tracing::warn!(code = ?self.code, subject = ?self.subject, "{}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}[{:?}]: {}", level, self.code, self.message)
    }
}
