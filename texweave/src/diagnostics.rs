//! Non-fatal conversion warnings

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnknownEnvironment,
    UnknownCommand,
    UnknownToken,
}

/// A construct no specific visitor recognized; it was passed through raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub name: String,
    /// Output ancestors at the point of the warning, outermost first
    pub path: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, name: impl Into<String>, path: Vec<String>) -> Self {
        Diagnostic {
            kind,
            name: name.into(),
            path,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::UnknownEnvironment => {
                write!(f, "unknown environment '{}' passed through", self.name)?
            }
            DiagnosticKind::UnknownCommand => {
                write!(f, "unknown command '\\{}' passed through", self.name)?
            }
            DiagnosticKind::UnknownToken => write!(f, "unhandled token '{}'", self.name)?,
        }
        if !self.path.is_empty() {
            write!(f, " (in {})", self.path.join(" > "))?;
        }
        Ok(())
    }
}
