//! Error types for conversion operations

use crate::output::TreeError;
use thiserror::Error;

/// Errors that abort a document conversion.
///
/// Unrecognized constructs are not errors: the fallback visitor renders them as raw
/// passthrough and records a [`Diagnostic`](crate::diagnostics::Diagnostic) instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A construct that cannot be expressed in HTML output (e.g. `\pageref`)
    #[error("unsupported construct '{construct}' at {}: {reason}", path_display(.path))]
    Unsupported {
        construct: String,
        reason: String,
        path: Vec<String>,
    },
    /// A node that lacks something its handler requires
    #[error("malformed '{construct}' at {}: {reason}", path_display(.path))]
    Malformed {
        construct: String,
        reason: String,
        path: Vec<String>,
    },
    /// No visitor matched, not even the fallback
    #[error("no visitor matched '{construct}'; the fallback visitor must match every node")]
    ChainExhausted { construct: String },
    /// `register_up` was called from a context without a parent scope
    #[error("cannot register '{key}' in the parent scope: the root scope has no parent")]
    ScopeUnderflow { key: String },
    /// Invalid structural edit of the output tree
    #[error("output tree: {0}")]
    Tree(#[from] TreeError),
    /// The source tree handed over by the external parser could not be read
    #[error("invalid source tree: {0}")]
    Source(#[from] serde_json::Error),
}

fn path_display(path: &[String]) -> String {
    if path.is_empty() {
        "top level".to_string()
    } else {
        path.join(" > ")
    }
}
