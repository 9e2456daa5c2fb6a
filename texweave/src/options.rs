//! Conversion options

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Interactive Mathematical Paper";
pub const DEFAULT_MATHJAX_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/mathjax/3.2.2/es5/tex-mml-chtml.min.js";

/// How the converter walks the source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// Call-stack recursion
    #[default]
    Recursive,
    /// Explicit work stack; depth is bounded by memory only
    Iterative,
}

/// Options for a single document conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Content of the `<title>` element
    pub title: String,
    /// Script URL of the client-side math renderer
    pub mathjax_url: String,
    /// Extra CSS appended after every visitor's styles
    pub custom_css: Option<String>,
    /// Extensions a `\usepackage` may activate
    pub enabled_packages: Vec<String>,
    /// Extensions active before traversal starts
    pub preload_packages: Vec<String>,
    pub traversal: Traversal,
    /// Log and record constructs handled by the fallback
    pub report_unknown: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            title: DEFAULT_TITLE.to_string(),
            mathjax_url: DEFAULT_MATHJAX_URL.to_string(),
            custom_css: None,
            enabled_packages: vec!["amsthm".to_string(), "amsmath".to_string()],
            preload_packages: Vec::new(),
            traversal: Traversal::Recursive,
            report_unknown: true,
        }
    }
}

impl ConvertOptions {
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_preload(mut self, packages: &[&str]) -> Self {
        self.preload_packages = packages.iter().map(|p| p.to_string()).collect();
        self
    }
}
