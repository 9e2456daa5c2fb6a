//! Inspect views
//!
//! Each view is a stage + format combination:
//!
//! 1. **Source** - the parsed document tree as read from the input file
//!    - `source-json`: pretty-printed JSON, the shape the converter reads
//!    - `source-treeviz`: tree visualization with Unicode icons
//!
//! 2. **Output** - the output tree after phase one, before rendering
//!    - `output-json`: nested JSON with `args` and `children`
//!    - `output-treeviz`: tree visualization with Unicode icons (default)
//!
//! Output views run a full conversion, so unknown constructs are reported the same way
//! `convert` reports them.

use texweave::inspect::{output_json, output_treeviz, source_json, source_treeviz};
use texweave::{convert, ConvertOptions, Reader, SourceNode};

/// All available inspect views (stage + format combinations)
pub const AVAILABLE_VIEWS: &[&str] = &[
    "source-json",
    "source-treeviz",
    "output-json",
    "output-treeviz",
];

pub const DEFAULT_VIEW: &str = "output-treeviz";

/// Render `view` for a JSON source tree.
pub fn execute_view(json: &str, view: &str, options: &ConvertOptions) -> Result<String, String> {
    let source = SourceNode::from_json(json).map_err(|e| format!("Invalid source tree: {e}"))?;

    match view {
        "source-json" => source_json(&source).map_err(|e| e.to_string()),
        "source-treeviz" => Ok(source_treeviz(&source)),
        "output-json" | "output-treeviz" => {
            let mut reader = Reader::from_options(options);
            let conversion = convert(&source, &mut reader, options.traversal)
                .map_err(|e| format!("Conversion failed: {e}"))?;
            if view == "output-json" {
                output_json(&conversion.tree, conversion.root).map_err(|e| e.to_string())
            } else {
                Ok(output_treeviz(&conversion.tree, conversion.root))
            }
        }
        other => Err(format!(
            "Unknown view '{other}'. Available: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "kind": "environment",
        "name": "document",
        "content": [
            {"kind": "command", "name": "section", "args": [
                {"kind": "environment", "name": "BraceGroup", "content": [
                    {"kind": "token", "category": "text", "text": "Intro"}
                ]}
            ]}
        ]
    }"#;

    #[test]
    fn test_every_view_runs() {
        for view in AVAILABLE_VIEWS {
            let output = execute_view(DOC, view, &ConvertOptions::default());
            assert!(output.is_ok(), "{view}: {output:?}");
        }
    }

    #[test]
    fn test_output_treeviz_shows_numbering() {
        let output = execute_view(DOC, DEFAULT_VIEW, &ConvertOptions::default()).unwrap();
        assert!(output.starts_with("⧉ document\n└─ § section 1\n"));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = execute_view("{", "source-json", &ConvertOptions::default()).unwrap_err();
        assert!(err.starts_with("Invalid source tree"));
    }

    #[test]
    fn test_unknown_view() {
        let err = execute_view(DOC, "ast-tag", &ConvertOptions::default()).unwrap_err();
        assert!(err.contains("source-treeviz"));
    }
}
