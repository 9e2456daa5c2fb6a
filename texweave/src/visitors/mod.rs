//! Built-in visitors
//!
//!     .
//!     ├── tex.rs          # base markup: structure, sectioning, references, text
//!     ├── math_mode.rs    # `$`/`$$` and everything inside them, passed through raw
//!     ├── amsthm.rs       # `\newtheorem` declarations and numbered theorem environments
//!     ├── amsmath.rs      # display math environments, `\hdots`
//!     └── fallback.rs     # raw passthrough for anything unrecognized
//!
//!     `tex`, `math_mode` and `fallback` form the standard chain; `amsthm` and `amsmath` are
//!     extensions activated by `\usepackage`.

pub mod amsmath;
pub mod amsthm;
pub mod fallback;
pub mod math_mode;
pub mod tex;

pub use amsmath::AmsMathVisitor;
pub use amsthm::TheoremVisitor;
pub use fallback::FallbackVisitor;
pub use math_mode::MathModeVisitor;
pub use tex::TexVisitor;

use crate::context::Context;
use crate::error::ConvertError;
use crate::source::Group;

/// Trimmed text of the `index`-th brace argument, or a `Malformed` error naming `what`.
pub(crate) fn required_text(
    group: &Group,
    index: usize,
    what: &str,
    ctx: &Context,
) -> Result<String, ConvertError> {
    group
        .brace_text(index)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ConvertError::Malformed {
            construct: format!("\\{}", group.name),
            reason: format!("missing {what}"),
            path: ctx.ancestor_path(),
        })
}
