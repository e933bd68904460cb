//! Template rendering for definition bodies
//!
//! Templates are literal text with two kinds of markers:
//!
//! ```text
//! {{ name }}                       placeholder, replaced from the context
//! {{ meta.model }}                 dotted path through nested mappings
//! {% include "components/x.j2" %}  fragment resolved against the template root
//! ```
//!
//! Included fragments are rendered with the same context before being
//! spliced in. Unknown placeholders and missing includes stay in the output
//! verbatim and are reported as [`Advisory`](crate::error::Advisory) values.
//! Include cycles and excessive nesting are errors.

mod config;
mod include;
pub mod lexer;
mod resolver;

pub use config::{TemplateConfig, DEFAULT_MAX_INCLUDE_DEPTH};
pub use include::{normalize_include_path, FsResolver, IncludeResolver, MemoryResolver, NoIncludes};
pub use resolver::{render, render_named, render_with_config, Rendered, ResolutionContext};
