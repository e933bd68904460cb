//! Agent Forge - build agent markdown files from definition files
//!
//! A definition file holds a small indentation-structured config block and a
//! markdown template, separated by a `---` line. This library provides the
//! config parser, the template renderer, and the build pipeline that writes
//! the finished files with a metadata header.
//!
//! # Example
//!
//! ```rust
//! use agent_forge::{parse, render, MemoryResolver};
//!
//! let config = parse("meta:\n  name: coder\n  tools:\n    - Read\n    - Write\n");
//! let resolver = MemoryResolver::new().with("tools.md", "Tools: {{ meta.tools }}");
//!
//! let out = render("# {{ meta.name }}\n{% include \"tools.md\" %}", &config, &resolver).unwrap();
//! assert_eq!(out.text, "# coder\nTools: Read, Write");
//! ```

pub mod build;
pub mod config;
pub mod definition;
pub mod error;
pub mod parser;
pub mod template;

pub use build::{build_all, build_definition, build_named, BuildError, BuildOutcome, BuildReport};
pub use config::{BuildConfig, ConfigError, MetaDefaults};
pub use definition::AgentMeta;
pub use error::{Advisory, RenderError};
pub use parser::{parse, Mapping, StructuredValue};
pub use template::{
    render, render_named, render_with_config, FsResolver, IncludeResolver, MemoryResolver,
    Rendered, TemplateConfig,
};
