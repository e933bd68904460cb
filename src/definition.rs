//! Definition files: a config block and a template separated by `---`
//!
//! ```text
//! meta:
//!   name: coder
//!   tools:
//!     - Read
//!     - Write
//! ---
//! # {{ meta.name }}
//! {% include "components/work.md.j2" %}
//! ```

use crate::config::MetaDefaults;
use crate::parser::Mapping;

/// A definition file split into its two parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionParts<'a> {
    /// Text before the separator line
    pub config: &'a str,
    /// Text after the separator line
    pub template: &'a str,
    /// Byte offset of `template` within the whole file
    pub template_offset: usize,
}

/// Split definition text at the first line consisting solely of `---`
///
/// Returns None when there is no separator.
pub fn split(content: &str) -> Option<DefinitionParts<'_>> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let next = offset + line.len();
        if line.trim_end() == "---" {
            return Some(DefinitionParts {
                config: &content[..offset],
                template: &content[next..],
                template_offset: next,
            });
        }
        offset = next;
    }
    None
}

/// Agent metadata taken from the `meta` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMeta {
    pub name: String,
    pub description: String,
    pub model: String,
    pub tools: Vec<String>,
    /// Base name of the generated file, without extension
    pub output_name: String,
    /// Informational path of the template source
    pub source_file: Option<String>,
}

impl AgentMeta {
    /// Extract metadata from a parsed config, applying defaults
    ///
    /// Returns None when `meta` is missing, empty, or not a mapping.
    pub fn from_config(config: &Mapping, defaults: &MetaDefaults) -> Option<Self> {
        let meta = config.get_mapping("meta").filter(|m| !m.is_empty())?;

        let text = |key: &str| meta.get(key).map(|v| v.to_string());
        let name = text("name").unwrap_or_else(|| defaults.name.clone());

        let tools = match meta.get("tools") {
            Some(value) => value
                .as_list()
                .map(<[String]>::to_vec)
                .unwrap_or_else(|| vec![value.to_string()]),
            None => Vec::new(),
        };

        Some(Self {
            description: text("description").unwrap_or_default(),
            model: text("model").unwrap_or_else(|| defaults.model.clone()),
            tools,
            output_name: text("output_name").unwrap_or_else(|| name.clone()),
            source_file: text("source_file"),
            name,
        })
    }

    /// File name of the generated markdown
    pub fn output_file_name(&self) -> String {
        format!("{}.md", self.output_name)
    }

    /// YAML frontmatter written ahead of the rendered body
    pub fn frontmatter(&self) -> String {
        format!(
            "---\nname: {}\ndescription: {}\ntools: {}\nmodel: {}\n---\n\n",
            self.name,
            self.description,
            self.tools.join(", "),
            self.model
        )
    }
}
