//! Template expansion: include directives and placeholder substitution

use crate::error::{Advisory, RenderError};
use crate::parser::Mapping;

use super::config::TemplateConfig;
use super::include::{normalize_include_path, IncludeResolver};
use super::lexer::{lex, Token};

/// Output of a successful render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Fully expanded text
    pub text: String,
    /// Non-fatal conditions, in the order they were encountered
    pub advisories: Vec<Advisory>,
}

/// Tracks which templates are currently being expanded
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    /// Include paths on the current expansion stack, outermost first
    pub resolving: Vec<String>,
    /// Number of include levels below the top-level template
    pub depth: usize,
}

impl ResolutionContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context whose top-level template has a known path
    pub fn for_template(name: &str) -> Self {
        Self {
            resolving: vec![normalize_include_path(name)],
            depth: 0,
        }
    }

    /// Check if a template is currently being expanded (cycle detection)
    pub fn is_resolving(&self, path: &str) -> bool {
        self.resolving.iter().any(|p| p == path)
    }

    /// Mark a template as being expanded
    pub fn start_resolving(&mut self, path: &str) {
        self.resolving.push(path.to_string());
        self.depth += 1;
    }

    /// Mark the innermost template as done
    pub fn done_resolving(&mut self) {
        self.resolving.pop();
        self.depth = self.depth.saturating_sub(1);
    }

    /// Describe the cycle closed by including `path`
    fn chain_to(&self, path: &str) -> String {
        let start = self
            .resolving
            .iter()
            .position(|p| p == path)
            .unwrap_or(0);
        let mut chain: Vec<&str> = self.resolving[start..].iter().map(String::as_str).collect();
        chain.push(path);
        chain.join(" -> ")
    }
}

/// Render a template with default configuration
///
/// # Example
///
/// ```rust
/// use agent_forge::parser::parse;
/// use agent_forge::template::{render, MemoryResolver};
///
/// let context = parse("meta:\n  model: sonnet\n");
/// let resolver = MemoryResolver::new().with("footer.md", "Model: {{ meta.model }}");
///
/// let rendered = render("# Agent\n{% include \"footer.md\" %}", &context, &resolver).unwrap();
/// assert_eq!(rendered.text, "# Agent\nModel: sonnet");
/// assert!(rendered.advisories.is_empty());
/// ```
pub fn render(
    template: &str,
    context: &Mapping,
    resolver: &dyn IncludeResolver,
) -> Result<Rendered, RenderError> {
    render_with_config(template, context, resolver, &TemplateConfig::default())
}

/// Render a template with custom configuration
pub fn render_with_config(
    template: &str,
    context: &Mapping,
    resolver: &dyn IncludeResolver,
    config: &TemplateConfig,
) -> Result<Rendered, RenderError> {
    let expansion = Expansion::new(context, resolver, config, ResolutionContext::new());
    expansion.run(template)
}

/// Render a template that itself lives under the template root as `name`
///
/// The name seeds cycle detection, so a fragment that includes the
/// top-level template is reported as circular rather than expanded again.
pub fn render_named(
    name: &str,
    template: &str,
    context: &Mapping,
    resolver: &dyn IncludeResolver,
    config: &TemplateConfig,
) -> Result<Rendered, RenderError> {
    let ctx = ResolutionContext::for_template(name);
    let expansion = Expansion::new(context, resolver, config, ctx);
    expansion.run(template)
}

/// State for one top-level render call
struct Expansion<'a> {
    context: &'a Mapping,
    resolver: &'a dyn IncludeResolver,
    config: &'a TemplateConfig,
    ctx: ResolutionContext,
    advisories: Vec<Advisory>,
}

impl<'a> Expansion<'a> {
    fn new(
        context: &'a Mapping,
        resolver: &'a dyn IncludeResolver,
        config: &'a TemplateConfig,
        ctx: ResolutionContext,
    ) -> Self {
        Self {
            context,
            resolver,
            config,
            ctx,
            advisories: Vec::new(),
        }
    }

    fn run(mut self, template: &str) -> Result<Rendered, RenderError> {
        let mut text = String::with_capacity(template.len());
        self.expand(None, template, &mut text)?;
        Ok(Rendered {
            text,
            advisories: self.advisories,
        })
    }

    /// Expand one template into `out`
    ///
    /// Includes and placeholders are handled in a single left-to-right pass.
    /// Text produced by an include or a substitution is appended to `out` and
    /// never scanned again.
    fn expand(
        &mut self,
        origin: Option<&str>,
        source: &str,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let source = if self.config.keep_trailing_newline {
            source
        } else {
            strip_trailing_newline(source)
        };

        for (token, span) in lex(source) {
            let raw = &source[span.clone()];
            match token {
                Token::Include(path) => {
                    let normalized = normalize_include_path(&path);
                    if self.ctx.is_resolving(&normalized) {
                        return Err(RenderError::CircularInclusion {
                            chain: self.ctx.chain_to(&normalized),
                        });
                    }
                    match self.resolver.resolve(&normalized) {
                        Some(fragment) => self.include(&normalized, &fragment, out)?,
                        None => {
                            self.advisories.push(Advisory::UnresolvedInclude {
                                path,
                                template: origin.map(str::to_string),
                                span,
                            });
                            out.push_str(raw);
                        }
                    }
                }
                Token::Placeholder(name) => match self.context.lookup(&name) {
                    Some(value) => out.push_str(&value.to_string()),
                    None => {
                        self.advisories.push(Advisory::UnmatchedPlaceholder {
                            name,
                            template: origin.map(str::to_string),
                            span,
                        });
                        out.push_str(raw);
                    }
                },
                Token::Text | Token::Brace => out.push_str(raw),
            }
        }
        Ok(())
    }

    fn include(&mut self, path: &str, fragment: &str, out: &mut String) -> Result<(), RenderError> {
        if self.ctx.depth >= self.config.max_include_depth {
            return Err(RenderError::DepthExceeded {
                limit: self.config.max_include_depth,
                path: path.to_string(),
            });
        }

        self.ctx.start_resolving(path);
        let result = self.expand(Some(path), fragment, out);
        self.ctx.done_resolving();
        result
    }
}

/// Remove a single trailing newline (`\n` or `\r\n`)
fn strip_trailing_newline(source: &str) -> &str {
    match source.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => source,
    }
}
