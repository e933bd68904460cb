//! Error and advisory types for template rendering

use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Fatal rendering failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// An include directive names a template that is already being expanded
    #[error("circular inclusion detected: {chain}")]
    CircularInclusion { chain: String },

    /// Include nesting went deeper than the configured ceiling
    #[error("include depth limit of {limit} exceeded at \"{path}\"")]
    DepthExceeded { limit: usize, path: String },
}

/// Non-fatal conditions found while rendering
///
/// The renderer never prints these; callers decide how to surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// An include directive whose path the resolver could not find.
    /// The directive text is left in the output unchanged.
    UnresolvedInclude {
        path: String,
        /// Include path of the template containing the directive, None for the top level
        template: Option<String>,
        span: Span,
    },
    /// A placeholder with no matching context value, left verbatim
    UnmatchedPlaceholder {
        name: String,
        template: Option<String>,
        span: Span,
    },
}

impl Advisory {
    pub fn span(&self) -> &Span {
        match self {
            Advisory::UnresolvedInclude { span, .. } | Advisory::UnmatchedPlaceholder { span, .. } => {
                span
            }
        }
    }

    /// The include path of the template this advisory came from
    pub fn template(&self) -> Option<&str> {
        match self {
            Advisory::UnresolvedInclude { template, .. }
            | Advisory::UnmatchedPlaceholder { template, .. } => template.as_deref(),
        }
    }

    /// Format the advisory with source context using ariadne
    ///
    /// `source` must be the text the span refers to, i.e. the template named
    /// by [`Advisory::template`].
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let label = match self {
            Advisory::UnresolvedInclude { .. } => "include not found; left unexpanded",
            Advisory::UnmatchedPlaceholder { .. } => "no value in context; left verbatim",
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Warning, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(label)
                    .with_color(Color::Yellow),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnresolvedInclude { path, template, .. } => {
                write!(f, "include not found: \"{}\"", path)?;
                if let Some(t) = template {
                    write!(f, " (in {})", t)?;
                }
                Ok(())
            }
            Advisory::UnmatchedPlaceholder { name, template, .. } => {
                write!(f, "unmatched placeholder: {{{{ {} }}}}", name)?;
                if let Some(t) = template {
                    write!(f, " (in {})", t)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_display() {
        let adv = Advisory::UnmatchedPlaceholder {
            name: "meta.role".to_string(),
            template: Some("components/work.md.j2".to_string()),
            span: 0..15,
        };
        assert_eq!(
            adv.to_string(),
            "unmatched placeholder: {{ meta.role }} (in components/work.md.j2)"
        );
    }

    #[test]
    fn test_advisory_format_includes_source_line() {
        let source = "intro\n{% include \"missing.md\" %}\n";
        let adv = Advisory::UnresolvedInclude {
            path: "missing.md".to_string(),
            template: None,
            span: 6..32,
        };
        let report = adv.format(source, "agent.j2");
        assert!(report.contains("missing.md"));
        assert!(report.contains("agent.j2"));
    }

    #[test]
    fn test_render_error_messages() {
        let err = RenderError::CircularInclusion {
            chain: "a.md -> b.md -> a.md".to_string(),
        };
        assert_eq!(err.to_string(), "circular inclusion detected: a.md -> b.md -> a.md");
    }
}
