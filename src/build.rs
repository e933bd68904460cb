//! Building agent markdown from definition files

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::BuildConfig;
use crate::definition::{self, AgentMeta};
use crate::error::{Advisory, RenderError};
use crate::parser;
use crate::template::{self, FsResolver};

/// Errors that stop a build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("agents directory not found: {}", .0.display())]
    AgentsDirMissing(PathBuf),

    #[error("no .{extension} files found in {}", dir.display())]
    NoDefinitions { dir: PathBuf, extension: String },

    #[error("definition not found: {}", .0.display())]
    DefinitionNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render {}: {source}", file.display())]
    Render {
        file: PathBuf,
        #[source]
        source: RenderError,
    },
}

/// Why a definition was skipped without producing output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingSeparator,
    MissingMeta,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSeparator => {
                f.write_str("missing '---' separator between config and template")
            }
            SkipReason::MissingMeta => f.write_str("no meta section in config"),
        }
    }
}

/// Result of building one definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Built {
        /// Path of the generated file (not written in dry-run mode)
        output: PathBuf,
        /// Full generated text, header included
        content: String,
        advisories: Vec<Advisory>,
    },
    Skipped {
        reason: SkipReason,
    },
}

/// Per-file results of a build-all run
#[derive(Debug, Default)]
pub struct BuildReport {
    pub entries: Vec<(PathBuf, Result<BuildOutcome, BuildError>)>,
}

impl BuildReport {
    pub fn built(&self) -> usize {
        self.count(|r| matches!(r, Ok(BuildOutcome::Built { .. })))
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, Ok(BuildOutcome::Skipped { .. })))
    }

    pub fn failed(&self) -> usize {
        self.count(Result::is_err)
    }

    fn count(&self, pred: impl Fn(&Result<BuildOutcome, BuildError>) -> bool) -> usize {
        self.entries.iter().filter(|(_, r)| pred(r)).count()
    }
}

/// Build a single definition file
pub fn build_definition(path: &Path, config: &BuildConfig) -> Result<BuildOutcome, BuildError> {
    let file_name = display_name(path);
    let content = fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(parts) = definition::split(&content) else {
        warn!("Skip {}: {}", file_name, SkipReason::MissingSeparator);
        return Ok(BuildOutcome::Skipped {
            reason: SkipReason::MissingSeparator,
        });
    };

    let context = parser::parse(parts.config);
    let Some(meta) = AgentMeta::from_config(&context, &config.defaults) else {
        warn!("Skip {}: {}", file_name, SkipReason::MissingMeta);
        return Ok(BuildOutcome::Skipped {
            reason: SkipReason::MissingMeta,
        });
    };
    debug!(
        agent = %meta.name,
        model = %meta.model,
        tools = meta.tools.len(),
        source_file = meta.source_file.as_deref().unwrap_or(file_name.as_str()),
        "parsed meta"
    );

    let template_root = config.template_root();
    let resolver = FsResolver::new(template_root);
    let template_name = path
        .strip_prefix(template_root)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| file_name.clone());

    let rendered = template::render_named(
        &template_name,
        parts.template,
        &context,
        &resolver,
        &config.template,
    )
    .map_err(|source| BuildError::Render {
        file: path.to_path_buf(),
        source,
    })?;

    for advisory in &rendered.advisories {
        match advisory.template() {
            None => {
                let mut span = advisory.span().clone();
                span.start += parts.template_offset;
                span.end += parts.template_offset;
                debug!("{}", relocated(advisory, span).format(&content, &file_name));
                warn!("{}: {}", file_name, advisory);
            }
            Some(_) => warn!("{}: {}", file_name, advisory),
        }
    }

    let output = config.output_dir().join(meta.output_file_name());
    let mut generated = meta.frontmatter();
    generated.push_str(&rendered.text);

    if config.dry_run {
        info!("{} → {} (dry run)", file_name, display_name(&output));
    } else {
        fs::write(&output, &generated).map_err(|source| BuildError::Io {
            path: output.clone(),
            source,
        })?;
        info!("✓ {} → {}", file_name, display_name(&output));
    }

    Ok(BuildOutcome::Built {
        output,
        content: generated,
        advisories: rendered.advisories,
    })
}

/// Build the definition for one agent name
pub fn build_named(name: &str, config: &BuildConfig) -> Result<BuildOutcome, BuildError> {
    let path = config.definition_path(name);
    if !path.is_file() {
        return Err(BuildError::DefinitionNotFound(path));
    }
    build_definition(&path, config)
}

/// Build every definition in the agents directory, in file-name order
///
/// A failure in one definition is recorded in the report and does not stop
/// the others.
pub fn build_all(config: &BuildConfig) -> Result<BuildReport, BuildError> {
    let definitions = discover(config)?;
    info!("Building {} agent(s)...", definitions.len());

    let entries = definitions
        .into_iter()
        .map(|path| {
            let result = build_definition(&path, config);
            if let Err(e) = &result {
                warn!("✗ {}", e);
            }
            (path, result)
        })
        .collect();

    Ok(BuildReport { entries })
}

/// List definition files in the agents directory, sorted
pub fn discover(config: &BuildConfig) -> Result<Vec<PathBuf>, BuildError> {
    let dir = &config.agents_dir;
    if !dir.is_dir() {
        return Err(BuildError::AgentsDirMissing(dir.clone()));
    }

    let read_err = |source: std::io::Error| BuildError::Io {
        path: dir.clone(),
        source,
    };
    let mut definitions = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        let matches_ext = path
            .extension()
            .is_some_and(|ext| ext == config.extension.as_str());
        if matches_ext && path.is_file() {
            definitions.push(path);
        }
    }

    if definitions.is_empty() {
        return Err(BuildError::NoDefinitions {
            dir: dir.clone(),
            extension: config.extension.clone(),
        });
    }

    definitions.sort();
    Ok(definitions)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Copy of an advisory with its span moved into whole-file coordinates
fn relocated(advisory: &Advisory, span: crate::error::Span) -> Advisory {
    let mut moved = advisory.clone();
    match &mut moved {
        Advisory::UnresolvedInclude { span: s, .. } | Advisory::UnmatchedPlaceholder { span: s, .. } => {
            *s = span
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(&path, content).expect("write");
        path
    }

    #[test]
    fn test_build_definition_writes_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "components/rules.md.j2", "Model: {{ meta.model }}\n");
        let path = write(
            dir.path(),
            "coder.j2",
            "meta:\n  name: coder\n  description: Writes code\n  model: sonnet\n  tools: [Read, Edit]\n---\n# {{ meta.name }}\n{% include \"components/rules.md.j2\" %}\n",
        );

        let config = BuildConfig::new().with_agents_dir(dir.path());
        let outcome = build_definition(&path, &config).expect("Should build");

        let expected = "---\nname: coder\ndescription: Writes code\ntools: Read, Edit\nmodel: sonnet\n---\n\n# coder\nModel: sonnet";
        let written = fs::read_to_string(dir.path().join("coder.md")).expect("output");
        assert_eq!(written, expected);
        assert!(matches!(outcome, BuildOutcome::Built { advisories, .. } if advisories.is_empty()));
    }

    #[test]
    fn test_build_definition_dry_run_does_not_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(dir.path(), "a.j2", "meta:\n  name: a\n---\nbody");

        let config = BuildConfig::new()
            .with_agents_dir(dir.path())
            .with_dry_run(true);
        let outcome = build_definition(&path, &config).expect("Should build");

        assert!(!dir.path().join("a.md").exists());
        match outcome {
            BuildOutcome::Built { content, .. } => assert!(content.ends_with("---\n\nbody")),
            other => panic!("Expected Built, got {:?}", other),
        }
    }

    #[test]
    fn test_build_definition_skips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let no_sep = write(dir.path(), "a.j2", "meta:\n  name: a\n");
        let no_meta = write(dir.path(), "b.j2", "other: 1\n---\nbody");
        let config = BuildConfig::new().with_agents_dir(dir.path());

        assert_eq!(
            build_definition(&no_sep, &config).expect("Should not fail"),
            BuildOutcome::Skipped {
                reason: SkipReason::MissingSeparator
            }
        );
        assert_eq!(
            build_definition(&no_meta, &config).expect("Should not fail"),
            BuildOutcome::Skipped {
                reason: SkipReason::MissingMeta
            }
        );
    }

    #[test]
    fn test_build_definition_self_include_is_circular() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            dir.path(),
            "loop.j2",
            "meta:\n  name: loop\n---\n{% include \"loop.j2\" %}",
        );
        let config = BuildConfig::new().with_agents_dir(dir.path());

        let err = build_definition(&path, &config).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Render {
                source: RenderError::CircularInclusion { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_build_definition_io_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = BuildConfig::new().with_agents_dir(dir.path());

        let missing = dir.path().join("missing.j2");
        match build_definition(&missing, &config).unwrap_err() {
            BuildError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("Expected Io, got {:?}", other),
        }

        let path = write(dir.path(), "a.j2", "meta:\n  name: a\n---\nbody");
        let config = config.with_output_dir(dir.path().join("absent"));
        let err = build_definition(&path, &config).unwrap_err();
        assert!(err.to_string().starts_with("I/O error on "));
        assert!(matches!(err, BuildError::Io { path, .. } if path.ends_with("absent/a.md")));
    }

    #[test]
    fn test_build_named_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = BuildConfig::new().with_agents_dir(dir.path());
        assert!(matches!(
            build_named("ghost", &config),
            Err(BuildError::DefinitionNotFound(_))
        ));
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "b.j2", "");
        write(dir.path(), "a.j2", "");
        write(dir.path(), "notes.md", "");
        write(dir.path(), "components/c.j2", "");
        let config = BuildConfig::new().with_agents_dir(dir.path());

        let names: Vec<String> = discover(&config)
            .expect("Should discover")
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(names, vec!["a.j2", "b.j2"]);
    }

    #[test]
    fn test_discover_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = BuildConfig::new().with_agents_dir(dir.path());
        assert!(matches!(discover(&config), Err(BuildError::NoDefinitions { .. })));

        let missing = BuildConfig::new().with_agents_dir(dir.path().join("nope"));
        assert!(matches!(discover(&missing), Err(BuildError::AgentsDirMissing(_))));
    }

    #[test]
    fn test_skip_reason_messages() {
        assert_eq!(
            SkipReason::MissingSeparator.to_string(),
            "missing '---' separator between config and template"
        );
        assert_eq!(SkipReason::MissingMeta.to_string(), "no meta section in config");
    }
}
