//! Include resolution: mapping a directive's path to fragment text

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Looks up the text of an included template
///
/// Paths arrive normalized (see [`normalize_include_path`]) and relative to
/// the template root. Returning None leaves the directive unexpanded.
pub trait IncludeResolver {
    fn resolve(&self, path: &str) -> Option<String>;
}

impl<F> IncludeResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, path: &str) -> Option<String> {
        self(path)
    }
}

/// Resolver that never finds anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIncludes;

impl IncludeResolver for NoIncludes {
    fn resolve(&self, _path: &str) -> Option<String> {
        None
    }
}

/// In-memory fragments keyed by path
#[derive(Debug, Default, Clone)]
pub struct MemoryResolver {
    fragments: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment, builder style
    pub fn with(mut self, path: &str, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: &str, text: impl Into<String>) {
        self.fragments
            .insert(normalize_include_path(path), text.into());
    }
}

impl IncludeResolver for MemoryResolver {
    fn resolve(&self, path: &str) -> Option<String> {
        self.fragments.get(path).cloned()
    }
}

/// Resolver reading fragments from a directory on disk
///
/// Absolute paths and paths containing `..` never resolve, so includes cannot
/// escape the template root.
#[derive(Debug, Clone)]
pub struct FsResolver {
    root: PathBuf,
}

impl FsResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a relative include path to a file under the root
    pub fn resolve_path(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained || relative.as_os_str().is_empty() {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl IncludeResolver for FsResolver {
    fn resolve(&self, path: &str) -> Option<String> {
        let full_path = self.resolve_path(path)?;
        std::fs::read_to_string(full_path).ok()
    }
}

/// Normalize an include path lexically
///
/// Drops empty and `.` segments so `./a//b.md` and `a/b.md` name the same
/// template for cycle detection. `..` segments are kept as-is.
pub fn normalize_include_path(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}
