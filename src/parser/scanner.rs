//! Line scanner for the indentation-structured config format
//!
//! The format is a forgiving subset of YAML: `key: value` pairs, nested blocks
//! opened by an empty value, inline `[a, b]` lists and `- item` block lists.
//! Nesting depth is tracked with a stack of open frames. Each frame learns its
//! child indentation from the first line it receives, so two-space and
//! four-space files parse the same way.

use super::value::{Mapping, StructuredValue};

/// Parse configuration text into a mapping
///
/// Never fails. Lines that are neither `key: value` pairs nor `- item` entries
/// (after dropping blanks and `#` comments) are skipped.
///
/// # Example
///
/// ```rust
/// use agent_forge::parser::{parse, StructuredValue};
///
/// let config = parse("meta:\n  name: coder\n  tools: [Read, Write]\n");
/// let meta = config.get_mapping("meta").unwrap();
/// assert_eq!(meta.get_scalar("name"), Some("coder"));
/// assert_eq!(
///     meta.get("tools"),
///     Some(&StructuredValue::List(vec!["Read".into(), "Write".into()]))
/// );
/// ```
pub fn parse(input: &str) -> Mapping {
    let mut scanner = Scanner::new();
    for line in input.lines() {
        scanner.line(line);
    }
    scanner.finish()
}

/// Entries of one scope plus the last key written to it
#[derive(Debug, Default)]
struct Scope {
    entries: Mapping,
    /// Key and indentation of its line, used to attribute `- item` lines
    last_key: Option<(String, usize)>,
}

/// A nested mapping opened by `key:` with an empty value
#[derive(Debug)]
struct Frame {
    key: String,
    /// Indentation of the `key:` line that opened the frame
    opener: usize,
    /// Indentation of the frame's children, learned from the first child line
    child_indent: Option<usize>,
    scope: Scope,
}

#[derive(Debug, Default)]
struct Scanner {
    root: Scope,
    frames: Vec<Frame>,
}

impl Scanner {
    fn new() -> Self {
        Self::default()
    }

    fn top(&mut self) -> &mut Scope {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.scope,
            None => &mut self.root,
        }
    }

    fn line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }

        let indent = line.chars().take_while(|c| c.is_whitespace()).count();

        if let Some(item) = line.trim_start().strip_prefix("- ") {
            self.list_item(indent, item.trim());
            return;
        }

        self.close_for_entry(indent);

        let Some((key, value)) = trimmed.split_once(':') else {
            return;
        };
        let key = key.trim();
        if key.is_empty() {
            return;
        }

        let scope = self.top();
        scope.last_key = Some((key.to_string(), indent));

        let mut value = value.trim();
        if let Some(pos) = value.find('#') {
            value = value[..pos].trim();
        }

        if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            scope.entries.insert(key, inline_list(inner));
        } else if value.is_empty() {
            // Reserve the key's position now; the frame's contents replace it on close
            scope.entries.insert(key, Mapping::new());
            self.frames.push(Frame {
                key: key.to_string(),
                opener: indent,
                child_indent: None,
                scope: Scope::default(),
            });
        } else {
            scope.entries.insert(key, value);
        }
    }

    /// Attach a `- item` line to the key that owns it
    fn list_item(&mut self, indent: usize, item: &str) {
        // Items at or shallower than a frame's child indentation belong to the
        // frame's own key (or something further out), so the frame closes.
        while let Some(frame) = self.frames.last_mut() {
            let closes = indent <= frame.opener || {
                let child = *frame.child_indent.get_or_insert(indent);
                indent <= child
            };
            if !closes {
                break;
            }
            self.close_frame();
        }

        let scope = self.top();
        let owner = match &scope.last_key {
            Some((key, key_indent)) if *key_indent < indent => key.clone(),
            _ => return,
        };

        match scope.entries.get_mut(&owner) {
            Some(StructuredValue::List(items)) => items.push(item.to_string()),
            _ => {
                scope.entries.insert(owner, vec![item.to_string()]);
            }
        }
    }

    /// Close frames that a `key: value` line at `indent` falls outside of
    fn close_for_entry(&mut self, indent: usize) {
        while let Some(frame) = self.frames.last_mut() {
            if indent <= frame.opener {
                self.close_frame();
                continue;
            }
            let child_indent = frame.child_indent;
            match child_indent {
                None => {
                    frame.child_indent = Some(indent);
                    break;
                }
                Some(child) if indent < child => self.close_frame(),
                Some(_) => break,
            }
        }
    }

    fn close_frame(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.top().entries.insert(frame.key, frame.scope.entries);
        }
    }

    fn finish(mut self) -> Mapping {
        while !self.frames.is_empty() {
            self.close_frame();
        }
        self.root.entries
    }
}

/// Split the interior of `[a, b, c]` into trimmed items
fn inline_list(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|s| s.trim().to_string()).collect()
}
