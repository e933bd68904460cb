//! Value types produced by the structured config parser

use std::fmt;

/// A parsed configuration value
///
/// Every value in a definition's configuration block is one of three shapes.
/// Consumers are expected to match exhaustively rather than sniff strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredValue {
    /// A trimmed string
    Scalar(String),
    /// An ordered list of scalars, from `[a, b]` or `- item` lines
    List(Vec<String>),
    /// A nested block of `key: value` lines
    Mapping(Mapping),
}

impl StructuredValue {
    /// Create a scalar value
    pub fn scalar(text: impl Into<String>) -> Self {
        StructuredValue::Scalar(text.into())
    }

    /// Get the scalar text, if this is a scalar
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            StructuredValue::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get the list items, if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            StructuredValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Get the nested mapping, if this is a mapping
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            StructuredValue::Mapping(m) => Some(m),
            _ => None,
        }
    }
}

/// Canonical display form used for placeholder substitution
///
/// - Scalar: the text itself
/// - List: items joined with `", "`
/// - Mapping: `{key: value, ...}` in key order, values in display form
impl fmt::Display for StructuredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuredValue::Scalar(s) => f.write_str(s),
            StructuredValue::List(items) => f.write_str(&items.join(", ")),
            StructuredValue::Mapping(m) => write!(f, "{}", m),
        }
    }
}

impl From<&str> for StructuredValue {
    fn from(s: &str) -> Self {
        StructuredValue::Scalar(s.to_string())
    }
}

impl From<Vec<String>> for StructuredValue {
    fn from(items: Vec<String>) -> Self {
        StructuredValue::List(items)
    }
}

impl From<Mapping> for StructuredValue {
    fn from(m: Mapping) -> Self {
        StructuredValue::Mapping(m)
    }
}

/// An insertion-ordered map of keys to values
///
/// Keys keep the position of their first insertion. Inserting an existing key
/// replaces its value in place, which gives last-write-wins semantics for
/// duplicate keys without disturbing source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, StructuredValue)>,
}

impl Mapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for the key if any
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<StructuredValue>,
    ) -> Option<StructuredValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut StructuredValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Get a scalar value by key
    pub fn get_scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(StructuredValue::as_scalar)
    }

    /// Get a nested mapping by key
    pub fn get_mapping(&self, key: &str) -> Option<&Mapping> {
        self.get(key).and_then(StructuredValue::as_mapping)
    }

    /// Walk a dotted path (`meta.model`) through nested mappings
    ///
    /// Returns None if any segment is missing or an intermediate value is not
    /// a mapping.
    pub fn lookup(&self, path: &str) -> Option<&StructuredValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StructuredValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<StructuredValue>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}
