//! Configuration for template rendering

/// Default ceiling on include nesting
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// Configuration options for template rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    /// Maximum include nesting before rendering fails
    pub max_include_depth: usize,

    /// Keep a single trailing newline at the end of each template
    pub keep_trailing_newline: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            keep_trailing_newline: true,
        }
    }
}

impl TemplateConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the include depth ceiling
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Set whether templates keep their trailing newline
    pub fn with_keep_trailing_newline(mut self, keep: bool) -> Self {
        self.keep_trailing_newline = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TemplateConfig::default();
        assert_eq!(config.max_include_depth, 32);
        assert!(config.keep_trailing_newline);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TemplateConfig::new()
            .with_max_include_depth(4)
            .with_keep_trailing_newline(false);

        assert_eq!(config.max_include_depth, 4);
        assert!(!config.keep_trailing_newline);
    }
}
