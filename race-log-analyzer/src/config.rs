//! Parser configuration types
//!
//! The analyzer itself takes no configuration; only the line parser does.
//! Report layout and chart settings belong to the application layer.

use serde::{Deserialize, Serialize};

/// Variable name printed by the classic two-thread increment demo
pub const DEFAULT_VARIABLE_NAME: &str = "glob";

/// Configuration for the log line parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Name of the shared variable in `[<tid>] <name> = <value>` lines
    #[serde(default = "default_variable_name", rename = "variable")]
    pub variable_name: String,

    /// Optional: only keep events from these threads
    #[serde(default, rename = "threads")]
    pub thread_filter: Option<Vec<u32>>,
}

fn default_variable_name() -> String {
    DEFAULT_VARIABLE_NAME.to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            variable_name: default_variable_name(),
            thread_filter: None,
        }
    }
}

impl ParserConfig {
    /// Create a new parser configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the shared variable name to look for
    pub fn with_variable_name(mut self, name: impl Into<String>) -> Self {
        self.variable_name = name.into();
        self
    }

    /// Builder method: set thread filter
    pub fn with_thread_filter(mut self, threads: Vec<u32>) -> Self {
        self.thread_filter = Some(threads);
        self
    }

    /// Check if events from a thread should be kept
    pub fn should_keep_thread(&self, thread_id: u32) -> bool {
        match &self.thread_filter {
            Some(threads) => threads.contains(&thread_id),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_builder() {
        let config = ParserConfig::new()
            .with_variable_name("counter")
            .with_thread_filter(vec![1, 2]);

        assert_eq!(config.variable_name, "counter");
        assert_eq!(config.thread_filter, Some(vec![1, 2]));
    }

    #[test]
    fn test_filter_logic() {
        let config = ParserConfig::new().with_thread_filter(vec![1, 2]);

        assert!(config.should_keep_thread(1));
        assert!(config.should_keep_thread(2));
        assert!(!config.should_keep_thread(3));
    }

    #[test]
    fn test_no_filters() {
        let config = ParserConfig::new();

        assert_eq!(config.variable_name, "glob");
        assert!(config.should_keep_thread(0));
        assert!(config.should_keep_thread(u32::MAX));
    }
}
