//! Key-value extraction for raw configuration documents.
//!
//! This module handles:
//! - Flat `key=value` / `key: value` text (`.properties` and friends)
//! - A YAML subset limited to nested mappings with scalar leaves
//!
//! Both parsers flatten into a [`ParsedView`] of dotted keys. Malformed lines
//! are skipped, never reported.

pub mod properties;
pub mod yaml;

use std::collections::BTreeMap;

pub use properties::parse_properties;
pub use yaml::parse_yaml;

/// Dotted-key flattening of one document. Keys are unique; the last
/// assignment of a repeated key wins.
pub type ParsedView = BTreeMap<String, String>;

/// Whether a document name selects the structured-text (YAML) parser.
pub fn is_yaml_name(name: &str) -> bool {
	let lower = name.to_lowercase();
	lower.ends_with(".yml") || lower.ends_with(".yaml")
}

/// Parse document content with the parser selected by `is_yaml`.
pub fn parse_values(content: &str, is_yaml: bool) -> ParsedView {
	if content.is_empty() {
		return ParsedView::new();
	}
	if is_yaml {
		parse_yaml(content)
	} else {
		parse_properties(content)
	}
}

/// Remove one layer of matching single or double quotes.
pub(crate) fn strip_quotes(value: &str) -> &str {
	let trimmed = value.trim();
	let quoted = trimmed.len() >= 2
		&& ((trimmed.starts_with('"') && trimmed.ends_with('"'))
			|| (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
	if quoted {
		&trimmed[1..trimmed.len() - 1]
	} else {
		trimmed
	}
}
