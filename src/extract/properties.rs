use super::{ParsedView, strip_quotes};

/// Parse flat `key=value` text.
///
/// Lines are split at the first `=`, falling back to the first `:`. Blank
/// lines, `#`/`!` comments and lines without a separator are skipped, as are
/// lines whose key or value is empty after trimming.
pub fn parse_properties(content: &str) -> ParsedView {
	let mut values = ParsedView::new();

	for raw_line in content.split('\n') {
		let line = raw_line.trim();
		if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
			continue;
		}

		let Some((key, value)) = line.split_once('=').or_else(|| line.split_once(':')) else {
			continue;
		};

		let key = key.trim();
		let value = value.trim();
		if key.is_empty() || value.is_empty() {
			continue;
		}

		values.insert(key.to_string(), strip_quotes(value).to_string());
	}

	values
}
