use super::{ParsedView, strip_quotes};

/// One open mapping level: its key segment and the indent it was opened at.
#[derive(Debug)]
struct Level<'a> {
	segment: &'a str,
	indent: usize,
}

/// Parse the YAML subset used by Spring configuration files into dotted keys.
///
/// Only mapping nesting is understood. Sequence items, multi-line scalars,
/// anchors and tags are not represented. Comments start at the first `#` on a
/// line, quoted or not.
///
/// Nesting is tracked with a stack of open levels. A line first closes every
/// level opened at the same or a deeper indent; a key with no value then opens
/// a new level, while a key with a value emits a leaf under the open path.
pub fn parse_yaml(content: &str) -> ParsedView {
	let mut values = ParsedView::new();
	let mut stack: Vec<Level<'_>> = Vec::new();

	for raw_line in content.split('\n') {
		let line = match raw_line.find('#') {
			Some(idx) => &raw_line[..idx],
			None => raw_line,
		};
		let trimmed = line.trim();
		if trimmed.is_empty() || trimmed.starts_with('-') {
			continue;
		}

		let indent = line.len() - line.trim_start_matches(' ').len();
		let (key, value) = match trimmed.split_once(':') {
			Some((key, value)) => (key.trim(), value.trim()),
			None => (trimmed, ""),
		};

		while stack.last().is_some_and(|level| level.indent >= indent) {
			stack.pop();
		}

		if value.is_empty() {
			stack.push(Level {
				segment: key,
				indent,
			});
			continue;
		}

		let mut dotted = String::new();
		for level in &stack {
			dotted.push_str(level.segment);
			dotted.push('.');
		}
		dotted.push_str(key);

		values.insert(dotted, strip_quotes(value).to_string());
	}

	values
}
