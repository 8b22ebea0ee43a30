use serde::Serialize;
use std::io::Read;
use std::path::Path;

use crate::error::{ProbeError, Result};

/// Text read from a document, capped at a character limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
	/// Bytes read from the source. Reading stops shortly past the character
	/// cap, so this is a lower bound for truncated sources.
	pub size_bytes: u64,

	/// Whether `content` was cut short.
	pub truncated: bool,

	pub content: String,
}

/// Longest UTF-8 encoding of a single character.
const MAX_UTF8_WIDTH: usize = 4;

/// Read a stream as UTF-8 (lossy), keeping at most `max_chars` characters.
///
/// At most `(max_chars + 1) * 4` bytes are consumed: enough to decode one
/// character past the cap, which decides `truncated`.
pub fn read_stream<R: Read>(reader: R, max_chars: usize) -> std::io::Result<ContentPayload> {
	let byte_budget = max_chars.saturating_add(1).saturating_mul(MAX_UTF8_WIDTH);
	let mut bytes = Vec::new();
	reader
		.take(u64::try_from(byte_budget).unwrap_or(u64::MAX))
		.read_to_end(&mut bytes)?;

	let text = String::from_utf8_lossy(&bytes);
	let (content, truncated) = truncate_chars(&text, max_chars);

	Ok(ContentPayload {
		size_bytes: bytes.len() as u64,
		truncated,
		content: content.to_string(),
	})
}

/// Read a file, keeping at most `max_chars` characters.
pub fn read_file(path: &Path, max_chars: usize) -> Result<ContentPayload> {
	let file = std::fs::File::open(path).map_err(|source| ProbeError::ReadError {
		path: path.to_path_buf(),
		source,
	})?;
	read_stream(file, max_chars).map_err(|source| ProbeError::ReadError {
		path: path.to_path_buf(),
		source,
	})
}

/// Cut `text` after `max_chars` characters, reporting whether anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
	match text.char_indices().nth(max_chars) {
		Some((idx, _)) => (&text[..idx], true),
		None => (text, false),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_stream_under_limit() {
		let payload = read_stream("a=1\n".as_bytes(), 100).unwrap();

		assert_eq!(payload.content, "a=1\n");
		assert_eq!(payload.size_bytes, 4);
		assert!(!payload.truncated);
	}

	#[test]
	fn test_read_stream_truncates_on_char_boundary() {
		let payload = read_stream("héllo".as_bytes(), 2).unwrap();

		assert_eq!(payload.content, "hé");
		assert_eq!(payload.size_bytes, 6);
		assert!(payload.truncated);
	}

	#[test]
	fn test_exact_limit_is_not_truncated() {
		assert_eq!(truncate_chars("abc", 3), ("abc", false));
		assert_eq!(truncate_chars("abc", 0), ("", true));
		assert_eq!(truncate_chars("", 0), ("", false));
	}

	#[test]
	fn test_invalid_utf8_is_lossy() {
		let payload = read_stream(&[b'a', 0xff, b'b'][..], 10).unwrap();

		assert_eq!(payload.content, "a\u{fffd}b");
	}

	/// Endless `a` bytes that remembers how many were handed out.
	struct CountingReader {
		consumed: usize,
	}

	impl Read for CountingReader {
		fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
			buf.fill(b'a');
			self.consumed += buf.len();
			Ok(buf.len())
		}
	}

	#[test]
	fn test_read_stream_stops_past_cap() {
		let mut source = CountingReader { consumed: 0 };

		let payload = read_stream(&mut source, 10).unwrap();

		assert_eq!(payload.content, "a".repeat(10));
		assert!(payload.truncated);
		assert!(source.consumed <= (10 + 1) * MAX_UTF8_WIDTH);
		assert_eq!(payload.size_bytes, source.consumed as u64);
	}

	#[test]
	fn test_multibyte_truncation_within_budget() {
		// Three 4-byte characters against a cap of two.
		let payload = read_stream("😀😀😀".as_bytes(), 2).unwrap();

		assert_eq!(payload.content, "😀😀");
		assert!(payload.truncated);
	}

	#[test]
	fn test_read_missing_file() {
		let result = read_file(Path::new("/nonexistent/application.yml"), 10);

		assert!(matches!(result, Err(ProbeError::ReadError { .. })));
	}
}
