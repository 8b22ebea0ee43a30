//! Ranked configuration candidates.
//!
//! This module handles:
//! - The raw document model handed over by the source collaborators
//! - Turning documents into priority-ranked, profile-tagged candidates
//! - Deciding which candidates are active for a profile set

pub mod profile;

use serde::Serialize;

use crate::extract::{ParsedView, is_yaml_name, parse_values};

pub use profile::{ActiveProfiles, is_active};

/// Where a raw document was found.
///
/// Declaration order is discovery order: equal-priority candidates keep
/// resource-loader documents ahead of filesystem ones, and those ahead of
/// archive entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
	ResourceLoader,
	Filesystem,
	Archive,
}

/// One configuration document as read by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
	/// Display identifier (`classpath:<name>`, a file path, `<jar>!<entry>`).
	pub source_id: String,

	/// File or entry name; drives format, profile tag and priority.
	pub name: String,

	/// UTF-8 text, already truncated by the reader.
	pub content: String,

	pub origin: Origin,

	/// Total bytes seen by the reader before truncation.
	pub size_bytes: u64,

	/// Whether `content` was cut at the reader's limit.
	pub truncated: bool,
}

impl RawDocument {
	/// A document with no reader metadata, sized from its content.
	pub fn new(
		origin: Origin,
		name: impl Into<String>,
		source_id: impl Into<String>,
		content: impl Into<String>,
	) -> Self {
		let content = content.into();
		Self {
			source_id: source_id.into(),
			name: name.into(),
			size_bytes: content.len() as u64,
			content,
			origin,
			truncated: false,
		}
	}
}

/// A parsed, ranked document considered for hint aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
	/// Lower sorts first and wins.
	pub priority: u8,

	pub parsed_view: ParsedView,

	pub is_yaml_format: bool,

	pub source_id: String,

	/// Profile named by the file (`application-<tag>.yml`), if any.
	pub profile_tag: Option<String>,
}

const BOOTSTRAP_BASE_PRIORITY: u8 = 0;
const APPLICATION_BASE_PRIORITY: u8 = 2;
const PROFILE_MARKERS: [&str; 2] = ["application-", "bootstrap-"];

impl Candidate {
	/// Build a candidate from a raw document.
	///
	/// Returns `None` for documents with empty content; they never take part
	/// in aggregation.
	pub fn from_document(doc: &RawDocument) -> Option<Self> {
		if doc.content.is_empty() {
			return None;
		}

		let lower = doc.name.to_lowercase();
		let is_yaml_format = is_yaml_name(&lower);
		let profile_tag = profile_from_name(&lower);

		let base = if lower.contains("bootstrap") {
			BOOTSTRAP_BASE_PRIORITY
		} else {
			APPLICATION_BASE_PRIORITY
		};
		let priority = if profile_tag.is_some() { base + 1 } else { base };

		Some(Candidate {
			priority,
			parsed_view: parse_values(&doc.content, is_yaml_format),
			is_yaml_format,
			source_id: doc.source_id.clone(),
			profile_tag,
		})
	}
}

/// Extract the profile suffix from a lowercased document name.
///
/// `application-prod.yml` gives `prod`. The `application-` marker is tried
/// before `bootstrap-`; a marker not followed by a non-empty segment ending in
/// `.` yields nothing.
pub fn profile_from_name(lower_name: &str) -> Option<String> {
	PROFILE_MARKERS.iter().find_map(|marker| {
		let idx = lower_name.find(marker)?;
		let remainder = &lower_name[idx + marker.len()..];
		match remainder.find('.') {
			Some(dot) if dot > 0 => Some(remainder[..dot].to_string()),
			_ => None,
		}
	})
}

/// Build candidates for every document and order them for aggregation.
///
/// `docs` must already be in discovery order. The sort is stable, so
/// equal-priority candidates keep that order.
pub fn rank_candidates(docs: &[RawDocument]) -> Vec<Candidate> {
	let mut candidates: Vec<Candidate> = docs.iter().filter_map(Candidate::from_document).collect();
	candidates.sort_by_key(|candidate| candidate.priority);
	candidates
}
