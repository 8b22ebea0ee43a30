use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::candidate::{Origin, RawDocument};
use crate::settings::ScanLimits;
use crate::sources::is_config_base_name;
use crate::sources::reader::{ContentPayload, read_file};

/// A configuration file found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMatch {
	pub path: PathBuf,

	#[serde(flatten)]
	pub payload: ContentPayload,
}

/// Result of walking the filesystem search roots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileScan {
	/// Every root considered, including ones that do not exist.
	pub search_paths: Vec<String>,

	pub matches: Vec<FileMatch>,
}

impl FileScan {
	pub fn documents(&self) -> Vec<RawDocument> {
		self.matches
			.iter()
			.map(|found| {
				let path = found.path.display().to_string();
				RawDocument {
					source_id: path.clone(),
					name: path,
					content: found.payload.content.clone(),
					origin: Origin::Filesystem,
					size_bytes: found.payload.size_bytes,
					truncated: found.payload.truncated,
				}
			})
			.collect()
	}
}

/// Walk `roots` in order, collecting configuration files up to `max_files`.
pub fn scan_files(roots: &[PathBuf], limits: &ScanLimits) -> FileScan {
	let mut scan = FileScan::default();

	for root in roots {
		scan.search_paths.push(root.display().to_string());
		walk_root(root, limits, &mut scan.matches);
		if scan.matches.len() >= limits.max_files {
			break;
		}
	}

	tracing::debug!(count = scan.matches.len(), "filesystem scan finished");
	scan
}

fn walk_root(root: &Path, limits: &ScanLimits, matches: &mut Vec<FileMatch>) {
	if !root.exists() {
		return;
	}

	let walker = WalkDir::new(root)
		.max_depth(limits.max_depth.max(1))
		.sort_by_file_name();

	for entry in walker {
		if matches.len() >= limits.max_files {
			return;
		}
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) => {
				tracing::debug!(error = %e, "skipping unreadable path");
				continue;
			}
		};
		if !entry.file_type().is_file() {
			continue;
		}
		let is_config = entry
			.file_name()
			.to_str()
			.is_some_and(is_config_base_name);
		if !is_config {
			continue;
		}

		match read_file(entry.path(), limits.max_chars) {
			Ok(payload) => matches.push(FileMatch {
				path: entry.path().to_path_buf(),
				payload,
			}),
			Err(e) => tracing::debug!(error = %e, "skipping unreadable file"),
		}
	}
}
