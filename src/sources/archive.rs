use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::candidate::{Origin, RawDocument};
use crate::error::{ProbeError, Result};
use crate::settings::ScanLimits;
use crate::sources::is_config_resource_name;
use crate::sources::reader::{ContentPayload, read_stream};

/// Sequential access to the entries of a packaged archive.
pub trait ArchiveReader {
	/// Read every entry whose name passes `wanted`, in archive order.
	///
	/// Entries that cannot be read are skipped.
	fn read_entries(&mut self, wanted: &dyn Fn(&str) -> bool, max_chars: usize) -> Vec<ArchiveEntry>;
}

/// One configuration entry inside an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
	pub name: String,

	#[serde(flatten)]
	pub payload: ContentPayload,
}

/// An archive with at least one configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveMatch {
	pub jar_path: PathBuf,
	pub entries: Vec<ArchiveEntry>,
}

/// Result of scanning the search roots for archives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveScan {
	pub search_paths: Vec<String>,
	pub matches: Vec<ArchiveMatch>,
}

impl ArchiveScan {
	pub fn documents(&self) -> Vec<RawDocument> {
		self.matches
			.iter()
			.flat_map(|archive| {
				archive.entries.iter().map(move |entry| RawDocument {
					source_id: format!("{}!{}", archive.jar_path.display(), entry.name),
					name: entry.name.clone(),
					content: entry.payload.content.clone(),
					origin: Origin::Archive,
					size_bytes: entry.payload.size_bytes,
					truncated: entry.payload.truncated,
				})
			})
			.collect()
	}
}

/// [`ArchiveReader`] over a zip-format file (`.jar`, `.war`, `.zip`).
pub struct ZipArchiveReader {
	path: PathBuf,
	archive: ZipArchive<File>,
}

impl ZipArchiveReader {
	pub fn open(path: &Path) -> Result<Self> {
		let file = File::open(path).map_err(|source| ProbeError::ReadError {
			path: path.to_path_buf(),
			source,
		})?;
		let archive = ZipArchive::new(file).map_err(|source| ProbeError::ArchiveError {
			path: path.to_path_buf(),
			source,
		})?;
		Ok(Self {
			path: path.to_path_buf(),
			archive,
		})
	}
}

impl ArchiveReader for ZipArchiveReader {
	fn read_entries(&mut self, wanted: &dyn Fn(&str) -> bool, max_chars: usize) -> Vec<ArchiveEntry> {
		let mut entries = Vec::new();

		for index in 0..self.archive.len() {
			let file = match self.archive.by_index(index) {
				Ok(file) => file,
				Err(e) => {
					tracing::debug!(archive = %self.path.display(), index, error = %e, "skipping archive entry");
					continue;
				}
			};
			if file.is_dir() || !wanted(file.name()) {
				continue;
			}

			let name = file.name().to_string();
			match read_stream(file, max_chars) {
				Ok(payload) => entries.push(ArchiveEntry { name, payload }),
				Err(e) => {
					tracing::debug!(archive = %self.path.display(), entry = %name, error = %e, "skipping unreadable entry")
				}
			}
		}

		entries
	}
}

/// Collect configuration entries from one archive via any [`ArchiveReader`].
pub fn read_config_entries(reader: &mut dyn ArchiveReader, max_chars: usize) -> Vec<ArchiveEntry> {
	reader.read_entries(&is_config_resource_name, max_chars)
}

/// Walk `roots` for `.jar` files and read their configuration entries.
///
/// Only archives with at least one configuration entry count towards
/// `max_jars`.
pub fn scan_archives(roots: &[PathBuf], limits: &ScanLimits) -> ArchiveScan {
	let mut scan = ArchiveScan::default();

	for root in roots {
		scan.search_paths.push(root.display().to_string());
		walk_root(root, limits, &mut scan.matches);
		if scan.matches.len() >= limits.max_jars {
			break;
		}
	}

	tracing::debug!(count = scan.matches.len(), "archive scan finished");
	scan
}

fn walk_root(root: &Path, limits: &ScanLimits, matches: &mut Vec<ArchiveMatch>) {
	if !root.exists() {
		return;
	}

	let walker = WalkDir::new(root)
		.max_depth(limits.max_depth.max(1))
		.sort_by_file_name()
		.into_iter()
		.filter_map(|entry| entry.ok())
		.filter(|entry| entry.file_type().is_file())
		.filter(|entry| entry.path().to_string_lossy().ends_with(".jar"));

	for entry in walker {
		if matches.len() >= limits.max_jars {
			return;
		}
		let mut reader = match ZipArchiveReader::open(entry.path()) {
			Ok(reader) => reader,
			Err(e) => {
				tracing::debug!(error = %e, "skipping archive");
				continue;
			}
		};
		let entries = read_config_entries(&mut reader, limits.max_chars);
		if !entries.is_empty() {
			matches.push(ArchiveMatch {
				jar_path: entry.path().to_path_buf(),
				entries,
			});
		}
	}
}
