//! Document collaborators.
//!
//! This module handles:
//! - Looking up fixed resource names under embedded resource roots
//! - Walking filesystem search roots for configuration files
//! - Scanning `.jar` archives for configuration entries
//!
//! Every collaborator enforces its own caps and swallows read failures; the
//! engine only sees the documents that could be read.

pub mod archive;
pub mod filesystem;
pub mod reader;
pub mod resources;

use std::path::{Path, PathBuf};

use crate::env::{
	EnvironmentProvider, SPRING_CONFIG_ADDITIONAL_LOCATION, SPRING_CONFIG_LOCATION, split_list,
};
use crate::settings::ProbeSettings;

pub use archive::{ArchiveEntry, ArchiveMatch, ArchiveReader, ArchiveScan, ZipArchiveReader, scan_archives};
pub use filesystem::{FileMatch, FileScan, scan_files};
pub use reader::{ContentPayload, read_file, read_stream};
pub use resources::{RESOURCE_NAMES, ResourceEntry, ResourceScan, scan_resources};

/// Well-known deployment directories searched unless disabled.
pub const DEFAULT_SEARCH_DIRS: [&str; 13] = [
	".",
	"./config",
	"/app",
	"/app/config",
	"/deployments",
	"/deployments/config",
	"/opt/app",
	"/opt/app/config",
	"/workspace",
	"/workspace/config",
	"/usr/app",
	"/usr/app/config",
	"/config",
];

const CONFIG_EXTENSIONS: [&str; 3] = [".yml", ".yaml", ".properties"];

/// Whether a base file name looks like a Spring configuration file.
pub fn is_config_base_name(base_name: &str) -> bool {
	let lower = base_name.to_lowercase();
	(lower.starts_with("application") || lower.starts_with("bootstrap"))
		&& CONFIG_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Whether an archive entry (a `/`-separated path) is a configuration file.
pub fn is_config_resource_name(name: &str) -> bool {
	let base = name.rsplit('/').next().unwrap_or(name);
	is_config_base_name(base)
}

/// Paths named by `SPRING_CONFIG_LOCATION` (or the additional location).
///
/// `optional:` and `file:` prefixes are stripped; classpath and HTTP locations
/// are not filesystem roots and are skipped.
pub fn spring_config_paths(env: &dyn EnvironmentProvider) -> Vec<PathBuf> {
	let Some(raw) = env.first_non_empty(&[SPRING_CONFIG_LOCATION, SPRING_CONFIG_ADDITIONAL_LOCATION])
	else {
		return Vec::new();
	};

	split_list(&raw)
		.iter()
		.map(String::as_str)
		.filter_map(|token| {
			let token = token.strip_prefix("optional:").unwrap_or(token);
			let token = token.strip_prefix("file:").unwrap_or(token);
			if token.starts_with("classpath:") || token.starts_with("http") {
				None
			} else {
				Some(PathBuf::from(token))
			}
		})
		.collect()
}

/// All filesystem roots to search, in order.
pub fn search_roots(
	working_dir: &Path,
	settings: &ProbeSettings,
	env: &dyn EnvironmentProvider,
) -> Vec<PathBuf> {
	let mut roots = vec![working_dir.to_path_buf(), working_dir.join("config")];
	if settings.default_search_dirs {
		roots.extend(DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from));
	}
	roots.extend(spring_config_paths(env));
	roots.extend(settings.search_paths.iter().cloned());
	roots
}
