use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MAX_CHARS: usize = 200_000;
pub const DEFAULT_MAX_FILES: usize = 120;
pub const DEFAULT_MAX_JARS: usize = 20;
pub const DEFAULT_MAX_DEPTH: usize = 6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Scan settings from a `.config-probe.toml` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProbeSettings {
	/// Maximum characters kept from any single document or response body.
	pub max_chars: usize,

	/// Maximum number of matching configuration files across all search roots.
	pub max_files: usize,

	/// Maximum number of archives that contribute entries.
	pub max_jars: usize,

	/// Maximum directory depth walked below each search root.
	pub max_depth: usize,

	/// Extra filesystem roots searched after the built-in ones.
	pub search_paths: Vec<PathBuf>,

	/// Directories treated as embedded resource roots (e.g. `BOOT-INF/classes`).
	pub resource_roots: Vec<PathBuf>,

	/// Whether the well-known deployment directories (`/app`, `/deployments`, ...)
	/// are searched.
	pub default_search_dirs: bool,

	/// Whether the resolved config server is queried.
	pub fetch: bool,

	/// Connect and read timeout for the config server request.
	pub timeout_secs: u64,

	/// Report destination. Stdout when unset.
	pub output: Option<PathBuf>,
}

impl Default for ProbeSettings {
	fn default() -> Self {
		Self {
			max_chars: DEFAULT_MAX_CHARS,
			max_files: DEFAULT_MAX_FILES,
			max_jars: DEFAULT_MAX_JARS,
			max_depth: DEFAULT_MAX_DEPTH,
			search_paths: Vec::new(),
			resource_roots: Vec::new(),
			default_search_dirs: true,
			fetch: true,
			timeout_secs: DEFAULT_TIMEOUT_SECS,
			output: None,
		}
	}
}

/// Caps applied by the source collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
	pub max_chars: usize,
	pub max_files: usize,
	pub max_jars: usize,
	pub max_depth: usize,
}

impl Default for ScanLimits {
	fn default() -> Self {
		ProbeSettings::default().limits()
	}
}

impl ProbeSettings {
	pub fn limits(&self) -> ScanLimits {
		ScanLimits {
			max_chars: self.max_chars,
			max_files: self.max_files,
			max_jars: self.max_jars,
			max_depth: self.max_depth,
		}
	}

	/// Config server timeout, never below one second.
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs.max(1))
	}
}

/// Settings together with the file they were read from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
	pub settings: ProbeSettings,

	/// `None` when no settings file was found and defaults apply.
	pub path: Option<PathBuf>,
}
