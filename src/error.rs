use std::path::PathBuf;

/// Library-level structured errors for config-probe.
///
/// Discovery itself never fails: unreadable documents, broken archives and
/// network problems degrade to "this source contributes nothing". These
/// variants cover the operator-facing edges (settings files and output).
/// The CLI binary wraps them with `anyhow` for context chains.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
	#[error("Settings file not found: {path}")]
	SettingsNotFound { path: PathBuf },

	#[error("Failed to read settings file: {path}")]
	SettingsReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings file: {path}")]
	SettingsParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to open archive: {path}")]
	ArchiveError {
		path: PathBuf,
		#[source]
		source: zip::result::ZipError,
	},

	#[error("Failed to read {path}")]
	ReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write output: {path}")]
	OutputWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to serialize report")]
	SerializeError(#[from] serde_json::Error),
}

/// Result type alias using ProbeError.
pub type Result<T> = std::result::Result<T, ProbeError>;
