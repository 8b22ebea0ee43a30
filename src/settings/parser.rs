use crate::error::{ProbeError, Result};
use crate::settings::types::ProbeSettings;
use std::path::Path;

/// Parse a settings file from the given path.
pub fn parse_settings_file(path: &Path) -> Result<ProbeSettings> {
	let content = std::fs::read_to_string(path).map_err(|source| ProbeError::SettingsReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_settings_str(&content, path)
}

/// Parse settings from a string (useful for testing).
pub fn parse_settings_str(content: &str, path: &Path) -> Result<ProbeSettings> {
	toml::from_str(content).map_err(|source| ProbeError::SettingsParseError {
		path: path.to_path_buf(),
		source,
	})
}
