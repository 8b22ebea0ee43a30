use crate::error::{ProbeError, Result};
use crate::settings::parser::parse_settings_file;
use crate::settings::types::LoadedSettings;
use std::path::{Path, PathBuf};

/// Name of the per-directory settings file.
pub const SETTINGS_FILE_NAME: &str = ".config-probe.toml";

/// Find and load the settings for a run.
///
/// The lookup order is:
/// 1. `explicit`, if given (it must exist)
/// 2. `.config-probe.toml` in `working_dir`
/// 3. `<user config dir>/config-probe/config.toml`
///
/// The first file found wins; when none exists the defaults apply.
pub fn discover_settings(working_dir: &Path, explicit: Option<&Path>) -> Result<LoadedSettings> {
	if let Some(path) = explicit {
		if !path.exists() {
			return Err(ProbeError::SettingsNotFound {
				path: path.to_path_buf(),
			});
		}
		return load(path.to_path_buf());
	}

	let local = working_dir.join(SETTINGS_FILE_NAME);
	if local.exists() {
		return load(local);
	}

	if let Some(user) = user_settings_path()
		&& user.exists()
	{
		return load(user);
	}

	tracing::debug!("no settings file found, using defaults");
	Ok(LoadedSettings::default())
}

fn load(path: PathBuf) -> Result<LoadedSettings> {
	let settings = parse_settings_file(&path)?;
	tracing::debug!(path = %path.display(), "loaded settings");
	Ok(LoadedSettings {
		settings,
		path: Some(path),
	})
}

/// Get the path to the user's settings file, if a config directory exists.
pub fn user_settings_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("config-probe").join("config.toml"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_explicit_missing_is_error() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("nope.toml");

		match discover_settings(dir.path(), Some(&missing)).unwrap_err() {
			ProbeError::SettingsNotFound { path } => assert_eq!(path, missing),
			other => panic!("Expected SettingsNotFound, got {other:?}"),
		}
	}

	#[test]
	fn test_explicit_file_wins_over_local() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join(SETTINGS_FILE_NAME), "max-files = 1").unwrap();
		let explicit = dir.path().join("custom.toml");
		std::fs::write(&explicit, "max-files = 9").unwrap();

		let loaded = discover_settings(dir.path(), Some(&explicit)).unwrap();

		assert_eq!(loaded.settings.max_files, 9);
		assert_eq!(loaded.path, Some(explicit));
	}

	#[test]
	fn test_local_file_is_found() {
		let dir = tempfile::tempdir().unwrap();
		let local = dir.path().join(SETTINGS_FILE_NAME);
		std::fs::write(&local, "fetch = false").unwrap();

		let loaded = discover_settings(dir.path(), None).unwrap();

		assert!(!loaded.settings.fetch);
		assert_eq!(loaded.path, Some(local));
	}

	#[test]
	fn test_user_settings_path() {
		if let Some(path) = user_settings_path() {
			assert!(path.ends_with("config-probe/config.toml"));
		}
	}
}
