//! Settings loading for config-probe.
//!
//! This module handles:
//! - TOML settings file parsing
//! - Settings file discovery (explicit, working directory, user config dir)

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{SETTINGS_FILE_NAME, discover_settings, user_settings_path};
pub use parser::{parse_settings_file, parse_settings_str};
pub use types::{LoadedSettings, ProbeSettings, ScanLimits};
