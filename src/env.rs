//! Environment lookups used by discovery.
//!
//! Resolution code never reads the process environment directly. It takes an
//! [`EnvironmentProvider`] so a discovery pass is a pure function of its
//! documents and an environment snapshot.

use std::collections::{BTreeMap, HashMap};

pub const SPRING_CONFIG_LOCATION: &str = "SPRING_CONFIG_LOCATION";
pub const SPRING_CONFIG_ADDITIONAL_LOCATION: &str = "SPRING_CONFIG_ADDITIONAL_LOCATION";
pub const SPRING_PROFILES_ACTIVE: &str = "SPRING_PROFILES_ACTIVE";
pub const SPRING_CLOUD_CONFIG_PROFILE: &str = "SPRING_CLOUD_CONFIG_PROFILE";
pub const SPRING_APPLICATION_NAME: &str = "SPRING_APPLICATION_NAME";
pub const SPRING_CLOUD_CONFIG_NAME: &str = "SPRING_CLOUD_CONFIG_NAME";
pub const SPRING_CLOUD_CONFIG_URI: &str = "SPRING_CLOUD_CONFIG_URI";
pub const SPRING_CONFIG_IMPORT: &str = "SPRING_CONFIG_IMPORT";
pub const SPRING_CLOUD_CONFIG_USERNAME: &str = "SPRING_CLOUD_CONFIG_USERNAME";
pub const SPRING_CLOUD_CONFIG_PASSWORD: &str = "SPRING_CLOUD_CONFIG_PASSWORD";
pub const ENCRYPT_KEY: &str = "ENCRYPT_KEY";

/// Read-only access to named environment values.
pub trait EnvironmentProvider {
	/// Raw value of `key`, if set.
	fn get(&self, key: &str) -> Option<String>;

	/// Value of `key`, trimmed, or `None` if unset, empty or whitespace-only.
	fn get_non_empty(&self, key: &str) -> Option<String> {
		self.get(key).and_then(non_blank)
	}

	/// First non-blank value among `keys`, trimmed.
	fn first_non_empty(&self, keys: &[&str]) -> Option<String> {
		keys.iter().find_map(|key| self.get_non_empty(key))
	}
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvironmentProvider for ProcessEnv {
	fn get(&self, key: &str) -> Option<String> {
		std::env::var(key).ok()
	}
}

impl ProcessEnv {
	/// Snapshot of the whole environment, sorted by name.
	pub fn snapshot(&self) -> BTreeMap<String, String> {
		std::env::vars().collect()
	}
}

/// A fixed mapping, used for tests and replaying captured environments.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
	values: HashMap<String, String>,
}

impl MapEnv {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	pub fn with(mut self, key: &str, value: &str) -> Self {
		self.values.insert(key.to_string(), value.to_string());
		self
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			values: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

impl EnvironmentProvider for MapEnv {
	fn get(&self, key: &str) -> Option<String> {
		self.values.get(key).cloned()
	}
}

/// Trim `value`, mapping blank strings to `None`.
pub(crate) fn non_blank(value: String) -> Option<String> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		None
	} else if trimmed.len() == value.len() {
		Some(value)
	} else {
		Some(trimmed.to_string())
	}
}

/// Split a `,`/`;` separated list, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
	raw.split([',', ';'])
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(str::to_string)
		.collect()
}
