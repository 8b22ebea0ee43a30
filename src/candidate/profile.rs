use crate::candidate::Candidate;
use crate::env::{EnvironmentProvider, SPRING_CLOUD_CONFIG_PROFILE, SPRING_PROFILES_ACTIVE, split_list};

/// Keys that restrict a document to a set of profiles, in lookup order.
pub const PROFILE_DIRECTIVE_KEYS: [&str; 2] = ["spring.profiles", "spring.config.activate.on-profile"];

pub const DEFAULT_PROFILE: &str = "default";

/// The ordered set of profiles active for one discovery pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveProfiles(Vec<String>);

impl ActiveProfiles {
	/// Build from explicit names, falling back to `default` when none remain.
	pub fn new<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut profiles: Vec<String> = Vec::new();
		for name in names {
			let name = name.as_ref().trim();
			if !name.is_empty() && !profiles.iter().any(|p| p == name) {
				profiles.push(name.to_string());
			}
		}
		if profiles.is_empty() {
			profiles.push(DEFAULT_PROFILE.to_string());
		}
		Self(profiles)
	}

	/// Read the active profiles from `SPRING_PROFILES_ACTIVE`, falling back to
	/// `SPRING_CLOUD_CONFIG_PROFILE`.
	pub fn from_env(env: &dyn EnvironmentProvider) -> Self {
		match env.first_non_empty(&[SPRING_PROFILES_ACTIVE, SPRING_CLOUD_CONFIG_PROFILE]) {
			Some(raw) => Self::new(split_list(&raw)),
			None => Self::new(std::iter::empty::<&str>()),
		}
	}

	pub fn contains(&self, profile: &str) -> bool {
		self.0.iter().any(|p| p == profile)
	}

	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}

impl Default for ActiveProfiles {
	fn default() -> Self {
		Self::new(std::iter::empty::<&str>())
	}
}

/// Decide whether a candidate contributes to aggregation.
///
/// A candidate is excluded when its file-name profile tag is not active, or
/// when its profile directive names no active profile.
pub fn is_active(candidate: &Candidate, active: &ActiveProfiles) -> bool {
	if let Some(tag) = candidate.profile_tag.as_deref()
		&& !tag.is_empty()
		&& !active.contains(tag)
	{
		return false;
	}

	let directive = PROFILE_DIRECTIVE_KEYS.iter().find_map(|key| {
		candidate
			.parsed_view
			.get(*key)
			.map(|value| value.trim())
			.filter(|value| !value.is_empty())
	});

	match directive {
		Some(names) => split_list(names).iter().any(|name| active.contains(name)),
		None => true,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::candidate::{Origin, RawDocument};
	use crate::env::MapEnv;

	fn candidate(name: &str, content: &str) -> Candidate {
		Candidate::from_document(&RawDocument::new(Origin::Filesystem, name, name, content)).unwrap()
	}

	#[test]
	fn test_profile_tag_exclusion() {
		let prod = candidate("application-prod.yml", "a: 1");

		assert!(!is_active(&prod, &ActiveProfiles::new(["dev"])));
		assert!(is_active(&prod, &ActiveProfiles::new(["prod"])));
		assert!(is_active(&prod, &ActiveProfiles::new(["prod", "dev"])));
	}

	#[test]
	fn test_untagged_without_directive_is_active() {
		let plain = candidate("application.yml", "a: 1");

		assert!(is_active(&plain, &ActiveProfiles::default()));
		assert!(is_active(&plain, &ActiveProfiles::new(["anything"])));
	}

	#[test]
	fn test_directive_intersection() {
		let doc = candidate("application.properties", "spring.profiles=qa, prod");

		assert!(is_active(&doc, &ActiveProfiles::new(["prod"])));
		assert!(!is_active(&doc, &ActiveProfiles::new(["dev"])));
	}

	#[test]
	fn test_on_profile_directive() {
		let doc = candidate(
			"application.yml",
			"spring:\n  config:\n    activate:\n      on-profile: dev;local\n",
		);

		assert!(is_active(&doc, &ActiveProfiles::new(["local"])));
		assert!(!is_active(&doc, &ActiveProfiles::default()));
	}

	#[test]
	fn test_first_directive_key_wins() {
		let doc = candidate(
			"application.properties",
			"spring.profiles=dev\nspring.config.activate.on-profile=prod",
		);

		assert!(is_active(&doc, &ActiveProfiles::new(["dev"])));
		assert!(!is_active(&doc, &ActiveProfiles::new(["prod"])));
	}

	#[test]
	fn test_directive_with_only_separators_never_matches() {
		let doc = candidate("application.properties", "spring.profiles=,;");

		assert!(!is_active(&doc, &ActiveProfiles::default()));
	}

	#[test]
	fn test_tag_and_directive_both_apply() {
		let doc = candidate("application-prod.properties", "spring.profiles=eu");

		assert!(!is_active(&doc, &ActiveProfiles::new(["prod"])));
		assert!(is_active(&doc, &ActiveProfiles::new(["prod", "eu"])));
	}

	#[test]
	fn test_active_profiles_default() {
		assert_eq!(ActiveProfiles::default().as_slice(), ["default"]);
		assert_eq!(ActiveProfiles::new(["", "  "]).as_slice(), ["default"]);
		assert_eq!(ActiveProfiles::new(["a", "b", "a"]).as_slice(), ["a", "b"]);
	}

	#[test]
	fn test_active_profiles_from_env() {
		let env = MapEnv::new().with(SPRING_PROFILES_ACTIVE, "dev, prod");
		assert_eq!(ActiveProfiles::from_env(&env).as_slice(), ["dev", "prod"]);

		let env = MapEnv::new()
			.with(SPRING_PROFILES_ACTIVE, "  ")
			.with(SPRING_CLOUD_CONFIG_PROFILE, "cloud");
		assert_eq!(ActiveProfiles::from_env(&env).as_slice(), ["cloud"]);

		let env = MapEnv::new().with(SPRING_PROFILES_ACTIVE, ";");
		assert_eq!(ActiveProfiles::from_env(&env).as_slice(), ["default"]);
	}
}
