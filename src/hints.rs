//! Config-server hint aggregation.
//!
//! Candidates are walked in precedence order and each hint field is filled at
//! most once, from the first active candidate that provides it. Aggregation
//! stops as soon as every required field is known.

use serde::Serialize;

use crate::candidate::{ActiveProfiles, Candidate, is_active};
use crate::extract::ParsedView;

pub const CONFIG_IMPORT_KEY: &str = "spring.config.import";
pub const CONFIG_URI_KEY: &str = "spring.cloud.config.uri";
pub const USERNAME_KEY: &str = "spring.cloud.config.username";
pub const PASSWORD_KEY: &str = "spring.cloud.config.password";
pub const ENCRYPT_KEY_KEY: &str = "encrypt.key";
pub const APPLICATION_NAME_KEY: &str = "spring.application.name";
pub const PROFILE_KEY: &str = "spring.profiles.active";

/// Connection facts gathered from configuration candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
	pub config_import: Option<String>,
	pub config_uri: Option<String>,
	pub username: Option<String>,
	pub password: Option<String>,
	pub encrypt_key: Option<String>,
	pub application_name: Option<String>,
	pub profile: Option<String>,

	/// Source id of the first non-empty candidate consulted.
	pub source: Option<String>,
}

impl Hint {
	/// Whether every field needed to reach the config server is set.
	///
	/// `encrypt_key` and `source` are not required.
	pub fn is_complete(&self) -> bool {
		self.config_import.is_some()
			&& self.config_uri.is_some()
			&& self.username.is_some()
			&& self.password.is_some()
			&& self.application_name.is_some()
			&& self.profile.is_some()
	}

	/// Fill every still-unset field from `values`.
	fn absorb(&mut self, values: &ParsedView) {
		set_once(&mut self.config_import, values, CONFIG_IMPORT_KEY);
		set_once(&mut self.config_uri, values, CONFIG_URI_KEY);
		set_once(&mut self.username, values, USERNAME_KEY);
		set_once(&mut self.password, values, PASSWORD_KEY);
		set_once(&mut self.encrypt_key, values, ENCRYPT_KEY_KEY);
		set_once(&mut self.application_name, values, APPLICATION_NAME_KEY);
		set_once(&mut self.profile, values, PROFILE_KEY);
	}
}

fn set_once(field: &mut Option<String>, values: &ParsedView, key: &str) {
	if field.is_some() {
		return;
	}
	if let Some(value) = values.get(key).filter(|v| !v.is_empty()) {
		*field = Some(value.clone());
	}
}

/// Aggregate a hint from candidates already ranked by [`rank_candidates`].
///
/// Inactive candidates are skipped. Once the hint is complete no further
/// candidates are consulted, even ones that would disagree.
///
/// [`rank_candidates`]: crate::candidate::rank_candidates
pub fn aggregate(candidates: &[Candidate], active: &ActiveProfiles) -> Hint {
	let mut hint = Hint::default();

	for candidate in candidates {
		if !is_active(candidate, active) {
			tracing::debug!(source = %candidate.source_id, "skipping inactive candidate");
			continue;
		}

		hint.absorb(&candidate.parsed_view);

		if hint.source.is_none() && !candidate.parsed_view.is_empty() {
			hint.source = Some(candidate.source_id.clone());
		}

		if hint.is_complete() {
			tracing::debug!(source = %candidate.source_id, "hint complete");
			break;
		}
	}

	hint
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::candidate::{Origin, RawDocument, rank_candidates};

	fn docs(entries: &[(&str, &str)]) -> Vec<RawDocument> {
		entries
			.iter()
			.map(|(name, content)| RawDocument::new(Origin::Filesystem, *name, *name, *content))
			.collect()
	}

	#[test]
	fn test_first_candidate_wins() {
		let candidates = rank_candidates(&docs(&[
			("application.properties", "spring.cloud.config.uri=http://first:8888"),
			("other/application.properties", "spring.cloud.config.uri=http://second:8888"),
		]));

		let hint = aggregate(&candidates, &ActiveProfiles::default());

		assert_eq!(hint.config_uri.as_deref(), Some("http://first:8888"));
		assert_eq!(hint.source.as_deref(), Some("application.properties"));
	}

	#[test]
	fn test_lower_priority_number_wins_regardless_of_order() {
		let candidates = rank_candidates(&docs(&[
			("application.properties", "spring.cloud.config.uri=http://app:8888"),
			("bootstrap.properties", "spring.cloud.config.uri=http://boot:8888"),
		]));

		let hint = aggregate(&candidates, &ActiveProfiles::default());

		assert_eq!(hint.config_uri.as_deref(), Some("http://boot:8888"));
	}

	#[test]
	fn test_fields_fill_from_multiple_candidates() {
		let candidates = rank_candidates(&docs(&[
			("bootstrap.yml", "spring:\n  application:\n    name: orders\n"),
			(
				"application.yml",
				"spring:\n  application:\n    name: ignored\n  cloud:\n    config:\n      uri: http://cfg\n",
			),
		]));

		let hint = aggregate(&candidates, &ActiveProfiles::default());

		assert_eq!(hint.application_name.as_deref(), Some("orders"));
		assert_eq!(hint.config_uri.as_deref(), Some("http://cfg"));
		assert_eq!(hint.source.as_deref(), Some("bootstrap.yml"));
	}

	#[test]
	fn test_inactive_candidates_contribute_nothing() {
		let candidates = rank_candidates(&docs(&[
			("application-prod.properties", "spring.cloud.config.uri=http://prod"),
			("application.properties", "spring.cloud.config.uri=http://base"),
		]));

		let hint = aggregate(&candidates, &ActiveProfiles::new(["dev"]));

		assert_eq!(hint.config_uri.as_deref(), Some("http://base"));
	}

	#[test]
	fn test_stops_once_complete() {
		let complete = "spring.config.import=configserver:http://a\n\
			spring.cloud.config.uri=http://a\n\
			spring.cloud.config.username=u\n\
			spring.cloud.config.password=p\n\
			spring.application.name=svc\n\
			spring.profiles.active=dev\n";
		let candidates = rank_candidates(&docs(&[
			("bootstrap.properties", complete),
			("application.properties", "encrypt.key=late"),
		]));

		let hint = aggregate(&candidates, &ActiveProfiles::default());

		assert!(hint.is_complete());
		// The later candidate is never consulted, so the optional key stays unset.
		assert_eq!(hint.encrypt_key, None);
	}

	#[test]
	fn test_encrypt_key_not_required_for_completeness() {
		let hint = Hint {
			config_import: Some("a".into()),
			config_uri: Some("b".into()),
			username: Some("c".into()),
			password: Some("d".into()),
			application_name: Some("e".into()),
			profile: Some("f".into()),
			..Default::default()
		};

		assert!(hint.is_complete());
		assert!(!Hint::default().is_complete());
	}

	#[test]
	fn test_source_requires_non_empty_view() {
		let candidates = rank_candidates(&docs(&[
			("bootstrap.properties", "# only a comment"),
			("application.properties", "unrelated=1"),
		]));

		let hint = aggregate(&candidates, &ActiveProfiles::default());

		assert_eq!(hint.source.as_deref(), Some("application.properties"));
		assert_eq!(hint.config_uri, None);
	}

	#[test]
	fn test_quoted_empty_value_does_not_fill() {
		let candidates = rank_candidates(&docs(&[
			("bootstrap.properties", "spring.application.name=\"\""),
			("application.properties", "spring.application.name=real"),
		]));

		let hint = aggregate(&candidates, &ActiveProfiles::default());

		assert_eq!(hint.application_name.as_deref(), Some("real"));
	}
}
