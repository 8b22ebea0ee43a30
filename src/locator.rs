//! Config-server endpoint resolution.
//!
//! The base URL comes from the first of, in order: the `SPRING_CONFIG_IMPORT`
//! override, the `SPRING_CLOUD_CONFIG_URI` override, the aggregated import
//! hint, the aggregated URI hint. Name, profile and credentials each prefer
//! their environment override over the hint.

use serde::Serialize;

use crate::env::{
	ENCRYPT_KEY, EnvironmentProvider, SPRING_APPLICATION_NAME, SPRING_CLOUD_CONFIG_NAME,
	SPRING_CLOUD_CONFIG_PASSWORD, SPRING_CLOUD_CONFIG_PROFILE, SPRING_CLOUD_CONFIG_URI,
	SPRING_CLOUD_CONFIG_USERNAME, SPRING_CONFIG_IMPORT, SPRING_PROFILES_ACTIVE,
};
use crate::hints::Hint;
use crate::secret;

const CONFIGSERVER_MARKER: &str = "configserver:";
const OPTIONAL_PREFIX: &str = "optional:";

pub const DEFAULT_APPLICATION_NAME: &str = "application";
pub const DEFAULT_PROFILE: &str = "default";

/// Everything the fetch collaborator needs to query the config server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRequest {
	/// `<base>/<application>/<profile>`.
	pub url: String,
	pub application_name: String,
	pub profile: String,
	pub username: Option<String>,

	/// Decrypted when a key was available, otherwise as found.
	#[serde(skip)]
	pub password: Option<String>,

	/// Source id recorded by the hint aggregator.
	pub source: Option<String>,
}

/// Pull the URL out of a `spring.config.import` style value.
///
/// Returns `None` unless the value contains `configserver:`. The URL is the
/// text after the marker with a leading `optional:` removed.
pub fn url_from_import(import: &str) -> Option<String> {
	let idx = import.find(CONFIGSERVER_MARKER)?;
	let url = import[idx + CONFIGSERVER_MARKER.len()..].trim();
	Some(url.strip_prefix(OPTIONAL_PREFIX).unwrap_or(url).to_string())
}

/// Resolve the config-server base URL, or `None` if nothing points at one.
pub fn resolve_base_url(hint: &Hint, env: &dyn EnvironmentProvider) -> Option<String> {
	if let Some(url) = env
		.get(SPRING_CONFIG_IMPORT)
		.as_deref()
		.and_then(url_from_import)
	{
		return Some(url);
	}
	if let Some(uri) = env.get_non_empty(SPRING_CLOUD_CONFIG_URI) {
		return Some(uri);
	}
	if let Some(url) = hint.config_import.as_deref().and_then(url_from_import) {
		return Some(url);
	}
	hint.config_uri.clone().filter(|uri| !uri.is_empty())
}

fn override_or_hint(env: &dyn EnvironmentProvider, keys: &[&str], hint: Option<&String>) -> Option<String> {
	env.first_non_empty(keys).or_else(|| {
		hint.map(|value| value.trim())
			.filter(|value| !value.is_empty())
			.map(str::to_string)
	})
}

/// Join a base URL with the application and profile path segments.
pub fn request_url(base: &str, application_name: &str, profile: &str) -> String {
	let mut url = base.to_string();
	if !url.ends_with('/') {
		url.push('/');
	}
	url.push_str(application_name);
	url.push('/');
	url.push_str(profile);
	url
}

/// Resolve the full request, or `None` when no endpoint can be determined.
///
/// A `configserver:` import with nothing after the marker still wins base
/// URL resolution, but yields no request.
pub fn locate(hint: &Hint, env: &dyn EnvironmentProvider) -> Option<ResolvedRequest> {
	let base = resolve_base_url(hint, env).filter(|base| !base.is_empty())?;

	let application_name = override_or_hint(
		env,
		&[SPRING_APPLICATION_NAME, SPRING_CLOUD_CONFIG_NAME],
		hint.application_name.as_ref(),
	)
	.unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string());
	let profile = override_or_hint(
		env,
		&[SPRING_PROFILES_ACTIVE, SPRING_CLOUD_CONFIG_PROFILE],
		hint.profile.as_ref(),
	)
	.unwrap_or_else(|| DEFAULT_PROFILE.to_string());

	let username = override_or_hint(env, &[SPRING_CLOUD_CONFIG_USERNAME], hint.username.as_ref());
	let encrypt_key = override_or_hint(env, &[ENCRYPT_KEY], hint.encrypt_key.as_ref());
	let password = override_or_hint(env, &[SPRING_CLOUD_CONFIG_PASSWORD], hint.password.as_ref())
		.map(|password| secret::decrypt(&password, encrypt_key.as_deref()));

	let url = request_url(&base, &application_name, &profile);
	tracing::info!(%url, "resolved config server request");

	Some(ResolvedRequest {
		url,
		application_name,
		profile,
		username,
		password,
		source: hint.source.clone(),
	})
}
