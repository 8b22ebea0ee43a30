//! Config-server request.
//!
//! This module handles:
//! - A single blocking GET to the resolved URL with fixed timeouts
//! - HTTP Basic credentials when a username and password were resolved
//! - Recording the status, capped body, or failure message
//!
//! There is no retry. Failures never abort the pass; they end up in
//! [`ConfigServerReport::error`].

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::locator::ResolvedRequest;
use crate::sources::reader::read_stream;

/// Reasons a config server request produced no usable response.
#[derive(Debug, Error)]
enum FetchError {
	#[error(transparent)]
	Http(#[from] reqwest::Error),

	#[error("failed to read response body: {0}")]
	Body(#[from] std::io::Error),
}

/// The `configServer` section of the report. Empty when no endpoint was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigServerReport {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<u16>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub truncated: Option<bool>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ConfigServerReport {
	/// The section for a resolved request that has not been fetched.
	pub fn unfetched(request: &ResolvedRequest) -> Self {
		Self {
			url: Some(request.url.clone()),
			source: request.source.clone(),
			..Default::default()
		}
	}
}

/// Options for the config-server request.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
	/// Applied to both connecting and the whole request.
	pub timeout: Duration,

	/// Maximum characters of the response body kept.
	pub max_chars: usize,
}

/// Query the config server once and record the outcome.
pub fn fetch_config(request: &ResolvedRequest, options: &FetchOptions) -> ConfigServerReport {
	let mut report = ConfigServerReport::unfetched(request);

	match send(request, options, &mut report) {
		Ok(()) => tracing::info!(url = %request.url, status = ?report.status, "config server responded"),
		Err(e) => {
			tracing::warn!(url = %request.url, error = %e, "config server request failed");
			report.error = Some(e.to_string());
		}
	}

	report
}

fn send(
	request: &ResolvedRequest,
	options: &FetchOptions,
	report: &mut ConfigServerReport,
) -> Result<(), FetchError> {
	let client = reqwest::blocking::Client::builder()
		.connect_timeout(options.timeout)
		.timeout(options.timeout)
		.no_proxy()
		.build()?;

	let mut builder = client.get(&request.url);
	if let Some(username) = request.username.as_deref().filter(|u| !u.is_empty())
		&& let Some(password) = request.password.as_deref()
	{
		builder = builder.basic_auth(username, Some(password));
	}

	let response = builder.send()?;
	report.status = Some(response.status().as_u16());

	let body = read_stream(response, options.max_chars)?;
	report.content = Some(body.content);
	report.truncated = Some(body.truncated);

	Ok(())
}
