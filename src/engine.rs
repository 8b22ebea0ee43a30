//! One discovery pass over a set of raw documents.

use crate::candidate::{ActiveProfiles, Candidate, RawDocument, rank_candidates};
use crate::env::EnvironmentProvider;
use crate::hints::{Hint, aggregate};
use crate::locator::{ResolvedRequest, locate};

/// Result of a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
	pub active_profiles: ActiveProfiles,

	/// Candidates in aggregation order.
	pub candidates: Vec<Candidate>,

	pub hint: Hint,

	/// `None` when nothing points at a config server.
	pub request: Option<ResolvedRequest>,
}

/// Run discovery over documents given in discovery order.
///
/// Callers concatenate resource-loader, filesystem and archive documents in
/// that order; [`discover_from_sources`] does it for them. The result depends
/// only on `documents` and `env`.
pub fn discover(documents: &[RawDocument], env: &dyn EnvironmentProvider) -> Discovery {
	let active_profiles = ActiveProfiles::from_env(env);
	let candidates = rank_candidates(documents);
	let hint = aggregate(&candidates, &active_profiles);
	let request = locate(&hint, env);

	tracing::info!(
		documents = documents.len(),
		candidates = candidates.len(),
		profiles = ?active_profiles.as_slice(),
		endpoint = request.is_some(),
		"discovery pass finished"
	);

	Discovery {
		active_profiles,
		candidates,
		hint,
		request,
	}
}

/// Run discovery over per-origin document lists.
pub fn discover_from_sources(
	resources: &[RawDocument],
	files: &[RawDocument],
	archives: &[RawDocument],
	env: &dyn EnvironmentProvider,
) -> Discovery {
	let documents: Vec<RawDocument> = resources
		.iter()
		.chain(files)
		.chain(archives)
		.cloned()
		.collect();
	discover(&documents, env)
}
