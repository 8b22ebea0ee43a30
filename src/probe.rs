//! A full probe: collect documents, run discovery, query the config server.

use std::path::Path;

use crate::engine::{Discovery, discover_from_sources};
use crate::env::EnvironmentProvider;
use crate::fetch::{ConfigServerReport, FetchOptions, fetch_config};
use crate::report::{Metadata, Report, group_resources};
use crate::settings::ProbeSettings;
use crate::sources::{
	ArchiveScan, FileScan, ResourceScan, scan_archives, scan_files, scan_resources, search_roots,
};

/// Documents gathered from every origin plus the discovery over them.
#[derive(Debug, Clone)]
pub struct Collected {
	pub resources: ResourceScan,
	pub files: FileScan,
	pub archives: ArchiveScan,
	pub discovery: Discovery,
}

/// Gather documents from all collaborators and run discovery.
pub fn collect(working_dir: &Path, settings: &ProbeSettings, env: &dyn EnvironmentProvider) -> Collected {
	let limits = settings.limits();
	let roots = search_roots(working_dir, settings, env);

	let resources = scan_resources(&settings.resource_roots, limits.max_chars);
	let files = scan_files(&roots, &limits);
	let archives = scan_archives(&roots, &limits);

	let discovery = discover_from_sources(
		&resources.documents(),
		&files.documents(),
		&archives.documents(),
		env,
	);

	Collected {
		resources,
		files,
		archives,
		discovery,
	}
}

/// Build the `configServer` section, querying the server when enabled.
pub fn config_server_section(discovery: &Discovery, settings: &ProbeSettings) -> ConfigServerReport {
	let Some(request) = discovery.request.as_ref() else {
		tracing::info!("no config server endpoint resolved");
		return ConfigServerReport::default();
	};

	if !settings.fetch {
		return ConfigServerReport::unfetched(request);
	}

	fetch_config(
		request,
		&FetchOptions {
			timeout: settings.timeout(),
			max_chars: settings.max_chars,
		},
	)
}

/// Run a complete probe and assemble the report.
pub fn run(
	working_dir: &Path,
	settings: &ProbeSettings,
	env: &dyn EnvironmentProvider,
	environment: std::collections::BTreeMap<String, String>,
	args: &[String],
) -> Report {
	let collected = collect(working_dir, settings, env);
	let config_server = config_server_section(&collected.discovery, settings);

	Report {
		metadata: Metadata::capture(
			working_dir,
			args,
			settings.max_chars,
			collected.discovery.active_profiles.as_slice(),
			env,
		),
		environment,
		classpath_resources: group_resources(&collected.resources),
		files: collected.files,
		jar_resources: collected.archives,
		config_server,
	}
}
