//! The JSON report written at the end of a scan.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::env::EnvironmentProvider;
use crate::error::{ProbeError, Result};
use crate::fetch::ConfigServerReport;
use crate::sources::{ArchiveScan, FileScan, ResourceEntry, ResourceScan};

/// Facts about the probing process itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
	/// RFC 3339, UTC.
	pub timestamp: String,
	/// Version of the binary that produced the report.
	pub tool_version: String,
	pub pid: u32,
	pub user: String,
	pub working_dir: String,
	pub hostname: String,
	pub args: String,
	pub max_content_chars: usize,
	pub active_profiles: Vec<String>,
}

impl Metadata {
	pub fn capture(
		working_dir: &Path,
		args: &[String],
		max_content_chars: usize,
		active_profiles: &[String],
		env: &dyn EnvironmentProvider,
	) -> Self {
		Self {
			timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
			tool_version: env!("CARGO_PKG_VERSION").to_string(),
			pid: std::process::id(),
			user: env.first_non_empty(&["USER", "USERNAME"]).unwrap_or_default(),
			working_dir: working_dir.display().to_string(),
			hostname: hostname(env),
			args: args.join(" "),
			max_content_chars,
			active_profiles: active_profiles.to_vec(),
		}
	}
}

fn hostname(env: &dyn EnvironmentProvider) -> String {
	env.first_non_empty(&["HOSTNAME", "COMPUTERNAME"])
		.or_else(|| {
			std::fs::read_to_string("/etc/hostname")
				.ok()
				.map(|name| name.trim().to_string())
				.filter(|name| !name.is_empty())
		})
		.unwrap_or_default()
}

/// Everything a scan found.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
	pub metadata: Metadata,

	/// Sorted process environment.
	pub environment: BTreeMap<String, String>,

	/// Resource name to every location it was found at.
	pub classpath_resources: BTreeMap<String, Vec<ResourceEntry>>,

	pub files: FileScan,

	pub jar_resources: ArchiveScan,

	pub config_server: ConfigServerReport,
}

/// Group resource hits by resource name.
pub fn group_resources(scan: &ResourceScan) -> BTreeMap<String, Vec<ResourceEntry>> {
	let mut grouped: BTreeMap<String, Vec<ResourceEntry>> = BTreeMap::new();
	for entry in &scan.entries {
		grouped.entry(entry.name.clone()).or_default().push(entry.clone());
	}
	grouped
}

impl Report {
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

/// Write the report to `path`, or stdout when `path` is `None`.
///
/// A failed write is logged and the report goes to stdout instead.
pub fn write_output(path: Option<&Path>, json: &str) {
	let Some(path) = path else {
		println!("{json}");
		return;
	};

	if let Err(e) = write_file(path, json) {
		tracing::warn!(error = %e, "writing report to stdout instead");
		println!("{json}");
	}
}

fn write_file(path: &Path, json: &str) -> Result<()> {
	let to_error = |source: std::io::Error| ProbeError::OutputWriteError {
		path: path.to_path_buf(),
		source,
	};
	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		std::fs::create_dir_all(parent).map_err(to_error)?;
	}
	std::fs::write(path, json).map_err(to_error)?;
	tracing::info!(path = %path.display(), "report written");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::env::MapEnv;
	use crate::sources::ContentPayload;
	use std::path::PathBuf;

	fn entry(name: &str, location: &str) -> ResourceEntry {
		ResourceEntry {
			name: name.to_string(),
			location: PathBuf::from(location),
			payload: ContentPayload {
				size_bytes: 3,
				truncated: false,
				content: "a=1".to_string(),
			},
		}
	}

	#[test]
	fn test_group_resources() {
		let scan = ResourceScan {
			entries: vec![
				entry("application.yml", "/a/application.yml"),
				entry("bootstrap.yml", "/a/bootstrap.yml"),
				entry("application.yml", "/b/application.yml"),
			],
		};

		let grouped = group_resources(&scan);

		assert_eq!(grouped.len(), 2);
		assert_eq!(grouped["application.yml"].len(), 2);
		assert_eq!(grouped["application.yml"][1].location, PathBuf::from("/b/application.yml"));
	}

	#[test]
	fn test_metadata_capture() {
		let env = MapEnv::new().with("USER", "deploy").with("HOSTNAME", "pod-1");
		let metadata = Metadata::capture(
			Path::new("/work"),
			&["scan".to_string(), "--no-fetch".to_string()],
			100,
			&["default".to_string()],
			&env,
		);

		assert_eq!(metadata.user, "deploy");
		assert_eq!(metadata.hostname, "pod-1");
		assert_eq!(metadata.args, "scan --no-fetch");
		assert_eq!(metadata.working_dir, "/work");
		assert_eq!(metadata.pid, std::process::id());
		assert_eq!(metadata.tool_version, env!("CARGO_PKG_VERSION"));
	}

	#[test]
	fn test_report_json_shape() {
		let report = Report {
			metadata: Metadata::capture(Path::new("/work"), &[], 10, &[], &MapEnv::new()),
			environment: BTreeMap::new(),
			classpath_resources: group_resources(&ResourceScan {
				entries: vec![entry("application.yml", "/a/application.yml")],
			}),
			files: FileScan::default(),
			jar_resources: ArchiveScan::default(),
			config_server: ConfigServerReport::default(),
		};

		let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

		assert_eq!(value["metadata"]["maxContentChars"], 10);
		assert_eq!(value["metadata"]["toolVersion"], env!("CARGO_PKG_VERSION"));
		assert_eq!(
			value["classpathResources"]["application.yml"][0]["sizeBytes"],
			3
		);
		assert_eq!(value["files"]["searchPaths"], serde_json::json!([]));
		assert_eq!(value["jarResources"]["matches"], serde_json::json!([]));
		assert_eq!(value["configServer"], serde_json::json!({}));
	}

	#[test]
	fn test_write_output_creates_parents() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested/out/report.json");

		write_output(Some(&path), "{}");

		assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
	}
}
