use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::candidate::{Origin, RawDocument};
use crate::sources::reader::{ContentPayload, read_file};

/// Resource names looked up under every resource root, in lookup order.
pub const RESOURCE_NAMES: [&str; 12] = [
	"application.properties",
	"application.yml",
	"application.yaml",
	"bootstrap.properties",
	"bootstrap.yml",
	"bootstrap.yaml",
	"config/application.properties",
	"config/application.yml",
	"config/application.yaml",
	"config/bootstrap.properties",
	"config/bootstrap.yml",
	"config/bootstrap.yaml",
];

/// One resource found under a resource root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
	/// The resource name, e.g. `config/application.yml`.
	pub name: String,

	/// Where it was found.
	pub location: PathBuf,

	#[serde(flatten)]
	pub payload: ContentPayload,
}

/// Resources found in lookup order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceScan {
	pub entries: Vec<ResourceEntry>,
}

impl ResourceScan {
	pub fn documents(&self) -> Vec<RawDocument> {
		self.entries
			.iter()
			.map(|entry| RawDocument {
				source_id: format!("classpath:{}", entry.name),
				name: entry.name.clone(),
				content: entry.payload.content.clone(),
				origin: Origin::ResourceLoader,
				size_bytes: entry.payload.size_bytes,
				truncated: entry.payload.truncated,
			})
			.collect()
	}
}

/// Look up every resource name under every root.
///
/// Names form the outer loop, so all `application.properties` hits come before
/// any `application.yml` hit regardless of root order.
pub fn scan_resources(roots: &[PathBuf], max_chars: usize) -> ResourceScan {
	let mut entries = Vec::new();

	for name in RESOURCE_NAMES {
		for root in roots {
			let location = resource_path(root, name);
			if !location.is_file() {
				continue;
			}
			match read_file(&location, max_chars) {
				Ok(payload) => entries.push(ResourceEntry {
					name: name.to_string(),
					location,
					payload,
				}),
				Err(e) => tracing::debug!(error = %e, "skipping unreadable resource"),
			}
		}
	}

	tracing::debug!(count = entries.len(), "resource scan finished");
	ResourceScan { entries }
}

fn resource_path(root: &Path, name: &str) -> PathBuf {
	name.split('/').fold(root.to_path_buf(), |path, segment| path.join(segment))
}
