//! config-probe - reconstruct the effective Spring configuration of an
//! application and locate its config server.
//!
//! This library provides:
//! - Key-value extraction from `.properties` and YAML documents
//! - Candidate ranking and profile filtering
//! - Set-once aggregation of config-server hints
//! - Best-effort secret decryption and endpoint resolution
//! - Collaborators for resource roots, filesystem walks and `.jar` archives
//!
//! # Example
//!
//! ```
//! use config_probe::candidate::{Origin, RawDocument};
//! use config_probe::engine::discover;
//! use config_probe::env::MapEnv;
//!
//! let docs = vec![RawDocument::new(
//!     Origin::Filesystem,
//!     "bootstrap.yml",
//!     "/app/bootstrap.yml",
//!     "spring:\n  config:\n    import: optional:configserver:http://host:8888\n",
//! )];
//! let env = MapEnv::new()
//!     .with("SPRING_APPLICATION_NAME", "svc")
//!     .with("SPRING_PROFILES_ACTIVE", "dev");
//!
//! let discovery = discover(&docs, &env);
//! assert_eq!(discovery.request.unwrap().url, "http://host:8888/svc/dev");
//! ```

pub mod candidate;
pub mod engine;
pub mod env;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod hints;
pub mod locator;
pub mod probe;
pub mod report;
pub mod secret;
pub mod settings;
pub mod sources;

pub use error::{ProbeError, Result};
