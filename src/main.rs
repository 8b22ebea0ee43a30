use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use config_probe::env::{ENCRYPT_KEY, EnvironmentProvider, ProcessEnv};
use config_probe::probe;
use config_probe::report::write_output;
use config_probe::secret;
use config_probe::settings::{LoadedSettings, ProbeSettings, discover_settings};

#[derive(Parser)]
#[command(name = "config-probe")]
#[command(
	author,
	version,
	about = "Reconstruct the effective Spring configuration of an application and locate its config server"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	#[command(flatten)]
	scan: ScanArgs,

	/// Increase log verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Scan all sources and print the JSON report (default)
	Scan,
	/// Show ranked candidates, aggregated hints and the resolved request
	Hints,
	/// Decrypt a {cipher} or ENC(...) value
	Decrypt {
		/// The wrapped value
		value: String,

		/// Passphrase (defaults to ENCRYPT_KEY)
		#[arg(long)]
		key: Option<String>,
	},
}

#[derive(Args, Debug, Default)]
struct ScanArgs {
	/// Settings file (defaults to .config-probe.toml, then the user config dir)
	#[arg(long, value_name = "PATH", global = true)]
	settings: Option<PathBuf>,

	/// Maximum characters kept per document
	#[arg(long, global = true)]
	max_chars: Option<usize>,

	/// Maximum number of configuration files
	#[arg(long, global = true)]
	max_files: Option<usize>,

	/// Maximum number of archives
	#[arg(long, global = true)]
	max_jars: Option<usize>,

	/// Maximum directory depth below each search root
	#[arg(long, global = true)]
	max_depth: Option<usize>,

	/// Additional filesystem search root (repeatable)
	#[arg(long = "search-path", value_name = "DIR", global = true)]
	search_paths: Vec<PathBuf>,

	/// Embedded resource root such as BOOT-INF/classes (repeatable)
	#[arg(long = "resource-root", value_name = "DIR", global = true)]
	resource_roots: Vec<PathBuf>,

	/// Skip the well-known deployment directories
	#[arg(long, global = true)]
	no_default_dirs: bool,

	/// Resolve the config server without querying it
	#[arg(long, global = true)]
	no_fetch: bool,

	/// Config server connect/read timeout in seconds
	#[arg(long, global = true)]
	timeout_secs: Option<u64>,

	/// Write the report to a file instead of stdout
	#[arg(short, long, value_name = "PATH", global = true)]
	output: Option<PathBuf>,
}

impl ScanArgs {
	/// Layer command-line flags over file settings.
	fn apply(&self, settings: &mut ProbeSettings) {
		if let Some(v) = self.max_chars {
			settings.max_chars = v;
		}
		if let Some(v) = self.max_files {
			settings.max_files = v;
		}
		if let Some(v) = self.max_jars {
			settings.max_jars = v;
		}
		if let Some(v) = self.max_depth {
			settings.max_depth = v;
		}
		settings.search_paths.extend(self.search_paths.iter().cloned());
		settings.resource_roots.extend(self.resource_roots.iter().cloned());
		if self.no_default_dirs {
			settings.default_search_dirs = false;
		}
		if self.no_fetch {
			settings.fetch = false;
		}
		if let Some(v) = self.timeout_secs {
			settings.timeout_secs = v;
		}
		if let Some(ref path) = self.output {
			settings.output = Some(path.clone());
		}
	}
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_tracing(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	// Logs go to stderr so stdout carries only the report.
	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_writer(std::io::stderr))
		.init();
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Some(Commands::Decrypt { ref value, ref key }) = cli.command {
		return handle_decrypt(value, key.as_deref());
	}

	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let LoadedSettings { mut settings, path } = discover_settings(&cwd, cli.scan.settings.as_deref())
		.context("Failed to load settings")?;
	if let Some(ref path) = path {
		tracing::info!(path = %path.display(), "using settings file");
	}
	cli.scan.apply(&mut settings);

	match cli.command {
		Some(Commands::Hints) => handle_hints(&cwd, &settings),
		_ => handle_scan(&cwd, &settings),
	}
}

fn handle_scan(cwd: &Path, settings: &ProbeSettings) -> Result<ExitCode> {
	let env = ProcessEnv;
	let args: Vec<String> = std::env::args().skip(1).collect();

	let report = probe::run(cwd, settings, &env, env.snapshot(), &args);
	let json = report.to_json().context("Failed to serialize report")?;
	write_output(settings.output.as_deref(), &json);

	Ok(ExitCode::SUCCESS)
}

fn handle_hints(cwd: &Path, settings: &ProbeSettings) -> Result<ExitCode> {
	let collected = probe::collect(cwd, settings, &ProcessEnv);
	let discovery = &collected.discovery;

	println!("Active profiles: {}", discovery.active_profiles.as_slice().join(", "));
	println!();

	if discovery.candidates.is_empty() {
		println!("No configuration documents found.");
	} else {
		println!("Candidates (in aggregation order):\n");
		for candidate in &discovery.candidates {
			let state = if config_probe::candidate::is_active(candidate, &discovery.active_profiles) {
				"active"
			} else {
				"inactive"
			};
			println!(
				"  [{}] {} ({}, {} keys)",
				candidate.priority,
				candidate.source_id,
				state,
				candidate.parsed_view.len()
			);
		}
	}
	println!();

	let hint = &discovery.hint;
	println!("Hints:");
	print_field("config-import", hint.config_import.as_deref());
	print_field("config-uri", hint.config_uri.as_deref());
	print_field("username", hint.username.as_deref());
	print_field("password", hint.password.as_deref().map(mask));
	print_field("encrypt-key", hint.encrypt_key.as_deref().map(mask));
	print_field("application-name", hint.application_name.as_deref());
	print_field("profile", hint.profile.as_deref());
	print_field("source", hint.source.as_deref());
	println!();

	match discovery.request {
		Some(ref request) => {
			println!("Config server request:");
			print_field("url", Some(request.url.as_str()));
			print_field("username", request.username.as_deref());
			print_field("password", request.password.as_deref().map(mask));
		}
		None => println!("No config server endpoint resolved."),
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_decrypt(value: &str, key: Option<&str>) -> Result<ExitCode> {
	let key = key
		.map(str::to_string)
		.or_else(|| ProcessEnv.get_non_empty(ENCRYPT_KEY));

	if !secret::is_wrapped(value) {
		eprintln!("Warning: value is not wrapped in {{cipher}} or ENC(...)");
	}
	println!("{}", secret::decrypt(value, key.as_deref()));
	Ok(ExitCode::SUCCESS)
}

fn print_field(name: &str, value: Option<&str>) {
	println!("  {name}: {}", value.unwrap_or("(unset)"));
}

/// Hide secrets in human-readable output, keeping wrapped values recognizable.
fn mask(value: &str) -> &'static str {
	if secret::is_wrapped(value) {
		"******** (encrypted)"
	} else {
		"********"
	}
}
