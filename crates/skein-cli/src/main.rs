// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! skein - create-or-replace and delete Kubernetes objects from inside a pod.
//!
//! Credentials come from the pod's service-account mount unless overridden
//! by flags or `SKEIN_*` variables. Results are written to stdout as JSON;
//! logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skein_common_config::{ClientConfig, ConfigOverrides};
use skein_k8s::{
	ApiResponse, HttpTransport, NaivePluralizer, OverridePluralizer, Pluralizer, Reconciler,
	RequestOptions, Resource, Transport,
};

mod manifest;

/// skein - minimal in-cluster Kubernetes client
#[derive(Parser, Debug)]
#[command(name = "skein", version, about, long_about = None)]
struct Args {
	/// API server URL (defaults to the in-cluster service address)
	#[arg(long, global = true, env = "SKEIN_SERVER_URL")]
	server: Option<String>,

	/// File containing the bearer token
	#[arg(long, global = true)]
	token_file: Option<PathBuf>,

	/// PEM file with the CA that signs the API server certificate
	#[arg(long, global = true, env = "SKEIN_CA_FILE")]
	ca_file: Option<PathBuf>,

	/// Per-request timeout in seconds; 0 disables it
	#[arg(long, global = true, env = "SKEIN_TIMEOUT_SECS")]
	timeout_secs: Option<u64>,

	/// Log level used when RUST_LOG is unset
	#[arg(long, global = true, default_value = "warn")]
	log_level: String,

	#[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
	log_format: LogFormat,

	/// Use known plurals for irregular core kinds instead of appending "s"
	#[arg(long, global = true)]
	irregular_plurals: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Create objects, replacing any that already exist
	Apply {
		/// JSON manifest, or - for stdin
		#[arg(short = 'f', long = "filename")]
		file: PathBuf,

		/// Namespace for objects that do not set one
		#[arg(short, long)]
		namespace: Option<String>,
	},
	/// Delete objects named in a manifest
	Delete {
		/// JSON manifest, or - for stdin
		#[arg(short = 'f', long = "filename")]
		file: PathBuf,

		/// Namespace for objects that do not set one
		#[arg(short, long)]
		namespace: Option<String>,
	},
	/// GET a raw API path, e.g. /api/v1/namespaces/default/pods
	Get { path: String },
	/// Print the collection path of each object without contacting the server
	Path {
		#[arg(short = 'f', long = "filename")]
		file: PathBuf,

		#[arg(short, long)]
		namespace: Option<String>,
	},
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
	Pretty,
	Compact,
	Json,
}

impl From<&Args> for ConfigOverrides {
	fn from(args: &Args) -> Self {
		ConfigOverrides {
			server_url: args.server.clone(),
			token_file: args.token_file.clone(),
			ca_file: args.ca_file.clone(),
			service_account_dir: None,
			timeout: args.timeout_secs.map(Duration::from_secs),
		}
	}
}

fn init_tracing(level: &str, format: LogFormat) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("skein={level}")));

	match format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

fn pluralizer(irregular: bool) -> Box<dyn Pluralizer> {
	if irregular {
		Box::new(OverridePluralizer::with_core_irregulars())
	} else {
		Box::new(NaivePluralizer)
	}
}

fn print_response(response: &ApiResponse) -> Result<()> {
	let rendered = serde_json::to_string_pretty(response).context("failed to render response")?;
	println!("{rendered}");
	Ok(())
}

fn all_succeeded(responses: &[ApiResponse]) -> bool {
	responses.iter().all(ApiResponse::is_success)
}

/// Print every response; failure if any is not 2xx.
fn report(responses: &[ApiResponse]) -> Result<ExitCode> {
	for response in responses {
		print_response(response)?;
	}
	if all_succeeded(responses) {
		Ok(ExitCode::SUCCESS)
	} else {
		Ok(ExitCode::FAILURE)
	}
}

fn load_objects(
	file: &std::path::Path,
	namespace: Option<&str>,
	config: Option<&ClientConfig>,
) -> Result<Vec<Resource>> {
	let objects = manifest::read_manifests(file)?;
	let fallback = namespace.or_else(|| config.and_then(|c| c.namespace.as_deref()));
	Ok(manifest::default_namespace(objects, fallback))
}

fn reconciler(args: &Args, config: &ClientConfig) -> Result<Reconciler<HttpTransport>> {
	let transport = HttpTransport::new(config).context("failed to build API transport")?;
	Ok(Reconciler::new(transport).with_pluralizer(pluralizer(args.irregular_plurals)))
}

async fn run(args: Args) -> Result<ExitCode> {
	if let Command::Path { file, namespace } = &args.command {
		let plurals = pluralizer(args.irregular_plurals);
		for object in load_objects(file, namespace.as_deref(), None)? {
			let path = skein_k8s::plural_path(&object, plurals.as_ref())
				.with_context(|| format!("cannot derive path for {:?}", object.name()))?;
			println!("{path}");
		}
		return Ok(ExitCode::SUCCESS);
	}

	let config = ClientConfig::load(ConfigOverrides::from(&args))
		.context("failed to load client configuration")?;
	debug!(?config, "loaded client configuration");

	match &args.command {
		Command::Apply { file, namespace } => {
			let objects = load_objects(file, namespace.as_deref(), Some(&config))?;
			info!(count = objects.len(), "applying objects");
			let responses = reconciler(&args, &config)?
				.apply_all(&objects)
				.await
				.context("apply failed")?;
			report(&responses)
		}
		Command::Delete { file, namespace } => {
			let objects = load_objects(file, namespace.as_deref(), Some(&config))?;
			info!(count = objects.len(), "deleting objects");
			let reconciler = reconciler(&args, &config)?;
			let mut responses = Vec::with_capacity(objects.len());
			for object in &objects {
				responses.push(
					reconciler
						.delete_object(object)
						.await
						.context("delete failed")?,
				);
			}
			report(&responses)
		}
		Command::Get { path } => {
			let transport = HttpTransport::new(&config).context("failed to build API transport")?;
			let response = transport
				.get(path, RequestOptions::new())
				.await
				.with_context(|| format!("GET {path} failed"))?;
			report(&[response])
		}
		Command::Path { .. } => Ok(ExitCode::SUCCESS),
	}
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
	let args = Args::parse();
	init_tracing(&args.log_level, args.log_format);

	run(args).await
}
