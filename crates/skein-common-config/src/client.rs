// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Resolved client configuration.
//!
//! Each field is resolved in order: explicit override, then `SKEIN_*`
//! environment variable, then the in-cluster default.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use skein_common_secret::SecretString;
use tracing::debug;

use crate::cluster::{
	read_file, read_namespace, read_optional_file, read_token, ClusterEndpoint,
	ServiceAccountCredentials, CA_FILE, SERVICE_ACCOUNT_DIR,
};
use crate::env::{load_secret_env, optional_env, optional_env_parse};
use crate::error::ConfigError;

/// Overrides the in-cluster API server address.
pub const SERVER_URL_VAR: &str = "SKEIN_SERVER_URL";
/// Bearer token (or `SKEIN_TOKEN_FILE`), replacing the mounted token.
pub const TOKEN_VAR: &str = "SKEIN_TOKEN";
/// PEM file with the CA that signs the API server certificate.
pub const CA_FILE_VAR: &str = "SKEIN_CA_FILE";
/// Alternative service-account mount directory.
pub const SERVICE_ACCOUNT_DIR_VAR: &str = "SKEIN_SERVICE_ACCOUNT_DIR";
/// Per-request timeout in seconds; `0` disables it.
pub const TIMEOUT_VAR: &str = "SKEIN_TIMEOUT_SECS";

/// Explicit values that win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
	pub server_url: Option<String>,
	pub token_file: Option<PathBuf>,
	pub ca_file: Option<PathBuf>,
	pub service_account_dir: Option<PathBuf>,
	pub timeout: Option<Duration>,
}

/// Everything needed to construct a transport, loaded once at startup.
#[derive(Clone)]
pub struct ClientConfig {
	/// Scheme, host and port of the API server, e.g. `https://10.96.0.1:443`.
	pub server_url: String,
	pub token: SecretString,
	/// PEM trust anchor. `None` falls back to the platform roots.
	pub ca_pem: Option<Vec<u8>>,
	pub timeout: Option<Duration>,
	/// Namespace of the pod's service account, when mounted.
	pub namespace: Option<String>,
}

impl ClientConfig {
	/// Resolve configuration from the environment alone.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::load(ConfigOverrides::default())
	}

	pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
		let sa_dir = overrides
			.service_account_dir
			.or_else(|| optional_env(SERVICE_ACCOUNT_DIR_VAR).map(PathBuf::from))
			.unwrap_or_else(|| PathBuf::from(SERVICE_ACCOUNT_DIR));

		let server_url = match overrides
			.server_url
			.or_else(|| optional_env(SERVER_URL_VAR))
		{
			Some(url) => url,
			None => ClusterEndpoint::from_env()?.base_url(),
		};

		let token = match overrides.token_file {
			Some(path) => Some(read_token(&path)?),
			None => load_secret_env(TOKEN_VAR)?,
		};
		let ca_pem = match overrides
			.ca_file
			.or_else(|| optional_env(CA_FILE_VAR).map(PathBuf::from))
		{
			Some(path) => Some(read_file(&path)?),
			None => None,
		};

		// Without an explicit token the mount must be complete; with one, the
		// mount is optional and only contributes the CA and namespace.
		let (token, ca_pem, namespace) = match token {
			None => {
				let mount = ServiceAccountCredentials::load(&sa_dir)?;
				(mount.token, Some(ca_pem.unwrap_or(mount.ca_pem)), mount.namespace)
			}
			Some(token) => {
				let ca_pem = match ca_pem {
					Some(pem) => Some(pem),
					None => read_optional_file(&sa_dir.join(CA_FILE))?,
				};
				(token, ca_pem, read_namespace(&sa_dir)?)
			}
		};

		let timeout = match overrides.timeout {
			Some(timeout) => timeout,
			None => Duration::from_secs(optional_env_parse(TIMEOUT_VAR, 0u64)?),
		};
		let timeout = (!timeout.is_zero()).then_some(timeout);

		debug!(
			server_url = %server_url,
			has_ca = ca_pem.is_some(),
			timeout = ?timeout,
			namespace = ?namespace,
			"resolved client configuration"
		);

		Ok(Self {
			server_url,
			token,
			ca_pem,
			timeout,
			namespace,
		})
	}
}

impl fmt::Debug for ClientConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClientConfig")
			.field("server_url", &self.server_url)
			.field("token", &self.token)
			.field("ca_pem", &self.ca_pem.as_ref().map(|pem| pem.len()))
			.field("timeout", &self.timeout)
			.field("namespace", &self.namespace)
			.finish()
	}
}
