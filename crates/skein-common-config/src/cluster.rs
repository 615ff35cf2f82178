// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-cluster endpoint discovery and service-account credentials.
//!
//! Pods get the API server address through `KUBERNETES_SERVICE_HOST` /
//! `KUBERNETES_SERVICE_PORT` and their credentials through a projected volume
//! mounted at [`SERVICE_ACCOUNT_DIR`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use skein_common_secret::SecretString;
use tracing::debug;

use crate::env::{optional_env_parse, require_env};
use crate::error::ConfigError;

/// Default mount point of the pod's service-account volume.
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

pub const SERVICE_HOST_VAR: &str = "KUBERNETES_SERVICE_HOST";
pub const SERVICE_PORT_VAR: &str = "KUBERNETES_SERVICE_PORT";

const DEFAULT_SERVICE_PORT: u16 = 443;

const TOKEN_FILE: &str = "token";
pub(crate) const CA_FILE: &str = "ca.crt";
const NAMESPACE_FILE: &str = "namespace";

/// Address of the API server as seen from inside the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEndpoint {
	pub host: String,
	pub port: u16,
}

impl ClusterEndpoint {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self {
			host: host.into(),
			port,
		}
	}

	/// Read the endpoint from the service environment variables kubelet injects.
	pub fn from_env() -> Result<Self, ConfigError> {
		let host = require_env(SERVICE_HOST_VAR)?;
		let port = optional_env_parse(SERVICE_PORT_VAR, DEFAULT_SERVICE_PORT)?;
		Ok(Self::new(host, port))
	}

	/// `https://host:port`, with IPv6 literals bracketed.
	pub fn base_url(&self) -> String {
		if self.host.contains(':') && !self.host.starts_with('[') {
			format!("https://[{}]:{}", self.host, self.port)
		} else {
			format!("https://{}:{}", self.host, self.port)
		}
	}
}

/// Credentials read from a service-account mount.
#[derive(Clone)]
pub struct ServiceAccountCredentials {
	pub token: SecretString,
	/// PEM-encoded cluster CA bundle.
	pub ca_pem: Vec<u8>,
	pub namespace: Option<String>,
}

impl ServiceAccountCredentials {
	/// Load `token` and `ca.crt` (both required) and `namespace` (optional)
	/// from `dir`.
	pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let dir = dir.as_ref();
		let token = read_token(&dir.join(TOKEN_FILE))?;
		let ca_pem = read_file(&dir.join(CA_FILE))?;
		let namespace = read_namespace(dir)?;

		debug!(dir = %dir.display(), namespace = ?namespace, "loaded service account credentials");

		Ok(Self {
			token,
			ca_pem,
			namespace,
		})
	}
}

impl fmt::Debug for ServiceAccountCredentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServiceAccountCredentials")
			.field("token", &self.token)
			.field("ca_pem", &format_args!("<{} bytes>", self.ca_pem.len()))
			.field("namespace", &self.namespace)
			.finish()
	}
}

/// Read a bearer token file. Surrounding whitespace is dropped since mounted
/// tokens are frequently newline-terminated.
pub fn read_token(path: &Path) -> Result<SecretString, ConfigError> {
	let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	let token = raw.trim();
	if token.is_empty() {
		return Err(ConfigError::EmptyFile {
			path: path.to_path_buf(),
		});
	}
	Ok(SecretString::new(token.to_string()))
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, ConfigError> {
	fs::read(path).map_err(|source| ConfigError::Io {
		path: path.to_path_buf(),
		source,
	})
}

/// Like [`read_file`], but a missing file yields `None`.
pub(crate) fn read_optional_file(path: &Path) -> Result<Option<Vec<u8>>, ConfigError> {
	match fs::read(path) {
		Ok(bytes) => Ok(Some(bytes)),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
		Err(source) => Err(ConfigError::Io {
			path: path.to_path_buf(),
			source,
		}),
	}
}

pub(crate) fn read_namespace(dir: &Path) -> Result<Option<String>, ConfigError> {
	let path: PathBuf = dir.join(NAMESPACE_FILE);
	Ok(read_optional_file(&path)?
		.map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
		.filter(|ns| !ns.is_empty()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;
	use tempfile::TempDir;

	fn service_account_dir(token: &str, namespace: Option<&str>) -> TempDir {
		let dir = TempDir::new().unwrap();
		fs::write(dir.path().join(TOKEN_FILE), token).unwrap();
		fs::write(
			dir.path().join(CA_FILE),
			"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n",
		)
		.unwrap();
		if let Some(ns) = namespace {
			fs::write(dir.path().join(NAMESPACE_FILE), ns).unwrap();
		}
		dir
	}

	#[test]
	fn base_url_formats_host_and_port() {
		let endpoint = ClusterEndpoint::new("10.96.0.1", 443);
		assert_eq!(endpoint.base_url(), "https://10.96.0.1:443");
	}

	#[test]
	fn base_url_brackets_ipv6_hosts() {
		let endpoint = ClusterEndpoint::new("fd00:10:96::1", 6443);
		assert_eq!(endpoint.base_url(), "https://[fd00:10:96::1]:6443");
	}

	#[test]
	fn endpoint_from_env() {
		// Single test touches the real variable names to avoid racing.
		env::set_var(SERVICE_HOST_VAR, "10.0.0.1");
		env::set_var(SERVICE_PORT_VAR, "6443");
		assert_eq!(
			ClusterEndpoint::from_env().unwrap(),
			ClusterEndpoint::new("10.0.0.1", 6443)
		);

		env::remove_var(SERVICE_PORT_VAR);
		assert_eq!(ClusterEndpoint::from_env().unwrap().port, DEFAULT_SERVICE_PORT);

		env::set_var(SERVICE_PORT_VAR, "https");
		assert!(matches!(
			ClusterEndpoint::from_env(),
			Err(ConfigError::InvalidValue { .. })
		));

		env::remove_var(SERVICE_HOST_VAR);
		env::remove_var(SERVICE_PORT_VAR);
		assert!(matches!(
			ClusterEndpoint::from_env(),
			Err(ConfigError::MissingEnvVar(_))
		));
	}

	#[test]
	fn loads_service_account_mount() {
		let dir = service_account_dir("sa-token\n", Some("team-a\n"));

		let creds = ServiceAccountCredentials::load(dir.path()).unwrap();
		assert_eq!(creds.token.expose(), "sa-token");
		assert!(creds.ca_pem.starts_with(b"-----BEGIN CERTIFICATE-----"));
		assert_eq!(creds.namespace.as_deref(), Some("team-a"));
	}

	#[test]
	fn namespace_file_is_optional() {
		let dir = service_account_dir("sa-token", None);

		let creds = ServiceAccountCredentials::load(dir.path()).unwrap();
		assert!(creds.namespace.is_none());
	}

	#[test]
	fn empty_token_is_rejected() {
		let dir = service_account_dir("  \n", None);

		assert!(matches!(
			ServiceAccountCredentials::load(dir.path()),
			Err(ConfigError::EmptyFile { .. })
		));
	}

	#[test]
	fn missing_ca_is_io_error() {
		let dir = service_account_dir("sa-token", None);
		fs::remove_file(dir.path().join(CA_FILE)).unwrap();

		assert!(matches!(
			ServiceAccountCredentials::load(dir.path()),
			Err(ConfigError::Io { .. })
		));
	}

	#[test]
	fn debug_output_redacts_token() {
		let dir = service_account_dir("very-secret-token", None);
		let creds = ServiceAccountCredentials::load(dir.path()).unwrap();

		assert!(!format!("{creds:?}").contains("very-secret-token"));
	}
}
