// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment variable helpers.
//!
//! Secrets follow the `VAR` / `VAR_FILE` convention: a token can be passed
//! directly or as a path to a mounted file, the latter taking precedence.

use std::path::PathBuf;
use std::str::FromStr;
use std::{env, fs};

use skein_common_secret::SecretString;
use thiserror::Error;

use crate::error::ConfigError;

/// Errors that can occur when loading secrets from environment variables.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from `{var}_FILE` or `{var}`, in that order.
///
/// A single trailing newline is stripped from file content; the rest is
/// kept verbatim. Returns `Ok(None)` when neither variable is set.
///
/// ```no_run
/// use skein_common_config::load_secret_env;
///
/// if let Some(token) = load_secret_env("SKEIN_TOKEN")? {
///     println!("using token {token}"); // prints "[REDACTED]"
/// }
/// # Ok::<(), skein_common_config::SecretEnvError>(())
/// ```
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(path_str);
		let content = fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	Ok(env::var(var).ok().map(SecretString::new))
}

/// Read a non-empty environment variable.
pub(crate) fn optional_env(name: &str) -> Option<String> {
	env::var(name).ok().filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, falling back to `default` when unset.
pub(crate) fn optional_env_parse<T>(name: &str, default: T) -> Result<T, ConfigError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	match optional_env(name) {
		Some(raw) => raw
			.trim()
			.parse()
			.map_err(|e: T::Err| ConfigError::InvalidValue {
				name: name.to_string(),
				message: e.to_string(),
			}),
		None => Ok(default),
	}
}

/// Read a required, non-empty environment variable.
pub(crate) fn require_env(name: &str) -> Result<String, ConfigError> {
	optional_env(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}
