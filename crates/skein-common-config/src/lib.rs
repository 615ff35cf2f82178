// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration for skein clients running inside a cluster.
//!
//! - [`ClusterEndpoint`]: API server address from `KUBERNETES_SERVICE_*`
//! - [`ServiceAccountCredentials`]: token, CA and namespace from the pod mount
//! - [`ClientConfig`]: the resolved aggregate, with [`ConfigOverrides`] taking
//!   precedence over `SKEIN_*` variables and in-cluster defaults
//! - [`load_secret_env`]: the `VAR` / `VAR_FILE` secret convention

pub mod client;
pub mod cluster;
pub mod env;
mod error;

pub use skein_common_secret::{Secret, SecretString, REDACTED};

pub use client::{ClientConfig, ConfigOverrides};
pub use cluster::{ClusterEndpoint, ServiceAccountCredentials, SERVICE_ACCOUNT_DIR};
pub use env::{load_secret_env, SecretEnvError};
pub use error::ConfigError;
