// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Certificate, Client, ClientBuilder};
use thiserror::Error;
use tracing::debug;

/// Errors from installing a custom trust anchor.
#[derive(Debug, Error)]
pub enum TrustError {
	#[error("invalid CA certificate: {0}")]
	Invalid(#[from] reqwest::Error),

	#[error("CA bundle contains no certificates")]
	Empty,
}

/// Creates a new HTTP client builder with the standard skein User-Agent header.
///
/// # Example
/// ```ignore
/// let client = skein_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a builder whose only trust anchors are the certificates in
/// `ca_pem`.
///
/// The platform roots are disabled, so the API server must present a chain
/// issued by the cluster CA. Every certificate in a multi-certificate bundle
/// is added.
pub fn builder_with_ca(ca_pem: &[u8]) -> Result<ClientBuilder, TrustError> {
	let certificates = Certificate::from_pem_bundle(ca_pem)?;
	if certificates.is_empty() {
		return Err(TrustError::Empty);
	}
	debug!(count = certificates.len(), "installing cluster CA certificates");

	let builder = certificates
		.into_iter()
		.fold(builder().tls_built_in_root_certs(false), |builder, cert| {
			builder.add_root_certificate(cert)
		});
	Ok(builder)
}

/// Returns the standard skein User-Agent string.
///
/// Format: `skein/{version} ({os}-{arch})`
pub fn user_agent() -> String {
	format!(
		"skein/{} ({}-{})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_correct_format() {
		let ua = user_agent();
		assert!(ua.starts_with("skein/"));
		assert!(ua.contains(std::env::consts::OS));
		assert!(ua.ends_with(')'));
	}

	#[test]
	fn builder_builds() {
		assert!(builder().build().is_ok());
	}

	#[test]
	fn rejects_bundle_without_certificates() {
		assert!(builder_with_ca(b"not a certificate").is_err());
		assert!(builder_with_ca(b"").is_err());
	}
}
