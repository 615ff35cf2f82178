// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Result type alias for K8s operations.
pub type K8sResult<T> = Result<T, K8sError>;

/// Failures that abort an operation.
///
/// HTTP error statuses are not represented here; they come back as an
/// ordinary [`ApiResponse`](crate::ApiResponse).
#[derive(Error, Debug)]
pub enum K8sError {
	/// Connection, DNS, TLS or body-read failure.
	#[error("K8s transport error: {message}")]
	Transport { message: String },

	#[error("K8s request timed out")]
	Timeout,

	/// The server answered with a body that is not JSON.
	#[error("invalid response from K8s API (status {status}): {message}")]
	InvalidResponse { status: u16, message: String },

	#[error("invalid CA certificate: {message}")]
	InvalidCaCertificate { message: String },

	#[error("resource object must be a JSON object")]
	NotAnObject,

	/// The resource lacks a field needed to address it.
	#[error("resource object is missing {field}")]
	InvalidObject { field: &'static str },

	#[error("invalid API server URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	#[error("failed to encode request body: {0}")]
	Encode(#[source] serde_json::Error),
}

impl From<reqwest::Error> for K8sError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			return K8sError::Timeout;
		}
		K8sError::Transport {
			message: error_chain(&err),
		}
	}
}

impl From<skein_common_http::TrustError> for K8sError {
	fn from(err: skein_common_http::TrustError) -> Self {
		K8sError::InvalidCaCertificate {
			message: err.to_string(),
		}
	}
}

/// Render an error with its sources; reqwest keeps TLS and DNS detail there.
fn error_chain(err: &dyn std::error::Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Error)]
	#[error("outer")]
	struct Outer(#[source] Inner);

	#[derive(Debug, Error)]
	#[error("certificate signed by unknown authority")]
	struct Inner;

	#[test]
	fn error_chain_includes_sources() {
		assert_eq!(
			error_chain(&Outer(Inner)),
			"outer: certificate signed by unknown authority"
		);
	}

	#[test]
	fn invalid_object_names_the_field() {
		let err = K8sError::InvalidObject {
			field: "metadata.name",
		};
		assert_eq!(err.to_string(), "resource object is missing metadata.name");
	}
}
