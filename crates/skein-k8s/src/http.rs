// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! `reqwest`-backed [`Transport`].

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use skein_common_config::ClientConfig;
use skein_common_secret::SecretString;
use tracing::{debug, instrument, trace};
use url::Url;

use crate::error::{K8sError, K8sResult};
use crate::transport::{parse_body, ApiResponse, RequestOptions, Transport};

/// Talks to the API server over HTTPS with a bearer token.
///
/// TLS trust is fixed when the transport is built: if the configuration
/// carries a CA bundle, that bundle is the only trust root for every request
/// made through this instance.
#[derive(Clone)]
pub struct HttpTransport {
	http: Client,
	base_url: Url,
	token: SecretString,
}

impl HttpTransport {
	/// Build a transport from resolved configuration.
	pub fn new(config: &ClientConfig) -> K8sResult<Self> {
		let mut builder = match &config.ca_pem {
			Some(ca_pem) => skein_common_http::builder_with_ca(ca_pem)?,
			None => skein_common_http::builder(),
		};
		if let Some(timeout) = config.timeout {
			builder = builder.timeout(timeout);
		}

		let http = builder.build()?;
		Self::with_client(http, &config.server_url, config.token.clone())
	}

	/// Use a pre-built client, e.g. one configured for tests.
	pub fn with_client(http: Client, server_url: &str, token: SecretString) -> K8sResult<Self> {
		let base_url = Url::parse(server_url)?;
		Ok(Self {
			http,
			base_url,
			token,
		})
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn default_headers(&self) -> K8sResult<HeaderMap> {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token.expose()))
			.map_err(|_| K8sError::Transport {
				message: "bearer token contains characters not allowed in a header".to_string(),
			})?;
		value.set_sensitive(true);

		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, value);
		Ok(headers)
	}
}

#[async_trait]
impl Transport for HttpTransport {
	#[instrument(skip(self, options), fields(method = %options.method()))]
	async fn request(&self, path: &str, options: RequestOptions) -> K8sResult<ApiResponse> {
		let method = options.method();
		let url = self.base_url.join(path)?;

		let mut headers = self.default_headers()?;
		headers.extend(options.headers);

		debug!(method = %method, path = %path, "sending K8s API request");

		let mut request = self.http.request(method, url).headers(headers);
		if let Some(body) = options.body {
			request = request.body(body);
		}

		let response = request.send().await?;
		let status = response.status().as_u16();
		let body = response.bytes().await?;

		trace!(status, bytes = body.len(), "received K8s API response");

		let data = parse_body(status, &body)?;
		Ok(ApiResponse::new(status, data))
	}
}

impl fmt::Debug for HttpTransport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HttpTransport")
			.field("base_url", &self.base_url.as_str())
			.field("token", &self.token)
			.finish()
	}
}
