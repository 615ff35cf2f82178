// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Single-request transport abstraction.
//!
//! A [`Transport`] performs one round trip and reports the status and JSON
//! body as an [`ApiResponse`]. It never retries and never turns an HTTP
//! status into an error; only connection, TLS and decoding failures are
//! returned as [`K8sError`].

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{K8sError, K8sResult};

/// Per-request settings.
///
/// Headers given here replace the transport's defaults key by key, including
/// `Authorization`.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
	/// Defaults to `GET`.
	pub method: Option<Method>,
	pub headers: HeaderMap,
	pub body: Option<Bytes>,
}

impl RequestOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = Some(body.into());
		self
	}

	/// The effective method.
	pub fn method(&self) -> Method {
		self.method.clone().unwrap_or(Method::GET)
	}

	/// Attach `body` as JSON with an exact `Content-Length`.
	///
	/// `Content-Type: application/json` is only set when the caller has not
	/// chosen one.
	fn with_json<B>(mut self, method: Method, body: &B) -> K8sResult<Self>
	where
		B: Serialize + ?Sized,
	{
		let encoded = serde_json::to_vec(body).map_err(K8sError::Encode)?;
		self.headers
			.entry(CONTENT_TYPE)
			.or_insert(HeaderValue::from_static("application/json"));
		self.headers
			.insert(CONTENT_LENGTH, HeaderValue::from(encoded.len()));
		self.method = Some(method);
		self.body = Some(Bytes::from(encoded));
		Ok(self)
	}
}

/// Status code and decoded body of one API call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
	pub status_code: u16,
	/// Parsed JSON body; `Null` when the server sent no body.
	pub data: Value,
}

impl ApiResponse {
	pub fn new(status_code: u16, data: Value) -> Self {
		Self { status_code, data }
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status_code)
	}

	pub fn is_conflict(&self) -> bool {
		self.status_code == reqwest::StatusCode::CONFLICT.as_u16()
	}
}

/// Decode a response body. Blank bodies decode to `Null`.
pub(crate) fn parse_body(status: u16, body: &[u8]) -> K8sResult<Value> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(Value::Null);
	}
	serde_json::from_slice(body).map_err(|e| K8sError::InvalidResponse {
		status,
		message: e.to_string(),
	})
}

/// One authenticated round trip to the API server.
///
/// Implementors provide [`Transport::request`]; the verb helpers build on it.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Send a request to `path` (including any query string).
	async fn request(&self, path: &str, options: RequestOptions) -> K8sResult<ApiResponse>;

	async fn get(&self, path: &str, options: RequestOptions) -> K8sResult<ApiResponse> {
		self.request(path, options.with_method(Method::GET)).await
	}

	async fn post<B>(&self, path: &str, body: &B, options: RequestOptions) -> K8sResult<ApiResponse>
	where
		B: Serialize + Sync + ?Sized,
	{
		let options = options.with_json(Method::POST, body)?;
		self.request(path, options).await
	}

	async fn put<B>(&self, path: &str, body: &B, options: RequestOptions) -> K8sResult<ApiResponse>
	where
		B: Serialize + Sync + ?Sized,
	{
		let options = options.with_json(Method::PUT, body)?;
		self.request(path, options).await
	}

	async fn del(&self, path: &str, options: RequestOptions) -> K8sResult<ApiResponse> {
		let mut options = options.with_method(Method::DELETE);
		options.body = None;
		self.request(path, options).await
	}
}
