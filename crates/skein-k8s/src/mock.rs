// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Scripted [`Transport`] for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

use crate::error::{K8sError, K8sResult};
use crate::object::Resource;
use crate::transport::{ApiResponse, RequestOptions, Transport};

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
	pub method: Method,
	pub path: String,
	pub headers: HeaderMap,
	/// Body decoded as JSON, if there was one.
	pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum MockReply {
	Respond(ApiResponse),
	Echo {
		status_code: u16,
		resource_version: String,
	},
	Fail(String),
}

/// A transport that answers from a FIFO queue and records every request.
///
/// Clones share the queue and the request log, so a test can keep one handle
/// while the code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
	replies: Arc<Mutex<VecDeque<MockReply>>>,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue a response.
	pub fn respond(&self, status_code: u16, data: Value) -> &Self {
		lock(&self.replies).push_back(MockReply::Respond(ApiResponse::new(status_code, data)));
		self
	}

	/// Queue a response that echoes the request body back with
	/// `metadata.resourceVersion` set, the way the API server answers a
	/// create or replace.
	pub fn echo(&self, status_code: u16, resource_version: impl Into<String>) -> &Self {
		lock(&self.replies).push_back(MockReply::Echo {
			status_code,
			resource_version: resource_version.into(),
		});
		self
	}

	/// Queue a transport failure.
	pub fn fail(&self, message: impl Into<String>) -> &Self {
		lock(&self.replies).push_back(MockReply::Fail(message.into()));
		self
	}

	/// All requests received so far, oldest first.
	pub fn requests(&self) -> Vec<RecordedRequest> {
		lock(&self.requests).clone()
	}

	/// Number of queued replies not yet consumed.
	pub fn pending(&self) -> usize {
		lock(&self.replies).len()
	}
}

#[async_trait]
impl Transport for MockTransport {
	async fn request(&self, path: &str, options: RequestOptions) -> K8sResult<ApiResponse> {
		let body = options
			.body
			.as_ref()
			.and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok());

		lock(&self.requests).push(RecordedRequest {
			method: options.method(),
			path: path.to_string(),
			headers: options.headers,
			body: body.clone(),
		});

		let reply = lock(&self.replies).pop_front();
		match reply {
			Some(MockReply::Respond(response)) => Ok(response),
			Some(MockReply::Echo {
				status_code,
				resource_version,
			}) => {
				let data = match body.map(Resource::try_from) {
					Some(Ok(resource)) => resource
						.with_resource_version(Some(Value::String(resource_version)))
						.into_value(),
					Some(Err(_)) | None => Value::Null,
				};
				Ok(ApiResponse::new(status_code, data))
			}
			Some(MockReply::Fail(message)) => Err(K8sError::Transport { message }),
			None => Err(K8sError::Transport {
				message: format!("no mock response configured for {path}"),
			}),
		}
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
