// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Create-or-replace and delete on top of a [`Transport`].
//!
//! # Apply protocol
//!
//! Updates must carry the object's current `resourceVersion`, which the
//! caller does not know up front. [`Reconciler::apply_object`] therefore:
//!
//! 1. `POST`s the object to its collection. Anything other than `409
//!    Conflict` is the final result.
//! 2. On `409`, `GET`s the named object. A non-`200` read is the final
//!    result and no update is attempted.
//! 3. Copies the live `metadata.resourceVersion` onto a private copy of the
//!    object and `PUT`s it. The `PUT` result is the final result.
//!
//! A new object costs one round trip; an existing one costs three. Nothing is
//! retried. Concurrent applies of the same object may race, and serializing
//! them is up to the caller.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::K8sResult;
use crate::object::Resource;
use crate::path::{item_path, plural_path, NaivePluralizer, Pluralizer};
use crate::transport::{ApiResponse, RequestOptions, Transport};

const STATUS_OK: u16 = 200;

pub struct Reconciler<T> {
	transport: T,
	pluralizer: Box<dyn Pluralizer>,
}

impl<T: Transport> Reconciler<T> {
	/// Reconciler using [`NaivePluralizer`].
	pub fn new(transport: T) -> Self {
		Self {
			transport,
			pluralizer: Box::new(NaivePluralizer),
		}
	}

	/// Replace the pluralization strategy used to build collection paths.
	pub fn with_pluralizer(mut self, pluralizer: impl Pluralizer + 'static) -> Self {
		self.pluralizer = Box::new(pluralizer);
		self
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Collection path of `object`.
	pub fn plural_path(&self, object: &Resource) -> K8sResult<String> {
		plural_path(object, self.pluralizer.as_ref())
	}

	/// Path of the named object.
	pub fn item_path(&self, object: &Resource) -> K8sResult<String> {
		item_path(object, self.pluralizer.as_ref())
	}

	/// Create `object`, or replace it if it already exists.
	///
	/// `object` itself is never modified; the update is sent from a copy.
	#[instrument(skip_all, fields(kind = ?object.kind(), name = ?object.name()))]
	pub async fn apply_object(&self, object: &Resource) -> K8sResult<ApiResponse> {
		let collection = self.plural_path(object)?;

		let created = self
			.transport
			.post(&collection, object, RequestOptions::new())
			.await?;
		if !created.is_conflict() {
			return Ok(created);
		}

		let item = self.item_path(object)?;
		debug!(path = %item, "object already exists, reading current version");

		let current = self.transport.get(&item, RequestOptions::new()).await?;
		if current.status_code != STATUS_OK {
			debug!(
				status = current.status_code,
				"reading existing object failed, not updating"
			);
			return Ok(current);
		}

		let update = object.with_resource_version(resource_version_of(&current.data).cloned());

		debug!(
			resource_version = ?update.resource_version(),
			"replacing existing object"
		);
		self.transport
			.put(&item, &update, RequestOptions::new())
			.await
	}

	/// Delete the named object. A missing object comes back as an ordinary
	/// `404` response.
	#[instrument(skip_all, fields(kind = ?object.kind(), name = ?object.name()))]
	pub async fn delete_object(&self, object: &Resource) -> K8sResult<ApiResponse> {
		let item = self.item_path(object)?;
		self.transport.del(&item, RequestOptions::new()).await
	}

	/// Apply a batch in order, stopping at the first transport error.
	///
	/// HTTP failures do not stop the batch; each object's response is
	/// returned in input order.
	pub async fn apply_all(&self, objects: &[Resource]) -> K8sResult<Vec<ApiResponse>> {
		let mut results = Vec::with_capacity(objects.len());
		for object in objects {
			results.push(self.apply_object(object).await?);
		}
		Ok(results)
	}
}

/// `metadata.resourceVersion` of a response body, if present. The value is
/// returned as-is so it can be echoed back without reinterpretation.
pub fn resource_version_of(data: &Value) -> Option<&Value> {
	data.pointer("/metadata/resourceVersion")
}
