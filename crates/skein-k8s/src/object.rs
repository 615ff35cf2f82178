// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Resource objects as opaque JSON with a handful of addressed fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{K8sError, K8sResult};

/// A Kubernetes resource manifest.
///
/// Only `apiVersion`, `kind` and the `metadata` fields `namespace`, `name`
/// and `resourceVersion` are read; everything else passes through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Map<String, Value>);

impl Resource {
	pub fn api_version(&self) -> Option<&str> {
		self.0.get("apiVersion").and_then(Value::as_str)
	}

	pub fn kind(&self) -> Option<&str> {
		self.0.get("kind").and_then(Value::as_str)
	}

	pub fn namespace(&self) -> Option<&str> {
		self.metadata_str("namespace")
	}

	pub fn name(&self) -> Option<&str> {
		self.metadata_str("name")
	}

	pub fn resource_version(&self) -> Option<&str> {
		self.metadata_str("resourceVersion")
	}

	pub fn require_api_version(&self) -> K8sResult<&str> {
		self.api_version().ok_or(K8sError::InvalidObject {
			field: "apiVersion",
		})
	}

	pub fn require_kind(&self) -> K8sResult<&str> {
		self.kind().ok_or(K8sError::InvalidObject { field: "kind" })
	}

	pub fn require_namespace(&self) -> K8sResult<&str> {
		self.namespace().ok_or(K8sError::InvalidObject {
			field: "metadata.namespace",
		})
	}

	pub fn require_name(&self) -> K8sResult<&str> {
		self.name().ok_or(K8sError::InvalidObject {
			field: "metadata.name",
		})
	}

	/// Copy of this object carrying `resource_version`, or with the field
	/// removed when `None`. `self` is left untouched.
	pub fn with_resource_version(&self, resource_version: Option<Value>) -> Resource {
		let mut copy = self.clone();
		match resource_version {
			Some(version) => {
				copy.metadata_mut()
					.insert("resourceVersion".to_string(), version);
			}
			None => {
				if let Some(Value::Object(metadata)) = copy.0.get_mut("metadata") {
					metadata.remove("resourceVersion");
				}
			}
		}
		copy
	}

	/// Set `metadata.namespace` when the manifest does not carry one.
	pub fn with_default_namespace(mut self, namespace: &str) -> Resource {
		if self.namespace().is_none() {
			self.metadata_mut()
				.insert("namespace".to_string(), Value::String(namespace.to_string()));
		}
		self
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.0
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.0)
	}

	fn metadata_str(&self, key: &str) -> Option<&str> {
		self.0.get("metadata")?.get(key)?.as_str()
	}

	/// `metadata`, replacing it with an empty object if absent or malformed.
	fn metadata_mut(&mut self) -> &mut Map<String, Value> {
		let metadata = self
			.0
			.entry("metadata")
			.or_insert_with(|| Value::Object(Map::new()));
		if !metadata.is_object() {
			*metadata = Value::Object(Map::new());
		}
		match metadata {
			Value::Object(map) => map,
			_ => unreachable!("metadata was just made an object"),
		}
	}
}

impl TryFrom<Value> for Resource {
	type Error = K8sError;

	fn try_from(value: Value) -> K8sResult<Self> {
		match value {
			Value::Object(map) => Ok(Resource(map)),
			_ => Err(K8sError::NotAnObject),
		}
	}
}

impl From<Map<String, Value>> for Resource {
	fn from(map: Map<String, Value>) -> Self {
		Resource(map)
	}
}

impl From<Resource> for Value {
	fn from(resource: Resource) -> Self {
		resource.into_value()
	}
}
