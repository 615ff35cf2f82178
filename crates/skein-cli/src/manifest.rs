// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Reading JSON manifests from files or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use skein_k8s::Resource;

/// Read the manifests in `source` (`-` for stdin).
///
/// Accepts a single object, a JSON array of objects, or a `*List` object
/// with an `items` array.
pub fn read_manifests(source: &Path) -> Result<Vec<Resource>> {
	let text = if source == Path::new("-") {
		let mut buf = String::new();
		std::io::stdin()
			.read_to_string(&mut buf)
			.context("failed to read manifest from stdin")?;
		buf
	} else {
		std::fs::read_to_string(source)
			.with_context(|| format!("failed to read manifest {}", source.display()))?
	};

	parse_manifests(&text).with_context(|| format!("invalid manifest {}", source.display()))
}

pub fn parse_manifests(text: &str) -> Result<Vec<Resource>> {
	let value: Value = serde_json::from_str(text).context("manifest is not valid JSON")?;

	let items = match value {
		Value::Array(items) => items,
		Value::Object(mut map) if is_list(&map) => match map.remove("items") {
			Some(Value::Array(items)) => items,
			_ => bail!("list manifest has no items array"),
		},
		other => vec![other],
	};

	items
		.into_iter()
		.enumerate()
		.map(|(i, item)| Resource::try_from(item).with_context(|| format!("manifest item {i}")))
		.collect()
}

fn is_list(map: &serde_json::Map<String, Value>) -> bool {
	map.get("kind")
		.and_then(Value::as_str)
		.is_some_and(|kind| kind.ends_with("List"))
		&& map.contains_key("items")
}

/// Fill in `metadata.namespace` where a manifest leaves it out.
pub fn default_namespace(objects: Vec<Resource>, namespace: Option<&str>) -> Vec<Resource> {
	match namespace {
		Some(ns) => objects
			.into_iter()
			.map(|object| object.with_default_namespace(ns))
			.collect(),
		None => objects,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn single_object() {
		let objects = parse_manifests(r#"{"apiVersion":"v1","kind":"Service"}"#).unwrap();
		assert_eq!(objects.len(), 1);
		assert_eq!(objects[0].kind(), Some("Service"));
	}

	#[test]
	fn array_and_list_forms() {
		let array = parse_manifests(r#"[{"kind":"Service"},{"kind":"ConfigMap"}]"#).unwrap();
		assert_eq!(array.len(), 2);

		let list =
			parse_manifests(r#"{"apiVersion":"v1","kind":"List","items":[{"kind":"Secret"}]}"#)
				.unwrap();
		assert_eq!(list.len(), 1);
		assert_eq!(list[0].kind(), Some("Secret"));
	}

	#[test]
	fn rejects_non_objects() {
		assert!(parse_manifests("[1, 2]").is_err());
		assert!(parse_manifests("\"service\"").is_err());
		assert!(parse_manifests("not json").is_err());
	}

	#[test]
	fn default_namespace_only_fills_gaps() {
		let objects = parse_manifests(
			r#"[{"kind":"Service","metadata":{"name":"a"}},
				{"kind":"Service","metadata":{"name":"b","namespace":"kept"}}]"#,
		)
		.unwrap();

		let objects = default_namespace(objects, Some("fallback"));
		assert_eq!(objects[0].namespace(), Some("fallback"));
		assert_eq!(objects[1].namespace(), Some("kept"));
	}

	#[test]
	fn reads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, r#"{{"apiVersion":"apps/v1","kind":"Deployment"}}"#).unwrap();

		let objects = read_manifests(file.path()).unwrap();
		assert_eq!(objects[0].api_version(), Some("apps/v1"));
	}

	#[test]
	fn missing_file_names_the_path() {
		let err = read_manifests(Path::new("/nonexistent/manifest.json")).unwrap_err();
		assert!(err.to_string().contains("/nonexistent/manifest.json"));
	}
}
