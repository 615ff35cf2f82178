// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! REST path derivation from `apiVersion`, `kind` and namespace.
//!
//! Collection paths have the shape
//! `/api[s]/<apiVersion>/namespaces/<namespace>/<plural>`: grouped API
//! versions (`apps/v1`) live under `/apis`, the core group (`v1`) under `/api`.
//!
//! The plural is produced by a [`Pluralizer`]. The default,
//! [`NaivePluralizer`], lowercases the kind and appends `s`, so irregular
//! kinds come out wrong (`Proxy` becomes `proxys`). Callers that need correct
//! plurals opt in to an [`OverridePluralizer`].

use std::collections::HashMap;

use crate::error::K8sResult;
use crate::object::Resource;

/// Maps a `kind` to the plural resource name used in URLs.
pub trait Pluralizer: Send + Sync {
	fn plural(&self, kind: &str) -> String;
}

impl<P: Pluralizer + ?Sized> Pluralizer for Box<P> {
	fn plural(&self, kind: &str) -> String {
		(**self).plural(kind)
	}
}

/// Lowercase the kind and append a literal `s`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaivePluralizer;

impl Pluralizer for NaivePluralizer {
	fn plural(&self, kind: &str) -> String {
		format!("{}s", kind.to_lowercase())
	}
}

/// Explicit plurals for selected kinds, naive pluralization for the rest.
///
/// ```
/// use skein_k8s::{OverridePluralizer, Pluralizer};
///
/// let plurals = OverridePluralizer::new().with_override("Proxy", "proxies");
/// assert_eq!(plurals.plural("Proxy"), "proxies");
/// assert_eq!(plurals.plural("Service"), "services");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OverridePluralizer {
	overrides: HashMap<String, String>,
}

impl OverridePluralizer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides for core kinds whose plural is not `kind + s`.
	pub fn with_core_irregulars() -> Self {
		Self::new()
			.with_override("Endpoints", "endpoints")
			.with_override("Ingress", "ingresses")
			.with_override("NetworkPolicy", "networkpolicies")
			.with_override("PodSecurityPolicy", "podsecuritypolicies")
			.with_override("PriorityClass", "priorityclasses")
			.with_override("StorageClass", "storageclasses")
			.with_override("IngressClass", "ingressclasses")
			.with_override("RuntimeClass", "runtimeclasses")
	}

	pub fn with_override(mut self, kind: impl Into<String>, plural: impl Into<String>) -> Self {
		self.overrides.insert(kind.into(), plural.into());
		self
	}
}

impl Pluralizer for OverridePluralizer {
	fn plural(&self, kind: &str) -> String {
		match self.overrides.get(kind) {
			Some(plural) => plural.clone(),
			None => NaivePluralizer.plural(kind),
		}
	}
}

/// Collection path for `object`, e.g. `/api/v1/namespaces/ns1/services`.
pub fn plural_path(object: &Resource, pluralizer: &dyn Pluralizer) -> K8sResult<String> {
	let api_version = object.require_api_version()?;
	let kind = object.require_kind()?;
	let namespace = object.require_namespace()?;

	let root = if api_version.contains('/') {
		"apis"
	} else {
		"api"
	};

	Ok(format!(
		"/{root}/{api_version}/namespaces/{namespace}/{}",
		pluralizer.plural(kind)
	))
}

/// Path of the named object inside its collection.
pub fn item_path(object: &Resource, pluralizer: &dyn Pluralizer) -> K8sResult<String> {
	let collection = plural_path(object, pluralizer)?;
	Ok(format!("{collection}/{}", object.require_name()?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::K8sError;
	use proptest::prelude::*;
	use serde_json::json;

	fn resource(api_version: &str, kind: &str, namespace: &str) -> Resource {
		Resource::try_from(json!({
			"apiVersion": api_version,
			"kind": kind,
			"metadata": {"namespace": namespace, "name": "obj"}
		}))
		.unwrap()
	}

	#[test]
	fn core_service_path() {
		let svc = resource("v1", "Service", "ns1");
		assert_eq!(
			plural_path(&svc, &NaivePluralizer).unwrap(),
			"/api/v1/namespaces/ns1/services"
		);
	}

	#[test]
	fn grouped_deployment_path() {
		let deploy = resource("apps/v1", "Deployment", "prod");
		assert_eq!(
			plural_path(&deploy, &NaivePluralizer).unwrap(),
			"/apis/apps/v1/namespaces/prod/deployments"
		);
	}

	#[test]
	fn item_path_appends_name() {
		let deploy = resource("apps/v1", "Deployment", "prod");
		assert_eq!(
			item_path(&deploy, &NaivePluralizer).unwrap(),
			"/apis/apps/v1/namespaces/prod/deployments/obj"
		);
	}

	/// Irregular plurals are not corrected by default.
	#[test]
	fn naive_pluralization_of_irregular_kinds() {
		assert_eq!(NaivePluralizer.plural("Proxy"), "proxys");
		assert_eq!(NaivePluralizer.plural("Ingress"), "ingresss");
		assert_eq!(NaivePluralizer.plural("Endpoints"), "endpointss");

		let proxy = resource("example.io/v1", "Proxy", "edge");
		assert_eq!(
			plural_path(&proxy, &NaivePluralizer).unwrap(),
			"/apis/example.io/v1/namespaces/edge/proxys"
		);
	}

	#[test]
	fn override_pluralizer_corrects_selected_kinds() {
		let plurals = OverridePluralizer::with_core_irregulars().with_override("Proxy", "proxies");

		assert_eq!(plurals.plural("Proxy"), "proxies");
		assert_eq!(plurals.plural("Ingress"), "ingresses");
		assert_eq!(plurals.plural("Endpoints"), "endpoints");
		assert_eq!(plurals.plural("ConfigMap"), "configmaps");
	}

	#[test]
	fn boxed_strategy_is_itself_a_pluralizer() {
		let boxed: Box<dyn Pluralizer> = Box::new(OverridePluralizer::with_core_irregulars());
		let svc = resource("networking.k8s.io/v1", "Ingress", "web");

		assert_eq!(
			plural_path(&svc, &boxed).unwrap(),
			"/apis/networking.k8s.io/v1/namespaces/web/ingresses"
		);
	}

	#[test]
	fn missing_fields_are_reported() {
		let no_ns = Resource::try_from(json!({"apiVersion": "v1", "kind": "Pod"})).unwrap();
		assert!(matches!(
			plural_path(&no_ns, &NaivePluralizer),
			Err(K8sError::InvalidObject {
				field: "metadata.namespace"
			})
		));

		let no_kind = Resource::try_from(json!({"apiVersion": "v1"})).unwrap();
		assert!(matches!(
			plural_path(&no_kind, &NaivePluralizer),
			Err(K8sError::InvalidObject { field: "kind" })
		));
	}

	proptest! {
		#[test]
		fn group_selects_apis_root(
			group in "[a-z]{1,10}(\\.[a-z]{1,10}){0,2}",
			version in "v[1-9](beta[1-9])?",
			kind in "[A-Z][a-zA-Z]{0,15}",
			namespace in "[a-z][a-z0-9-]{0,20}",
		) {
			let grouped = resource(&format!("{group}/{version}"), &kind, &namespace);
			let core = resource(&version, &kind, &namespace);

			prop_assert!(plural_path(&grouped, &NaivePluralizer).unwrap().starts_with("/apis/"));
			let core_path = plural_path(&core, &NaivePluralizer).unwrap();
			prop_assert!(core_path.starts_with("/api/"));
			prop_assert!(!core_path.starts_with("/apis/"));
		}

		#[test]
		fn plural_segment_is_lowercased_kind_plus_s(kind in "[A-Za-z]{1,20}") {
			let path = plural_path(&resource("v1", &kind, "default"), &NaivePluralizer).unwrap();
			let segment = path.rsplit('/').next().unwrap();

			prop_assert_eq!(segment, format!("{}s", kind.to_lowercase()));
		}
	}
}
