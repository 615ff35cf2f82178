// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Minimal in-cluster Kubernetes API client.
//!
//! This crate provides:
//! - A trait-based [`Transport`] performing one authenticated round trip
//! - [`HttpTransport`], the production implementation over `reqwest`
//! - [`MockTransport`], a scripted transport for tests
//! - [`Reconciler`], which creates or replaces objects from JSON manifests

mod error;
mod http;
mod mock;
mod object;
mod path;
mod reconciler;
mod transport;

pub use error::{K8sError, K8sResult};
pub use http::HttpTransport;
pub use mock::{MockTransport, RecordedRequest};
pub use object::Resource;
pub use path::{item_path, plural_path, NaivePluralizer, OverridePluralizer, Pluralizer};
pub use reconciler::{resource_version_of, Reconciler};
pub use transport::{ApiResponse, RequestOptions, Transport};
