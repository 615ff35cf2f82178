// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for skein.
//!
//! This crate provides a pre-configured `reqwest` client builder with a
//! consistent User-Agent header, optionally pinned to a cluster CA bundle.

mod client;

pub use client::{builder, builder_with_ca, user_agent, TrustError};
