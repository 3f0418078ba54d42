// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Sol.
//!
//! This crate provides a pre-configured HTTP client builder with a consistent
//! User-Agent header and an explicit credential policy.

mod client;

pub use client::{builder, builder_with_credentials, user_agent, Credentials};
