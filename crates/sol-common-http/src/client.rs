// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::{Client, ClientBuilder};

/// Whether requests carry the host's ambient credentials.
#[derive(Debug, Clone)]
pub enum Credentials {
	/// No cookie store is attached to the client.
	Omit,
	/// Cookies from the given jar are sent, and cookies the server sets are
	/// stored back into it.
	Include(Arc<Jar>),
}

impl Credentials {
	/// Returns true if requests are sent with credentials.
	pub fn is_included(&self) -> bool {
		matches!(self, Credentials::Include(_))
	}
}

/// Creates a new HTTP client builder with the standard Sol User-Agent header.
///
/// Use this when you need to customize the client (e.g., set timeout).
///
/// # Example
/// ```ignore
/// let client = sol_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a client builder that applies the given credential policy.
pub fn builder_with_credentials(credentials: &Credentials) -> ClientBuilder {
	match credentials {
		Credentials::Omit => builder(),
		Credentials::Include(jar) => builder().cookie_provider(Arc::clone(jar)),
	}
}

/// Returns the standard Sol User-Agent string.
///
/// Format: `sol-tracker/{version}`
pub fn user_agent() -> String {
	format!("sol-tracker/{}", env!("CARGO_PKG_VERSION"))
}
