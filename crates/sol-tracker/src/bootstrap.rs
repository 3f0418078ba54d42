// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Automatic setup from `data-sol-*` attributes on the page.

use std::collections::HashMap;

use sol_tracker_core::TrackerOptions;
use tracing::debug;

use crate::client::{Tracker, TrackerBuilder};
use crate::error::Result;
use crate::session::RecordHandle;

/// Marks the element that turns auto-tracking on. Holds the domain id.
pub const DOMAIN_ID_ATTRIBUTE: &str = "data-sol-domain-id";
/// Base URL of the server. Defaults to an empty string.
pub const SERVER_ATTRIBUTE: &str = "data-sol-server";
/// JSON-encoded options. Defaults to `{}`.
pub const OPTIONS_ATTRIBUTE: &str = "data-sol-opts";

/// Lookup of attributes on the element carrying the tracker configuration.
pub trait AttributeSource {
	fn attribute(&self, name: &str) -> Option<String>;
}

impl AttributeSource for HashMap<String, String> {
	fn attribute(&self, name: &str) -> Option<String> {
		self.get(name).cloned()
	}
}

impl AttributeSource for [(&str, &str)] {
	fn attribute(&self, name: &str) -> Option<String> {
		self.iter()
			.find(|(key, _)| *key == name)
			.map(|(_, value)| value.to_string())
	}
}

/// A tracker created from page attributes, already recording the visit.
pub struct AutoDetected {
	pub tracker: Tracker,
	pub record: RecordHandle,
}

/// Sets up tracking from page attributes.
///
/// Returns `Ok(None)` when the page carries no domain id. Invalid options
/// JSON is a page author mistake and fails the bootstrap.
///
/// `builder` supplies everything the page attributes do not, at least the
/// environment.
pub fn bootstrap(
	source: &(impl AttributeSource + ?Sized),
	builder: TrackerBuilder,
) -> Result<Option<AutoDetected>> {
	let Some(domain_id) = source.attribute(DOMAIN_ID_ATTRIBUTE) else {
		debug!("No {DOMAIN_ID_ATTRIBUTE} attribute found, auto-tracking disabled");
		return Ok(None);
	};

	let server = source.attribute(SERVER_ATTRIBUTE).unwrap_or_default();
	let options = TrackerOptions::from_json_str(
		source
			.attribute(OPTIONS_ATTRIBUTE)
			.as_deref()
			.unwrap_or("{}"),
	)?;

	let tracker = builder.server(server).options(options).build()?;
	let record = tracker.record(domain_id, None);

	Ok(Some(AutoDetected { tracker, record }))
}
