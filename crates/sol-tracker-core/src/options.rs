// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker options and their validation.

use serde_json::Value;

use crate::error::Result;

/// Behaviour switches for a tracker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerOptions {
	/// Collect device, screen and browser details in addition to the page.
	pub detailed: bool,
	/// Do not track visits served from a local development host.
	pub ignore_localhost: bool,
	/// Send requests without ambient credentials.
	pub ignore_own_visits: bool,
}

impl Default for TrackerOptions {
	fn default() -> Self {
		Self {
			detailed: false,
			ignore_localhost: true,
			ignore_own_visits: true,
		}
	}
}

impl TrackerOptions {
	/// Normalizes a loosely typed options value.
	///
	/// A field only moves away from its default when the input carries the
	/// opposite boolean literal. Anything else (missing fields, strings,
	/// numbers, a non-object value) keeps the default.
	#[must_use]
	pub fn validate(input: Option<&Value>) -> Self {
		let defaults = Self::default();
		let Some(Value::Object(map)) = input else {
			return defaults;
		};

		let flag = |key: &str, default: bool| match map.get(key) {
			Some(Value::Bool(value)) if *value != default => *value,
			_ => default,
		};

		Self {
			detailed: flag("detailed", defaults.detailed),
			ignore_localhost: flag("ignoreLocalhost", defaults.ignore_localhost),
			ignore_own_visits: flag("ignoreOwnVisits", defaults.ignore_own_visits),
		}
	}

	/// Parses JSON options text and validates the result.
	///
	/// Only a JSON syntax error fails; well-formed but odd input falls back
	/// to defaults.
	pub fn from_json_str(text: &str) -> Result<Self> {
		let value: Value = serde_json::from_str(text)?;
		Ok(Self::validate(Some(&value)))
	}

	pub fn detailed(mut self, detailed: bool) -> Self {
		self.detailed = detailed;
		self
	}

	pub fn ignore_localhost(mut self, ignore: bool) -> Self {
		self.ignore_localhost = ignore;
		self
	}

	pub fn ignore_own_visits(mut self, ignore: bool) -> Self {
		self.ignore_own_visits = ignore;
		self
	}
}
