// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Visit and action attribute records.
//!
//! Field names follow the server's GraphQL input types, so these structs
//! serialize directly into the `input` variable of a request.

use serde::Serialize;

/// Context collected when a visit record is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
	pub site_location: String,
	pub site_referrer: String,
	/// Traffic source tag taken from the `source` query parameter.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	#[serde(flatten)]
	pub detailed: Option<DetailedAttributes>,
}

/// Device, screen and browser facts, only sent for detailed tracking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAttributes {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub site_language: Option<String>,
	pub screen_width: u32,
	pub screen_height: u32,
	pub screen_color_depth: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub device_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub device_manufacturer: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub os_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub os_version: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub browser_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub browser_version: Option<String>,
	pub browser_width: u32,
	pub browser_height: u32,
}

/// Platform identity as reported by a user-agent parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformInfo {
	pub device_name: Option<String>,
	pub device_manufacturer: Option<String>,
	pub os_family: Option<String>,
	pub os_version: Option<String>,
	pub browser_name: Option<String>,
	pub browser_version: Option<String>,
}

/// Input for creating or updating an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionAttributes {
	pub key: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
}

impl ActionAttributes {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			..Default::default()
		}
	}

	pub fn with_value(mut self, value: f64) -> Self {
		self.value = Some(value);
		self
	}

	pub fn with_details(mut self, details: impl Into<String>) -> Self {
		self.details = Some(details.into());
		self
	}
}
