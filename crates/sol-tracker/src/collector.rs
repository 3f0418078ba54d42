// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute collection from the hosting page.

use sol_tracker_core::{Attributes, DetailedAttributes};

use crate::environment::Environment;

/// Snapshots the page context for a new visit record.
///
/// Every call reads the environment again, so navigation or a resized window
/// between two records is reflected.
pub fn attributes(environment: &dyn Environment, detailed: bool) -> Attributes {
	let site_location = environment.location();
	let source = traffic_source(&site_location);

	Attributes {
		site_referrer: environment.referrer(),
		source,
		detailed: detailed.then(|| detailed_attributes(environment)),
		site_location,
	}
}

fn detailed_attributes(environment: &dyn Environment) -> DetailedAttributes {
	let screen = environment.screen();
	let window = environment.outer_window();
	let platform = environment.platform();

	DetailedAttributes {
		site_language: environment
			.language()
			.map(|language| language.chars().take(2).collect()),
		screen_width: screen.width,
		screen_height: screen.height,
		screen_color_depth: screen.color_depth,
		device_name: platform.device_name,
		device_manufacturer: platform.device_manufacturer,
		os_name: platform.os_family,
		os_version: platform.os_version,
		browser_name: platform.browser_name,
		browser_version: platform.browser_version,
		browser_width: window.width,
		browser_height: window.height,
	}
}

/// Value of the first `source` query parameter, kept verbatim.
///
/// Returns `None` when the parameter is missing or empty.
pub fn traffic_source(location: &str) -> Option<String> {
	let location = location.split('#').next().unwrap_or_default();
	let (_, query) = location.split_once('?')?;

	let value = query
		.split('&')
		.find_map(|pair| match pair.split_once('=') {
			Some(("source", value)) => Some(value),
			None if pair == "source" => Some(""),
			_ => None,
		})?;

	(!value.is_empty()).then(|| value.to_string())
}
