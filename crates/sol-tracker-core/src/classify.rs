// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Visitor classification predicates.
//!
//! These decide whether a visit should be tracked at all. They are pure and
//! operate on values read from the host environment by the caller.

use crate::options::TrackerOptions;

/// Identifier the server returns for visitors it has decided to ignore.
pub const FAKE_ID: &str = "88888888-8888-8888-8888-888888888888";

const LOCALHOST_NAMES: [&str; 4] = ["", "localhost", "127.0.0.1", "::1"];

const BOT_MARKERS: [&str; 4] = ["bot", "crawler", "spider", "crawling"];

/// Visibility of the hosting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
	#[default]
	Visible,
	Hidden,
}

/// Why a visitor is not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
	/// Page is served from a local development host.
	Localhost,
	/// User agent looks like a crawler.
	Bot,
}

impl std::fmt::Display for IgnoreReason {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			IgnoreReason::Localhost => write!(f, "localhost"),
			IgnoreReason::Bot => write!(f, "bot"),
		}
	}
}

/// Returns true for hostnames that identify a local development machine.
///
/// Only exact matches count; `127.0.0.2` is not treated as local.
#[must_use]
pub fn is_localhost(hostname: &str) -> bool {
	LOCALHOST_NAMES.contains(&hostname)
}

/// Returns true if the user agent contains a common crawler marker.
///
/// Only catches bots that execute the tracker in the first place.
#[must_use]
pub fn is_bot(user_agent: &str) -> bool {
	let user_agent = user_agent.to_ascii_lowercase();
	BOT_MARKERS.iter().any(|marker| user_agent.contains(marker))
}

/// Returns true when the page is hidden from the user.
#[must_use]
pub fn is_in_background(visibility: VisibilityState) -> bool {
	visibility == VisibilityState::Hidden
}

/// Returns true for the sentinel id of an ignored visitor.
#[must_use]
pub fn is_fake_id(id: &str) -> bool {
	id == FAKE_ID
}

/// Runs the tracking gate. Localhost is checked before the bot heuristic.
#[must_use]
pub fn ignore_reason(
	options: &TrackerOptions,
	hostname: &str,
	user_agent: &str,
) -> Option<IgnoreReason> {
	if options.ignore_localhost && is_localhost(hostname) {
		return Some(IgnoreReason::Localhost);
	}
	if is_bot(user_agent) {
		return Some(IgnoreReason::Bot);
	}
	None
}
