// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access to the hosting page.
//!
//! The tracker never reads global state directly. Everything it needs to know
//! about the page (location, visibility, screen, platform) comes through an
//! [`Environment`] supplied when the tracker is built.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use sol_tracker_core::{is_in_background, PlatformInfo, VisibilityState};

/// Screen geometry of the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Screen {
	pub width: u32,
	pub height: u32,
	pub color_depth: u32,
}

/// Outer size of the browser window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowSize {
	pub width: u32,
	pub height: u32,
}

/// Read-only view of the page the tracker is embedded in.
///
/// Implementations must return current values on every call; the tracker
/// relies on re-reading visibility before each heartbeat.
pub trait Environment: Send + Sync {
	/// Hostname of the current location, without port.
	fn hostname(&self) -> String;

	/// Full URL of the current location.
	fn location(&self) -> String;

	/// URL of the referring page, empty if there is none.
	fn referrer(&self) -> String;

	fn user_agent(&self) -> String;

	fn visibility(&self) -> VisibilityState;

	/// Negotiated locale, e.g. `en-US`.
	fn language(&self) -> Option<String>;

	fn screen(&self) -> Screen;

	fn outer_window(&self) -> WindowSize;

	/// Device, OS and browser identity derived from the user agent.
	fn platform(&self) -> PlatformInfo {
		PlatformInfo::default()
	}

	/// Returns true while the page is hidden from the user.
	fn is_in_background(&self) -> bool {
		is_in_background(self.visibility())
	}
}

/// An [`Environment`] backed by plain values.
///
/// Suitable for hosts that are not a browser and for tests. Location and
/// visibility can change after construction.
#[derive(Debug)]
pub struct StaticEnvironment {
	location: RwLock<String>,
	hostname: Option<String>,
	referrer: String,
	user_agent: String,
	hidden: AtomicBool,
	language: Option<String>,
	screen: Screen,
	outer_window: WindowSize,
	platform: PlatformInfo,
}

impl StaticEnvironment {
	/// Creates an environment for a visible page at `location`.
	pub fn new(location: impl Into<String>) -> Self {
		Self {
			location: RwLock::new(location.into()),
			hostname: None,
			referrer: String::new(),
			user_agent: String::new(),
			hidden: AtomicBool::new(false),
			language: None,
			screen: Screen::default(),
			outer_window: WindowSize::default(),
			platform: PlatformInfo::default(),
		}
	}

	/// Overrides the hostname derived from the location.
	pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
		self.hostname = Some(hostname.into());
		self
	}

	pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
		self.referrer = referrer.into();
		self
	}

	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();
		self
	}

	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = Some(language.into());
		self
	}

	pub fn with_screen(mut self, screen: Screen) -> Self {
		self.screen = screen;
		self
	}

	pub fn with_outer_window(mut self, outer_window: WindowSize) -> Self {
		self.outer_window = outer_window;
		self
	}

	pub fn with_platform(mut self, platform: PlatformInfo) -> Self {
		self.platform = platform;
		self
	}

	/// Marks the page as hidden or visible.
	pub fn set_visibility(&self, visibility: VisibilityState) {
		self.hidden
			.store(visibility == VisibilityState::Hidden, Ordering::SeqCst);
	}

	/// Navigates to a new location.
	pub fn set_location(&self, location: impl Into<String>) {
		*self.location.write().unwrap_or_else(PoisonError::into_inner) = location.into();
	}
}

impl Environment for StaticEnvironment {
	fn hostname(&self) -> String {
		if let Some(hostname) = &self.hostname {
			return hostname.clone();
		}
		reqwest::Url::parse(&self.location())
			.ok()
			.and_then(|url| url.host_str().map(|host| host.trim_matches(['[', ']']).to_string()))
			.unwrap_or_default()
	}

	fn location(&self) -> String {
		self.location
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	fn referrer(&self) -> String {
		self.referrer.clone()
	}

	fn user_agent(&self) -> String {
		self.user_agent.clone()
	}

	fn visibility(&self) -> VisibilityState {
		if self.hidden.load(Ordering::SeqCst) {
			VisibilityState::Hidden
		} else {
			VisibilityState::Visible
		}
	}

	fn language(&self) -> Option<String> {
		self.language.clone()
	}

	fn screen(&self) -> Screen {
		self.screen
	}

	fn outer_window(&self) -> WindowSize {
		self.outer_window
	}

	fn platform(&self) -> PlatformInfo {
		self.platform.clone()
	}
}
