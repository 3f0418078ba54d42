// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sol visit tracker SDK.
//!
//! Records page visits on a Sol server, keeps them alive with heartbeats while
//! the page is visible, and records custom actions. Failures are logged and
//! never reach the host: the worst case is that analytics silently stop.
//!
//! # Features
//!
//! - **Visit records**: one create call per page view, then a heartbeat every
//!   15 seconds while the page is visible
//! - **Actions**: one-shot create and update calls for custom events
//! - **Ignored visitors**: bots, local development hosts and the site's own
//!   operators get a no-op tracker
//! - **Injected environment**: page state comes from an [`Environment`], so
//!   the tracker runs the same in a browser host, a native app or a test
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sol_tracker::{ActionAttributes, StaticEnvironment, Tracker, TrackerOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let environment = Arc::new(
//!         StaticEnvironment::new("https://example.com/pricing?source=newsletter")
//!             .with_user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Firefox/121.0"),
//!     );
//!
//!     let tracker = Tracker::builder()
//!         .server("https://sol.example.com")
//!         .options(TrackerOptions::default().detailed(true))
//!         .environment(environment)
//!         .build()?;
//!
//!     let mut visit = tracker.record("d5f2e4b0-site", None);
//!     if let Some(record_id) = visit.created().await {
//!         println!("tracking visit {record_id}");
//!     }
//!
//!     let action = tracker.action("b1a4-signup", ActionAttributes::new("plan").with_value(1.0));
//!     let _action_id = action.created().await;
//!
//!     visit.stop();
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
mod client;
pub mod collector;
mod environment;
mod error;
mod session;
mod transport;

#[cfg(test)]
mod testing;

pub use bootstrap::{bootstrap, AttributeSource, AutoDetected};
pub use client::{
	create, ActionHandle, ClientConfig, FakeTracker, RealTracker, Tracker, TrackerBuilder,
};
pub use environment::{Environment, Screen, StaticEnvironment, WindowSize};
pub use error::{Result, TrackerError};
pub use session::{RecordHandle, SessionStatus, HEARTBEAT_INTERVAL};
pub use transport::{endpoint, HttpTransport, Transport};

// Re-export core types for convenience
pub use sol_common_http::Credentials;
pub use sol_tracker_core::{
	is_bot, is_fake_id, is_localhost, ActionAttributes, ActionId, Attributes, DetailedAttributes,
	DomainId, EventId, GraphqlRequest, IgnoreReason, Operation, PlatformInfo, RecordId,
	TrackerOptions, VisibilityState, FAKE_ID,
};
