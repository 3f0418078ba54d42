// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: Record a visit and an action against a Sol server.
//!
//! Run with:
//!   cargo run --example track -p sol-tracker -- https://sol.example.com <domain-id> [event-id]

use std::sync::Arc;
use std::time::Duration;

use sol_tracker::{ActionAttributes, Screen, StaticEnvironment, Tracker, TrackerOptions, WindowSize};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let mut args = std::env::args().skip(1);
	let server = args
		.next()
		.or_else(|| std::env::var("SOL_SERVER").ok())
		.unwrap_or_else(|| "https://sol.example.com".to_string());
	let domain_id = args
		.next()
		.or_else(|| std::env::var("SOL_DOMAIN_ID").ok())
		.expect("domain id argument or SOL_DOMAIN_ID environment variable required");
	let event_id = args.next();

	println!("Initializing tracker...");
	println!("  Server: {}", server);
	println!("  Domain ID: {}", domain_id);

	let environment = Arc::new(
		StaticEnvironment::new("https://example.com/pricing?source=example")
			.with_referrer("https://search.example.org/")
			.with_user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Firefox/121.0")
			.with_language("en-US")
			.with_screen(Screen {
				width: 1920,
				height: 1080,
				color_depth: 24,
			})
			.with_outer_window(WindowSize {
				width: 1440,
				height: 900,
			}),
	);

	let tracker = Tracker::builder()
		.server(&server)
		.options(TrackerOptions::default().detailed(true))
		.environment(environment)
		.heartbeat_interval(Duration::from_secs(5))
		.request_timeout(Duration::from_secs(10))
		.build()?;

	println!("\nRecording visit...");
	let mut visit = tracker.record(domain_id, None);
	match visit.created().await {
		Some(record_id) => println!("  Record ID: {}", record_id),
		None => println!("  Visit not recorded, see logs"),
	}

	if let Some(event_id) = event_id {
		println!("\nRecording action...");
		let action = tracker.action(event_id, ActionAttributes::new("example").with_value(1.0));
		match action.created().await {
			Some(action_id) => {
				println!("  Action ID: {}", action_id);
				tracker.update_action(
					action_id,
					ActionAttributes::new("example")
						.with_value(2.0)
						.with_details("updated"),
				);
			}
			None => println!("  Action not recorded, see logs"),
		}
	}

	println!("\nSending heartbeats for 12 seconds...");
	tokio::time::sleep(Duration::from_secs(12)).await;

	visit.stop();
	println!("Stopped ({})", visit.status());

	// Let the last in-flight request finish before the runtime shuts down.
	tokio::time::sleep(Duration::from_millis(500)).await;
	Ok(())
}
