// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker instances and their builder.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use sol_common_http::Credentials;
use sol_tracker_core::{
	ignore_reason, ActionAttributes, ActionId, Attributes, CreatedPayload, DomainId, EventId,
	GraphqlRequest, RecordId, TrackerOptions,
};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::collector;
use crate::environment::Environment;
use crate::error::{Result, TrackerError};
use crate::session::{HeartbeatContext, RecordHandle, Session, SessionStatus, HEARTBEAT_INTERVAL};
use crate::transport::{HttpTransport, Transport};

/// Configuration for a tracker.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Period between heartbeats of an active session.
	pub heartbeat_interval: Duration,
	/// Timeout for HTTP requests. `None` leaves it to the HTTP stack.
	pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			heartbeat_interval: HEARTBEAT_INTERVAL,
			request_timeout: None,
		}
	}
}

/// Builder for constructing a [`Tracker`].
pub struct TrackerBuilder {
	server: String,
	options: TrackerOptions,
	environment: Option<Arc<dyn Environment>>,
	transport: Option<Arc<dyn Transport>>,
	cookie_jar: Option<Arc<Jar>>,
	config: ClientConfig,
}

impl TrackerBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			server: String::new(),
			options: TrackerOptions::default(),
			environment: None,
			transport: None,
			cookie_jar: None,
			config: ClientConfig::default(),
		}
	}

	/// Sets the base URL of the Sol server.
	///
	/// Example: `https://sol.example.com`
	pub fn server(mut self, server: impl Into<String>) -> Self {
		self.server = server.into();
		self
	}

	pub fn options(mut self, options: TrackerOptions) -> Self {
		self.options = options;
		self
	}

	/// Sets the page the tracker reads its context from. Required.
	pub fn environment(mut self, environment: Arc<dyn Environment>) -> Self {
		self.environment = Some(environment);
		self
	}

	/// Replaces the HTTP transport, e.g. with an in-process one.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Sets the ambient cookies sent when own visits are not ignored.
	pub fn cookie_jar(mut self, jar: Arc<Jar>) -> Self {
		self.cookie_jar = Some(jar);
		self
	}

	pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
		self.config.heartbeat_interval = interval;
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = Some(timeout);
		self
	}

	/// Builds the tracker.
	///
	/// Fails without an environment, with a zero heartbeat interval, or when a
	/// real tracker is built outside a Tokio runtime.
	///
	/// Visitors on localhost (when ignored) and bots get a [`Tracker::Fake`]
	/// that never touches the network.
	pub fn build(self) -> Result<Tracker> {
		let environment = self.environment.ok_or(TrackerError::MissingEnvironment)?;
		if self.config.heartbeat_interval.is_zero() {
			return Err(TrackerError::InvalidHeartbeatInterval);
		}

		if let Some(reason) = ignore_reason(
			&self.options,
			&environment.hostname(),
			&environment.user_agent(),
		) {
			warn!(reason = %reason, "Visitor ignored, tracking disabled");
			return Ok(Tracker::Fake(FakeTracker {
				options: self.options,
			}));
		}

		let runtime = Handle::try_current().map_err(|_| TrackerError::NoRuntime)?;

		let transport: Arc<dyn Transport> = match self.transport {
			Some(transport) => transport,
			None => {
				let credentials = if self.options.ignore_own_visits {
					Credentials::Omit
				} else {
					Credentials::Include(self.cookie_jar.unwrap_or_default())
				};
				Arc::new(HttpTransport::new(
					&self.server,
					&credentials,
					self.config.request_timeout,
				)?)
			}
		};

		info!(
			server = %self.server,
			detailed = self.options.detailed,
			ignore_own_visits = self.options.ignore_own_visits,
			"Sol tracker initialized"
		);

		Ok(Tracker::Real(RealTracker {
			inner: Arc::new(TrackerInner {
				options: self.options,
				environment,
				transport,
				config: self.config,
				runtime,
			}),
		}))
	}
}

impl Default for TrackerBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Creates a tracker for `server`.
///
/// Shorthand for [`Tracker::builder`] with the server, options and
/// environment set.
pub fn create(
	server: impl Into<String>,
	options: TrackerOptions,
	environment: Arc<dyn Environment>,
) -> Result<Tracker> {
	Tracker::builder()
		.server(server)
		.options(options)
		.environment(environment)
		.build()
}

/// A tracking instance.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use sol_tracker::{StaticEnvironment, Tracker, TrackerOptions};
///
/// let environment = Arc::new(StaticEnvironment::new("https://example.com/pricing"));
/// let tracker = Tracker::builder()
///     .server("https://sol.example.com")
///     .options(TrackerOptions::default().detailed(true))
///     .environment(environment)
///     .build()?;
///
/// let visit = tracker.record("d5f2e4b0-site", None);
///
/// // On page unload:
/// visit.stop();
/// ```
#[derive(Clone)]
pub enum Tracker {
	/// Sends to the server.
	Real(RealTracker),
	/// Ignores every call.
	Fake(FakeTracker),
}

impl Tracker {
	/// Creates a new builder for constructing a Tracker.
	pub fn builder() -> TrackerBuilder {
		TrackerBuilder::new()
	}

	/// Returns true for the no-op instance.
	pub fn is_fake(&self) -> bool {
		matches!(self, Tracker::Fake(_))
	}

	pub fn options(&self) -> &TrackerOptions {
		match self {
			Tracker::Real(tracker) => &tracker.inner.options,
			Tracker::Fake(tracker) => &tracker.options,
		}
	}

	/// Records a visit and keeps it alive with heartbeats.
	///
	/// `attributes` defaults to a fresh snapshot of the page, detailed if the
	/// options ask for it.
	pub fn record(
		&self,
		domain_id: impl Into<DomainId>,
		attributes: Option<Attributes>,
	) -> RecordHandle {
		match self {
			Tracker::Real(tracker) => tracker.record(domain_id.into(), attributes),
			Tracker::Fake(_) => RecordHandle::inert(),
		}
	}

	/// Resumes heartbeats for a record created earlier.
	pub fn update_record(&self, record_id: impl Into<RecordId>) -> RecordHandle {
		match self {
			Tracker::Real(tracker) => tracker.update_record(record_id.into()),
			Tracker::Fake(_) => RecordHandle::inert(),
		}
	}

	/// Records a single action for `event_id`.
	pub fn action(
		&self,
		event_id: impl Into<EventId>,
		attributes: ActionAttributes,
	) -> ActionHandle {
		match self {
			Tracker::Real(tracker) => tracker.action(event_id.into(), attributes),
			Tracker::Fake(_) => ActionHandle::empty(),
		}
	}

	/// Updates an action created earlier.
	pub fn update_action(&self, action_id: impl Into<ActionId>, attributes: ActionAttributes) {
		if let Tracker::Real(tracker) = self {
			tracker.update_action(action_id.into(), attributes);
		}
	}
}

/// Internal tracker state.
struct TrackerInner {
	options: TrackerOptions,
	environment: Arc<dyn Environment>,
	transport: Arc<dyn Transport>,
	config: ClientConfig,
	runtime: Handle,
}

/// Tracker that talks to the server.
#[derive(Clone)]
pub struct RealTracker {
	inner: Arc<TrackerInner>,
}

impl RealTracker {
	fn heartbeat_context(&self) -> HeartbeatContext {
		HeartbeatContext {
			transport: Arc::clone(&self.inner.transport),
			environment: Arc::clone(&self.inner.environment),
			interval: self.inner.config.heartbeat_interval,
			runtime: self.inner.runtime.clone(),
		}
	}

	fn record(&self, domain_id: DomainId, attributes: Option<Attributes>) -> RecordHandle {
		let attributes = attributes.unwrap_or_else(|| {
			collector::attributes(self.inner.environment.as_ref(), self.inner.options.detailed)
		});
		let request = GraphqlRequest::create_record(&domain_id, &attributes);

		let session = Session::new();
		session.mark_pending();

		let (tx, rx) = oneshot::channel();
		let task_session = Arc::clone(&session);
		let context = self.heartbeat_context();

		self.inner.runtime.spawn(async move {
			let Some(body) = context.transport.send(request).await else {
				task_session.abandon();
				return;
			};

			let Some(record_id) = CreatedPayload::record_id(&body) else {
				error!(domain_id = %domain_id, "Create record response carried no record id");
				task_session.abandon();
				return;
			};

			// Heartbeats start only after the create request has completed.
			let status = task_session.establish(record_id.clone(), context);
			if status == SessionStatus::Active {
				let _ = tx.send(record_id);
			}
		});

		RecordHandle::new(session, Some(rx))
	}

	fn update_record(&self, record_id: RecordId) -> RecordHandle {
		if record_id.is_fake() {
			warn!("Visitor ignored by the server, this looks like a visit to your own site");
			return RecordHandle::inert();
		}

		let session = Session::new();
		session.establish(record_id, self.heartbeat_context());
		RecordHandle::new(session, None)
	}

	fn action(&self, event_id: EventId, attributes: ActionAttributes) -> ActionHandle {
		let request = GraphqlRequest::create_action(&event_id, &attributes);
		let transport = Arc::clone(&self.inner.transport);
		let (tx, rx) = oneshot::channel();

		self.inner.runtime.spawn(async move {
			let Some(body) = transport.send(request).await else {
				return;
			};

			let Some(action_id) = CreatedPayload::action_id(&body) else {
				error!(event_id = %event_id, "Create action response carried no action id");
				return;
			};

			if action_id.is_fake() {
				warn!("Visitor ignored by the server, this looks like a visit to your own site");
				return;
			}

			let _ = tx.send(action_id);
		});

		ActionHandle { created: Some(rx) }
	}

	fn update_action(&self, action_id: ActionId, attributes: ActionAttributes) {
		if action_id.is_fake() {
			warn!("Visitor ignored by the server, this looks like a visit to your own site");
			return;
		}

		let request = GraphqlRequest::update_action(&action_id, &attributes);
		let transport = Arc::clone(&self.inner.transport);
		self.inner.runtime.spawn(async move {
			transport.send(request).await;
		});
	}
}

/// Tracker handed out for ignored visitors.
#[derive(Debug, Clone)]
pub struct FakeTracker {
	options: TrackerOptions,
}

/// Result of [`Tracker::action`].
#[derive(Debug)]
pub struct ActionHandle {
	created: Option<oneshot::Receiver<ActionId>>,
}

impl ActionHandle {
	fn empty() -> Self {
		Self { created: None }
	}

	/// Waits for the server to create the action.
	///
	/// Resolves to `None` if creation failed or the visitor is ignored.
	pub async fn created(self) -> Option<ActionId> {
		match self.created {
			Some(receiver) => receiver.await.ok(),
			None => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::environment::StaticEnvironment;
	use crate::testing::{MockTransport, DESKTOP_UA};
	use sol_tracker_core::{Operation, VisibilityState, FAKE_ID};

	fn environment() -> Arc<StaticEnvironment> {
		Arc::new(
			StaticEnvironment::new("https://example.com/?source=ads")
				.with_user_agent(DESKTOP_UA)
				.with_language("en-GB"),
		)
	}

	fn tracker(transport: Arc<MockTransport>, environment: Arc<StaticEnvironment>) -> Tracker {
		Tracker::builder()
			.server("https://sol.example.com")
			.environment(environment)
			.transport(transport)
			.build()
			.unwrap()
	}

	#[test]
	fn builder_requires_environment() {
		let result = Tracker::builder().server("https://sol.example.com").build();
		assert!(matches!(result, Err(TrackerError::MissingEnvironment)));
	}

	#[test]
	fn builder_requires_runtime_for_real_tracker() {
		let result = Tracker::builder().environment(environment()).build();
		assert!(matches!(result, Err(TrackerError::NoRuntime)));
	}

	#[test]
	fn client_config_defaults() {
		let config = ClientConfig::default();
		assert_eq!(config.heartbeat_interval, Duration::from_secs(15));
		assert!(config.request_timeout.is_none());
	}

	#[tokio::test]
	async fn zero_heartbeat_interval_is_rejected() {
		let transport = Arc::new(MockTransport::new());
		let result = Tracker::builder()
			.environment(environment())
			.transport(transport.clone())
			.heartbeat_interval(Duration::ZERO)
			.build();
		assert!(matches!(result, Err(TrackerError::InvalidHeartbeatInterval)));
		assert_eq!(transport.total(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn short_heartbeat_interval_keeps_ticking() {
		let transport = Arc::new(MockTransport::new());
		let tracker = Tracker::builder()
			.environment(environment())
			.transport(transport.clone())
			.heartbeat_interval(Duration::from_millis(1))
			.build()
			.unwrap();

		let mut handle = tracker.record("dom-1", None);
		assert!(handle.created().await.is_some());
		tokio::time::sleep(Duration::from_millis(5) + Duration::from_micros(500)).await;
		assert_eq!(handle.status(), SessionStatus::Active);
		assert!(transport.count(Operation::UpdateRecord) >= 4);
		handle.stop();
	}

	#[tokio::test]
	async fn localhost_gets_fake_tracker() {
		let transport = Arc::new(MockTransport::new());
		let env =
			Arc::new(StaticEnvironment::new("http://localhost:8080/").with_user_agent(DESKTOP_UA));
		let tracker = tracker(transport.clone(), env);
		assert!(tracker.is_fake());

		let mut handle = tracker.record("dom-1", None);
		handle.stop();
		handle.stop();
		assert!(handle.created().await.is_none());
		assert!(tracker.action("evt-1", ActionAttributes::new("k")).created().await.is_none());
		tracker.update_action("act-1", ActionAttributes::new("k"));
		tracker.update_record("rec-1").stop();

		tokio::task::yield_now().await;
		assert_eq!(transport.total(), 0);
	}

	#[tokio::test]
	async fn localhost_tracked_when_not_ignored() {
		let transport = Arc::new(MockTransport::new());
		let env = Arc::new(StaticEnvironment::new("http://127.0.0.1/").with_user_agent(DESKTOP_UA));
		let tracker = Tracker::builder()
			.options(TrackerOptions::default().ignore_localhost(false))
			.environment(env)
			.transport(transport)
			.build()
			.unwrap();
		assert!(!tracker.is_fake());
		assert!(!tracker.options().ignore_localhost);
	}

	#[test]
	fn bots_get_fake_tracker_without_runtime() {
		let env = Arc::new(
			StaticEnvironment::new("https://example.com/").with_user_agent("Googlebot/2.1"),
		);
		let tracker = create("https://sol.example.com", TrackerOptions::default(), env).unwrap();
		assert!(tracker.is_fake());
		assert!(tracker.options().ignore_own_visits);
	}

	#[tokio::test(start_paused = true)]
	async fn record_lifecycle() {
		let transport = Arc::new(MockTransport::new());
		let tracker = tracker(transport.clone(), environment());

		let mut handle = tracker.record("dom-1", None);
		assert_eq!(handle.status(), SessionStatus::Pending);
		assert_eq!(handle.created().await, Some(RecordId::new("rec-1")));
		assert_eq!(handle.status(), SessionStatus::Active);
		assert_eq!(transport.count(Operation::CreateRecord), 1);
		assert_eq!(transport.count(Operation::UpdateRecord), 0);

		tokio::time::sleep(HEARTBEAT_INTERVAL + Duration::from_millis(1)).await;
		assert_eq!(transport.count(Operation::UpdateRecord), 1);

		tokio::time::sleep(HEARTBEAT_INTERVAL).await;
		assert_eq!(transport.count(Operation::UpdateRecord), 2);

		handle.stop();
		tokio::time::sleep(HEARTBEAT_INTERVAL * 4).await;
		assert_eq!(transport.count(Operation::UpdateRecord), 2);
		assert_eq!(handle.status(), SessionStatus::Stopped);
		assert_eq!(transport.count(Operation::CreateRecord), 1);

		let update = &transport.requests()[1];
		assert_eq!(update.variables["recordId"], "rec-1");
	}

	#[tokio::test]
	async fn record_sends_collected_attributes() {
		let transport = Arc::new(MockTransport::new());
		let tracker = tracker(transport.clone(), environment());

		let mut handle = tracker.record("dom-1", None);
		handle.created().await;

		let request = &transport.requests()[0];
		assert_eq!(request.variables["domainId"], "dom-1");
		assert_eq!(request.variables["input"]["source"], "ads");
		assert!(request.variables["input"].get("siteLanguage").is_none());
		handle.stop();
	}

	#[tokio::test]
	async fn detailed_record_includes_details() {
		let transport = Arc::new(MockTransport::new());
		let tracker = Tracker::builder()
			.options(TrackerOptions::default().detailed(true))
			.environment(environment())
			.transport(transport.clone())
			.build()
			.unwrap();

		let mut handle = tracker.record("dom-1", None);
		handle.created().await;
		assert_eq!(transport.requests()[0].variables["input"]["siteLanguage"], "en");
		handle.stop();
	}

	#[tokio::test]
	async fn record_uses_explicit_attributes() {
		let transport = Arc::new(MockTransport::new());
		let tracker = tracker(transport.clone(), environment());
		let attributes = Attributes {
			site_location: "https://example.com/custom".into(),
			..Default::default()
		};

		let mut handle = tracker.record("dom-1", Some(attributes));
		handle.created().await;
		assert_eq!(
			transport.requests()[0].variables["input"]["siteLocation"],
			"https://example.com/custom"
		);
		handle.stop();
	}

	#[tokio::test(start_paused = true)]
	async fn sentinel_record_never_heartbeats() {
		let transport = Arc::new(MockTransport::with_ids(FAKE_ID, "act-1"));
		let tracker = tracker(transport.clone(), environment());

		let mut handle = tracker.record("dom-1", None);
		assert!(handle.created().await.is_none());
		assert_eq!(handle.status(), SessionStatus::Ignored);
		assert!(!handle.session().has_heartbeat());

		tokio::time::sleep(HEARTBEAT_INTERVAL * 10).await;
		assert_eq!(transport.count(Operation::UpdateRecord), 0);
		assert_eq!(transport.total(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn failed_create_stops_session() {
		let transport = Arc::new(MockTransport::new());
		transport.set_should_fail(true);
		let tracker = tracker(transport.clone(), environment());

		let mut handle = tracker.record("dom-1", None);
		assert!(handle.created().await.is_none());
		assert_eq!(handle.status(), SessionStatus::Stopped);

		tokio::time::sleep(HEARTBEAT_INTERVAL * 3).await;
		assert_eq!(transport.total(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn background_ticks_send_nothing() {
		let transport = Arc::new(MockTransport::new());
		let env = environment();
		let tracker = tracker(transport.clone(), env.clone());

		let mut handle = tracker.record("dom-1", None);
		handle.created().await;
		env.set_visibility(VisibilityState::Hidden);

		tokio::time::sleep(HEARTBEAT_INTERVAL * 2 + Duration::from_millis(1)).await;
		assert_eq!(transport.count(Operation::UpdateRecord), 0);
		assert_eq!(handle.status(), SessionStatus::Active);

		env.set_visibility(VisibilityState::Visible);
		tokio::time::sleep(HEARTBEAT_INTERVAL).await;
		assert_eq!(transport.count(Operation::UpdateRecord), 1);
		handle.stop();
	}

	#[tokio::test(start_paused = true)]
	async fn update_record_resumes_heartbeats() {
		let transport = Arc::new(MockTransport::new());
		let tracker = tracker(transport.clone(), environment());

		let mut handle = tracker.update_record("rec-7");
		assert_eq!(handle.status(), SessionStatus::Active);
		assert_eq!(handle.created().await, Some(RecordId::new("rec-7")));

		tokio::time::sleep(HEARTBEAT_INTERVAL * 2 + Duration::from_millis(1)).await;
		assert_eq!(transport.count(Operation::UpdateRecord), 2);
		assert_eq!(transport.count(Operation::CreateRecord), 0);

		handle.stop();
		tokio::time::sleep(HEARTBEAT_INTERVAL * 2).await;
		assert_eq!(transport.count(Operation::UpdateRecord), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn update_record_with_sentinel_is_inert() {
		let transport = Arc::new(MockTransport::new());
		let tracker = tracker(transport.clone(), environment());

		let handle = tracker.update_record(FAKE_ID);
		handle.stop();
		assert_eq!(handle.status(), SessionStatus::Ignored);

		tokio::time::sleep(HEARTBEAT_INTERVAL * 3).await;
		assert_eq!(transport.total(), 0);
	}

	#[tokio::test]
	async fn action_delivers_id() {
		let transport = Arc::new(MockTransport::new());
		let tracker = tracker(transport.clone(), environment());

		let handle = tracker.action("evt-1", ActionAttributes::new("signup").with_value(1.0));
		assert_eq!(handle.created().await, Some(ActionId::new("act-1")));

		let request = &transport.requests()[0];
		assert_eq!(request.operation, Operation::CreateAction);
		assert_eq!(request.variables["eventId"], "evt-1");
		assert_eq!(request.variables["input"]["key"], "signup");
	}

	#[tokio::test]
	async fn sentinel_action_is_not_delivered() {
		let transport = Arc::new(MockTransport::with_ids("rec-1", FAKE_ID));
		let tracker = tracker(transport.clone(), environment());

		let handle = tracker.action("evt-1", ActionAttributes::new("signup"));
		assert!(handle.created().await.is_none());
		assert_eq!(transport.total(), 1);
	}

	#[tokio::test]
	async fn failed_action_is_not_delivered() {
		let transport = Arc::new(MockTransport::new());
		transport.set_should_fail(true);
		let tracker = tracker(transport.clone(), environment());

		assert!(tracker
			.action("evt-1", ActionAttributes::new("signup"))
			.created()
			.await
			.is_none());
	}

	#[tokio::test]
	async fn update_action_sends_once() {
		let transport = Arc::new(MockTransport::new());
		let tracker = tracker(transport.clone(), environment());

		tracker.update_action("act-1", ActionAttributes::new("signup").with_details("plan=pro"));
		for _ in 0..3 {
			tokio::task::yield_now().await;
		}

		let requests = transport.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].operation, Operation::UpdateAction);
		assert_eq!(requests[0].variables["actionId"], "act-1");
		assert_eq!(requests[0].variables["input"]["details"], "plan=pro");
	}

	#[tokio::test]
	async fn update_action_with_sentinel_sends_nothing() {
		let transport = Arc::new(MockTransport::new());
		let tracker = tracker(transport.clone(), environment());

		tracker.update_action(FAKE_ID, ActionAttributes::new("signup"));
		for _ in 0..3 {
			tokio::task::yield_now().await;
		}
		assert_eq!(transport.total(), 0);
	}
}
