// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Visit session state and the heartbeat loop.
//!
//! A session moves `Idle -> Pending -> Active -> Stopped`, or ends in
//! `Ignored` when the server hands back the sentinel id. Only an `Active`
//! session owns a heartbeat task, and it owns at most one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sol_tracker_core::{GraphqlRequest, RecordId};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::environment::Environment;
use crate::transport::Transport;

/// Period between two heartbeats of an active session.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Lifecycle state of a visit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
	/// Nothing sent yet.
	#[default]
	Idle,
	/// Create request in flight.
	Pending,
	/// Record id known, heartbeat running.
	Active,
	/// Heartbeat cancelled or the create request failed.
	Stopped,
	/// Server asked to ignore this visitor.
	Ignored,
}

impl std::fmt::Display for SessionStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SessionStatus::Idle => write!(f, "idle"),
			SessionStatus::Pending => write!(f, "pending"),
			SessionStatus::Active => write!(f, "active"),
			SessionStatus::Stopped => write!(f, "stopped"),
			SessionStatus::Ignored => write!(f, "ignored"),
		}
	}
}

/// Mutable state of one session.
#[derive(Debug, Default)]
pub struct SessionState {
	pub status: SessionStatus,
	pub record_id: Option<RecordId>,
	heartbeat: Option<JoinHandle<()>>,
}

/// Everything a heartbeat needs besides the session itself.
#[derive(Clone)]
pub(crate) struct HeartbeatContext {
	pub transport: Arc<dyn Transport>,
	pub environment: Arc<dyn Environment>,
	pub interval: Duration,
	pub runtime: Handle,
}

/// A session shared between its handle and its heartbeat task.
#[derive(Debug, Default)]
pub(crate) struct Session {
	state: Mutex<SessionState>,
	stopped: AtomicBool,
}

impl Session {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// A session that will never send anything.
	pub fn ignored() -> Arc<Self> {
		let session = Self::default();
		session.state().status = SessionStatus::Ignored;
		Arc::new(session)
	}

	fn state(&self) -> MutexGuard<'_, SessionState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn status(&self) -> SessionStatus {
		self.state().status
	}

	pub fn record_id(&self) -> Option<RecordId> {
		self.state().record_id.clone()
	}

	#[cfg(test)]
	pub fn has_heartbeat(&self) -> bool {
		self.state().heartbeat.is_some()
	}

	/// Requests cancellation. Takes effect at the next tick.
	pub fn stop(&self) {
		self.stopped.store(true, Ordering::SeqCst);
	}

	pub fn is_stopped(&self) -> bool {
		self.stopped.load(Ordering::SeqCst)
	}

	pub fn mark_pending(&self) {
		let mut state = self.state();
		if state.status == SessionStatus::Idle {
			state.status = SessionStatus::Pending;
		}
	}

	/// Ends a session whose create request produced no usable record.
	pub fn abandon(&self) {
		let mut state = self.state();
		if state.status == SessionStatus::Pending {
			state.status = SessionStatus::Stopped;
		}
	}

	/// Moves the session onto `record_id` and starts its heartbeat.
	///
	/// The sentinel id leads to `Ignored` without a heartbeat.
	pub fn establish(
		self: &Arc<Self>,
		record_id: RecordId,
		context: HeartbeatContext,
	) -> SessionStatus {
		let mut state = self.state();
		if matches!(
			state.status,
			SessionStatus::Active | SessionStatus::Stopped | SessionStatus::Ignored
		) {
			return state.status;
		}

		if record_id.is_fake() {
			warn!("Visitor ignored by the server, this looks like a visit to your own site");
			state.status = SessionStatus::Ignored;
			state.record_id = Some(record_id);
			return state.status;
		}

		info!(record_id = %record_id, interval_secs = context.interval.as_secs(), "Session active");

		let runtime = context.runtime.clone();
		let heartbeat = runtime.spawn(run_heartbeat(Arc::clone(self), record_id.clone(), context));
		state.status = SessionStatus::Active;
		state.record_id = Some(record_id);
		state.heartbeat = Some(heartbeat);
		state.status
	}

	fn finish(&self) {
		let mut state = self.state();
		state.status = SessionStatus::Stopped;
		state.heartbeat = None;
	}
}

async fn run_heartbeat(session: Arc<Session>, record_id: RecordId, context: HeartbeatContext) {
	let mut ticker = tokio::time::interval_at(Instant::now() + context.interval, context.interval);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

	loop {
		ticker.tick().await;

		if session.is_stopped() {
			session.finish();
			debug!(record_id = %record_id, "Heartbeat stopped");
			break;
		}

		if context.environment.is_in_background() {
			debug!(record_id = %record_id, "Page hidden, skipping heartbeat");
			continue;
		}

		// Sends are not awaited here, so a slow response never delays the
		// next tick and two updates may overlap.
		let transport = Arc::clone(&context.transport);
		let request = GraphqlRequest::update_record(&record_id);
		context.runtime.spawn(async move {
			transport.send(request).await;
		});
	}
}

/// Handle to a tracked visit.
///
/// Dropping the handle does not stop the heartbeat; call [`RecordHandle::stop`].
#[derive(Debug)]
pub struct RecordHandle {
	session: Arc<Session>,
	created: Option<oneshot::Receiver<RecordId>>,
}

impl RecordHandle {
	pub(crate) fn new(session: Arc<Session>, created: Option<oneshot::Receiver<RecordId>>) -> Self {
		Self { session, created }
	}

	/// A handle that does nothing.
	pub(crate) fn inert() -> Self {
		Self::new(Session::ignored(), None)
	}

	/// Stops heartbeats for this visit. Calling it more than once is harmless.
	///
	/// A tick that is already running still completes.
	pub fn stop(&self) {
		self.session.stop();
	}

	pub fn status(&self) -> SessionStatus {
		self.session.status()
	}

	/// The record id once the server has issued one.
	pub fn record_id(&self) -> Option<RecordId> {
		self.session.record_id()
	}

	/// Waits for the server to create the record.
	///
	/// Resolves to `None` if creation failed or the visitor is ignored.
	pub async fn created(&mut self) -> Option<RecordId> {
		match self.created.take() {
			Some(receiver) => receiver.await.ok(),
			None => self.record_id().filter(|id| !id.is_fake()),
		}
	}

	#[cfg(test)]
	pub(crate) fn session(&self) -> &Arc<Session> {
		&self.session
	}
}
