// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use sol_tracker_core::{GraphqlRequest, Operation};

use crate::transport::Transport;

pub(crate) const DESKTOP_UA: &str =
	"Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Records every request and answers like a healthy server.
pub(crate) struct MockTransport {
	requests: Mutex<Vec<GraphqlRequest>>,
	record_id: String,
	action_id: String,
	should_fail: AtomicBool,
}

impl MockTransport {
	pub fn new() -> Self {
		Self::with_ids("rec-1", "act-1")
	}

	pub fn with_ids(record_id: &str, action_id: &str) -> Self {
		Self {
			requests: Mutex::new(Vec::new()),
			record_id: record_id.to_string(),
			action_id: action_id.to_string(),
			should_fail: AtomicBool::new(false),
		}
	}

	pub fn set_should_fail(&self, fail: bool) {
		self.should_fail.store(fail, Ordering::SeqCst);
	}

	pub fn requests(&self) -> Vec<GraphqlRequest> {
		self.requests.lock().unwrap().clone()
	}

	pub fn count(&self, operation: Operation) -> usize {
		self.requests
			.lock()
			.unwrap()
			.iter()
			.filter(|r| r.operation == operation)
			.count()
	}

	pub fn total(&self) -> usize {
		self.requests.lock().unwrap().len()
	}
}

#[async_trait]
impl Transport for MockTransport {
	async fn send(&self, request: GraphqlRequest) -> Option<Value> {
		let operation = request.operation;
		self.requests.lock().unwrap().push(request);

		if self.should_fail.load(Ordering::SeqCst) {
			return None;
		}

		Some(match operation {
			Operation::CreateRecord => {
				json!({ "data": { "createRecord": { "payload": { "id": self.record_id } } } })
			}
			Operation::UpdateRecord => json!({ "data": { "updateRecord": { "success": true } } }),
			Operation::CreateAction => {
				json!({ "data": { "createAction": { "payload": { "id": self.action_id } } } })
			}
			Operation::UpdateAction => json!({ "data": { "updateAction": { "success": true } } }),
		})
	}
}
