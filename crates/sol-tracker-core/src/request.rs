// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GraphQL request bodies and response shapes for the Sol API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::attributes::{ActionAttributes, Attributes};
use crate::ids::{ActionId, DomainId, EventId, RecordId};

const CREATE_RECORD: &str = r#"
	mutation createRecord($domainId: ID!, $input: CreateRecordInput!) {
		createRecord(domainId: $domainId, input: $input) {
			payload {
				id
			}
		}
	}
"#;

const UPDATE_RECORD: &str = r#"
	mutation updateRecord($recordId: ID!) {
		updateRecord(id: $recordId) {
			success
		}
	}
"#;

const CREATE_ACTION: &str = r#"
	mutation createAction($eventId: ID!, $input: CreateActionInput!) {
		createAction(eventId: $eventId, input: $input) {
			payload {
				id
			}
		}
	}
"#;

const UPDATE_ACTION: &str = r#"
	mutation updateAction($actionId: ID!, $input: UpdateActionInput!) {
		updateAction(id: $actionId, input: $input) {
			success
		}
	}
"#;

/// The four server mutations the tracker uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
	CreateRecord,
	UpdateRecord,
	CreateAction,
	UpdateAction,
}

impl Operation {
	/// Name of the mutation field in the response `data` object.
	#[must_use]
	pub fn field(&self) -> &'static str {
		match self {
			Operation::CreateRecord => "createRecord",
			Operation::UpdateRecord => "updateRecord",
			Operation::CreateAction => "createAction",
			Operation::UpdateAction => "updateAction",
		}
	}
}

impl std::fmt::Display for Operation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.field())
	}
}

/// A `{query, variables}` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
	#[serde(skip)]
	pub operation: Operation,
	pub query: &'static str,
	pub variables: Value,
}

impl GraphqlRequest {
	pub fn create_record(domain_id: &DomainId, attributes: &Attributes) -> Self {
		Self {
			operation: Operation::CreateRecord,
			query: CREATE_RECORD,
			variables: json!({
				"domainId": domain_id,
				"input": attributes,
			}),
		}
	}

	pub fn update_record(record_id: &RecordId) -> Self {
		Self {
			operation: Operation::UpdateRecord,
			query: UPDATE_RECORD,
			variables: json!({ "recordId": record_id }),
		}
	}

	pub fn create_action(event_id: &EventId, attributes: &ActionAttributes) -> Self {
		Self {
			operation: Operation::CreateAction,
			query: CREATE_ACTION,
			variables: json!({
				"eventId": event_id,
				"input": attributes,
			}),
		}
	}

	pub fn update_action(action_id: &ActionId, attributes: &ActionAttributes) -> Self {
		Self {
			operation: Operation::UpdateAction,
			query: UPDATE_ACTION,
			variables: json!({
				"actionId": action_id,
				"input": attributes,
			}),
		}
	}
}

/// Response envelope returned by the GraphQL endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlResponse {
	#[serde(default)]
	pub data: Option<Value>,
	#[serde(default)]
	pub errors: Option<Vec<GraphqlError>>,
}

impl GraphqlResponse {
	/// Message of the first reported error, if the response carries any.
	#[must_use]
	pub fn first_error(&self) -> Option<&str> {
		self.errors
			.as_ref()
			.and_then(|errors| errors.first())
			.map(|error| error.message.as_str())
	}
}

/// One entry of a GraphQL `errors` list.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
	#[serde(default)]
	pub message: String,
}

/// Accessors for the `payload.id` of create mutations.
pub struct CreatedPayload;

impl CreatedPayload {
	/// Reads `data.createRecord.payload.id`.
	#[must_use]
	pub fn record_id(body: &Value) -> Option<RecordId> {
		payload_id(body, Operation::CreateRecord).map(RecordId::new)
	}

	/// Reads `data.createAction.payload.id`.
	#[must_use]
	pub fn action_id(body: &Value) -> Option<ActionId> {
		payload_id(body, Operation::CreateAction).map(ActionId::new)
	}
}

fn payload_id(body: &Value, operation: Operation) -> Option<&str> {
	body.get("data")?
		.get(operation.field())?
		.get("payload")?
		.get("id")?
		.as_str()
}
