// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery of GraphQL requests to the Sol server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use sol_common_http::Credentials;
use sol_tracker_core::{GraphqlRequest, GraphqlResponse};
use tracing::{debug, error};

use crate::error::{Result, TrackerError};

const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Sends requests to the server.
///
/// Implementations swallow every failure: the response body is returned only
/// for a clean answer, and anything else is logged and turned into `None`.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Issues exactly one request.
	async fn send(&self, request: GraphqlRequest) -> Option<Value>;
}

/// Builds the GraphQL endpoint for a server base URL.
///
/// Exactly one slash separates the base URL from `api`.
pub fn endpoint(server: &str) -> String {
	format!("{}/api", server.trim_end_matches('/'))
}

/// [`Transport`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	endpoint: String,
	http_client: Client,
	credentials_included: bool,
}

impl HttpTransport {
	/// Creates a transport for `server` with the given credential policy.
	pub fn new(
		server: &str,
		credentials: &Credentials,
		request_timeout: Option<Duration>,
	) -> Result<Self> {
		let mut builder = sol_common_http::builder_with_credentials(credentials);
		if let Some(timeout) = request_timeout {
			builder = builder.timeout(timeout);
		}
		let http_client = builder.build().map_err(TrackerError::RequestFailed)?;

		Ok(Self {
			endpoint: endpoint(server),
			http_client,
			credentials_included: credentials.is_included(),
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub fn credentials_included(&self) -> bool {
		self.credentials_included
	}

	/// Issues the request and classifies the response.
	pub async fn execute(&self, request: &GraphqlRequest) -> Result<Value> {
		let body = serde_json::to_vec(request)?;

		debug!(
			endpoint = %self.endpoint,
			operation = %request.operation,
			credentials = self.credentials_included,
			"Sending Sol request"
		);

		let response = self
			.http_client
			.post(&self.endpoint)
			.header(CONTENT_TYPE, JSON_CONTENT_TYPE)
			.body(body)
			.send()
			.await?;

		if !response.status().is_success() {
			let status = response.status().as_u16();
			let message = response.text().await.unwrap_or_default();
			return Err(TrackerError::ServerError { status, message });
		}

		let body: Value = response.json().await?;
		check_graphql_errors(&body)?;
		Ok(body)
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, request: GraphqlRequest) -> Option<Value> {
		match self.execute(&request).await {
			Ok(body) => Some(body),
			Err(e) => {
				error!(
					endpoint = %self.endpoint,
					operation = %request.operation,
					error = %e,
					"Sol request failed"
				);
				None
			}
		}
	}
}

fn check_graphql_errors(body: &Value) -> Result<()> {
	if !body.is_object() {
		return Err(TrackerError::UnexpectedResponse(
			"response body is not a JSON object".to_string(),
		));
	}

	let envelope: GraphqlResponse = serde_json::from_value(body.clone())?;
	match envelope.errors {
		Some(errors) if !errors.is_empty() => Err(TrackerError::GraphqlError(
			errors.into_iter().next().map(|e| e.message).unwrap_or_default(),
		)),
		_ => Ok(()),
	}
}
