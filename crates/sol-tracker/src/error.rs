// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the tracker SDK.
//!
//! Request failures never reach callers of the tracking methods. They are
//! produced by the transport, logged, and dropped there.

use sol_tracker_core::CoreError;
use thiserror::Error;

/// Tracker SDK errors.
#[derive(Debug, Error)]
pub enum TrackerError {
	/// No environment was supplied to the builder.
	#[error("an environment is required to build a tracker")]
	MissingEnvironment,

	/// The heartbeat period must be longer than zero.
	#[error("heartbeat interval must be non-zero")]
	InvalidHeartbeatInterval,

	/// The tracker was built outside of a Tokio runtime.
	#[error("a Tokio runtime is required to run the tracker")]
	NoRuntime,

	/// Options supplied by the page could not be parsed.
	#[error("invalid tracker options: {0}")]
	InvalidOptions(#[from] CoreError),

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Server returned a non-success status.
	#[error("server error ({status}): {message}")]
	ServerError { status: u16, message: String },

	/// Server answered with a GraphQL error list.
	#[error("GraphQL error: {0}")]
	GraphqlError(String),

	/// Response did not have the expected shape.
	#[error("unexpected response: {0}")]
	UnexpectedResponse(String),

	/// Serialization error.
	#[error("serialization error: {0}")]
	SerializationError(#[from] serde_json::Error),
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
