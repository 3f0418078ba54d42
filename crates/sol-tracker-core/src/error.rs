// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the tracker core.

use thiserror::Error;

/// Errors that can occur while interpreting tracker configuration.
#[derive(Debug, Error)]
pub enum CoreError {
	/// Options text was not valid JSON.
	#[error("invalid options JSON: {0}")]
	InvalidOptionsJson(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
