// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Sol visit tracker.
//!
//! This crate holds everything that is pure: option validation, the
//! environment classification predicates, attribute records, and the GraphQL
//! request bodies exchanged with the Sol server. Nothing here performs I/O.

pub mod attributes;
pub mod classify;
pub mod error;
pub mod ids;
pub mod options;
pub mod request;

pub use attributes::{ActionAttributes, Attributes, DetailedAttributes, PlatformInfo};
pub use classify::{
	ignore_reason, is_bot, is_fake_id, is_in_background, is_localhost, IgnoreReason,
	VisibilityState, FAKE_ID,
};
pub use error::{CoreError, Result};
pub use ids::{ActionId, DomainId, EventId, RecordId};
pub use options::TrackerOptions;
pub use request::{CreatedPayload, GraphqlError, GraphqlRequest, GraphqlResponse, Operation};
