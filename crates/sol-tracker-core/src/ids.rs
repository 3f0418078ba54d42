// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identifier newtypes.
//!
//! Ids are issued by the server (records, actions) or chosen by the site
//! operator (domains, events) and are never validated client side.

use serde::{Deserialize, Serialize};

use crate::classify::is_fake_id;

macro_rules! string_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			pub fn new(id: impl Into<String>) -> Self {
				Self(id.into())
			}

			#[must_use]
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(s: &str) -> Self {
				Self(s.to_string())
			}
		}

		impl From<String> for $name {
			fn from(s: String) -> Self {
				Self(s)
			}
		}
	};
}

string_id!(
	/// Identifier of the tracked site.
	DomainId
);

string_id!(
	/// Identifier of an event definition that actions are recorded against.
	EventId
);

string_id!(
	/// Server-issued identifier of a visit record.
	RecordId
);

string_id!(
	/// Server-issued identifier of a single action.
	ActionId
);

impl RecordId {
	/// Returns true if the server marked this visitor as ignored.
	#[must_use]
	pub fn is_fake(&self) -> bool {
		is_fake_id(&self.0)
	}
}

impl ActionId {
	/// Returns true if the server marked this visitor as ignored.
	#[must_use]
	pub fn is_fake(&self) -> bool {
		is_fake_id(&self.0)
	}
}
