// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

//! Multiplayer collaboration-data assembly.
//!
//! Collaboration payloads arrive and depart as opaque byte blobs. When the
//! bytes trickle in through a stream, [`CollaborationDataBuilder`] accumulates
//! them chunk by chunk into a single native allocation; when the whole blob is
//! already in hand, [`CollaborationData::from_bytes`] is the direct path.

mod builder;
mod data;

pub use builder::CollaborationDataBuilder;
pub use data::CollaborationData;
