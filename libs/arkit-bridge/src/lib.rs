// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

//! Marshaling core for the ARKit platform bridge.
//!
//! This crate is the portable heart of the bridge: the pieces that are real
//! control flow and resource management rather than declarative FFI plumbing.
//!
//! - [`collaboration`] — incremental assembly of multiplayer collaboration
//!   data from byte chunks into one native allocation, with deterministic
//!   manual release.
//! - [`camera`] — the single-slot asynchronous promise for high-resolution
//!   CPU image capture, bridging a fixed native callback into a polling loop.
//! - [`native`] — the call contract with the native bridge library. On iOS
//!   this is a set of `extern "C"` declarations against the statically-linked
//!   library; everywhere else an in-process host backend with identical
//!   signatures stands in for it.
//!
//! The provider subsystems (anchors, planes, meshing, raycasting, ...) sit on
//! top of these primitives and are out of scope here.

pub mod camera;
pub mod collaboration;
pub mod error;
pub mod native;
pub mod promise;
pub mod session;

pub use camera::{
    try_acquire_high_res_cpu_image, CpuImage, HighResCpuImagePromise, HighResCpuImageResult,
};
pub use collaboration::{CollaborationData, CollaborationDataBuilder};
pub use error::{ArkitBridgeError, Result};
pub use promise::Promise;
