// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

//! High-resolution CPU image capture.
//!
//! The platform exposes capture as "start one request, get one completion
//! callback later", with a fixed function pointer as the only callback shape
//! and at most one request in flight. [`try_acquire_high_res_cpu_image`]
//! wraps that into a promise the caller polls from its update loop.

mod cpu_image;
mod promise;

pub use cpu_image::CpuImage;
pub use promise::{
    capture_in_flight, try_acquire_high_res_cpu_image, HighResCpuImagePromise,
    HighResCpuImageResult,
};
