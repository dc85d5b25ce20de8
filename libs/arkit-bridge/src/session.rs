// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

//! Session-level capability queries.
//!
//! These are the capability gates callers are expected to branch on before
//! starting the corresponding operation; the operations themselves re-check
//! and fail with a tagged "unsupported" outcome rather than attempting the
//! native call.

use crate::native;

/// Whether this OS version supports collaborative sessions and therefore
/// [`crate::CollaborationData`] payloads.
pub fn collaboration_supported() -> bool {
    native::collaboration_supported()
}

/// Whether this device and OS version support high-resolution CPU image
/// capture.
pub fn high_res_capture_supported() -> bool {
    native::high_res_capture_supported()
}
