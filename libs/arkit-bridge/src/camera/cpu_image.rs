// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

use arkit_bridge_native_abi::CpuImageCinfo;

use crate::native;

/// A CPU-side image produced by a successful capture request.
///
/// Owns the native pixel storage: release it with
/// [`dispose`](Self::dispose) when done, or let drop do it. Metadata stays
/// readable after disposal; only the pixel storage is released.
pub struct CpuImage {
    cinfo: CpuImageCinfo,
}

impl CpuImage {
    pub(crate) fn from_cinfo(cinfo: CpuImageCinfo) -> Self {
        Self { cinfo }
    }

    pub fn width(&self) -> u32 {
        self.cinfo.width
    }

    pub fn height(&self) -> u32 {
        self.cinfo.height
    }

    pub fn plane_count(&self) -> u32 {
        self.cinfo.plane_count
    }

    /// Pixel format tag, mirroring the native format enumeration.
    pub fn format(&self) -> i32 {
        self.cinfo.format
    }

    /// Capture time in seconds of native session time.
    pub fn timestamp(&self) -> f64 {
        self.cinfo.timestamp
    }

    /// Whether the pixel storage is still held.
    pub fn is_valid(&self) -> bool {
        !self.cinfo.handle.is_null()
    }

    /// Releases the native pixel storage. Idempotent; drop also releases.
    pub fn dispose(&mut self) {
        if !self.cinfo.handle.is_null() {
            unsafe { native::cpu_image_dispose(self.cinfo.handle) };
            self.cinfo.handle = arkit_bridge_native_abi::CpuImageHandle::null();
        }
    }
}

impl Drop for CpuImage {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for CpuImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("plane_count", &self.plane_count())
            .field("format", &self.format())
            .field("timestamp", &self.timestamp())
            .field("valid", &self.is_valid())
            .finish()
    }
}
