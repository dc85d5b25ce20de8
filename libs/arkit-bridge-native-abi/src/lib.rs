// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

//! ABI-stable types shared between `arkit-bridge` and the native bridge library.
//!
//! Everything in this crate crosses the C ABI boundary: opaque resource handles,
//! the out-parameter structure the native layer populates for asynchronous
//! capture requests, and the fixed completion-callback signature. The native
//! side can only invoke a plain function pointer — no closures, no instance
//! methods — so the callback type here is the entire callback contract.
//!
//! Layout changes to any `#[repr(C)]` type in this crate are breaking and must
//! bump [`NATIVE_ABI_VERSION`].

use core::ffi::c_void;

/// Current native ABI version. The Rust side and the native library must match
/// this exactly.
///
/// Increment when making breaking changes to any type in this crate.
pub const NATIVE_ABI_VERSION: u32 = 2;

/// Completion callback the native layer invokes exactly once per started
/// capture, on a thread of its choosing. The boolean reports whether the
/// capture succeeded; on success the previously-registered [`CpuImageCinfo`]
/// out-parameter has been populated and is valid to read.
pub type CaptureCompleteFn = extern "C" fn(was_successful: bool);

macro_rules! opaque_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        ///
        /// Equality and hashing are pointer identity: two handles are equal only
        /// if they name the same native allocation.
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub *mut c_void);

        impl $name {
            /// The null handle, naming no allocation.
            pub const fn null() -> Self {
                Self(core::ptr::null_mut())
            }

            /// Whether this handle names a live native allocation.
            pub fn is_null(&self) -> bool {
                self.0.is_null()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::null()
            }
        }

        // Safety: the handle is an address, not a reference; the owning wrapper
        // types on the Rust side enforce single-owner access. The native
        // contract permits create/append/dispose from any single thread.
        unsafe impl Send for $name {}
    };
}

opaque_handle! {
    /// Handle to a native growable byte region (the `NSMutableData` analog).
    MutableDataHandle
}

opaque_handle! {
    /// Handle to an immutable native collaboration-data payload.
    CollaborationDataHandle
}

opaque_handle! {
    /// Handle to a native CPU-side image buffer produced by a capture request.
    CpuImageHandle
}

/// Out-parameter structure for high-resolution capture requests.
///
/// The caller hands the native layer a pointer to one of these when starting a
/// capture; the native layer populates every field *before* invoking the
/// completion callback, so inside the callback (and only there, on the success
/// path) the structure is valid to read.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuImageCinfo {
    /// Handle to the image's pixel storage. Ownership transfers to the Rust
    /// side on a successful capture; release it with the image-dispose call.
    pub handle: CpuImageHandle,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of pixel planes (1 for packed formats, 2 for biplanar YCbCr).
    pub plane_count: u32,
    /// Pixel format tag. Values mirror the native format enumeration.
    pub format: i32,
    /// Capture timestamp in seconds of native session time.
    pub timestamp: f64,
}

impl CpuImageCinfo {
    /// An all-zero structure with the null handle, for pre-registering the
    /// out-parameter before the native layer populates it.
    pub const fn empty() -> Self {
        Self {
            handle: CpuImageHandle::null(),
            width: 0,
            height: 0,
            plane_count: 0,
            format: 0,
            timestamp: 0.0,
        }
    }
}
