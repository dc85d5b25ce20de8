// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

//! Call contract with the native ARKit bridge library.
//!
//! On iOS every function here forwards to an `extern "C"` entry point in the
//! statically-linked native library. On every other target the [`host`]
//! backend provides the identical signatures in-process — that backend is the
//! simulator/editor path, not test scaffolding, so it ships with the crate.
//!
//! All functions taking raw pointers are `unsafe`: callers guarantee the
//! pointer/length pair describes readable memory and that handles passed in
//! are live (created by this module and not yet disposed).

use arkit_bridge_native_abi::{
    CaptureCompleteFn, CollaborationDataHandle, CpuImageCinfo, CpuImageHandle, MutableDataHandle,
};

#[cfg(not(target_os = "ios"))]
pub mod host;

#[cfg(target_os = "ios")]
mod sys {
    use super::*;

    #[link(name = "ARKitBridge", kind = "static")]
    unsafe extern "C" {
        pub fn ARKitBridge_MutableData_Create(
            bytes: *const u8,
            length: usize,
        ) -> MutableDataHandle;
        pub fn ARKitBridge_MutableData_Append(
            handle: MutableDataHandle,
            bytes: *const u8,
            length: usize,
        );
        pub fn ARKitBridge_MutableData_GetLength(handle: MutableDataHandle) -> usize;
        pub fn ARKitBridge_MutableData_Dispose(handle: MutableDataHandle);

        pub fn ARKitBridge_Session_IsCollaborationSupported() -> bool;
        pub fn ARKitBridge_CollaborationData_CreateFromMutableData(
            handle: MutableDataHandle,
        ) -> CollaborationDataHandle;
        pub fn ARKitBridge_CollaborationData_CreateFromBytes(
            bytes: *const u8,
            length: usize,
        ) -> CollaborationDataHandle;
        pub fn ARKitBridge_CollaborationData_GetBytes(
            handle: CollaborationDataHandle,
        ) -> *const u8;
        pub fn ARKitBridge_CollaborationData_GetLength(handle: CollaborationDataHandle) -> usize;
        pub fn ARKitBridge_CollaborationData_Dispose(handle: CollaborationDataHandle);

        pub fn ARKitBridge_Camera_IsHighResCaptureSupported() -> bool;
        pub fn ARKitBridge_Camera_TryAcquireHighResCpuImage(
            callback: CaptureCompleteFn,
            out_cinfo: *mut CpuImageCinfo,
        );
        pub fn ARKitBridge_CpuImage_Dispose(handle: CpuImageHandle);
    }
}

/// Allocates a new native growable byte region initialized with `length`
/// bytes copied from `bytes`. A `length` of zero allocates an empty region.
pub(crate) unsafe fn mutable_data_create(bytes: *const u8, length: usize) -> MutableDataHandle {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_MutableData_Create(bytes, length)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::mutable_data_create(bytes, length)
    }
}

/// Grows the region in place, copying `length` bytes from `bytes` to the end.
pub(crate) unsafe fn mutable_data_append(
    handle: MutableDataHandle,
    bytes: *const u8,
    length: usize,
) {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_MutableData_Append(handle, bytes, length)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::mutable_data_append(handle, bytes, length)
    }
}

pub(crate) unsafe fn mutable_data_length(handle: MutableDataHandle) -> usize {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_MutableData_GetLength(handle)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::mutable_data_length(handle)
    }
}

/// Releases the region. The handle is dead afterwards; passing it to any
/// other call in this module is undefined behavior.
pub(crate) unsafe fn mutable_data_dispose(handle: MutableDataHandle) {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_MutableData_Dispose(handle)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::mutable_data_dispose(handle)
    }
}

pub(crate) fn collaboration_supported() -> bool {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_Session_IsCollaborationSupported()
    }
    #[cfg(not(target_os = "ios"))]
    {
        host::collaboration_supported()
    }
}

/// Builds an immutable collaboration-data payload from the accumulated bytes
/// of a mutable region. The payload takes an independent copy: the source
/// region stays live, still owned by its holder, and can be disposed in any
/// order relative to the returned handle.
pub(crate) unsafe fn collaboration_data_create(
    handle: MutableDataHandle,
) -> CollaborationDataHandle {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_CollaborationData_CreateFromMutableData(handle)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::collaboration_data_create(handle)
    }
}

pub(crate) unsafe fn collaboration_data_create_from_bytes(
    bytes: *const u8,
    length: usize,
) -> CollaborationDataHandle {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_CollaborationData_CreateFromBytes(bytes, length)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::collaboration_data_create_from_bytes(bytes, length)
    }
}

pub(crate) unsafe fn collaboration_data_bytes(handle: CollaborationDataHandle) -> *const u8 {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_CollaborationData_GetBytes(handle)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::collaboration_data_bytes(handle)
    }
}

pub(crate) unsafe fn collaboration_data_length(handle: CollaborationDataHandle) -> usize {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_CollaborationData_GetLength(handle)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::collaboration_data_length(handle)
    }
}

pub(crate) unsafe fn collaboration_data_dispose(handle: CollaborationDataHandle) {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_CollaborationData_Dispose(handle)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::collaboration_data_dispose(handle)
    }
}

pub(crate) fn high_res_capture_supported() -> bool {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_Camera_IsHighResCaptureSupported()
    }
    #[cfg(not(target_os = "ios"))]
    {
        host::high_res_capture_supported()
    }
}

/// Starts a high-resolution capture. Fire-and-forget: the native layer
/// populates `out_cinfo` and then invokes `callback` exactly once, on a
/// thread of its choosing. `out_cinfo` must stay valid until the callback
/// has fired.
pub(crate) unsafe fn try_acquire_high_res_cpu_image(
    callback: CaptureCompleteFn,
    out_cinfo: *mut CpuImageCinfo,
) {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_Camera_TryAcquireHighResCpuImage(callback, out_cinfo)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::try_acquire_high_res_cpu_image(callback, out_cinfo)
    }
}

pub(crate) unsafe fn cpu_image_dispose(handle: CpuImageHandle) {
    #[cfg(target_os = "ios")]
    unsafe {
        sys::ARKitBridge_CpuImage_Dispose(handle)
    }
    #[cfg(not(target_os = "ios"))]
    unsafe {
        host::cpu_image_dispose(handle)
    }
}
