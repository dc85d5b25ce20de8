// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

//! In-process host backend for the native call contract.
//!
//! Compiled on every non-iOS target. It implements the same signatures the
//! statically-linked library exports on device, backed by heap allocations
//! behind raw handles, so the marshaling layer above behaves identically on a
//! developer machine, in the editor, and in CI.
//!
//! Capture completion is driven explicitly: the backend parks the started
//! request in a single pending slot and [`complete_pending_capture`] plays the
//! role of the platform invoking the completion callback. Capability switches
//! default to "supported" and can be flipped to exercise the unsupported
//! paths.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use arkit_bridge_native_abi::{
    CaptureCompleteFn, CollaborationDataHandle, CpuImageCinfo, CpuImageHandle, MutableDataHandle,
};
use parking_lot::Mutex;

/// Dimensions reported for host-backend captures. Matches the 4:3 sensor
/// resolution the device path reports for high-resolution frames.
const CAPTURE_WIDTH: u32 = 4032;
const CAPTURE_HEIGHT: u32 = 3024;
/// Biplanar YCbCr 4:2:0 full-range, the device capture format.
const CAPTURE_FORMAT: i32 = 1;

static COLLABORATION_SUPPORTED: AtomicBool = AtomicBool::new(true);
static HIGH_RES_CAPTURE_SUPPORTED: AtomicBool = AtomicBool::new(true);

/// Count of live host allocations (mutable regions, collaboration payloads,
/// capture images). Embedders can diff this around a scope to catch leaks.
static LIVE_ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

/// Monotonic stand-in for native session time.
static CAPTURE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

struct HostData {
    bytes: Vec<u8>,
}

struct PendingCapture {
    callback: CaptureCompleteFn,
    out_cinfo: *mut CpuImageCinfo,
}

// Safety: the out-pointer targets the process-wide cinfo cell owned by the
// camera module, which stays valid for the life of the process. The slot
// mutex orders all access to it.
unsafe impl Send for PendingCapture {}

static PENDING_CAPTURE: Mutex<Option<PendingCapture>> = Mutex::new(None);

fn into_handle(data: HostData) -> *mut core::ffi::c_void {
    LIVE_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    Box::into_raw(Box::new(data)) as *mut core::ffi::c_void
}

unsafe fn drop_handle(raw: *mut core::ffi::c_void) {
    debug_assert!(!raw.is_null());
    LIVE_ALLOCATIONS.fetch_sub(1, Ordering::Relaxed);
    drop(unsafe { Box::from_raw(raw as *mut HostData) });
}

unsafe fn collect(bytes: *const u8, length: usize) -> Vec<u8> {
    if length == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(bytes, length).to_vec() }
    }
}

pub(crate) unsafe fn mutable_data_create(bytes: *const u8, length: usize) -> MutableDataHandle {
    MutableDataHandle(into_handle(HostData {
        bytes: unsafe { collect(bytes, length) },
    }))
}

pub(crate) unsafe fn mutable_data_append(
    handle: MutableDataHandle,
    bytes: *const u8,
    length: usize,
) {
    let data = unsafe { &mut *(handle.0 as *mut HostData) };
    if length > 0 {
        data.bytes
            .extend_from_slice(unsafe { std::slice::from_raw_parts(bytes, length) });
    }
}

pub(crate) unsafe fn mutable_data_length(handle: MutableDataHandle) -> usize {
    unsafe { &*(handle.0 as *const HostData) }.bytes.len()
}

pub(crate) unsafe fn mutable_data_dispose(handle: MutableDataHandle) {
    unsafe { drop_handle(handle.0) }
}

pub(crate) fn collaboration_supported() -> bool {
    COLLABORATION_SUPPORTED.load(Ordering::Relaxed)
}

pub(crate) unsafe fn collaboration_data_create(
    handle: MutableDataHandle,
) -> CollaborationDataHandle {
    let source = unsafe { &*(handle.0 as *const HostData) };
    CollaborationDataHandle(into_handle(HostData {
        bytes: source.bytes.clone(),
    }))
}

pub(crate) unsafe fn collaboration_data_create_from_bytes(
    bytes: *const u8,
    length: usize,
) -> CollaborationDataHandle {
    CollaborationDataHandle(into_handle(HostData {
        bytes: unsafe { collect(bytes, length) },
    }))
}

pub(crate) unsafe fn collaboration_data_bytes(handle: CollaborationDataHandle) -> *const u8 {
    unsafe { &*(handle.0 as *const HostData) }.bytes.as_ptr()
}

pub(crate) unsafe fn collaboration_data_length(handle: CollaborationDataHandle) -> usize {
    unsafe { &*(handle.0 as *const HostData) }.bytes.len()
}

pub(crate) unsafe fn collaboration_data_dispose(handle: CollaborationDataHandle) {
    unsafe { drop_handle(handle.0) }
}

pub(crate) fn high_res_capture_supported() -> bool {
    HIGH_RES_CAPTURE_SUPPORTED.load(Ordering::Relaxed)
}

pub(crate) unsafe fn try_acquire_high_res_cpu_image(
    callback: CaptureCompleteFn,
    out_cinfo: *mut CpuImageCinfo,
) {
    if !high_res_capture_supported() {
        // Device behavior: an unsupported request is rejected by completing
        // immediately with failure rather than by hanging.
        callback(false);
        return;
    }

    let mut pending = PENDING_CAPTURE.lock();
    if pending.is_some() {
        tracing::warn!("host backend: capture requested while one is in flight; rejecting");
        drop(pending);
        callback(false);
        return;
    }
    *pending = Some(PendingCapture { callback, out_cinfo });
}

pub(crate) unsafe fn cpu_image_dispose(handle: CpuImageHandle) {
    unsafe { drop_handle(handle.0) }
}

/// Completes the in-flight capture, standing in for the platform firing the
/// completion callback. On success the out-structure is populated first, as
/// the device contract requires. Returns `false` if no capture was pending.
pub fn complete_pending_capture(was_successful: bool) -> bool {
    let Some(capture) = PENDING_CAPTURE.lock().take() else {
        return false;
    };

    if was_successful {
        let sequence = CAPTURE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let plane_bytes = (CAPTURE_WIDTH as usize) * (CAPTURE_HEIGHT as usize);
        let image = CpuImageHandle(into_handle(HostData {
            bytes: vec![0u8; plane_bytes + plane_bytes / 2],
        }));
        // The pending slot lock ordered this write before the callback below;
        // the camera layer only reads the cell from inside the callback.
        unsafe {
            *capture.out_cinfo = CpuImageCinfo {
                handle: image,
                width: CAPTURE_WIDTH,
                height: CAPTURE_HEIGHT,
                plane_count: 2,
                format: CAPTURE_FORMAT,
                timestamp: sequence as f64 / 60.0,
            };
        }
    }

    (capture.callback)(was_successful);
    true
}

/// Whether a started capture is waiting for [`complete_pending_capture`].
pub fn capture_pending() -> bool {
    PENDING_CAPTURE.lock().is_some()
}

/// Flips the collaboration capability switch.
pub fn set_collaboration_supported(supported: bool) {
    COLLABORATION_SUPPORTED.store(supported, Ordering::Relaxed);
}

/// Flips the high-resolution-capture capability switch.
pub fn set_high_res_capture_supported(supported: bool) {
    HIGH_RES_CAPTURE_SUPPORTED.store(supported, Ordering::Relaxed);
}

/// Count of live host allocations across all resource kinds.
pub fn live_allocations() -> usize {
    LIVE_ALLOCATIONS.load(Ordering::Relaxed)
}

/// Restores default capability switches and drops any pending capture without
/// completing it. Intended for test setup.
pub fn reset() {
    set_collaboration_supported(true);
    set_high_res_capture_supported(true);
    *PENDING_CAPTURE.lock() = None;
}
