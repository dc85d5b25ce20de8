// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

use std::cell::UnsafeCell;

use arkit_bridge_native_abi::CpuImageCinfo;

use crate::camera::CpuImage;
use crate::promise::{PendingSlot, Promise, PromiseResolver};
use crate::{native, session};

/// A promise for a high-resolution CPU image. Poll
/// [`keep_waiting`](Promise::keep_waiting) from the update loop, then read
/// [`result`](Promise::result).
pub type HighResCpuImagePromise = Promise<HighResCpuImageResult>;

/// The outcome of a capture request.
///
/// Failure is an expected, recoverable condition (request already in flight,
/// capability absent, or the platform declined the capture), reported here
/// rather than as an error: a polling loop checks [`Self::was_successful`]
/// every tick anyway.
#[derive(Debug, Default)]
pub struct HighResCpuImageResult {
    /// If `true`, [`image`](Self::image) holds a valid image the caller is
    /// responsible for disposing. If `false`, `image` is `None`.
    pub was_successful: bool,

    /// The captured image on success.
    pub image: Option<CpuImage>,
}

/// The resolver awaiting the native completion callback, or empty when no
/// request is in flight.
///
/// The native layer can only invoke the fixed function pointer
/// [`on_capture_complete`], not an instance-bound closure, so the completion
/// path finds the promise to resolve through this slot. Only one promise at a
/// time can await a result; the native capture API has the same limitation,
/// so nothing is lost.
static PENDING: PendingSlot<PromiseResolver<HighResCpuImageResult>> = PendingSlot::new();

/// Out-parameter cell the native layer populates before firing the callback.
struct CinfoCell(UnsafeCell<CpuImageCinfo>);

// Safety: the native layer writes the cell after a request starts and before
// the completion callback fires; the Rust side reads it only from inside the
// callback, on the success path. The pending slot's lock orders the two: a
// write happens only while a resolver is installed, a read only while taking
// it out.
unsafe impl Sync for CinfoCell {}

static PENDING_CINFO: CinfoCell = CinfoCell(UnsafeCell::new(CpuImageCinfo::empty()));

/// Requests a high-resolution CPU image capture.
///
/// Never blocks and never hangs on a rejected request: when capture is
/// unsupported on this device, or a previous request has not completed yet,
/// the returned promise is already resolved with an unsuccessful result and
/// the native layer is not touched. Only one request can be in flight at a
/// time; there is no queueing and no cancellation — once started, a request
/// runs to its callback even if the promise is dropped.
pub fn try_acquire_high_res_cpu_image() -> HighResCpuImagePromise {
    if !session::high_res_capture_supported() {
        tracing::warn!(
            "high resolution CPU image capture is not supported on this device; resolving \
             request as unsuccessful"
        );
        return Promise::resolved(HighResCpuImageResult::default());
    }

    let (promise, resolver) = Promise::new();
    match PENDING.try_install(resolver) {
        Ok(()) => {
            unsafe {
                native::try_acquire_high_res_cpu_image(
                    on_capture_complete,
                    PENDING_CINFO.0.get(),
                );
            }
            promise
        }
        Err(resolver) => {
            tracing::error!(
                "a previous request for a high resolution capture hasn't completed yet; \
                 subsequent requests fail until the request in progress completes"
            );
            resolver.resolve(HighResCpuImageResult::default());
            promise
        }
    }
}

/// Fixed entry point the native layer invokes when the capture completes,
/// possibly on a platform-owned thread.
extern "C" fn on_capture_complete(was_successful: bool) {
    let Some(resolver) = PENDING.take() else {
        // Late or duplicate delivery: the managing side no longer tracks a
        // request. Nothing was constructed on our side, so dropping it leaks
        // nothing.
        tracing::warn!(
            was_successful,
            "capture completion arrived with no pending request; dropping"
        );
        return;
    };

    let result = if was_successful {
        let cinfo = unsafe { *PENDING_CINFO.0.get() };
        HighResCpuImageResult {
            was_successful: true,
            image: Some(CpuImage::from_cinfo(cinfo)),
        }
    } else {
        HighResCpuImageResult::default()
    };

    resolver.resolve(result);
}

/// Whether a capture request is currently awaiting its completion callback.
pub fn capture_in_flight() -> bool {
    PENDING.is_pending()
}
