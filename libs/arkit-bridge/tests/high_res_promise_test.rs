// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

//! High-resolution capture promise tests.
//!
//! Runs against the host backend, driving the completion callback through
//! `host::complete_pending_capture`. Everything here is `#[serial]`: the
//! pending-request slot is process-global by design, so interleaved tests
//! would observe each other's requests.

#![cfg(not(target_os = "ios"))]

use arkit_bridge::native::host;
use arkit_bridge::{camera, try_acquire_high_res_cpu_image};
use serial_test::serial;

fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    // Resolve any request a previous (failed) test left behind before
    // resetting the backend, so the global slot starts empty.
    if host::capture_pending() {
        host::complete_pending_capture(false);
    }
    host::reset();
}

#[test]
#[serial]
fn successful_capture_resolves_with_image() {
    init();

    let mut promise = try_acquire_high_res_cpu_image();
    assert!(promise.keep_waiting());
    assert!(camera::capture_in_flight());
    assert!(host::capture_pending());

    assert!(host::complete_pending_capture(true));
    assert!(!promise.keep_waiting());
    assert!(!camera::capture_in_flight());

    let result = promise.result().unwrap();
    assert!(result.was_successful);
    let image = result.image.as_ref().unwrap();
    assert!(image.is_valid());
    assert_eq!(image.width(), 4032);
    assert_eq!(image.height(), 3024);
    assert_eq!(image.plane_count(), 2);
}

#[test]
#[serial]
fn second_request_while_pending_fails_fast() {
    init();

    let mut first = try_acquire_high_res_cpu_image();
    let mut second = try_acquire_high_res_cpu_image();

    // The second request neither queues nor blocks: it is resolved
    // immediately and unsuccessfully, while the first stays pending.
    assert!(!second.keep_waiting());
    let rejected = second.result().unwrap();
    assert!(!rejected.was_successful);
    assert!(rejected.image.is_none());
    assert!(first.keep_waiting());

    // The first request's completion is unaffected by the rejection.
    assert!(host::complete_pending_capture(true));
    let result = first.result().unwrap();
    assert!(result.was_successful);
    assert!(result.image.is_some());
}

#[test]
#[serial]
fn resolution_is_terminal_and_stable() {
    init();

    let mut promise = try_acquire_high_res_cpu_image();
    host::complete_pending_capture(true);

    let first_timestamp = promise.result().unwrap().image.as_ref().unwrap().timestamp();
    for _ in 0..3 {
        assert!(!promise.keep_waiting());
        let result = promise.result().unwrap();
        assert!(result.was_successful);
        assert_eq!(
            result.image.as_ref().unwrap().timestamp(),
            first_timestamp
        );
    }
}

#[test]
#[serial]
fn unsupported_device_resolves_immediately_without_native_call() {
    init();
    host::set_high_res_capture_supported(false);

    let mut promise = try_acquire_high_res_cpu_image();

    // No hang and no native request: the caller observes an immediate
    // unsuccessful resolution.
    assert!(!promise.keep_waiting());
    assert!(!host::capture_pending());
    assert!(!camera::capture_in_flight());

    let result = promise.result().unwrap();
    assert!(!result.was_successful);
    assert!(result.image.is_none());
}

#[test]
#[serial]
fn failed_capture_resolves_without_image() {
    init();

    let mut promise = try_acquire_high_res_cpu_image();
    assert!(host::complete_pending_capture(false));

    let result = promise.result().unwrap();
    assert!(!result.was_successful);
    assert!(result.image.is_none());
    assert!(!camera::capture_in_flight());
}

#[test]
#[serial]
fn abandoned_promise_still_clears_the_slot() {
    init();
    let live_before = host::live_allocations();

    let promise = try_acquire_high_res_cpu_image();
    drop(promise);

    // Dropping the promise abandons the result but not the native work; the
    // eventual callback must still clear the slot and leak nothing.
    assert!(camera::capture_in_flight());
    assert!(host::complete_pending_capture(true));
    assert!(!camera::capture_in_flight());
    assert_eq!(host::live_allocations(), live_before);

    // A fresh request is accepted afterwards.
    let mut next = try_acquire_high_res_cpu_image();
    host::complete_pending_capture(true);
    assert!(next.result().unwrap().was_successful);
}

#[test]
#[serial]
fn completion_without_request_is_dropped() {
    init();

    // Nothing pending on either side: the host reports no callback to fire.
    assert!(!host::complete_pending_capture(true));
    assert!(!camera::capture_in_flight());
}

#[test]
#[serial]
fn image_dispose_is_idempotent_and_keeps_metadata() {
    init();
    let live_before = host::live_allocations();

    let promise = try_acquire_high_res_cpu_image();
    host::complete_pending_capture(true);

    let mut image = promise.into_result().unwrap().image.unwrap();
    assert!(image.is_valid());

    image.dispose();
    assert!(!image.is_valid());
    assert_eq!(host::live_allocations(), live_before);

    // Second dispose is a no-op; metadata stays readable.
    image.dispose();
    assert_eq!(image.width(), 4032);
    assert_eq!(image.height(), 3024);
}

#[test]
#[serial]
fn capture_cycle_leaks_nothing() {
    init();
    let live_before = host::live_allocations();

    for _ in 0..8 {
        let promise = try_acquire_high_res_cpu_image();
        host::complete_pending_capture(true);
        let mut result = promise.into_result().unwrap();
        assert!(result.was_successful);
        result.image.take().unwrap().dispose();
    }

    assert_eq!(host::live_allocations(), live_before);
}
