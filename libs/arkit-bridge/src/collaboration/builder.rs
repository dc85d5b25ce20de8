// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

use std::hash::{Hash, Hasher};

use arkit_bridge_native_abi::MutableDataHandle;

use crate::collaboration::CollaborationData;
use crate::error::{ArkitBridgeError, Result};
use crate::{native, session};

/// Incrementally assembles a collaboration payload from serialized bytes.
///
/// Useful when the payload arrives through a stream; if all the bytes are
/// already in hand, use [`CollaborationData::from_bytes`] instead.
///
/// The builder owns one native allocation. The first successful append
/// materializes it sized to that chunk; later appends grow it in place, so the
/// accumulated bytes are always the appends in call order. Appending after
/// [`dispose`](Self::dispose) re-arms the builder with a fresh allocation
/// rather than erroring.
///
/// The backing allocation is a native resource, not garbage-collected memory:
/// it is released when the builder is dropped, or earlier via `dispose`. A
/// single builder is single-owner (`&mut self` throughout), but independent
/// builders share no state and can live on different threads.
pub struct CollaborationDataBuilder {
    data: MutableDataHandle,
}

impl CollaborationDataBuilder {
    /// Creates a builder with no backing allocation. Nothing is allocated
    /// until the first append.
    pub const fn new() -> Self {
        Self {
            data: MutableDataHandle::null(),
        }
    }

    /// Whether the builder holds a native allocation. `true` after any
    /// successful append (including an empty one) until `dispose`.
    pub fn has_data(&self) -> bool {
        !self.data.is_null()
    }

    /// Total bytes accumulated. Zero before the first append and after
    /// `dispose`.
    pub fn len(&self) -> usize {
        if self.data.is_null() {
            0
        } else {
            unsafe { native::mutable_data_length(self.data) }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends all of `bytes` to the accumulated data.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        unsafe { self.append_unchecked(bytes.as_ptr(), bytes.len()) };
        Ok(())
    }

    /// Appends `size` bytes of `bytes` starting at `offset`.
    ///
    /// Fails with [`ArkitBridgeError::InvalidArgument`] when the range
    /// `offset..offset + size` does not lie within `bytes`; a rejected call
    /// leaves the accumulated data untouched.
    pub fn append_range(&mut self, bytes: &[u8], offset: usize, size: usize) -> Result<()> {
        let end = offset.checked_add(size).ok_or_else(|| {
            ArkitBridgeError::InvalidArgument(format!(
                "offset {offset} + size {size} overflows"
            ))
        })?;
        if end > bytes.len() {
            return Err(ArkitBridgeError::InvalidArgument(format!(
                "reading {size} bytes starting at offset {offset} would run past the end of the \
                 source (source length = {})",
                bytes.len()
            )));
        }

        unsafe { self.append_unchecked(bytes.as_ptr().add(offset), size) };
        Ok(())
    }

    /// Appends `len` bytes from an externally-owned region.
    ///
    /// Fails with [`ArkitBridgeError::NullSource`] when `ptr` is null.
    ///
    /// # Safety
    ///
    /// `ptr` must point to at least `len` readable bytes for the duration of
    /// the call.
    pub unsafe fn append_raw(&mut self, ptr: *const u8, len: usize) -> Result<()> {
        if ptr.is_null() {
            return Err(ArkitBridgeError::NullSource);
        }
        unsafe { self.append_unchecked(ptr, len) };
        Ok(())
    }

    /// Bounds already checked by the caller. Materializes the allocation on
    /// first use, extends it afterwards.
    unsafe fn append_unchecked(&mut self, ptr: *const u8, len: usize) {
        if self.data.is_null() {
            self.data = unsafe { native::mutable_data_create(ptr, len) };
        } else {
            unsafe { native::mutable_data_append(self.data, ptr, len) };
        }
    }

    /// Converts the accumulated bytes into a [`CollaborationData`].
    ///
    /// The payload takes an independent copy of the bytes: this builder is
    /// not consumed, keeps its allocation, and must still be disposed; the
    /// returned payload is released separately, in any order.
    ///
    /// Fails with [`ArkitBridgeError::NotSupported`] when this OS version
    /// does not support collaboration (check
    /// [`session::collaboration_supported`] first) and with
    /// [`ArkitBridgeError::InvalidOperation`] when nothing has been appended.
    pub fn to_collaboration_data(&self) -> Result<CollaborationData> {
        if !session::collaboration_supported() {
            return Err(ArkitBridgeError::NotSupported(
                "collaboration data is not supported by this OS version".into(),
            ));
        }
        if !self.has_data() {
            return Err(ArkitBridgeError::InvalidOperation(
                "no data to convert to collaboration data".into(),
            ));
        }
        Ok(unsafe { CollaborationData::from_mutable(self.data) })
    }

    /// Releases the backing allocation. Safe to call on every exit path:
    /// calling it again (or dropping afterwards) is a no-op, and a later
    /// append re-arms the builder as if newly constructed.
    pub fn dispose(&mut self) {
        if !self.data.is_null() {
            unsafe { native::mutable_data_dispose(self.data) };
            self.data = MutableDataHandle::null();
        }
    }
}

impl Drop for CollaborationDataBuilder {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Default for CollaborationDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Identity of the native allocation, not byte contents: two builders holding
// equal bytes in different allocations are different resources.
impl PartialEq for CollaborationDataBuilder {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for CollaborationDataBuilder {}

impl Hash for CollaborationDataBuilder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

impl std::fmt::Debug for CollaborationDataBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollaborationDataBuilder")
            .field("has_data", &self.has_data())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builder_is_empty() {
        let builder = CollaborationDataBuilder::new();
        assert!(!builder.has_data());
        assert_eq!(builder.len(), 0);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut builder = CollaborationDataBuilder::new();
        builder.append(&[0x01, 0x02]).unwrap();
        builder.append(&[0x03]).unwrap();
        builder.append(&[]).unwrap();
        assert!(builder.has_data());
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn test_empty_append_materializes() {
        let mut builder = CollaborationDataBuilder::new();
        builder.append(&[]).unwrap();
        assert!(builder.has_data());
        assert_eq!(builder.len(), 0);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_append_range() {
        let mut builder = CollaborationDataBuilder::new();
        builder
            .append_range(&[0xAA, 0xBB, 0xCC, 0xDD], 1, 2)
            .unwrap();
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_append_range_rejects_out_of_bounds() {
        let mut builder = CollaborationDataBuilder::new();
        let source = [0u8; 6];

        let err = builder.append_range(&source, 5, 3).unwrap_err();
        assert!(matches!(err, ArkitBridgeError::InvalidArgument(_)));
        // A rejected call leaves the builder untouched.
        assert!(!builder.has_data());
        assert_eq!(builder.len(), 0);
    }

    #[test]
    fn test_append_range_rejects_overflow() {
        let mut builder = CollaborationDataBuilder::new();
        let err = builder
            .append_range(&[0u8; 4], usize::MAX, 2)
            .unwrap_err();
        assert!(matches!(err, ArkitBridgeError::InvalidArgument(_)));
        assert!(!builder.has_data());
    }

    #[test]
    fn test_append_range_rejected_after_data_keeps_length() {
        let mut builder = CollaborationDataBuilder::new();
        builder.append(&[1, 2, 3]).unwrap();
        assert!(builder.append_range(&[0u8; 2], 1, 4).is_err());
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn test_append_raw_rejects_null() {
        let mut builder = CollaborationDataBuilder::new();
        let err = unsafe { builder.append_raw(std::ptr::null(), 4) }.unwrap_err();
        assert!(matches!(err, ArkitBridgeError::NullSource));
        assert!(!builder.has_data());
    }

    #[test]
    fn test_append_raw() {
        let source = [9u8, 8, 7];
        let mut builder = CollaborationDataBuilder::new();
        unsafe { builder.append_raw(source.as_ptr(), source.len()) }.unwrap();
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut builder = CollaborationDataBuilder::new();
        builder.append(&[1, 2, 3]).unwrap();

        builder.dispose();
        assert!(!builder.has_data());
        assert_eq!(builder.len(), 0);

        // Second dispose is a no-op, not an error.
        builder.dispose();
        assert!(!builder.has_data());
    }

    #[test]
    fn test_rearm_after_dispose() {
        let mut builder = CollaborationDataBuilder::new();
        builder.append(&[1, 2, 3]).unwrap();
        builder.dispose();

        builder.append(&[4, 5]).unwrap();
        assert!(builder.has_data());
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_equality_is_allocation_identity() {
        let mut a = CollaborationDataBuilder::new();
        let mut b = CollaborationDataBuilder::new();
        a.append(&[1, 2]).unwrap();
        b.append(&[1, 2]).unwrap();

        // Same bytes, different allocations: not interchangeable resources.
        assert_ne!(a, b);

        // Two never-armed builders both hold the null handle.
        assert_eq!(
            CollaborationDataBuilder::new(),
            CollaborationDataBuilder::new()
        );
    }

    #[test]
    fn test_debug_reports_accumulation_state() {
        let mut builder = CollaborationDataBuilder::new();
        assert_eq!(
            format!("{builder:?}"),
            "CollaborationDataBuilder { has_data: false, len: 0 }"
        );
        builder.append(&[1, 2, 3]).unwrap();
        assert_eq!(
            format!("{builder:?}"),
            "CollaborationDataBuilder { has_data: true, len: 3 }"
        );
    }

    #[test]
    fn test_independent_builders_on_different_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let mut builder = CollaborationDataBuilder::new();
                    for _ in 0..64 {
                        builder.append(&[i as u8; 16]).unwrap();
                    }
                    assert_eq!(builder.len(), 64 * 16);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
