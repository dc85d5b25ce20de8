// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

use std::hash::{Hash, Hasher};

use arkit_bridge_native_abi::{CollaborationDataHandle, MutableDataHandle};

use crate::error::{ArkitBridgeError, Result};
use crate::{native, session};

/// An immutable collaboration payload, ready to hand to the session or to
/// serialize onto the wire.
///
/// Owns its native allocation; the allocation is released on drop, or earlier
/// via [`dispose`](Self::dispose).
pub struct CollaborationData {
    handle: CollaborationDataHandle,
}

impl CollaborationData {
    /// Builds a payload from a whole byte blob in one step.
    ///
    /// Fails with [`ArkitBridgeError::NotSupported`] when this OS version does
    /// not support collaboration, and with
    /// [`ArkitBridgeError::InvalidArgument`] for an empty blob — an empty
    /// payload cannot have come from a serialized session.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if !session::collaboration_supported() {
            return Err(ArkitBridgeError::NotSupported(
                "collaboration data is not supported by this OS version".into(),
            ));
        }
        if bytes.is_empty() {
            return Err(ArkitBridgeError::InvalidArgument(
                "collaboration data cannot be built from an empty buffer".into(),
            ));
        }
        Ok(Self {
            handle: unsafe {
                native::collaboration_data_create_from_bytes(bytes.as_ptr(), bytes.len())
            },
        })
    }

    /// Builds a payload as an independent copy of a mutable region's bytes.
    /// The caller keeps ownership of the source region.
    pub(crate) unsafe fn from_mutable(source: MutableDataHandle) -> Self {
        Self {
            handle: unsafe { native::collaboration_data_create(source) },
        }
    }

    /// The payload bytes. Borrowed from the native allocation, so the slice
    /// lives as long as `self` stays undisposed.
    pub fn as_bytes(&self) -> &[u8] {
        if self.handle.is_null() {
            return &[];
        }
        let len = unsafe { native::collaboration_data_length(self.handle) };
        if len == 0 {
            return &[];
        }
        unsafe {
            std::slice::from_raw_parts(native::collaboration_data_bytes(self.handle), len)
        }
    }

    pub fn len(&self) -> usize {
        if self.handle.is_null() {
            0
        } else {
            unsafe { native::collaboration_data_length(self.handle) }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Releases the native allocation. Idempotent; drop also releases.
    pub fn dispose(&mut self) {
        if !self.handle.is_null() {
            unsafe { native::collaboration_data_dispose(self.handle) };
            self.handle = CollaborationDataHandle::null();
        }
    }
}

impl Drop for CollaborationData {
    fn drop(&mut self) {
        self.dispose();
    }
}

// Allocation identity, matching the builder's equality contract.
impl PartialEq for CollaborationData {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for CollaborationData {}

impl Hash for CollaborationData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl std::fmt::Debug for CollaborationData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollaborationData")
            .field("len", &self.len())
            .finish()
    }
}
