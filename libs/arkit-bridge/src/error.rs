// Copyright (c) 2026 ARKit Bridge contributors
// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArkitBridgeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Source buffer is null")]
    NullSource,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("Native bridge error: {0}")]
    Native(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ArkitBridgeError>;
