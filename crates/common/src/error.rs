// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

// Error types for Hub Connect

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The local daemon could not be reached or answered with something
    /// unusable. Callers cannot distinguish the cause; the detail is logged
    /// at the point of failure.
    #[error("daemon unreachable")]
    Unreachable,

    /// A user-specified remote hub answered the enrollment request with
    /// something other than the expected identity. Surfaced to the user.
    #[error("{0}")]
    BadRemoteResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
