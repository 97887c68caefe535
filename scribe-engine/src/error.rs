// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Error taxonomy for encoder, corpus and runtime construction.
//!
//! Every variant is raised at construction time and surfaces directly to the
//! caller. Out-of-range input *values* are never errors: scalar values are
//! clamped and unknown letters map to the reserved bucket.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribeError {
    /// An encoder, corpus or runtime configuration invariant is violated.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A corpus or configuration file could not be opened or read.
    #[error("cannot open {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The corpus yielded zero symbols.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// A collaborator required by the runtime was never supplied.
    #[error("missing dependency: {0}")]
    NullDependency(&'static str),
}

pub type Result<T> = std::result::Result<T, ScribeError>;

impl ScribeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
