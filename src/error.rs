// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by launchsniff.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error with no further path context.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// I/O error tied to a specific path, for better diagnostics.
    #[error("{0}: {1}")]
    IoWithPath(PathBuf, std::io::Error),
    /// Directory walking error.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
    /// Zip archive error.
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    /// Object file parsing error (PE/ELF/Mach-O).
    #[error(transparent)]
    Goblin(#[from] goblin::error::Error),
    /// Regex compilation error.
    #[error(transparent)]
    Regex(#[from] regex::Error),
    /// Relativizing a walked path against the tree root failed.
    #[error(transparent)]
    StripPrefix(#[from] std::path::StripPrefixError),
    /// The requested root is not a directory.
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    /// The requested root contains no filesystem entries at all (after the
    /// default filter, if any).
    #[error("directory tree is empty")]
    EmptyTree,
}

/// Convenient type alias of the Result type for launchsniff.
pub type Result<T> = std::result::Result<T, Error>;
