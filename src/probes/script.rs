// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! POSIX script probe: reads the shebang line.

use crate::model::{Candidate, Flavor};

/// Returns a [`Flavor::Script`] candidate for any `#!`-prefixed file. The
/// interpreter named after `#!` is not surfaced on [`Candidate`] (the data
/// model has no field for it); it only needs to exist for this to be a
/// script at all, which the `23 21` magic match already established.
pub fn sniff(bytes: &[u8], path: &str) -> crate::Result<Option<Candidate>> {
    let first_line = bytes
        .split(|&b| b == b'\n')
        .next()
        .unwrap_or(bytes);
    if !first_line.starts_with(b"#!") {
        return Ok(None);
    }
    Ok(Some(Candidate::new(path, Flavor::Script)))
}
