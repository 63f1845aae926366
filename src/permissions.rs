// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Permission fixer: adds the owner-execute bit to native/script candidates
//! that are missing it.

use crate::consumer::Consumer;
use crate::model::Flavor;
use crate::{Error, Result, Verdict};

const OWNER_EXECUTE_BIT: u32 = 0o100;
const FIXED_MODE: u32 = 0o755;

/// Options accepted by [`fix_permissions`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FixOptions {
    /// When true, report what would be fixed without touching the filesystem.
    pub dry_run: bool,
}

/// For every candidate whose flavor is [`Flavor::NativeLinux`],
/// [`Flavor::NativeMacos`], or [`Flavor::Script`], adds the owner-execute
/// bit when missing. Returns the list of paths that were (or, in dry-run
/// mode, would be) fixed. Zeros every processed candidate's `mode` field,
/// since it is no longer authoritative afterwards.
///
/// Errors propagate immediately and processing stops; paths fixed before
/// the failing one are not rolled back.
pub fn fix_permissions(
    verdict: &mut Verdict,
    options: FixOptions,
    consumer: &dyn Consumer,
) -> Result<Vec<String>> {
    let mut fixed = Vec::new();

    for candidate in &mut verdict.candidates {
        if !matches!(
            candidate.flavor,
            Flavor::NativeLinux | Flavor::NativeMacos | Flavor::Script
        ) {
            continue;
        }

        if candidate.mode & OWNER_EXECUTE_BIT == 0 {
            fixed.push(candidate.path.clone());
            if !options.dry_run {
                let full_path = format!("{}/{}", verdict.base_path, candidate.path);
                set_executable(&full_path)?;
                consumer.log(format_args!("{full_path}: added owner-execute bit"));
            } else {
                consumer.debug(format_args!("{}: would add owner-execute bit (dry run)", candidate.path));
            }
        }

        candidate.mode = 0;
    }

    Ok(fixed)
}

#[cfg(unix)]
fn set_executable(path: &str) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|e| Error::IoWithPath(path.into(), e))?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(FIXED_MODE);
    fs::set_permissions(path, permissions).map_err(|e| Error::IoWithPath(path.into(), e))
}

#[cfg(not(unix))]
fn set_executable(_path: &str) -> Result<()> {
    // Mode bits are meaningless on non-unix targets; the bookkeeping above
    // (fixed list, dry-run semantics) still applies, but there is nothing
    // to change on disk.
    Ok(())
}
