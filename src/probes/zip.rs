// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! ZIP probe: inspects the central directory for conventional Jar or Love
//! bundle markers, grounded on `zip::ZipArchive`.

use std::io::Cursor;

use zip::ZipArchive;

use crate::model::{Candidate, Flavor};

/// Inspects `bytes` (the full contents of a ZIP-looking file) for a Jar's
/// conventional manifest entry or a Love bundle's root `conf.lua`. Returns
/// `Ok(None)` for an ordinary ZIP that is neither.
pub fn sniff(bytes: &[u8], path: &str) -> crate::Result<Option<Candidate>> {
    let cursor = Cursor::new(bytes);
    let mut archive = match ZipArchive::new(cursor) {
        Ok(archive) => archive,
        Err(_) => return Ok(None),
    };

    let mut has_manifest = false;
    let mut has_root_conf_lua = false;
    for i in 0..archive.len() {
        let file = match archive.by_index(i) {
            Ok(file) => file,
            Err(_) => continue,
        };
        let name = file.name();
        if name.eq_ignore_ascii_case("META-INF/MANIFEST.MF") {
            has_manifest = true;
        }
        if name.eq_ignore_ascii_case("conf.lua") {
            has_root_conf_lua = true;
        }
    }

    if has_manifest {
        Ok(Some(Candidate::new(path, Flavor::Jar)))
    } else if has_root_conf_lua {
        Ok(Some(Candidate::new(path, Flavor::Love)))
    } else {
        Ok(None)
    }
}
