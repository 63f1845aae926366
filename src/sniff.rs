// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The magic sniffer: given a seekable byte source, recognizes executable
//! file formats by path convention and leading bytes, dispatching to the
//! format probes in [`crate::probes`].

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::model::{Candidate, Flavor};
use crate::probes::{elf, love, pe, script, spellbook, zip};
use crate::Result;

const MACHO_THIN_MAGICS: [[u8; 4]; 2] = [[0xCE, 0xFA, 0xED, 0xFE], [0xCF, 0xFA, 0xED, 0xFE]];
const MACHO_FAT_OR_CLASS_MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];
const ELF_MAGIC: [u8; 4] = [0x7F, 0x45, 0x4C, 0x46];
const SHEBANG_MAGIC: [u8; 2] = [0x23, 0x21];
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Sniffs a single file, given a seekable reader positioned anywhere (it is
/// rewound before use), its `name` (used for extension/basename checks and
/// as the default candidate path), and its `size` in bytes.
///
/// Returns `Ok(None)` when the file is not a launch candidate. Extension
/// blacklisting is the caller's responsibility (see [`crate::ext`]) —
/// `sniff` itself never consults the blacklist, since `index.html` and
/// `.app` bundle detection both need to bypass it.
pub fn sniff<R: Read + Seek>(mut reader: R, name: &str, size: u64) -> Result<Option<Candidate>> {
    let mut candidate = match do_sniff(&mut reader, name)? {
        Some(c) => c,
        None => return Ok(None),
    };
    if candidate.path.is_empty() {
        candidate.path = name.to_string();
    }
    candidate.size = size;
    candidate.depth = crate::model::segment_count(&candidate.path);
    Ok(Some(candidate))
}

fn do_sniff<R: Read + Seek>(reader: &mut R, path: &str) -> Result<Option<Candidate>> {
    let lower = path.to_lowercase();
    let basename = Path::new(&lower)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    if basename == "index.html" {
        return Ok(Some(Candidate::new(path, Flavor::Html)));
    }

    if basename == "conf.lua" {
        let dir = Path::new(path)
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        return Ok(Some(love::probe_dir(&dir)));
    }

    if lower.ends_with(".love") {
        return Ok(Some(Candidate::new(path, Flavor::Love)));
    }

    if lower.ends_with(".exe") {
        let bytes = read_all(reader)?;
        if let Some(candidate) = pe::sniff(&bytes, path)? {
            return Ok(Some(candidate));
        }
        // Not actually a PE: a clean miss, fall through to the magic table
        // below (some `.exe` files found in the wild are renamed scripts
        // or archives).
    }

    if lower.ends_with(".bat") || lower.ends_with(".cmd") {
        return Ok(Some(Candidate::new(path, Flavor::ScriptWindows)));
    }

    let bytes = read_all(reader)?;
    if bytes.len() < 8 {
        return Ok(None);
    }
    let head: [u8; 8] = bytes[..8].try_into().expect("checked length above");

    if MACHO_THIN_MAGICS.iter().any(|m| head[..4] == *m) {
        return Ok(Some(Candidate::new(path, Flavor::NativeMacos)));
    }

    if head[..4] == MACHO_FAT_OR_CLASS_MAGIC {
        let spell = spellbook::identify(&bytes);
        if spell.contains("compiled Java class data,") {
            return Ok(None);
        }
        return Ok(Some(Candidate::new(path, Flavor::NativeMacos).with_spell(spell)));
    }

    if head[..4] == ELF_MAGIC {
        return elf::sniff(&bytes, path);
    }

    if head[..2] == SHEBANG_MAGIC {
        return script::sniff(&bytes, path);
    }

    if head == OLE_MAGIC {
        return Ok(Some(Candidate::new(path, Flavor::Msi)));
    }

    if head[..4] == ZIP_MAGIC {
        return zip::sniff(&bytes, path);
    }

    Ok(None)
}

fn read_all<R: Read + Seek>(reader: &mut R) -> Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}
