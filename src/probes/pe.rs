// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Windows PE probe, grounded on `goblin::pe::PE` for header/subsystem
//! parsing. Installer fingerprinting and manifest inspection (assembly
//! info, elevation) fall back to scanning the raw bytes for well-known
//! markers, mirroring the magic-number style the rest of the sniffer uses,
//! since `goblin` does not expose a full Win32 resource/manifest reader.

use goblin::pe::PE;

use crate::model::{Arch, Candidate, Flavor, WindowsInfo};

/// Metadata extracted from a PE file, independent of whether it ends up
/// being surfaced as a [`Candidate`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PeInfo {
    /// Detected architecture, when recognized.
    pub arch: Option<Arch>,
    /// Windows-specific metadata as consumed by the installer-exclusion and
    /// GUI-preference filter stages.
    pub windows_info: WindowsInfo,
}

impl PeInfo {
    /// Mirrors the external PE collaborator's `RequiresElevation()` accessor.
    pub fn requires_elevation(&self) -> bool {
        self.windows_info.requires_elevation
    }
}

const IMAGE_FILE_MACHINE_I386: u16 = 0x014c;
const IMAGE_FILE_MACHINE_AMD64: u16 = 0x8664;
const IMAGE_SUBSYSTEM_WINDOWS_GUI: u16 = 2;

/// Filename fragments that make a `.exe` look like an installer even absent
/// other evidence, per the external collaborator's
/// `HasSuspiciouslySetupLikeName` heuristic.
const SETUP_LIKE_NAME_FRAGMENTS: &[&str] = &[
    "setup", "install", "installer", "instalar", "installateur", "installazione",
];

/// Returns true if `basename` (no directory components) looks like an
/// installer by name alone.
pub fn has_suspiciously_setup_like_name(basename: &str) -> bool {
    let lower = basename.to_lowercase();
    SETUP_LIKE_NAME_FRAGMENTS
        .iter()
        .any(|frag| lower.contains(frag))
}

/// Parses `bytes` as a PE file. Returns `Ok(None)` when the bytes are not a
/// well-formed PE (a clean sniff failure, not an error) so the sniffer can
/// fall through to the next magic test.
pub fn probe(bytes: &[u8]) -> crate::Result<Option<PeInfo>> {
    let pe = match PE::parse(bytes) {
        Ok(pe) => pe,
        Err(_) => return Ok(None),
    };

    let arch = match pe.header.coff_header.machine {
        IMAGE_FILE_MACHINE_I386 => Some(Arch::X86),
        IMAGE_FILE_MACHINE_AMD64 => Some(Arch::Amd64),
        _ => None,
    };

    let gui = pe
        .header
        .optional_header
        .map(|oh| oh.windows_fields.subsystem == IMAGE_SUBSYSTEM_WINDOWS_GUI)
        .unwrap_or(false);

    let has_assembly_info = contains(bytes, b"<assembly") || contains(bytes, b"urn:schemas-microsoft-com:asm.v1");
    let requires_elevation = contains(bytes, b"requireAdministrator");

    let installer_type = if contains(bytes, b"Nullsoft.NSIS") {
        Some("nsis".to_string())
    } else if contains(bytes, b"Inno Setup") {
        Some("innosetup".to_string())
    } else if contains(bytes, b"Windows Installer Xtreme") || contains(bytes, b"InstallShield") {
        Some("installshield".to_string())
    } else {
        None
    };

    Ok(Some(PeInfo {
        arch,
        windows_info: WindowsInfo {
            gui,
            installer_type,
            has_assembly_info,
            requires_elevation,
        },
    }))
}

/// Sniffs `bytes` (the full contents of a `.exe` file) into a
/// [`Flavor::NativeWindows`] candidate, or `None` if it isn't a PE.
pub fn sniff(bytes: &[u8], path: &str) -> crate::Result<Option<Candidate>> {
    let info = match probe(bytes)? {
        Some(info) => info,
        None => return Ok(None),
    };

    let mut candidate = Candidate::new(path, Flavor::NativeWindows).with_windows_info(info.windows_info);
    if let Some(arch) = info.arch {
        candidate = candidate.with_arch(arch);
    }
    Ok(Some(candidate))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len().max(1))
        .any(|window| window == needle)
}
