// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The generic file-type identifier ("spellbook"), used only to
//! disambiguate a `CAFEBABE`-prefixed file between a fat Mach-O binary and
//! a compiled Java class file — both share the same four leading bytes.
//!
//! Grounded on `goblin::mach::Mach`: a fat Mach-O's `nfat_arch` count and
//! per-architecture headers are structurally distinct from a class file's
//! minor/major version pair, so attempting the real Mach-O parse first is
//! a genuine disambiguator rather than a heuristic guess.

use goblin::mach::{cputype, Mach};

/// Returns a human-readable description of `bytes`. When `bytes` is
/// actually a compiled Java class file, the returned string contains the
/// literal substring `"compiled Java class data,"`, which is the only
/// thing callers are expected to check for.
pub fn identify(bytes: &[u8]) -> String {
    match Mach::parse(bytes) {
        Ok(Mach::Fat(fat)) => describe_fat(&fat),
        Ok(Mach::Binary(macho)) => describe_thin(&macho),
        Err(_) => describe_as_class_file(bytes),
    }
}

fn describe_as_class_file(bytes: &[u8]) -> String {
    if bytes.len() >= 8 {
        let minor = u16::from_be_bytes([bytes[4], bytes[5]]);
        let major = u16::from_be_bytes([bytes[6], bytes[7]]);
        format!("compiled Java class data, version {major}.{minor}")
    } else {
        "compiled Java class data,".to_string()
    }
}

fn describe_fat(fat: &goblin::mach::fat::MultiArch) -> String {
    let arches: Vec<&'static str> = fat
        .iter_arches()
        .filter_map(|arch| arch.ok())
        .map(|arch| cpu_name(arch.cputype))
        .collect();
    format!(
        "Mach-O universal binary with {} architectures: [{}]",
        arches.len(),
        arches.join(", ")
    )
}

fn describe_thin(macho: &goblin::mach::MachO) -> String {
    format!(
        "Mach-O {}-bit executable {}",
        if macho.header.is_64() { 64 } else { 32 },
        cpu_name(macho.header.cputype as u32)
    )
}

fn cpu_name(cputype: u32) -> &'static str {
    match cputype {
        cputype::CPU_TYPE_X86_64 => "x86_64",
        cputype::CPU_TYPE_X86 => "i386",
        cputype::CPU_TYPE_ARM64 => "arm64",
        cputype::CPU_TYPE_ARM => "arm",
        _ => "unknown",
    }
}
