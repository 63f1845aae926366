// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Linux ELF probe, grounded on `goblin::elf::Elf`.

use goblin::elf::{
    header::{EM_386, EM_X86_64, ET_DYN, ET_EXEC},
    Elf,
};

use crate::model::{Arch, Candidate, Flavor};

/// Parses `bytes` as an ELF file and, if it is a recognized executable
/// (`ET_EXEC` or position-independent `ET_DYN` with a nonzero entry point),
/// returns a [`Flavor::NativeLinux`] candidate. Relocatable objects, core
/// dumps, and anything `goblin` fails to parse yield `Ok(None)`.
pub fn sniff(bytes: &[u8], path: &str) -> crate::Result<Option<Candidate>> {
    let elf = match Elf::parse(bytes) {
        Ok(elf) => elf,
        Err(_) => return Ok(None),
    };

    let is_executable = match elf.header.e_type {
        ET_EXEC => true,
        ET_DYN => elf.entry != 0,
        _ => false,
    };
    if !is_executable {
        return Ok(None);
    }

    let arch = match elf.header.e_machine {
        EM_386 => Some(Arch::X86),
        EM_X86_64 => Some(Arch::Amd64),
        _ => None,
    };

    let mut candidate = Candidate::new(path, Flavor::NativeLinux);
    if let Some(arch) = arch {
        candidate = candidate.with_arch(arch);
    }
    Ok(Some(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_elf_bytes_are_a_clean_miss() {
        assert_eq!(sniff(b"not an elf", "game").unwrap(), None);
    }
}
