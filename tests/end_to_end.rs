// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Full-pipeline tests: synthetic directory trees through `configure` and
//! `Verdict::filter`, exercising scenarios no single unit test covers end to
//! end.

use std::io::Write;

use launchsniff::{configure, Arch, ConfigureOptions, FilterOptions, Flavor, NullConsumer, Os, TracingConsumer};

#[test]
fn single_html_fallback_wins_with_no_other_candidates() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"<html></html>").unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets/foo.png"), b"\x89PNG").unwrap();
    std::fs::write(dir.path().join("game.js"), b"console.log(1)").unwrap();

    let verdict = configure(dir.path(), ConfigureOptions::new(&NullConsumer)).unwrap();
    let filtered = verdict.filter(
        &NullConsumer,
        FilterOptions {
            os: Os::Linux,
            arch: Some(Arch::Amd64),
        },
    );
    assert_eq!(filtered.candidates.len(), 1);
    assert_eq!(filtered.candidates[0].flavor, Flavor::Html);
    assert_eq!(filtered.candidates[0].path, "index.html");
}

#[test]
fn love_bundle_is_found_regardless_of_extension_case() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = std::fs::File::create(dir.path().join("game.love")).unwrap();
    f.write_all(b"pretend love bundle bytes").unwrap();

    let verdict = configure(dir.path(), ConfigureOptions::new(&NullConsumer)).unwrap();
    let filtered = verdict.filter(
        &NullConsumer,
        FilterOptions {
            os: Os::Linux,
            arch: None,
        },
    );
    assert_eq!(filtered.candidates.len(), 1);
    assert_eq!(filtered.candidates[0].flavor, Flavor::Love);
}

#[test]
fn macos_app_bundle_beats_a_stray_shell_script() {
    let dir = tempfile::tempdir().unwrap();
    let app = dir.path().join("MyGame.app");
    let contents = app.join("Contents");
    std::fs::create_dir_all(contents.join("MacOS")).unwrap();
    std::fs::write(contents.join("Info.plist"), b"<plist></plist>").unwrap();
    let mut macho = vec![0xCE, 0xFA, 0xED, 0xFE];
    macho.extend_from_slice(&[0; 16]);
    std::fs::write(contents.join("MacOS/mygame"), &macho).unwrap();
    std::fs::write(dir.path().join("install.sh"), b"#!/bin/sh\necho hi\n").unwrap();

    let verdict = configure(dir.path(), ConfigureOptions::new(&NullConsumer)).unwrap();
    let filtered = verdict.filter(
        &NullConsumer,
        FilterOptions {
            os: Os::Darwin,
            arch: None,
        },
    );
    assert_eq!(filtered.candidates.len(), 1);
    assert_eq!(filtered.candidates[0].flavor, Flavor::AppMacos);
    assert_eq!(filtered.candidates[0].path, "MyGame.app");
}

/// Builds a minimal, structurally valid little-endian ELF64 executable
/// header with no program or section headers - enough for `goblin` to
/// parse `e_type`/`e_machine`/`e_entry` without needing real code.
fn minimal_elf64_exec(machine: u16) -> Vec<u8> {
    let mut bytes = vec![0u8; 64];
    bytes[0..4].copy_from_slice(&[0x7F, b'E', b'L', b'F']);
    bytes[4] = 2; // ELFCLASS64
    bytes[5] = 1; // ELFDATA2LSB
    bytes[6] = 1; // EV_CURRENT
    bytes[16..18].copy_from_slice(&2u16.to_le_bytes()); // e_type = ET_EXEC
    bytes[18..20].copy_from_slice(&machine.to_le_bytes()); // e_machine
    bytes[20..24].copy_from_slice(&1u32.to_le_bytes()); // e_version
    bytes[24..32].copy_from_slice(&0x400078u64.to_le_bytes()); // e_entry
    bytes[40..42].copy_from_slice(&64u16.to_le_bytes()); // e_ehsize
    bytes
}

#[test]
fn amd64_native_linux_executable_is_preferred_over_a_jar_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("game.x86_64"), minimal_elf64_exec(0x3E)).unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"nothing to see here").unwrap();

    let verdict = configure(dir.path(), ConfigureOptions::new(&NullConsumer)).unwrap();
    let filtered = verdict.filter(
        &NullConsumer,
        FilterOptions {
            os: Os::Linux,
            arch: Some(Arch::Amd64),
        },
    );
    assert_eq!(filtered.candidates.len(), 1);
    assert_eq!(filtered.candidates[0].flavor, Flavor::NativeLinux);
    assert_eq!(filtered.candidates[0].arch, Some(Arch::Amd64));
}

/// Builds a minimal, structurally valid 64-bit (PE32+) Windows executable
/// header with zero sections and zero data directories - enough for
/// `goblin` to parse the COFF and optional headers (machine, subsystem)
/// without needing real code, a section table, or a resource directory.
/// `extra` is appended past the header and is where installer/elevation
/// marker strings get planted for the byte-scan half of the PE probe.
fn minimal_pe64(subsystem: u16, extra: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; 64];
    bytes[0] = b'M';
    bytes[1] = b'Z';
    bytes[0x3c..0x40].copy_from_slice(&64u32.to_le_bytes()); // e_lfanew

    bytes.extend_from_slice(b"PE\0\0");

    // COFF header.
    bytes.extend_from_slice(&0x8664u16.to_le_bytes()); // Machine = AMD64
    bytes.extend_from_slice(&0u16.to_le_bytes()); // NumberOfSections
    bytes.extend_from_slice(&0u32.to_le_bytes()); // TimeDateStamp
    bytes.extend_from_slice(&0u32.to_le_bytes()); // PointerToSymbolTable
    bytes.extend_from_slice(&0u32.to_le_bytes()); // NumberOfSymbols
    bytes.extend_from_slice(&112u16.to_le_bytes()); // SizeOfOptionalHeader
    bytes.extend_from_slice(&0x0022u16.to_le_bytes()); // Characteristics

    // Optional header, PE32+ (Magic 0x20b), 0 data directories.
    bytes.extend_from_slice(&0x020bu16.to_le_bytes()); // Magic
    bytes.push(14); // MajorLinkerVersion
    bytes.push(0); // MinorLinkerVersion
    bytes.extend_from_slice(&0x1000u32.to_le_bytes()); // SizeOfCode
    bytes.extend_from_slice(&0u32.to_le_bytes()); // SizeOfInitializedData
    bytes.extend_from_slice(&0u32.to_le_bytes()); // SizeOfUninitializedData
    bytes.extend_from_slice(&0x1000u32.to_le_bytes()); // AddressOfEntryPoint
    bytes.extend_from_slice(&0x1000u32.to_le_bytes()); // BaseOfCode
    bytes.extend_from_slice(&0x140000000u64.to_le_bytes()); // ImageBase
    bytes.extend_from_slice(&0x1000u32.to_le_bytes()); // SectionAlignment
    bytes.extend_from_slice(&0x200u32.to_le_bytes()); // FileAlignment
    bytes.extend_from_slice(&6u16.to_le_bytes()); // MajorOperatingSystemVersion
    bytes.extend_from_slice(&0u16.to_le_bytes()); // MinorOperatingSystemVersion
    bytes.extend_from_slice(&0u16.to_le_bytes()); // MajorImageVersion
    bytes.extend_from_slice(&0u16.to_le_bytes()); // MinorImageVersion
    bytes.extend_from_slice(&6u16.to_le_bytes()); // MajorSubsystemVersion
    bytes.extend_from_slice(&0u16.to_le_bytes()); // MinorSubsystemVersion
    bytes.extend_from_slice(&0u32.to_le_bytes()); // Win32VersionValue
    bytes.extend_from_slice(&0x3000u32.to_le_bytes()); // SizeOfImage
    bytes.extend_from_slice(&0x400u32.to_le_bytes()); // SizeOfHeaders
    bytes.extend_from_slice(&0u32.to_le_bytes()); // CheckSum
    bytes.extend_from_slice(&subsystem.to_le_bytes()); // Subsystem
    bytes.extend_from_slice(&0u16.to_le_bytes()); // DllCharacteristics
    bytes.extend_from_slice(&0x100000u64.to_le_bytes()); // SizeOfStackReserve
    bytes.extend_from_slice(&0x1000u64.to_le_bytes()); // SizeOfStackCommit
    bytes.extend_from_slice(&0x100000u64.to_le_bytes()); // SizeOfHeapReserve
    bytes.extend_from_slice(&0x1000u64.to_le_bytes()); // SizeOfHeapCommit
    bytes.extend_from_slice(&0u32.to_le_bytes()); // LoaderFlags
    bytes.extend_from_slice(&0u32.to_le_bytes()); // NumberOfRvaAndSizes

    bytes.extend_from_slice(extra);
    bytes
}

const GUI_SUBSYSTEM: u16 = 2;

#[test]
fn gui_pe_executable_is_the_single_windows_candidate() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Game.exe"), minimal_pe64(GUI_SUBSYSTEM, b"")).unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"nothing to see here").unwrap();

    let verdict = configure(dir.path(), ConfigureOptions::new(&NullConsumer)).unwrap();
    let filtered = verdict.filter(
        &NullConsumer,
        FilterOptions {
            os: Os::Windows,
            arch: Some(Arch::Amd64),
        },
    );
    assert_eq!(filtered.candidates.len(), 1);
    assert_eq!(filtered.candidates[0].flavor, Flavor::NativeWindows);
    assert_eq!(filtered.candidates[0].path, "Game.exe");
    assert_eq!(filtered.candidates[0].arch, Some(Arch::Amd64));
}

#[test]
fn elevated_installer_and_msi_lose_to_the_plain_gui_exe() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("setup.exe"),
        minimal_pe64(GUI_SUBSYSTEM, b"requireAdministrator"),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("installer.msi"),
        [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
    )
    .unwrap();
    std::fs::write(dir.path().join("game.exe"), minimal_pe64(GUI_SUBSYSTEM, b"")).unwrap();

    let verdict = configure(dir.path(), ConfigureOptions::new(&NullConsumer)).unwrap();
    let filtered = verdict.filter(
        &NullConsumer,
        FilterOptions {
            os: Os::Windows,
            arch: None,
        },
    );
    assert_eq!(filtered.candidates.len(), 1);
    assert_eq!(filtered.candidates[0].flavor, Flavor::NativeWindows);
    assert_eq!(filtered.candidates[0].path, "game.exe");
}

#[test]
fn tracing_consumer_does_not_disrupt_a_walk() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"nothing runnable here").unwrap();

    let verdict = configure(dir.path(), ConfigureOptions::new(&TracingConsumer)).unwrap();
    assert!(verdict.candidates.is_empty());
}
