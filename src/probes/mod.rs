// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Format probes: the external collaborators the magic sniffer dispatches
//! to once it recognizes a leading byte pattern. Each probe is a thin
//! adapter over a real parser (`goblin` for PE/ELF/Mach-O, `zip` for
//! archives) so the sniffer's magic-number table stays small and the
//! dispatch table can grow new formats without touching it.
//!
//! Soft failures (bytes matched the magic number but parsing rules the file
//! out) are represented as `Ok(None)`, never as an `Err`: per the crate's
//! error handling design, a corrupted or merely similar-looking binary must
//! not abort the whole sniff.

pub mod elf;
pub mod love;
pub mod pe;
pub mod script;
pub mod spellbook;
pub mod zip;
