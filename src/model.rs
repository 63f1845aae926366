// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Data model and taxonomy: flavors, architectures, candidates and verdicts.

use std::collections::HashMap;
use std::fmt::{self, Display};

/// The kind of runnable thing a [`Candidate`] was sniffed as.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Flavor {
    /// A native Linux ELF executable.
    NativeLinux,
    /// A native Windows PE executable.
    NativeWindows,
    /// A native macOS Mach-O executable (thin or fat).
    NativeMacos,
    /// A macOS `.app` bundle, represented as a directory.
    AppMacos,
    /// A POSIX shell script with a `#!` shebang.
    Script,
    /// A Windows batch/command script (`.bat`/`.cmd`).
    ScriptWindows,
    /// An `index.html` (or other top-level `.html`) launch target.
    Html,
    /// A Love2D game, either a `conf.lua` directory or a `.love` bundle.
    Love,
    /// A Java archive detected inside a ZIP.
    Jar,
    /// A Windows installer package (`.msi`).
    Msi,
}

impl Flavor {
    /// Short lowercase name, used in logging and tests.
    pub fn short_name(&self) -> &'static str {
        match self {
            Flavor::NativeLinux => "native-linux",
            Flavor::NativeWindows => "native-windows",
            Flavor::NativeMacos => "native-macos",
            Flavor::AppMacos => "app-macos",
            Flavor::Script => "script",
            Flavor::ScriptWindows => "script-windows",
            Flavor::Html => "html",
            Flavor::Love => "love",
            Flavor::Jar => "jar",
            Flavor::Msi => "msi",
        }
    }
}

impl Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// CPU architecture of a native candidate. Arm variants are not modeled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Arch {
    /// 32-bit x86.
    X86,
    /// 64-bit x86.
    Amd64,
}

impl Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X86 => write!(f, "386"),
            Arch::Amd64 => write!(f, "amd64"),
        }
    }
}

/// Target operating system requested for [`crate::Verdict::filter`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Os {
    /// Linux.
    Linux,
    /// Windows.
    Windows,
    /// macOS.
    Darwin,
}

impl Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Linux => write!(f, "linux"),
            Os::Windows => write!(f, "windows"),
            Os::Darwin => write!(f, "darwin"),
        }
    }
}

/// Metadata extracted from the PE probe, only present for [`Flavor::NativeWindows`]
/// candidates.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WindowsInfo {
    /// Whether the PE subsystem is GUI (as opposed to console).
    pub gui: bool,
    /// The recognized installer type, if any (e.g. `"nsis"`, `"innosetup"`, `"msi-stub"`).
    pub installer_type: Option<String>,
    /// Whether the PE carries an embedded assembly/manifest resource.
    pub has_assembly_info: bool,
    /// Whether the PE's manifest requests elevation (`requireAdministrator`).
    pub requires_elevation: bool,
}

impl WindowsInfo {
    /// Mirrors the external PE collaborator's `RequiresElevation()` accessor.
    pub fn requires_elevation(&self) -> bool {
        self.requires_elevation
    }
}

/// A single potential launch target discovered by sniffing or bundle detection.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Path relative to the verdict's `base_path`, using forward slashes.
    pub path: String,
    /// Number of path segments; top-level files have depth 1.
    pub depth: usize,
    /// Size in bytes; always 0 for [`Flavor::AppMacos`].
    pub size: u64,
    /// POSIX mode bits at scan time; zeroed after [`crate::fix_permissions`] runs.
    pub mode: u32,
    /// What kind of launchable thing this is.
    pub flavor: Flavor,
    /// Detected architecture, when meaningful for the flavor.
    pub arch: Option<Arch>,
    /// Human-readable signature string from the generic identifier, used only to
    /// disambiguate fat Mach-O from compiled Java class files.
    pub spell: Option<String>,
    /// PE-specific metadata, only set for [`Flavor::NativeWindows`].
    pub windows_info: Option<WindowsInfo>,
}

impl Candidate {
    /// Builds a candidate, computing `depth` from `path`.
    pub fn new(path: impl Into<String>, flavor: Flavor) -> Self {
        let path = path.into();
        let depth = segment_count(&path);
        Candidate {
            path,
            depth,
            size: 0,
            mode: 0,
            flavor,
            arch: None,
            spell: None,
            windows_info: None,
        }
    }

    /// Builder-style setter for `arch`.
    pub fn with_arch(mut self, arch: Arch) -> Self {
        self.arch = Some(arch);
        self
    }

    /// Builder-style setter for `spell`.
    pub fn with_spell(mut self, spell: impl Into<String>) -> Self {
        self.spell = Some(spell.into());
        self
    }

    /// Builder-style setter for `windows_info`.
    pub fn with_windows_info(mut self, info: WindowsInfo) -> Self {
        self.windows_info = Some(info);
        self
    }
}

/// Counts forward-slash-separated segments in a relative path.
///
/// An empty path has a segment count of 0; callers should never hand a
/// [`Candidate`] an empty path (see the crate-level invariant that `path`
/// is always set).
pub fn segment_count(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.split('/').count()
    }
}

/// Optional counters threaded through [`crate::configure`] for observability.
#[derive(Clone, Debug, Default)]
pub struct VerdictStats {
    /// Total number of files handed to the sniffer.
    pub num_sniffs: u64,
    /// Per-extension sniff counts, keyed by the extension classifier's
    /// extraction routine (including the leading dot, e.g. `".exe"`).
    pub sniffs_by_ext: HashMap<String, u64>,
}

impl VerdictStats {
    /// Records one sniff attempt for the given extension (empty string for
    /// extension-less files).
    pub fn record_sniff(&mut self, ext: &str) {
        self.num_sniffs += 1;
        *self.sniffs_by_ext.entry(ext.to_string()).or_insert(0) += 1;
    }
}

/// The set of candidates produced for a directory, plus its base path and
/// aggregate size.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    /// The directory the candidates were sniffed relative to.
    pub base_path: String,
    /// Sum of all walked file sizes, including blacklisted ones.
    pub total_size: u64,
    /// Candidates in directory-walk order (directories first, then files),
    /// or in ranked order after [`Verdict::filter`].
    pub candidates: Vec<Candidate>,
}

impl Verdict {
    /// An empty verdict rooted at `base_path`.
    pub fn new(base_path: impl Into<String>) -> Self {
        Verdict {
            base_path: base_path.into(),
            total_size: 0,
            candidates: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_matches_segment_count() {
        let c = Candidate::new("a/b/c.exe", Flavor::NativeWindows);
        assert_eq!(c.depth, 3);
        let c = Candidate::new("top.love", Flavor::Love);
        assert_eq!(c.depth, 1);
    }

    #[test]
    fn stats_record_per_extension() {
        let mut stats = VerdictStats::default();
        stats.record_sniff(".exe");
        stats.record_sniff(".exe");
        stats.record_sniff("");
        assert_eq!(stats.num_sniffs, 3);
        assert_eq!(stats.sniffs_by_ext.get(".exe"), Some(&2));
        assert_eq!(stats.sniffs_by_ext.get(""), Some(&1));
    }
}
