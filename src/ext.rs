// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Extension classifier: decides, from a filename alone, whether a path is
//! worth sniffing.
//!
//! The blacklist is a union of every variant the legacy blacklists carried,
//! kept deliberately over-inclusive: this is a blacklist, not a whitelist,
//! because Linux and macOS executables routinely carry an arbitrary or empty
//! extension (`Game.x86_64`, plain `game`). A missing whitelist entry breaks
//! launchability; a missing blacklist entry only wastes a sniff.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// Extensions (including the leading dot, lowercased) that are never worth
/// sniffing.
static BLACKLISTED_EXTS: &[&str] = &[
    // Images
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tga", ".tif", ".tiff", ".psd", ".ico", ".dds",
    ".webp", ".svg", ".xcf", ".pcx",
    // Audio
    ".wav", ".mp3", ".ogg", ".oga", ".flac", ".aiff", ".aif", ".wma", ".m4a", ".it", ".xm",
    ".s3m", ".mod",
    // Video
    ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".ogv", ".bik", ".m4v",
    // Level / asset data
    ".bsp", ".vpk", ".pak", ".pk3", ".pk4", ".wad", ".map", ".lvl", ".nav", ".vmf", ".vtf",
    ".vmt", ".ain",
    // Source code suffixes
    ".c", ".h", ".cpp", ".cc", ".cxx", ".hpp", ".hxx", ".rs", ".go", ".java", ".cs", ".py",
    ".rb", ".php", ".swift", ".kt", ".m", ".mm", ".pl", ".lua", ".ts", ".js", ".html", ".htm",
    ".css", ".json", ".xml", ".yaml", ".yml",
    // Python artifacts
    ".pyc", ".pyo", ".pyd", ".egg", ".whl",
    // Java runtime data (not the jar itself, which is sniffed via ZIP probe)
    ".class", ".jad",
    // Unreal Engine assets
    ".uasset", ".umap", ".uexp", ".uproject", ".upk", ".udk",
    // Source-engine assets
    ".vpk", ".vcd", ".mdl", ".phy", ".vtx", ".vvd",
    // Debug symbols
    ".pdb", ".dsym", ".debug", ".sym", ".map",
    // Shared libraries (the dotted-version forms are matched by regex below)
    ".dll", ".dylib",
    // Fonts
    ".ttf", ".otf", ".fon", ".woff", ".woff2",
    // Shaders
    ".hlsl", ".glsl", ".cg", ".fx", ".shader", ".cso", ".fxc",
    // macOS metadata
    ".ds_store", ".plist", ".strings", ".nib", ".storyboard",
    // Databases
    ".db", ".sqlite", ".sqlite3", ".mdb",
    // Configuration text
    ".ini", ".cfg", ".conf", ".toml", ".properties", ".txt", ".md", ".log",
    // Flash
    ".swf", ".flv", ".fla",
];

static BLACKLIST_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| BLACKLISTED_EXTS.iter().copied().collect());

/// Matches `.so`, `.so.2`, `.so.2.0.0`, etc. Cannot be expressed as a fixed
/// suffix set because the version tail is open-ended.
static SHARED_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.so(\.[0-9]+)*$").expect("static regex is valid"));

/// Extracts the lowercased final dot-suffix of `path`'s basename, including
/// the dot. Returns an empty string when the basename has no dot.
pub fn extension(path: &str) -> String {
    let basename = Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match basename.rfind('.') {
        Some(idx) => basename[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Decides whether `path` should be skipped by the sniffer based on its
/// extension alone.
///
/// An empty extension (no dot in the basename) is treated as a literal
/// lookup key that is never in the blacklist, so extension-less executables
/// like `Game.x86_64`'s sibling `game` are always sniffed.
pub fn is_blacklisted_ext(path: &str) -> bool {
    let ext = extension(path);
    if ext.is_empty() {
        return false;
    }
    BLACKLIST_SET.contains(ext.as_str()) || SHARED_OBJECT_RE.is_match(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executables_are_never_blacklisted() {
        assert!(!is_blacklisted_ext("game/Game.exe"));
        assert!(!is_blacklisted_ext("game/LaunchGame.bat"));
        assert!(!is_blacklisted_ext("game/game"));
        assert!(!is_blacklisted_ext("game/game.x86"));
        assert!(!is_blacklisted_ext("game/game.x86_64"));
    }

    #[test]
    fn known_junk_is_blacklisted() {
        assert!(is_blacklisted_ext("game/maps/random.umap"));
    }

    #[test]
    fn shared_objects_with_version_suffixes_are_blacklisted() {
        assert!(is_blacklisted_ext("libs/x86_64/libSDL.so"));
        assert!(is_blacklisted_ext("libs/x86_64/libSDL.so.2"));
        assert!(is_blacklisted_ext("libs/x86_64/libSDL.so.2.0.0"));
    }

    #[test]
    fn extension_extraction_is_lowercased_and_dotted() {
        assert_eq!(extension("Foo/Bar.EXE"), ".exe");
        assert_eq!(extension("Foo/Bar"), "");
        assert_eq!(extension("Foo/.hidden"), ".hidden");
    }

    #[test]
    fn determinism_depends_only_on_basename_suffix() {
        for p in ["a/b/c.EXE", "A/B/C.EXE", "c.EXE"] {
            assert_eq!(is_blacklisted_ext(p), is_blacklisted_ext("c.exe"));
        }
    }
}
