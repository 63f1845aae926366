// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Tree scanner: walks a directory, detects macOS `.app` bundles, drives
//! the sniffer over non-blacklisted files, and falls back to top-level
//! HTML when nothing else is found.

use std::fs::File;
use std::path::Path;

use walkdir::WalkDir;

use crate::consumer::{Consumer, TracingConsumer};
use crate::ext::{extension, is_blacklisted_ext};
use crate::model::{Candidate, Flavor, VerdictStats};
use crate::sniff::sniff;
use crate::{Error, Result, Verdict};

/// Default path filter: excludes VCS metadata, OS junk, and this crate's
/// own reserved marker file.
pub fn default_filter(path: &str) -> bool {
    let lower = path.to_lowercase();
    let reserved = [
        "/.git/", "/.svn/", "/.hg/", "/__macosx/", ".ds_store", "thumbs.db",
        ".launchsniff",
    ];
    let prefixed = format!("/{lower}");
    !reserved.iter().any(|needle| prefixed.contains(needle) || lower.starts_with(needle.trim_start_matches('/')))
}

struct WalkedFile {
    path: String,
    size: u64,
    mode: u32,
}

struct WalkedDir {
    path: String,
    mode: u32,
}

/// Options accepted by [`configure`].
pub struct ConfigureOptions<'a> {
    /// Logger for observability; never affects control flow.
    pub consumer: &'a dyn Consumer,
    /// Path predicate gating which walked entries are considered at all.
    /// `None` uses [`default_filter`].
    pub filter: Option<&'a dyn Fn(&str) -> bool>,
    /// Optional sniff counters, updated in place.
    pub stats: Option<&'a mut VerdictStats>,
}

impl<'a> ConfigureOptions<'a> {
    /// Options using [`TracingConsumer`], [`default_filter`], and no stats.
    pub fn new(consumer: &'a dyn Consumer) -> Self {
        ConfigureOptions {
            consumer,
            filter: None,
            stats: None,
        }
    }
}

impl Default for ConfigureOptions<'static> {
    fn default() -> Self {
        ConfigureOptions {
            consumer: &TracingConsumer,
            filter: None,
            stats: None,
        }
    }
}

/// Walks `root` and produces a [`Verdict`] of launch candidates.
///
/// Aborts on the first I/O or walk error; format-probe soft failures never
/// propagate (see [`crate::sniff::sniff`]).
pub fn configure(root: &Path, mut options: ConfigureOptions<'_>) -> Result<Verdict> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let filter: &dyn Fn(&str) -> bool = options.filter.unwrap_or(&default_filter);

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.path() == root {
            continue;
        }
        let rel = entry.path().strip_prefix(root)?;
        let rel_str = to_forward_slash(rel);
        if !filter(&rel_str) {
            continue;
        }

        let metadata = entry.metadata()?;
        let mode = file_mode(&metadata);

        if entry.file_type().is_dir() {
            dirs.push(WalkedDir {
                path: rel_str,
                mode,
            });
        } else if entry.file_type().is_file() {
            files.push(WalkedFile {
                path: rel_str,
                size: metadata.len(),
                mode,
            });
        }
    }

    if dirs.is_empty() && files.is_empty() {
        return Err(Error::EmptyTree);
    }

    let mut verdict = Verdict::new(root.to_string_lossy().to_string());
    let mut candidates = Vec::new();

    for dir in &dirs {
        if !dir.path.to_lowercase().ends_with(".app") {
            continue;
        }
        let wanted = format!("{}/contents/info.plist", dir.path.to_lowercase());
        let has_info_plist = files.iter().any(|f| f.path.to_lowercase() == wanted);
        if has_info_plist {
            let mut candidate = Candidate::new(dir.path.clone(), Flavor::AppMacos);
            candidate.mode = dir.mode;
            candidates.push(candidate);
        } else {
            options
                .consumer
                .warn(format_args!("{}: missing Contents/Info.plist, skipping bundle", dir.path));
        }
    }

    for file in &files {
        verdict.total_size += file.size;

        if is_blacklisted_ext(&file.path) {
            continue;
        }

        let full_path = root.join(&file.path);
        let reader = match File::open(&full_path) {
            Ok(f) => f,
            Err(e) => return Err(Error::IoWithPath(full_path, e)),
        };

        if let Some(stats) = options.stats.as_deref_mut() {
            stats.record_sniff(&extension(&file.path));
        }

        if let Some(mut candidate) = sniff(reader, &file.path, file.size)? {
            candidate.mode = file.mode;
            candidates.push(candidate);
        }
    }

    if candidates.is_empty() {
        let html_files: Vec<&WalkedFile> = files
            .iter()
            .filter(|f| f.path.to_lowercase().ends_with(".html"))
            .collect();
        if html_files.len() == 1 {
            let mut candidate = Candidate::new(html_files[0].path.clone(), Flavor::Html);
            candidate.size = html_files[0].size;
            candidates.push(candidate);
        } else {
            for file in files.iter().filter(|f| {
                f.path.to_lowercase().ends_with(".html") && crate::model::segment_count(&f.path) == 1
            }) {
                let mut candidate = Candidate::new(file.path.clone(), Flavor::Html);
                candidate.size = file.size;
                candidates.push(candidate);
            }
        }
    }

    verdict.candidates = candidates;
    Ok(verdict)
}

fn to_forward_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(windows)]
fn file_mode(_metadata: &std::fs::Metadata) -> u32 {
    0
}

#[cfg(not(windows))]
fn file_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}
