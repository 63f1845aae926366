// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Verdict filter/ranker: a monotonic narrowing cascade of independently
//! testable stages, modeled as data (a list of [`Stage`] objects) rather
//! than one deeply nested function, per the crate's design notes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::consumer::Consumer;
use crate::model::{Arch, Candidate, Flavor, Os};
use crate::probes::pe;
use crate::Verdict;

/// Parameters for [`filter`].
#[derive(Clone, Copy, Debug)]
pub struct FilterOptions {
    /// Target operating system.
    pub os: Os,
    /// Target architecture, when the caller cares to narrow by it.
    pub arch: Option<Arch>,
}

struct FilterContext<'a> {
    base_path: &'a str,
    os: Os,
    arch: Option<Arch>,
    consumer: &'a dyn Consumer,
}

enum Narrowed {
    Continue(Vec<Candidate>),
    Done(Vec<Candidate>),
}

fn shortcircuit_if_singleton(working: Vec<Candidate>) -> Narrowed {
    if working.len() == 1 {
        Narrowed::Done(working)
    } else {
        Narrowed::Continue(working)
    }
}

trait Stage {
    fn narrow(&self, ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed;
}

/// Stage 1: OS/arch compatibility.
struct OsArchCompat;
impl Stage for OsArchCompat {
    fn narrow(&self, ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        let kept: Vec<Candidate> = working
            .into_iter()
            .filter(|c| match c.flavor {
                Flavor::NativeLinux => ctx.os == Os::Linux,
                Flavor::NativeWindows => ctx.os == Os::Windows,
                Flavor::NativeMacos | Flavor::AppMacos => ctx.os == Os::Darwin,
                _ => true,
            })
            .filter(|c| {
                if c.flavor == Flavor::NativeLinux && ctx.arch == Some(Arch::X86) {
                    !matches!(c.arch, Some(a) if a != Arch::X86)
                } else {
                    true
                }
            })
            .collect();
        shortcircuit_if_singleton(kept)
    }
}

/// Stage 2: minimum depth.
struct MinimumDepth;
impl Stage for MinimumDepth {
    fn narrow(&self, _ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        let min_depth = match working.iter().map(|c| c.depth).min() {
            Some(d) => d,
            None => return Narrowed::Continue(working),
        };
        let kept: Vec<Candidate> = working.into_iter().filter(|c| c.depth == min_depth).collect();
        shortcircuit_if_singleton(kept)
    }
}

/// Stage 3: Love wins outright.
struct LoveWins;
impl Stage for LoveWins {
    fn narrow(&self, _ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        let love_count = working.iter().filter(|c| c.flavor == Flavor::Love).count();
        if love_count == 1 {
            Narrowed::Done(working.into_iter().filter(|c| c.flavor == Flavor::Love).collect())
        } else {
            Narrowed::Continue(working)
        }
    }
}

/// Stage 4: macOS app bundles win (darwin only).
struct AppBundleWins;
impl Stage for AppBundleWins {
    fn narrow(&self, ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        if ctx.os != Os::Darwin {
            return Narrowed::Continue(working);
        }
        if working.iter().any(|c| c.flavor == Flavor::AppMacos) {
            Narrowed::Continue(working.into_iter().filter(|c| c.flavor == Flavor::AppMacos).collect())
        } else {
            Narrowed::Continue(working)
        }
    }
}

/// Stage 5: Windows scripts win (windows only).
struct WindowsScriptsWin;
impl Stage for WindowsScriptsWin {
    fn narrow(&self, ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        if ctx.os != Os::Windows {
            return Narrowed::Continue(working);
        }
        let count = working.iter().filter(|c| c.flavor == Flavor::ScriptWindows).count();
        if count == 1 {
            Narrowed::Done(working.into_iter().filter(|c| c.flavor == Flavor::ScriptWindows).collect())
        } else {
            Narrowed::Continue(working)
        }
    }
}

/// Stage 6: Linux scripts win (linux only).
struct LinuxScriptsWin;
impl Stage for LinuxScriptsWin {
    fn narrow(&self, ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        if ctx.os != Os::Linux {
            return Narrowed::Continue(working);
        }
        let count = working.iter().filter(|c| c.flavor == Flavor::Script).count();
        if count == 1 {
            Narrowed::Done(working.into_iter().filter(|c| c.flavor == Flavor::Script).collect())
        } else {
            Narrowed::Continue(working)
        }
    }
}

/// Stage 7: Linux 64-bit preference (linux + amd64 only).
struct Linux64Preference;
impl Stage for Linux64Preference {
    fn narrow(&self, ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        if ctx.os != Os::Linux || ctx.arch != Some(Arch::Amd64) {
            return Narrowed::Continue(working);
        }
        let amd64_natives: Vec<Candidate> = working
            .iter()
            .filter(|c| c.flavor == Flavor::NativeLinux && c.arch == Some(Arch::Amd64))
            .cloned()
            .collect();
        if !amd64_natives.is_empty() {
            return Narrowed::Continue(amd64_natives);
        }
        let jars: Vec<Candidate> = working.iter().filter(|c| c.flavor == Flavor::Jar).cloned().collect();
        if !jars.is_empty() {
            Narrowed::Done(jars)
        } else {
            Narrowed::Continue(working)
        }
    }
}

/// Stage 8: Windows installer exclusion (windows only).
struct WindowsInstallerExclusion;
impl Stage for WindowsInstallerExclusion {
    fn narrow(&self, ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        if ctx.os != Os::Windows {
            return Narrowed::Continue(working);
        }
        let kept: Vec<Candidate> = working
            .into_iter()
            .filter(|c| {
                if c.flavor != Flavor::NativeWindows {
                    return true;
                }
                let full_path = format!("{}/{}", ctx.base_path, c.path);
                let bytes = match std::fs::read(&full_path) {
                    Ok(b) => b,
                    Err(_) => return true, // fail-open
                };
                let info = match pe::probe(&bytes) {
                    Ok(Some(info)) => info,
                    _ => return true, // fail-open
                };
                let looks_like_installer = info.windows_info.installer_type.is_some()
                    || info.requires_elevation()
                    || (!info.windows_info.has_assembly_info
                        && pe::has_suspiciously_setup_like_name(basename(&c.path)));
                if looks_like_installer {
                    ctx.consumer
                        .debug(format_args!("{}: excluded as an installer", c.path));
                }
                !looks_like_installer
            })
            .collect();
        shortcircuit_if_singleton(kept)
    }
}

/// Stage 9: Windows GUI preference (windows only).
struct WindowsGuiPreference;
impl Stage for WindowsGuiPreference {
    fn narrow(&self, ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        if ctx.os != Os::Windows {
            return Narrowed::Continue(working);
        }
        let gui_count = working
            .iter()
            .filter(|c| c.flavor == Flavor::NativeWindows && c.windows_info.as_ref().is_some_and(|w| w.gui))
            .count();
        if gui_count > 0 {
            let kept: Vec<Candidate> = working
                .into_iter()
                .filter(|c| c.flavor == Flavor::NativeWindows && c.windows_info.as_ref().is_some_and(|w| w.gui))
                .collect();
            shortcircuit_if_singleton(kept)
        } else {
            Narrowed::Continue(working)
        }
    }
}

/// Stage 10: HTML is a last resort.
struct HtmlLastResort;
impl Stage for HtmlLastResort {
    fn narrow(&self, _ctx: &FilterContext<'_>, mut working: Vec<Candidate>) -> Narrowed {
        let has_other = working.iter().any(|c| c.flavor != Flavor::Html);
        if has_other {
            working.retain(|c| c.flavor != Flavor::Html);
        }
        Narrowed::Continue(working)
    }
}

/// Stage 11: Jar is a last resort.
struct JarLastResort;
impl Stage for JarLastResort {
    fn narrow(&self, _ctx: &FilterContext<'_>, mut working: Vec<Candidate>) -> Narrowed {
        let has_other = working.iter().any(|c| c.flavor != Flavor::Jar);
        if has_other {
            working.retain(|c| c.flavor != Flavor::Jar);
        }
        Narrowed::Continue(working)
    }
}

/// Stage 12: biggest-first stable sort.
struct BiggestFirstSort;
impl Stage for BiggestFirstSort {
    fn narrow(&self, _ctx: &FilterContext<'_>, mut working: Vec<Candidate>) -> Narrowed {
        working.sort_by(|a, b| b.size.cmp(&a.size));
        Narrowed::Continue(working)
    }
}

struct ScorePattern {
    regex: &'static Lazy<Regex>,
    delta: i32,
    exclude: bool,
}

static UNINS_EXE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)unins.*\.exe$").unwrap());
static KICK_BIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)kick\.bin$").unwrap());
static VSHOST_EXE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.vshost\.exe$").unwrap());
static NACL_HELPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)nacl_helper").unwrap());
static NWJC_EXE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)nwjc\.exe$").unwrap());
static FLIXEL_EXE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)flixel\.exe$").unwrap());
static SO_OR_DYLIB: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.(so|dylib)$").unwrap());
static DXWEBSETUP_EXE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)dxwebsetup\.exe$").unwrap());
static VCREDIST_EXE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)vcredist.*\.exe$").unwrap());
static UNITYCRASHHANDLER_EXE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)unitycrashhandler.*\.exe$").unwrap());

fn score_patterns() -> Vec<ScorePattern> {
    vec![
        ScorePattern { regex: &UNINS_EXE, delta: 50, exclude: false },
        ScorePattern { regex: &KICK_BIN, delta: 50, exclude: false },
        ScorePattern { regex: &VSHOST_EXE, delta: 50, exclude: false },
        ScorePattern { regex: &NACL_HELPER, delta: 20, exclude: false },
        ScorePattern { regex: &NWJC_EXE, delta: 20, exclude: false },
        ScorePattern { regex: &FLIXEL_EXE, delta: 20, exclude: false },
        ScorePattern { regex: &SO_OR_DYLIB, delta: 0, exclude: true },
        ScorePattern { regex: &DXWEBSETUP_EXE, delta: 0, exclude: true },
        ScorePattern { regex: &VCREDIST_EXE, delta: 0, exclude: true },
        ScorePattern { regex: &UNITYCRASHHANDLER_EXE, delta: 0, exclude: true },
    ]
}

/// Stage 13: scored exclusion and ranking.
struct ScoredRanking;
impl Stage for ScoredRanking {
    fn narrow(&self, _ctx: &FilterContext<'_>, working: Vec<Candidate>) -> Narrowed {
        let patterns = score_patterns();
        let mut scored: Vec<(i32, Candidate)> = Vec::new();
        for candidate in working {
            let mut score = 100;
            let mut excluded = false;
            for pattern in &patterns {
                if pattern.regex.is_match(&candidate.path) {
                    if pattern.exclude {
                        excluded = true;
                        break;
                    }
                    score -= pattern.delta;
                }
            }
            if !excluded && score > 0 {
                scored.push((score, candidate));
            }
        }
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        Narrowed::Continue(scored.into_iter().map(|(_, c)| c).collect())
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Applies the filter cascade described in the crate-level docs and returns
/// a narrowed, ranked copy of `verdict`. The original is never mutated.
pub fn filter(verdict: &Verdict, consumer: &dyn Consumer, options: FilterOptions) -> Verdict {
    let ctx = FilterContext {
        base_path: &verdict.base_path,
        os: options.os,
        arch: options.arch,
        consumer,
    };

    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(OsArchCompat),
        Box::new(MinimumDepth),
        Box::new(LoveWins),
        Box::new(AppBundleWins),
        Box::new(WindowsScriptsWin),
        Box::new(LinuxScriptsWin),
        Box::new(Linux64Preference),
        Box::new(WindowsInstallerExclusion),
        Box::new(WindowsGuiPreference),
        Box::new(HtmlLastResort),
        Box::new(JarLastResort),
        Box::new(BiggestFirstSort),
        Box::new(ScoredRanking),
    ];

    let mut working = verdict.candidates.clone();
    for stage in &stages {
        match stage.narrow(&ctx, working) {
            Narrowed::Done(result) => {
                return Verdict {
                    base_path: verdict.base_path.clone(),
                    total_size: verdict.total_size,
                    candidates: result,
                }
            }
            Narrowed::Continue(next) => working = next,
        }
    }

    Verdict {
        base_path: verdict.base_path.clone(),
        total_size: verdict.total_size,
        candidates: working,
    }
}
