// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! launchsniff inspects a directory tree that purports to contain an
//! installable, runnable piece of software (typically a game distribution)
//! and produces a [`Verdict`]: an ordered list of launch candidates, each
//! tagged with a flavor (what kind of runnable thing it is), an
//! architecture when meaningful, and enough metadata to let a downstream
//! launcher pick one and invoke it.
//!
//! ## Pipeline
//!
//! 1. [`configure`] walks a directory and sniffs every file into zero or
//!    one [`Candidate`], assembling a [`Verdict`].
//! 2. [`Verdict::filter`] narrows that verdict down to the best candidate
//!    (or candidates) for a requested OS/architecture.
//! 3. [`fix_permissions`] optionally repairs the executable bit on
//!    already-classified native/script candidates.
//!
//! This crate does not execute, sandbox, or sign anything it finds; it
//! only classifies and ranks.

mod consumer;
mod error;
mod ext;
mod filter;
mod model;
mod permissions;
mod probes;
mod sniff;
mod walk;

pub use consumer::{Consumer, NullConsumer, TracingConsumer};
pub use error::{Error, Result};
pub use ext::{extension, is_blacklisted_ext};
pub use filter::FilterOptions;
pub use model::{Arch, Candidate, Flavor, Os, Verdict, VerdictStats, WindowsInfo};
pub use permissions::{fix_permissions, FixOptions};
pub use sniff::sniff;
pub use walk::{configure, default_filter, ConfigureOptions};

impl Verdict {
    /// Narrows this verdict down to the best candidate(s) for `options`,
    /// returning a new, ranked copy. The receiver is never mutated.
    pub fn filter(&self, consumer: &dyn Consumer, options: FilterOptions) -> Verdict {
        filter::filter(self, consumer, options)
    }
}
