// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Love2D probe: classifies a directory containing `conf.lua` as a Love
//! game. This is a naming-convention probe, not a content probe — Love
//! doesn't define a magic number for its project directories.

use crate::model::{Candidate, Flavor};

/// Classifies `dir` (the containing directory of a `conf.lua` file) as a
/// Love game candidate.
pub fn probe_dir(dir: &str) -> Candidate {
    Candidate::new(dir, Flavor::Love)
}
