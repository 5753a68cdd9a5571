/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]
#![allow(clippy::type_complexity)]

pub mod algo;
#[cfg(feature = "cli")]
pub mod cli;
pub mod graphs;
pub mod traits;
pub mod utils;

/// Prelude module to import everything from this crate.
pub mod prelude {
    pub use crate::algo::celf::{Celf, CelfResult, NodeGain, Selection};
    pub use crate::algo::{Cascade, SpreadEstimator};
    pub use crate::graphs::prelude::*;
    pub use crate::traits::*;
    pub use crate::utils::*;
}
