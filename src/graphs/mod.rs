/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph implementations and loaders.

pub mod gexf;
pub mod prob_graph;
pub mod random;

pub mod prelude {
    pub use super::gexf::GexfGraph;
    pub use super::prob_graph::{ProbArc, ProbGraph};
    pub use super::random::ErdosRenyi;
}
