/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Miscellaneous utilities.

mod granularity;
pub use granularity::Granularity;

mod mix64;
pub use mix64::{mix64, mix64_words};

pub mod seeding;
pub use seeding::{Entropy, Fixed, RngFactory, Seeder};
