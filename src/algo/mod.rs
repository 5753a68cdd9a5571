/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

pub mod cascade;
pub use cascade::Cascade;

pub mod spread;
pub use spread::SpreadEstimator;

pub mod celf;
