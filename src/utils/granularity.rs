/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Relative or absolute specification of the granularity of parallel tasks.
///
/// This enum provides a simple (and possibly size-independent) way of
/// specifying how many nodes a worker grabs at a time during the parallel
/// initialization of [`Celf`](crate::algo::celf::Celf). The method
/// [`Granularity::granularity`] will return an appropriate value depending on
/// the variant, on the number of elements to process and on the number of
/// threads.
///
/// Since every node requires a full Monte Carlo estimate, tasks are much more
/// expensive than in a typical graph visit, and the default granularity is
/// correspondingly small.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Granularity {
    /// Absolute granularity.
    Absolute(usize),
    /// Relative granularity.
    ///
    /// Granularity will be first determined by the overall number of element to
    /// process, divided by the number of threads multiplied by the slack; then,
    /// the resulting granularity will be clamped between a minimum and a
    /// maximum value.
    Relative {
        slack: f64,
        min_len: usize,
        max_len: usize,
    },
}

impl core::default::Default for Granularity {
    /// Return a default relative granularity with slack factor 16,
    /// minimum length 1, and maximum length 1024.
    fn default() -> Self {
        Self::Relative {
            slack: 16.0,
            min_len: 1,
            max_len: 1024,
        }
    }
}

impl Granularity {
    /// Return a granularity for a given number of elements and threads.
    ///
    /// * [`Granularity::Absolute`]: granularity is just the fixed value.
    /// * [`Granularity::Relative`]: granularity will be first given by the
    ///   overall number of element to process, divided by the number of threads
    ///   multiplied by the slack; then, the resulting granularity will be
    ///   clamped between a minimum and a maximum value.
    ///
    /// The result is never zero.
    pub fn granularity(&self, num_elements: usize, num_threads: usize) -> usize {
        match *self {
            Granularity::Absolute(fixed) => fixed.max(1),
            Granularity::Relative {
                slack,
                min_len,
                max_len,
            } => {
                let tasks = ((num_threads as f64 * slack) as usize).max(1);
                (num_elements / tasks).max(min_len).min(max_len).max(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity() {
        assert_eq!(Granularity::Absolute(10).granularity(1000, 4), 10);
        assert_eq!(Granularity::Absolute(0).granularity(1000, 4), 1);
        assert_eq!(Granularity::default().granularity(6400, 4), 100);
        assert_eq!(Granularity::default().granularity(10, 4), 1);
        assert_eq!(Granularity::default().granularity(usize::MAX, 1), 1024);
    }
}
