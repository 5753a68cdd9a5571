/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2026 The infmax developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Mixes the bits of a 64-bit value.
///
/// This is the 64-bit finalizer of MurmurHash3: a bijection on `u64` that
/// spreads every input bit over all output bits.
#[inline(always)]
pub fn mix64(x: u64) -> u64 {
    let mut state = x;
    state ^= state >> 33;
    state = state.wrapping_mul(0xff51_afd7_ed55_8ccd);
    state ^= state >> 33;
    state = state.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    state ^= state >> 33;
    state
}

/// Folds a sequence of words into a single well-mixed 64-bit value.
///
/// Each word is combined with the mixed state so far, so the result depends
/// on both the words and their order.
pub fn mix64_words(init: u64, words: &[u64]) -> u64 {
    words.iter().fold(mix64(init), |state, &word| {
        mix64(state ^ word.wrapping_add(0x9e37_79b9_7f4a_7c15))
    })
}
