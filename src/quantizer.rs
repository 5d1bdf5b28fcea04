// lmzip: LLM-guided arithmetic coding for lossless text compression
// Copyright (C) 2025  Yair Ziv
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

/// Scale factor applied to each probability before rounding to an integer
/// frequency (`K` in the design).
const FREQ_SCALE: f64 = 4294967296.0; // 2^32

/// Numerically stable softmax in double precision, ascending-index
/// summation, max-subtract trick. Both the encoder and decoder must reach
/// bit-identical results from the same logits, which is why this is fixed
/// to one summation order rather than left to the caller's model library.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut exps: Vec<f64> = logits.iter().map(|&x| (x - max).exp()).collect();

    let mut sum = 0.0;
    for e in exps.iter() {
        sum += e;
    }
    for e in exps.iter_mut() {
        *e /= sum;
    }
    exps
}

/// Converts a probability vector into a monotonically non-decreasing
/// cumulative-frequency table with a guaranteed minimum count of 1 per
/// symbol, so every symbol remains codable. `cum_freqs[V-1]` is the total
/// `T`. Rounding is half-away-from-zero, matching `f64::round`; both sides
/// of the stream must use this exact rule for the coded stream to agree.
pub fn quantize(probs: &[f64]) -> Vec<u64> {
    let mut cum_freqs = Vec::with_capacity(probs.len());
    let mut accum: u64 = 0;

    for &p in probs {
        let freq = (FREQ_SCALE * p).round().max(1.0) as u64;
        accum = accum.checked_add(freq).expect("cumulative frequency overflowed u64");
        cum_freqs.push(accum);
    }
    cum_freqs
}
