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


use crate::bits::{BitSink, BitSource};
use log::debug;

/// Number of bits in the coder's interval state. The original design fits
/// the interval in 64 bits; `u128` is only used as a widening scratch type
/// for the `cum_c * range` products, which need up to ~114 bits.
const HALF: u64 = 1 << 63;
const QUARTER: u64 = 1 << 62;

/// 64-bit integer arithmetic encoder. Maintains an `[low, high]` interval
/// that narrows with every encoded symbol, renormalizing (E1/E2) whenever
/// the interval's top bit has settled, and deferring bits (E3) whenever the
/// interval straddles the midpoint but is still confined to the middle
/// half.
pub struct ArithmeticEncoder {
    low: u64,
    high: u64,
    /// Underflow (E3) steps deferred until the next E1/E2 emits a top bit.
    pending: usize,
    sink: BitSink,
}

impl ArithmeticEncoder {
    pub fn new() -> Self {
        Self {
            low: 0,
            high: u64::MAX,
            pending: 0,
            sink: BitSink::new(),
        }
    }

    /// Encodes `symbol` given the step's cumulative-frequency table.
    /// `cum_freqs[i]` is the cumulative frequency up to and including
    /// symbol `i`; `cum_freqs.last()` is the total `T`.
    pub fn encode_symbol(&mut self, cum_freqs: &[u64], symbol: usize) {
        let total = *cum_freqs.last().expect("cum_freqs is non-empty") as u128;
        let range = self.high as u128 - self.low as u128 + 1;

        let lo_c = if symbol == 0 { 0 } else { cum_freqs[symbol - 1] } as u128;
        let hi_c = cum_freqs[symbol] as u128;
        debug_assert!(lo_c < hi_c, "symbol {symbol} has an empty frequency interval");

        let low = self.low as u128;
        self.high = (low + (hi_c * range) / total - 1) as u64;
        self.low = (low + (lo_c * range) / total) as u64;

        self.renormalize();
        debug!("ArithmeticEncoder: encoded symbol {symbol}, interval now [{}, {}]", self.low, self.high);
    }

    /// E1/E2/E3 renormalization, shared by every `encode_symbol` call.
    fn renormalize(&mut self) {
        loop {
            if (self.low ^ self.high) & HALF == 0 {
                self.shift_bit();
                self.low <<= 1;
                self.high = (self.high << 1) | 1;
            } else if self.low & !self.high & QUARTER != 0 {
                self.pending += 1;
                self.low = (self.low << 1) ^ HALF;
                self.high = ((self.high ^ HALF) << 1) | HALF | 1;
            } else {
                break;
            }
        }
    }

    /// Emits the top bit of `low`, followed by `pending` copies of its
    /// complement (the deferred underflow resolution).
    fn shift_bit(&mut self) {
        let bit = self.low >> 63 == 1;
        self.sink.write_bit(bit);
        self.sink.write_bits(!bit, self.pending);
        self.pending = 0;
    }

    /// Finalizes the stream, returning the compressed byte payload. No
    /// interval-flushing tail beyond the sink's own terminator bit is
    /// written; the shared EOS symbol, not payload exhaustion, is what
    /// terminates decoding (see [`crate::driver`]).
    pub fn finish(self) -> Vec<u8> {
        self.sink.finish()
    }
}

impl Default for ArithmeticEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl ArithmeticEncoder {
    /// Current interval width, `high - low + 1`. Exposed only for the
    /// non-emptiness invariant test; the coder never needs this itself.
    fn interval_width(&self) -> u128 {
        self.high as u128 - self.low as u128 + 1
    }
}

/// Symmetric decoder: reads bits from a [`BitSource`] and, given the same
/// per-step cumulative-frequency tables the encoder used, recovers the
/// original symbol sequence exactly.
pub struct ArithmeticDecoder<'a> {
    low: u64,
    high: u64,
    code: u64,
    source: BitSource<'a>,
}

impl<'a> ArithmeticDecoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        let mut source = BitSource::new(bytes);
        let mut code = 0u64;
        for _ in 0..64 {
            code = (code << 1) | source.read_bit() as u64;
        }

        Self {
            low: 0,
            high: u64::MAX,
            code,
            source,
        }
    }

    /// Decodes the next symbol given the step's cumulative-frequency table.
    pub fn decode_symbol(&mut self, cum_freqs: &[u64]) -> usize {
        let total = *cum_freqs.last().expect("cum_freqs is non-empty") as u128;
        let range = self.high as u128 - self.low as u128 + 1;

        let value = (((self.code as u128 - self.low as u128 + 1) * total - 1) / range) as u64;
        // Smallest symbol whose cumulative frequency exceeds `value`; cum_freqs
        // is non-decreasing and strictly positive, so this is well-defined.
        let symbol = cum_freqs.partition_point(|&c| c <= value);

        let lo_c = if symbol == 0 { 0 } else { cum_freqs[symbol - 1] } as u128;
        let hi_c = cum_freqs[symbol] as u128;

        let low = self.low as u128;
        self.high = (low + (hi_c * range) / total - 1) as u64;
        self.low = (low + (lo_c * range) / total) as u64;

        self.renormalize();
        debug!("ArithmeticDecoder: decoded symbol {symbol}, interval now [{}, {}]", self.low, self.high);
        symbol
    }

    fn renormalize(&mut self) {
        loop {
            if (self.low ^ self.high) & HALF == 0 {
                self.low <<= 1;
                self.high = (self.high << 1) | 1;
                self.code = (self.code << 1) | self.source.read_bit() as u64;
            } else if self.low & !self.high & QUARTER != 0 {
                self.low = (self.low << 1) ^ HALF;
                self.high = ((self.high ^ HALF) << 1) | HALF | 1;
                self.code = (self.code & HALF)
                    | ((self.code << 1) & (u64::MAX >> 1))
                    | self.source.read_bit() as u64;
            } else {
                break;
            }
        }
    }

    /// Bytes of the input payload consumed so far, for progress reporting.
    pub fn bytes_consumed(&self) -> usize {
        self.source.bytes_consumed()
    }
}
