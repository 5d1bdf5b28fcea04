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

use lmzip::coder::{ArithmeticDecoder, ArithmeticEncoder};
use lmzip::model::{BosPrimedUniformModel, ByteTokenizer, DegenerateModel, UniformModel};
use lmzip::CompressionDriver;

const VOCAB: usize = 257;
const EOS: u32 = 256;

fn driver() -> CompressionDriver<UniformModel, ByteTokenizer> {
    CompressionDriver::new(UniformModel::new(VOCAB, EOS), ByteTokenizer)
}

#[test]
fn hello_world_round_trips_exactly() {
    let mut d = driver();
    let compressed = d.compress("hello world").unwrap();
    assert_eq!(d.decompress(&compressed, 10_000).unwrap(), "hello world");
}

#[test]
fn multi_byte_characters_round_trip_exactly() {
    let mut d = driver();
    let text = "h\u{e9}llo \u{4e16}\u{754c}"; // "héllo 世界"
    let compressed = d.compress(text).unwrap();
    assert_eq!(d.decompress(&compressed, 10_000).unwrap(), text);
}

#[test]
fn empty_string_compresses_to_a_short_payload_and_round_trips() {
    let mut d = driver();
    let compressed = d.compress("").unwrap();
    // Just EOS under a uniform model: a handful of bytes at most.
    assert!(compressed.len() <= 8, "got {} bytes", compressed.len());
    assert_eq!(d.decompress(&compressed, 10_000).unwrap(), "");
}

#[test]
fn longer_natural_language_text_compresses_under_a_degenerate_model() {
    // The coder itself can't beat entropy under a uniform model on short
    // inputs, but a model that predicts the actual continuation with near
    // certainty must compress to O(1) regardless of input length, per the
    // degenerate-model scenario.
    let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
    let tokenizer = ByteTokenizer;
    let tokens: Vec<u32> = {
        use lmzip::Tokenizer;
        let mut t = tokenizer.tokenize(&text).unwrap();
        t.push(EOS);
        t
    };

    let mut d = CompressionDriver::new(DegenerateModel::new(tokens, VOCAB, EOS), ByteTokenizer);
    let compressed = d.compress(&text).unwrap();
    assert!(
        compressed.len() < 64,
        "expected near-constant compressed size, got {} bytes for {} input bytes",
        compressed.len(),
        text.len()
    );
    assert_eq!(d.decompress(&compressed, 10_000).unwrap(), text);
}

#[test]
fn bos_priming_perturbs_the_first_symbol_and_still_round_trips() {
    // Same vocabulary/EOS, differing only in whether the model defines a BOS
    // token. The initial context policy (spec.md "Initial context policy")
    // must make the two diverge on the very first coded symbol's frequency
    // table, and so on the bytes, while both still round-trip exactly.
    let text = "A";
    let mut primed = CompressionDriver::new(BosPrimedUniformModel::new(VOCAB, EOS, 0), ByteTokenizer);
    let mut plain = driver();

    let primed_bytes = primed.compress(text).unwrap();
    let plain_bytes = plain.compress(text).unwrap();

    assert_ne!(
        primed_bytes, plain_bytes,
        "a model-defined BOS token must change the first step's frequency table"
    );
    assert_eq!(primed.decompress(&primed_bytes, 10_000).unwrap(), text);
    assert_eq!(plain.decompress(&plain_bytes, 10_000).unwrap(), text);
}

#[test]
fn uniform_v4_scenario_from_the_design_round_trips() {
    // A synthetic uniform-distribution model over V=4, EOS=3, stream [0,1,2,3].
    let mut encoder = ArithmeticEncoder::new();
    let cdf = [1u64, 2, 3, 4]; // uniform: each symbol has frequency 1
    for &s in &[0usize, 1, 2, 3] {
        encoder.encode_symbol(&cdf, s);
    }
    let bytes = encoder.finish();
    assert!(bytes.len() >= 1, "4 symbols at 2 bits each must take at least 1 byte");

    let mut decoder = ArithmeticDecoder::new(&bytes);
    let mut decoded = Vec::new();
    loop {
        let s = decoder.decode_symbol(&cdf);
        if s == 3 {
            break;
        }
        decoded.push(s);
    }
    assert_eq!(decoded, vec![0, 1, 2]);
}

/// Small, dependency-free xorshift64 PRNG so the coder fuzz test below is
/// reproducible without pulling in a `rand` dependency the example pack
/// doesn't otherwise use.
struct Xorshift64(u64);

impl Xorshift64 {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn next_range(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

#[test]
fn ten_thousand_random_symbols_round_trip_through_the_coder_alone() {
    let mut rng = Xorshift64(0x9E3779B97F4A7C15);
    const V: usize = 16;
    const STEPS: usize = 10_000;

    let mut cdfs: Vec<[u64; V]> = Vec::with_capacity(STEPS);
    let mut symbols: Vec<usize> = Vec::with_capacity(STEPS);

    let mut encoder = ArithmeticEncoder::new();
    for _ in 0..STEPS {
        // Random, strictly increasing, all-positive frequency table.
        let mut freqs = [0u64; V];
        let mut cum = 0u64;
        for f in freqs.iter_mut() {
            cum += 1 + rng.next_range(50);
            *f = cum;
        }
        let symbol = rng.next_range(V as u64) as usize;

        encoder.encode_symbol(&freqs, symbol);
        cdfs.push(freqs);
        symbols.push(symbol);
    }
    let bytes = encoder.finish();

    let mut decoder = ArithmeticDecoder::new(&bytes);
    for (cdf, expected) in cdfs.iter().zip(symbols.iter()) {
        assert_eq!(decoder.decode_symbol(cdf), *expected);
    }
}
