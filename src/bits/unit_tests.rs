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

use super::*;

#[test]
fn sink_packs_bits_msb_first() {
    let mut sink = BitSink::new();
    for bit in [true, false, true, false, true, false, true, false] {
        sink.write_bit(bit);
    }
    let bytes = sink.finish();
    // 10101010, then a terminator `1` bit starts a new byte: 10000000
    assert_eq!(bytes, vec![0b1010_1010, 0b1000_0000]);
}

#[test]
fn sink_write_bits_matches_repeated_write_bit() {
    let mut a = BitSink::new();
    a.write_bits(true, 5);
    let mut b = BitSink::new();
    for _ in 0..5 {
        b.write_bit(true);
    }
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn source_reads_back_what_sink_wrote() {
    let mut sink = BitSink::new();
    let pattern = [true, true, false, true, false, false, false, true, true];
    for bit in pattern {
        sink.write_bit(bit);
    }
    let bytes = sink.finish();

    let mut source = BitSource::new(&bytes);
    for bit in pattern {
        assert_eq!(source.read_bit(), bit);
    }
}

#[test]
fn source_zero_pads_past_end() {
    let bytes = [0b1111_1111u8];
    let mut source = BitSource::new(&bytes);
    for _ in 0..8 {
        assert!(source.read_bit());
    }
    for _ in 0..64 {
        assert!(!source.read_bit());
    }
}

#[test]
fn source_over_empty_slice_is_all_zero() {
    let mut source = BitSource::new(&[]);
    for _ in 0..16 {
        assert!(!source.read_bit());
    }
}
