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

//! Lossless text compression by coupling a language model's next-token
//! distribution with an integer arithmetic coder.
//!
//! The [`coder`] and [`bits`] modules implement the coder in isolation from
//! any model; [`quantizer`] turns a probability vector into the integer
//! frequency table the coder needs; [`model`] defines the pluggable
//! prediction contract; [`driver`] ties all of these into the
//! predict-quantize-code loop. Model loading, tokenizer internals, and the
//! HTTP layer that would stream [`driver::Progress`] records to clients are
//! all out of scope for this crate.

pub mod bits;
pub mod coder;
pub mod driver;
pub mod error;
pub mod model;
pub mod quantizer;

pub use driver::{CompressionDriver, Progress, ProgressResult};
pub use error::LmzipError;
pub use model::{Model, Token, Tokenizer};
