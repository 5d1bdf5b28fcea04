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

use clap::ValueEnum;
use std::fmt::{Display, Formatter};

/// Builtin probability models the CLI can drive the coder with. Real
/// language-model inference is deliberately out of scope for this crate
/// (see the design notes); `Uniform` is the one built-in that is both
/// always available and statistically honest about its lack of predictive
/// power.
#[derive(Debug, Clone, ValueEnum)]
pub enum BuiltinModel {
    Uniform,
}

impl Display for BuiltinModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuiltinModel::Uniform => write!(f, "uniform"),
        }
    }
}

/// Vocabulary used by the CLI's byte-level tokenizer: the 256 byte values
/// plus one trailing EOS symbol.
pub const CLI_VOCAB_SIZE: usize = 257;
pub const CLI_EOS_TOKEN: u32 = 256;
