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

use thiserror::Error;

/// Errors that can terminate a compress/decompress stream.
///
/// All variants are fatal to the in-progress stream; nothing here is retried
/// internally. `DeterminismMismatch` from the design (a decoder silently
/// producing garbage because the model disagreed with itself between the
/// encode and decode runs) has no variant: it can't be detected from the
/// stream alone, so it isn't a runtime error, it's a deployment invariant
/// documented on [`crate::model::Model::next_logits`].
#[derive(Debug, Error)]
pub enum LmzipError {
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("decoder did not reach EOS within {max_tokens} tokens")]
    PayloadTruncated { max_tokens: usize },

    #[error("invalid hex payload")]
    InvalidHex(#[from] hex::FromHexError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
