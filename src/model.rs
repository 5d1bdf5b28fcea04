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

use crate::error::LmzipError;

/// A vocabulary index. Bounded well under 2^31 per this crate's scope; a
/// `u32` is ample and keeps the driver's context cheap to clone/grow.
pub type Token = u32;

/// A pluggable next-token probability source.
///
/// `next_logits` must be a pure, deterministic function of `context`: the
/// encoder and the decoder each call it once per step and must get
/// byte-identical logits back, or the two sides silently diverge. That
/// divergence isn't detectable from the compressed stream itself — it just
/// manifests as garbled decoded output. Keeping inference off
/// reduced-precision/non-deterministic-reduction code paths is a deployment
/// concern this trait can't enforce, only document.
pub trait Model {
    /// Number of symbols in the vocabulary (including EOS and, if present,
    /// BOS).
    fn vocab_size(&self) -> usize;

    /// The distinguished symbol whose observation terminates decoding.
    fn eos_token(&self) -> Token;

    /// The symbol used to prime prediction when the context is empty, or
    /// `None` if the model instead expects a uniform distribution at the
    /// start of a stream. Both the encoder and the decoder must apply the
    /// same rule.
    fn bos_token(&self) -> Option<Token> {
        None
    }

    /// Next-token logits given the tokens seen so far.
    fn next_logits(&mut self, context: &[Token]) -> Result<Vec<f64>, LmzipError>;
}

/// Bijection between text and token sequences, treated as opaque by the
/// rest of the crate.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, LmzipError>;
    fn detokenize(&self, tokens: &[Token]) -> Result<String, LmzipError>;
}

/// A probability model that assigns every symbol in the vocabulary an
/// equal probability, regardless of context. Useful as a always-available
/// fallback and as the model used to prove the coder itself is correct
/// independently of any real predictive power.
pub struct UniformModel {
    vocab_size: usize,
    eos: Token,
}

impl UniformModel {
    pub fn new(vocab_size: usize, eos: Token) -> Self {
        assert!(vocab_size > 0, "vocab_size must be non-zero");
        assert!((eos as usize) < vocab_size, "eos must be a valid vocabulary index");
        Self { vocab_size, eos }
    }
}

impl Model for UniformModel {
    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn eos_token(&self) -> Token {
        self.eos
    }

    fn next_logits(&mut self, _context: &[Token]) -> Result<Vec<f64>, LmzipError> {
        // Equal logits produce a uniform softmax regardless of their value.
        Ok(vec![0.0; self.vocab_size])
    }
}

/// An oracle model that assigns near-certain probability to the token that
/// actually comes next in a known sequence. Exercises the driver's
/// compression-effectiveness path (§8, degenerate-model scenario) without
/// needing a real predictive model: compressed length stays `O(1)`
/// regardless of how long the matched sequence is.
pub struct DegenerateModel {
    expected: Vec<Token>,
    vocab_size: usize,
    eos: Token,
}

impl DegenerateModel {
    /// `expected` is the token sequence (including its trailing EOS) this
    /// model predicts with near-certainty at each position.
    pub fn new(expected: Vec<Token>, vocab_size: usize, eos: Token) -> Self {
        assert!((eos as usize) < vocab_size);
        Self { expected, vocab_size, eos }
    }
}

impl Model for DegenerateModel {
    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn eos_token(&self) -> Token {
        self.eos
    }

    fn next_logits(&mut self, context: &[Token]) -> Result<Vec<f64>, LmzipError> {
        let mut logits = vec![0.0; self.vocab_size];
        if let Some(&predicted) = self.expected.get(context.len()) {
            logits[predicted as usize] = 64.0;
        }
        Ok(logits)
    }
}

/// A uniform model that additionally defines a beginning-of-stream token: the
/// very first prediction (the one step where the driver's real context is
/// still empty) is primed with that token instead of an empty context,
/// mirroring a real language model that embeds a BOS token before its first
/// forward pass. Every later step, and every context that isn't exactly
/// `[bos]`, stays perfectly uniform like [`UniformModel`].
pub struct BosPrimedUniformModel {
    vocab_size: usize,
    eos: Token,
    bos: Token,
}

impl BosPrimedUniformModel {
    pub fn new(vocab_size: usize, eos: Token, bos: Token) -> Self {
        assert!(vocab_size > 0, "vocab_size must be non-zero");
        assert!((eos as usize) < vocab_size, "eos must be a valid vocabulary index");
        assert!((bos as usize) < vocab_size, "bos must be a valid vocabulary index");
        Self { vocab_size, eos, bos }
    }
}

impl Model for BosPrimedUniformModel {
    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn eos_token(&self) -> Token {
        self.eos
    }

    fn bos_token(&self) -> Option<Token> {
        Some(self.bos)
    }

    fn next_logits(&mut self, context: &[Token]) -> Result<Vec<f64>, LmzipError> {
        let mut logits = vec![0.0; self.vocab_size];
        if context == [self.bos] {
            logits[self.bos as usize] = 8.0;
        }
        Ok(logits)
    }
}

/// Identity tokenizer over raw UTF-8 bytes. Token `b` (0..=255) maps to
/// byte value `b`; there is no symbol above 255 in this tokenizer's own
/// output (EOS/BOS are driver- and model-level concerns layered on top).
pub struct ByteTokenizer;

impl Tokenizer for ByteTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, LmzipError> {
        Ok(text.as_bytes().iter().map(|&b| b as Token).collect())
    }

    fn detokenize(&self, tokens: &[Token]) -> Result<String, LmzipError> {
        let bytes: Vec<u8> = tokens
            .iter()
            .map(|&t| {
                u8::try_from(t).map_err(|_| {
                    LmzipError::Tokenizer(format!("token {t} is not a valid byte"))
                })
            })
            .collect::<Result<_, _>>()?;
        String::from_utf8(bytes).map_err(|e| LmzipError::Tokenizer(e.to_string()))
    }
}
