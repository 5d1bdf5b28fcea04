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

use crate::coder::{ArithmeticDecoder, ArithmeticEncoder};
use crate::error::LmzipError;
use crate::model::{Model, Token, Tokenizer};
use crate::quantizer::{quantize, softmax};
use log::{debug, info};

/// One step of a compress/decompress stream, mirroring the progress records
/// the (out-of-scope) HTTP layer would serialize as server-sent events.
#[derive(Debug, Clone)]
pub struct Progress {
    pub progress: f64,
    /// Incrementally decoded text for this step, if any (decompression only).
    pub chunk: Option<String>,
    /// The finished payload/text, present only on the final record.
    pub result: Option<ProgressResult>,
}

#[derive(Debug, Clone)]
pub enum ProgressResult {
    Compressed(Vec<u8>),
    Decompressed(String),
}

impl Progress {
    fn step(progress: f64) -> Self {
        Self { progress, chunk: None, result: None }
    }

    fn final_compressed(bytes: Vec<u8>) -> Self {
        Self { progress: 1.0, chunk: None, result: Some(ProgressResult::Compressed(bytes)) }
    }

    fn final_decompressed(text: String) -> Self {
        Self { progress: 1.0, chunk: None, result: Some(ProgressResult::Decompressed(text)) }
    }

    pub fn is_final(&self) -> bool {
        self.result.is_some()
    }
}

/// Orchestrates the predict -> quantize -> encode (or decode) loop described
/// in the design: owns the growing token context fed to the model, and
/// hands back one [`Progress`] record per pulled step so a caller (e.g. a
/// streaming HTTP handler) can drive the stream token by token without this
/// crate owning an event loop.
pub struct CompressionDriver<M, T> {
    model: M,
    tokenizer: T,
}

impl<M: Model, T: Tokenizer> CompressionDriver<M, T> {
    pub fn new(model: M, tokenizer: T) -> Self {
        Self { model, tokenizer }
    }

    /// Compresses `text` in one call, discarding intermediate progress.
    pub fn compress(&mut self, text: &str) -> Result<Vec<u8>, LmzipError> {
        let mut last = None;
        for step in self.compress_iter(text)? {
            last = Some(step?);
        }
        match last.and_then(|p| p.result) {
            Some(ProgressResult::Compressed(bytes)) => Ok(bytes),
            _ => unreachable!("compress_iter always yields a final Compressed result"),
        }
    }

    /// Decompresses `bytes` in one call, discarding intermediate progress.
    /// `max_tokens` bounds the decode loop; exceeding it without observing
    /// EOS is a [`LmzipError::PayloadTruncated`].
    pub fn decompress(&mut self, bytes: &[u8], max_tokens: usize) -> Result<String, LmzipError> {
        let mut last = None;
        for step in self.decompress_iter(bytes, max_tokens) {
            last = Some(step?);
        }
        match last.and_then(|p| p.result) {
            Some(ProgressResult::Decompressed(text)) => Ok(text),
            _ => unreachable!("decompress_iter always yields a final Decompressed result"),
        }
    }

    /// State machine: `Idle -> Encoding -> Finalizing -> Done`, linear, no
    /// branching or retry. Returns an iterator that performs one token's
    /// worth of work per `next()` call.
    pub fn compress_iter(&mut self, text: &str) -> Result<CompressIter<'_, M, T>, LmzipError> {
        let mut tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(|e| LmzipError::Tokenizer(e.to_string()))?;
        tokens.push(self.model.eos_token());
        info!("CompressionDriver: compressing {} tokens (incl. EOS)", tokens.len());

        Ok(CompressIter {
            driver: self,
            tokens,
            index: 0,
            context: Vec::new(),
            encoder: Some(ArithmeticEncoder::new()),
            state: EncodeState::Encoding,
        })
    }

    /// State machine: `Idle -> Decoding -> Done`. EOS, not payload
    /// exhaustion, is the sole terminator; the byte stream is not
    /// self-delimiting.
    pub fn decompress_iter<'a>(
        &'a mut self,
        bytes: &'a [u8],
        max_tokens: usize,
    ) -> DecompressIter<'a, M, T> {
        DecompressIter {
            driver: self,
            decoder: ArithmeticDecoder::new(bytes),
            total_bytes: bytes.len(),
            context: Vec::new(),
            out: Vec::new(),
            max_tokens,
            state: DecodeState::Decoding,
        }
    }

}

/// Applies the initial context policy before asking the model to predict:
/// when the real context is still empty, priming uses the model's BOS token
/// if it defines one, and the literal empty context (a flat distribution for
/// every built-in model here) otherwise. Centralizing this in the driver,
/// rather than leaving each `Model` impl to re-derive it, is what guarantees
/// the encoder and decoder apply the identical rule.
fn predict_cdf<M: Model>(model: &mut M, context: &[Token]) -> Result<Vec<u64>, LmzipError> {
    let logits = if context.is_empty() {
        match model.bos_token() {
            Some(bos) => model.next_logits(&[bos])?,
            None => model.next_logits(context)?,
        }
    } else {
        model.next_logits(context)?
    };
    Ok(quantize(&softmax(&logits)))
}

enum EncodeState {
    Encoding,
    Finalizing,
    Done,
}

enum DecodeState {
    Decoding,
    Done,
}

/// Iterator driving one token of compression per `next()` call.
pub struct CompressIter<'d, M, T> {
    driver: &'d mut CompressionDriver<M, T>,
    tokens: Vec<Token>,
    index: usize,
    context: Vec<Token>,
    encoder: Option<ArithmeticEncoder>,
    state: EncodeState,
}

impl<M: Model, T: Tokenizer> Iterator for CompressIter<'_, M, T> {
    type Item = Result<Progress, LmzipError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            EncodeState::Encoding => {
                let token = self.tokens[self.index];
                let cdf = match predict_cdf(&mut self.driver.model, &self.context) {
                    Ok(cdf) => cdf,
                    Err(e) => {
                        self.state = EncodeState::Done;
                        return Some(Err(e));
                    }
                };

                self.encoder.as_mut().expect("encoder present while Encoding").encode_symbol(&cdf, token as usize);
                self.context.push(token);
                self.index += 1;

                let progress = self.index as f64 / self.tokens.len() as f64;
                debug!("CompressIter: step {}/{} (token {token})", self.index, self.tokens.len());

                if self.index == self.tokens.len() {
                    self.state = EncodeState::Finalizing;
                }
                Some(Ok(Progress::step(progress)))
            }
            EncodeState::Finalizing => {
                let bytes = self.encoder.take().expect("encoder present while Finalizing").finish();
                self.state = EncodeState::Done;
                Some(Ok(Progress::final_compressed(bytes)))
            }
            EncodeState::Done => None,
        }
    }
}

/// Iterator driving one token of decompression per `next()` call.
pub struct DecompressIter<'d, M, T> {
    driver: &'d mut CompressionDriver<M, T>,
    decoder: ArithmeticDecoder<'d>,
    total_bytes: usize,
    context: Vec<Token>,
    out: Vec<Token>,
    max_tokens: usize,
    state: DecodeState,
}

impl<M: Model, T: Tokenizer> Iterator for DecompressIter<'_, M, T> {
    type Item = Result<Progress, LmzipError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            DecodeState::Decoding => {
                if self.out.len() >= self.max_tokens {
                    self.state = DecodeState::Done;
                    return Some(Err(LmzipError::PayloadTruncated { max_tokens: self.max_tokens }));
                }

                let cdf = match predict_cdf(&mut self.driver.model, &self.context) {
                    Ok(cdf) => cdf,
                    Err(e) => {
                        self.state = DecodeState::Done;
                        return Some(Err(e));
                    }
                };

                let symbol = self.decoder.decode_symbol(&cdf) as Token;
                if symbol == self.driver.model.eos_token() {
                    let text = match self.driver.tokenizer.detokenize(&self.out) {
                        Ok(text) => text,
                        Err(e) => {
                            self.state = DecodeState::Done;
                            return Some(Err(e));
                        }
                    };
                    self.state = DecodeState::Done;
                    return Some(Ok(Progress::final_decompressed(text)));
                }

                self.out.push(symbol);
                self.context.push(symbol);

                let progress = if self.total_bytes == 0 {
                    0.5
                } else {
                    (self.decoder.bytes_consumed() as f64 / self.total_bytes as f64).min(0.99)
                };
                debug!("DecompressIter: decoded {} tokens so far", self.out.len());

                let chunk = self
                    .driver
                    .tokenizer
                    .detokenize(std::slice::from_ref(&symbol))
                    .ok();
                Some(Ok(Progress { progress, chunk, result: None }))
            }
            DecodeState::Done => None,
        }
    }
}

