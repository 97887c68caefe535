// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Symbol Encoding into Sparse Distributed Representations
//!
//! Two encoding strategies map a discrete symbol to a fixed-width binary vector:
//! 1. **Scalar**: a contiguous window of `w` active bits slides across `n` bits
//!    as the value grows, so neighbouring values share most of their bits
//! 2. **Word rows**: one row per letter position, each row activating a
//!    letter-specific block of `letter_bits` bits
//!
//! Both guarantee a fixed population count per configuration, which is what
//! the downstream sequence memory relies on.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScribeError};

/// A sparse distributed representation: one `0`/`1` byte per bit.
pub type Sdr = Vec<u8>;

/// Number of active bits in an SDR.
pub fn population(sdr: &[u8]) -> usize {
    sdr.iter().filter(|&&b| b != 0).count()
}

/// Number of positions active in both SDRs.
pub fn shared_bits(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).filter(|(&x, &y)| x != 0 && y != 0).count()
}

/// Trait for turning one corpus symbol into model input.
///
/// `S` is the symbol type yielded by the matching corpus cursor
/// (`u8` in character mode, `String` in word mode).
pub trait SymbolEncoder<S>: Send + Sync {
    /// Encode a symbol into an SDR of length [`width`](Self::width).
    fn encode_symbol(&self, symbol: &S) -> Sdr;

    /// Total number of bits produced per symbol.
    fn width(&self) -> usize;

    /// Name of this encoding strategy.
    fn name(&self) -> &str;
}

// ─── Scalar Encoder ─────────────────────────────────

/// Parameters for [`ScalarEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarParams {
    /// Total number of bits in the output SDR
    pub n: usize,
    /// Number of active bits per encoding
    pub w: usize,
    /// Minimum input value (inclusive)
    pub min_val: i64,
    /// Maximum input value (inclusive)
    pub max_val: i64,
}

impl Default for ScalarParams {
    fn default() -> Self {
        Self {
            n: 400,
            w: 21,
            min_val: 0,
            max_val: 127,
        }
    }
}

/// Scalar encoding: a window of `w` contiguous active bits whose start offset
/// grows with the value.
///
/// `start = floor((v - min) / (max - min) · (n - w) + 0.5)`, bits `[start, start + w)` set.
///
/// Values outside `[min_val, max_val]` are clamped, so every encoding has
/// exactly `w` active bits and the window never moves left as the value grows.
#[derive(Debug, Clone)]
pub struct ScalarEncoder {
    params: ScalarParams,
    /// Valid window start offsets are `0..=num_buckets`
    num_buckets: usize,
    /// `max_val - min_val`, widened so the full `i64` span fits
    range: u64,
}

impl ScalarEncoder {
    pub fn new(params: ScalarParams) -> Result<Self> {
        if params.n == 0 {
            return Err(ScribeError::invalid("ScalarEncoder: n must be > 0"));
        }
        if params.w == 0 {
            return Err(ScribeError::invalid("ScalarEncoder: w must be > 0"));
        }
        if params.w > params.n {
            return Err(ScribeError::invalid(format!(
                "ScalarEncoder: w ({}) must be <= n ({})",
                params.w, params.n
            )));
        }
        if params.max_val < params.min_val {
            return Err(ScribeError::invalid(format!(
                "ScalarEncoder: max_val ({}) must be >= min_val ({})",
                params.max_val, params.min_val
            )));
        }

        Ok(Self {
            params,
            num_buckets: params.n - params.w,
            range: span(params.min_val, params.max_val),
        })
    }

    /// Encode a value into an SDR of length `n`.
    pub fn encode(&self, value: i64) -> Sdr {
        let start = self.window_start(value);
        let mut sdr = vec![0u8; self.params.n];
        sdr[start..start + self.params.w].fill(1);
        sdr
    }

    /// Number of active bits shared by the encodings of two values.
    pub fn overlap(&self, a: i64, b: i64) -> usize {
        shared_bits(&self.encode(a), &self.encode(b))
    }

    /// Offset of the first active bit for `value`.
    pub fn window_start(&self, value: i64) -> usize {
        let value = value.clamp(self.params.min_val, self.params.max_val);
        if self.range == 0 {
            return 0;
        }
        let frac = span(self.params.min_val, value) as f64 / self.range as f64;
        let start = (frac * self.num_buckets as f64 + 0.5).floor() as usize;
        start.min(self.num_buckets)
    }

    pub fn params(&self) -> &ScalarParams {
        &self.params
    }

    pub fn total_bits(&self) -> usize {
        self.params.n
    }

    pub fn active_bits(&self) -> usize {
        self.params.w
    }

    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }
}

/// Distance from `lo` up to `hi` (`lo <= hi`) without overflowing `i64`.
fn span(lo: i64, hi: i64) -> u64 {
    (hi as i128 - lo as i128) as u64
}

impl Default for ScalarEncoder {
    fn default() -> Self {
        let params = ScalarParams::default();
        Self {
            params,
            num_buckets: params.n - params.w,
            range: span(params.min_val, params.max_val),
        }
    }
}

impl SymbolEncoder<u8> for ScalarEncoder {
    fn encode_symbol(&self, symbol: &u8) -> Sdr {
        self.encode(i64::from(*symbol))
    }

    fn width(&self) -> usize {
        self.params.n
    }

    fn name(&self) -> &str {
        "scalar"
    }
}

// ─── Word Row Encoder ───────────────────────────────

/// Parameters for [`WordRowEncoder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRowParams {
    /// One row per letter position
    pub rows: usize,
    /// Bits per row; must equal `letter_bits * (alphabet_len + 1)`
    pub cols: usize,
    /// Width of each letter block
    pub letter_bits: usize,
    pub alphabet: String,
}

impl Default for WordRowParams {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 108,
            letter_bits: 4,
            alphabet: "abcdefghijklmnopqrstuvwxyz".to_string(),
        }
    }
}

/// Word-row encoding: row `r` activates the block of the word's `r`-th letter.
///
/// Letter `alphabet[i]` owns columns `[i·letter_bits, (i+1)·letter_bits)` of its
/// row; letters outside the alphabet share the trailing unknown block. Rows
/// past the end of the word stay zero.
#[derive(Debug, Clone)]
pub struct WordRowEncoder {
    params: WordRowParams,
    alphabet: Vec<char>,
}

impl WordRowEncoder {
    pub fn new(params: WordRowParams) -> Result<Self> {
        if params.rows == 0 {
            return Err(ScribeError::invalid("WordRowEncoder: rows must be > 0"));
        }
        if params.cols == 0 {
            return Err(ScribeError::invalid("WordRowEncoder: cols must be > 0"));
        }
        if params.letter_bits == 0 {
            return Err(ScribeError::invalid("WordRowEncoder: letter_bits must be > 0"));
        }
        let alphabet: Vec<char> = params.alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(ScribeError::invalid("WordRowEncoder: alphabet must not be empty"));
        }
        let required = params.letter_bits * (alphabet.len() + 1);
        if params.cols != required {
            return Err(ScribeError::invalid(format!(
                "WordRowEncoder: cols ({}) must equal letter_bits * (alphabet_size + 1) = {}",
                params.cols, required
            )));
        }

        Ok(Self { params, alphabet })
    }

    /// Encode a word into an SDR of length `rows · cols`.
    pub fn encode(&self, word: &str) -> Sdr {
        let lb = self.params.letter_bits;
        let mut sdr = vec![0u8; self.total_bits()];
        for (row, c) in word.chars().take(self.params.rows).enumerate() {
            let start = row * self.params.cols + self.bucket_for_char(c) * lb;
            sdr[start..start + lb].fill(1);
        }
        sdr
    }

    /// Bucket index of a letter: its alphabet position after lowercasing,
    /// or `alphabet_len` for letters outside the alphabet.
    pub fn bucket_for_char(&self, c: char) -> usize {
        let lower = c.to_lowercase().next().unwrap_or(c);
        self.alphabet
            .iter()
            .position(|&a| a == lower)
            .unwrap_or(self.alphabet.len())
    }

    /// Bucket reserved for letters outside the alphabet.
    pub fn unknown_bucket(&self) -> usize {
        self.alphabet.len()
    }

    pub fn params(&self) -> &WordRowParams {
        &self.params
    }

    pub fn total_bits(&self) -> usize {
        self.params.rows * self.params.cols
    }
}

impl SymbolEncoder<String> for WordRowEncoder {
    fn encode_symbol(&self, symbol: &String) -> Sdr {
        self.encode(symbol)
    }

    fn width(&self) -> usize {
        self.total_bits()
    }

    fn name(&self) -> &str {
        "word_rows"
    }
}
