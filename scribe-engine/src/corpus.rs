// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Corpus cursors: endless, epoch-counted iteration over a loaded text.
//!
//! The corpus is read once at construction and never mutated afterwards.
//! [`TextChunker`] yields raw bytes, [`WordChunker`] yields lowercase
//! alphabetic tokens. Both wrap around at the end of the sequence and count
//! completed passes as epochs.

use std::path::{Path, PathBuf};

use crate::error::{Result, ScribeError};

/// Path reported for cursors built from an in-memory string.
pub const MEMORY_PATH: &str = "<memory>";

/// A symbol that can be shown in a diagnostic context window.
pub trait Symbol: Clone + Send + Sync + 'static {
    /// Symbols shown on each side of the centre symbol.
    const CONTEXT_RADIUS: usize;
    /// Separator placed between rendered symbols.
    const SEPARATOR: &'static str;

    /// Human-readable rendering of the symbol.
    fn render(&self) -> String;
}

impl Symbol for u8 {
    const CONTEXT_RADIUS: usize = 10;
    const SEPARATOR: &'static str = "";

    fn render(&self) -> String {
        printable(*self).to_string()
    }
}

impl Symbol for String {
    const CONTEXT_RADIUS: usize = 3;
    const SEPARATOR: &'static str = " ";

    fn render(&self) -> String {
        self.clone()
    }
}

/// Map a byte to a displayable character: whitespace controls become a space,
/// everything else outside printable ASCII becomes `.`.
pub fn printable(b: u8) -> char {
    match b {
        b'\n' | b'\r' | b'\t' => ' ',
        32..=126 => b as char,
        _ => '.',
    }
}

/// Wrap-around cursor over an immutable symbol sequence.
///
/// `position` is always in `[0, len)`. Every [`next`](Self::next) bumps
/// `total_steps`; passing the end resets `position` to 0 and bumps `epoch`.
#[derive(Debug, Clone)]
pub struct SequenceCursor<S> {
    symbols: Vec<S>,
    path: PathBuf,
    position: usize,
    epoch: u64,
    total_steps: u64,
}

/// Character-mode cursor over the raw bytes of a text.
pub type TextChunker = SequenceCursor<u8>;

/// Word-mode cursor over lowercase alphabetic tokens.
pub type WordChunker = SequenceCursor<String>;

impl<S: Symbol> SequenceCursor<S> {
    fn with_symbols(symbols: Vec<S>, path: PathBuf, what: &str) -> Result<Self> {
        if symbols.is_empty() {
            return Err(ScribeError::EmptyInput(format!(
                "no {} found in {}",
                what,
                path.display()
            )));
        }
        Ok(Self {
            symbols,
            path,
            position: 0,
            epoch: 0,
            total_steps: 0,
        })
    }

    /// Return the current symbol and advance, wrapping at the end.
    ///
    /// The cursor never runs dry, so this yields `S` rather than `Option<S>`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> S {
        let value = self.symbols[self.position].clone();
        self.position += 1;
        self.total_steps += 1;
        if self.position >= self.symbols.len() {
            self.position = 0;
            self.epoch += 1;
        }
        value
    }

    /// The current symbol, without advancing.
    pub fn peek(&self) -> &S {
        &self.symbols[self.position]
    }

    /// Rewind to the start; the loaded sequence is untouched.
    pub fn reset(&mut self) {
        self.position = 0;
        self.epoch = 0;
        self.total_steps = 0;
    }

    /// The symbol `offset` positions before the cursor, wrapping.
    fn behind(&self, offset: usize) -> &S {
        let len = self.symbols.len();
        let idx = (self.position + len - offset % len) % len;
        &self.symbols[idx]
    }

    /// Render the symbols around the most recently yielded one, which is
    /// shown bracketed. Indexing wraps in both directions.
    pub fn context_window(&self) -> String {
        let len = self.symbols.len();
        // position has already moved past the last yielded symbol
        let centre = (self.position + len - 1) % len;
        let radius = S::CONTEXT_RADIUS;

        let mut parts = Vec::with_capacity(2 * radius + 1);
        for j in 0..=2 * radius {
            let idx = (centre + len * (radius / len + 1) + j - radius) % len;
            let rendered = self.symbols[idx].render();
            if j == radius {
                parts.push(format!("[{}]", rendered));
            } else {
                parts.push(rendered);
            }
        }
        parts.join(S::SEPARATOR)
    }

    /// The most recently yielded symbol, if any step has been taken.
    pub fn last(&self) -> Option<&S> {
        (self.total_steps > 0).then(|| self.behind(1))
    }

    /// Number of symbols in one epoch.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Completed passes through the sequence.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Symbols yielded since construction or the last reset.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Source file, or `<memory>` for in-memory corpora.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn symbols(&self) -> &[S] {
        &self.symbols
    }
}

fn read_corpus(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| ScribeError::NotFound {
        path: path.to_path_buf(),
        source,
    })
}

// ─── Character mode ─────────────────────────────────

impl SequenceCursor<u8> {
    /// Load a text file; each byte is one symbol.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = read_corpus(path)?;
        Self::with_symbols(bytes, path.to_path_buf(), "characters")
    }

    pub fn from_string(text: &str) -> Result<Self> {
        Self::with_symbols(text.as_bytes().to_vec(), PathBuf::from(MEMORY_PATH), "characters")
    }

    /// The symbol `offset` positions ahead of the cursor, wrapping.
    pub fn peek_at(&self, offset: usize) -> u8 {
        self.symbols[(self.position + offset) % self.symbols.len()]
    }

    /// The full loaded text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.symbols).into_owned()
    }
}

// ─── Word mode ──────────────────────────────────────

impl SequenceCursor<String> {
    /// Load a text file and split it into lowercase alphabetic words.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = read_corpus(path)?;
        Self::with_symbols(tokenize(&bytes), path.to_path_buf(), "words")
    }

    pub fn from_string(text: &str) -> Result<Self> {
        Self::with_symbols(tokenize(text.as_bytes()), PathBuf::from(MEMORY_PATH), "words")
    }

    pub fn words(&self) -> &[String] {
        &self.symbols
    }
}

/// Split text into maximal runs of ASCII letters, lowercased.
/// Everything else is a separator and is dropped.
pub fn tokenize(text: &[u8]) -> Vec<String> {
    text.split(|b| !b.is_ascii_alphabetic())
        .filter(|run| !run.is_empty())
        .map(|run| run.iter().map(|b| b.to_ascii_lowercase() as char).collect())
        .collect()
}
