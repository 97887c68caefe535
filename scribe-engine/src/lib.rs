// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Text-driven sequence memory
//!
//! Streams a corpus one character or one word at a time through an SDR
//! encoder into a sequence model and measures how often the model
//! anticipated the next symbol.

pub mod config;
pub mod corpus;
pub mod encoding;
pub mod error;
pub mod model;
pub mod runtime;

pub use config::{list_config_files, EncoderConfig, LayerConfig, RuntimeConfig, TextMode};
pub use corpus::{SequenceCursor, Symbol, TextChunker, WordChunker};
pub use encoding::{ScalarEncoder, ScalarParams, Sdr, SymbolEncoder, WordRowEncoder, WordRowParams};
pub use error::{Result, ScribeError};
pub use model::{ModelLayer, SequenceModel, Snapshot, TransitionMemory};
pub use runtime::{HtmRuntime, InputSequence, TextRuntime, TextRuntimeBuilder};
