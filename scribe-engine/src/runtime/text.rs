// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! TextRuntime: replays a corpus into a sequence model
//!
//! Each call to `step()` runs, per symbol:
//! 1. Prediction check against the snapshot left by the previous step
//! 2. Feed: next symbol → encoder → `set_input` → `step(1)`
//! 3. Record the fed symbol for display
//! 4. Optional per-step log line
//!
//! The check must precede the feed: afterwards the snapshot would describe
//! the symbol just fed rather than the model's earlier prediction of it.

use std::path::Path;

use tracing::info;

use super::{HtmRuntime, InputSequence};
use crate::config::{RuntimeConfig, TextMode};
use crate::corpus::{SequenceCursor, Symbol, TextChunker, WordChunker};
use crate::encoding::{ScalarEncoder, Sdr, SymbolEncoder, WordRowEncoder};
use crate::error::{Result, ScribeError};
use crate::model::{
    DistalSynapseQuery, ModelLayer, ProximalSynapseQuery, SequenceModel, Snapshot,
    TransitionMemory,
};

const DEFAULT_NAME: &str = "scribe";

/// A cursor paired with the encoder for its symbol type.
struct Channel<S, E> {
    cursor: SequenceCursor<S>,
    encoder: E,
}

impl<S: Symbol, E: SymbolEncoder<S>> Channel<S, E> {
    fn next_sdr(&mut self) -> (S, Sdr) {
        let symbol = self.cursor.next();
        let sdr = self.encoder.encode_symbol(&symbol);
        (symbol, sdr)
    }
}

enum Input {
    Character(Channel<u8, ScalarEncoder>),
    WordRows(Channel<String, WordRowEncoder>),
}

impl Input {
    fn mode(&self) -> TextMode {
        match self {
            Self::Character(_) => TextMode::Character,
            Self::WordRows(_) => TextMode::WordRows,
        }
    }

    fn width(&self) -> usize {
        match self {
            Self::Character(ch) => ch.encoder.width(),
            Self::WordRows(ch) => ch.encoder.width(),
        }
    }

    fn size(&self) -> usize {
        match self {
            Self::Character(ch) => ch.cursor.size(),
            Self::WordRows(ch) => ch.cursor.size(),
        }
    }

    fn epoch(&self) -> u64 {
        match self {
            Self::Character(ch) => ch.cursor.epoch(),
            Self::WordRows(ch) => ch.cursor.epoch(),
        }
    }

    fn total_steps(&self) -> u64 {
        match self {
            Self::Character(ch) => ch.cursor.total_steps(),
            Self::WordRows(ch) => ch.cursor.total_steps(),
        }
    }

    fn context(&self) -> String {
        match self {
            Self::Character(ch) => ch.cursor.context_window(),
            Self::WordRows(ch) => ch.cursor.context_window(),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Character(ch) => ch.cursor.path(),
            Self::WordRows(ch) => ch.cursor.path(),
        }
    }
}

/// Drives a [`SequenceModel`] with symbols from one corpus and tracks how
/// often the model anticipated each input.
pub struct TextRuntime {
    model: Box<dyn SequenceModel>,
    input: Input,
    name: String,
    active_layer: usize,
    log_text: bool,
    last_char: u8,
    last_word: String,
    correct_predictions: u64,
    total_predictions: u64,
}

impl TextRuntime {
    pub fn builder() -> TextRuntimeBuilder {
        TextRuntimeBuilder::default()
    }

    /// Build the reference model, cursor and encoder described by `config`,
    /// reading the corpus from `input_path`.
    pub fn from_config(config: &RuntimeConfig, input_path: impl AsRef<Path>) -> Result<Self> {
        let model = TransitionMemory::from_config(config)?;
        let builder = Self::builder().name(config.display_name()).model(model);
        let builder = match config.text.mode {
            TextMode::Character => builder
                .text_chunker(TextChunker::open(input_path)?)
                .scalar_encoder(ScalarEncoder::new(config.scalar_params())?),
            TextMode::WordRows => builder
                .word_chunker(WordChunker::open(input_path)?)
                .word_encoder(WordRowEncoder::new(config.word_row_params())?),
        };
        builder.build()
    }

    /// Compare the model's prior prediction with the columns now active.
    ///
    /// Counts a step as correct when a strict majority of the bottom layer's
    /// active columns had a predicted cell. Skipped until the model has
    /// processed at least one input.
    fn check_prediction(&mut self) {
        if self.total_predictions == 0 && self.model.timestep() == 0 {
            return;
        }
        let Some(bottom) = self.model.layer(0) else {
            return;
        };
        let snap = bottom.snapshot();
        if snap.is_empty() {
            return;
        }

        let mut predicted_and_active = 0usize;
        let mut total_active = 0usize;
        for &idx in &snap.active_column_indices {
            if let Some(predicted) = snap.column_predicted(idx) {
                total_active += 1;
                if predicted {
                    predicted_and_active += 1;
                }
            }
        }
        if total_active > 0 && predicted_and_active > total_active / 2 {
            self.correct_predictions += 1;
        }
        self.total_predictions += 1;
    }

    fn feed_next(&mut self) -> anyhow::Result<()> {
        let sdr = match &mut self.input {
            Input::Character(ch) => {
                let (symbol, sdr) = ch.next_sdr();
                self.last_char = symbol;
                sdr
            }
            Input::WordRows(ch) => {
                let (symbol, sdr) = ch.next_sdr();
                self.last_word = symbol;
                sdr
            }
        };
        self.model.set_input(&sdr)?;
        self.model.step(1)
    }

    fn selected_layer(&self) -> Option<&dyn ModelLayer> {
        self.model.layer(self.active_layer)
    }

    // ─── Text-specific accessors ───

    pub fn input_mode(&self) -> TextMode {
        self.input.mode()
    }

    /// Symbols per epoch (characters or words).
    pub fn input_size(&self) -> usize {
        self.input.size()
    }

    pub fn input_epoch(&self) -> u64 {
        self.input.epoch()
    }

    pub fn input_total_steps(&self) -> u64 {
        self.input.total_steps()
    }

    /// Bits per encoded symbol; always equals the model's input size.
    pub fn input_width(&self) -> usize {
        self.input.width()
    }

    pub fn chunker(&self) -> Option<&TextChunker> {
        match &self.input {
            Input::Character(ch) => Some(&ch.cursor),
            Input::WordRows(_) => None,
        }
    }

    pub fn word_chunker(&self) -> Option<&WordChunker> {
        match &self.input {
            Input::WordRows(ch) => Some(&ch.cursor),
            Input::Character(_) => None,
        }
    }

    pub fn encoder(&self) -> Option<&ScalarEncoder> {
        match &self.input {
            Input::Character(ch) => Some(&ch.encoder),
            Input::WordRows(_) => None,
        }
    }

    pub fn word_encoder(&self) -> Option<&WordRowEncoder> {
        match &self.input {
            Input::WordRows(ch) => Some(&ch.encoder),
            Input::Character(_) => None,
        }
    }

    pub fn model(&self) -> &dyn SequenceModel {
        self.model.as_ref()
    }

    /// Byte most recently fed in character mode (`0` before the first step).
    pub fn last_char(&self) -> u8 {
        self.last_char
    }

    /// Word most recently fed in word mode (empty before the first step).
    pub fn last_word(&self) -> &str {
        &self.last_word
    }

    /// Emit one log line per fed symbol.
    pub fn set_log_text(&mut self, enabled: bool) {
        self.log_text = enabled;
    }

    pub fn log_text(&self) -> bool {
        self.log_text
    }

    pub fn correct_predictions(&self) -> u64 {
        self.correct_predictions
    }

    pub fn total_predictions(&self) -> u64 {
        self.total_predictions
    }
}

impl HtmRuntime for TextRuntime {
    fn snapshot(&self) -> Snapshot {
        self.selected_layer()
            .map(|l| l.snapshot())
            .unwrap_or_default()
    }

    fn step(&mut self, n: usize) -> anyhow::Result<()> {
        for _ in 0..n {
            self.check_prediction();
            self.feed_next()?;

            if self.log_text {
                info!(
                    "[text] step={}  epoch={}  accuracy={:.1}%  | {}",
                    self.model.timestep(),
                    self.input.epoch(),
                    self.prediction_accuracy() * 100.0,
                    self.input.context()
                );
            }
        }
        Ok(())
    }

    fn query_proximal(&self, column_x: usize, column_y: usize) -> ProximalSynapseQuery {
        self.selected_layer()
            .map(|l| l.query_proximal(column_x, column_y))
            .unwrap_or_default()
    }

    fn num_segments(&self, column_x: usize, column_y: usize, cell: usize) -> usize {
        self.selected_layer()
            .map_or(0, |l| l.num_segments(column_x, column_y, cell))
    }

    fn query_distal(
        &self,
        column_x: usize,
        column_y: usize,
        cell: usize,
        segment: usize,
    ) -> DistalSynapseQuery {
        self.selected_layer()
            .map(|l| l.query_distal(column_x, column_y, cell, segment))
            .unwrap_or_default()
    }

    fn input_sequences(&self) -> Vec<InputSequence> {
        vec![InputSequence {
            id: 0,
            name: format!("Text: {}", self.input.path().display()),
        }]
    }

    fn activation_threshold(&self) -> usize {
        self.selected_layer().map_or(0, |l| l.activation_threshold())
    }

    fn name(&self) -> String {
        format!(
            "{} (Layer {}/{})",
            self.name,
            self.active_layer,
            self.num_layers()
        )
    }

    fn layer_options(&self) -> Vec<InputSequence> {
        (0..self.num_layers())
            .map(|i| InputSequence {
                id: i,
                name: format!("Layer {}", i),
            })
            .collect()
    }

    fn num_layers(&self) -> usize {
        self.model.num_layers()
    }

    fn active_layer(&self) -> usize {
        self.active_layer
    }

    fn set_active_layer(&mut self, idx: usize) {
        if idx < self.num_layers() {
            self.active_layer = idx;
        }
    }

    fn prediction_accuracy(&self) -> f64 {
        if self.total_predictions == 0 {
            return 0.0;
        }
        self.correct_predictions as f64 / self.total_predictions as f64
    }

    fn input_context(&self) -> String {
        self.input.context()
    }
}

// ─── Builder ────────────────────────────────────────

/// Assembles a [`TextRuntime`]; exactly one input mode must be supplied.
#[derive(Default)]
pub struct TextRuntimeBuilder {
    name: Option<String>,
    model: Option<Box<dyn SequenceModel>>,
    text_chunker: Option<TextChunker>,
    scalar_encoder: Option<ScalarEncoder>,
    word_chunker: Option<WordChunker>,
    word_encoder: Option<WordRowEncoder>,
}

impl TextRuntimeBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn model(self, model: impl SequenceModel + 'static) -> Self {
        self.boxed_model(Box::new(model))
    }

    pub fn boxed_model(mut self, model: Box<dyn SequenceModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn text_chunker(mut self, chunker: TextChunker) -> Self {
        self.text_chunker = Some(chunker);
        self
    }

    pub fn scalar_encoder(mut self, encoder: ScalarEncoder) -> Self {
        self.scalar_encoder = Some(encoder);
        self
    }

    pub fn word_chunker(mut self, chunker: WordChunker) -> Self {
        self.word_chunker = Some(chunker);
        self
    }

    pub fn word_encoder(mut self, encoder: WordRowEncoder) -> Self {
        self.word_encoder = Some(encoder);
        self
    }

    pub fn build(self) -> Result<TextRuntime> {
        let model = self.model.ok_or(ScribeError::NullDependency("sequence model"))?;

        let input = match (self.text_chunker, self.word_chunker) {
            (Some(_), Some(_)) => {
                return Err(ScribeError::invalid(
                    "runtime takes either a character or a word corpus, not both",
                ));
            }
            (Some(cursor), None) => Input::Character(Channel {
                cursor,
                encoder: self
                    .scalar_encoder
                    .ok_or(ScribeError::NullDependency("scalar encoder"))?,
            }),
            (None, Some(cursor)) => Input::WordRows(Channel {
                cursor,
                encoder: self
                    .word_encoder
                    .ok_or(ScribeError::NullDependency("word-row encoder"))?,
            }),
            (None, None) => return Err(ScribeError::NullDependency("corpus cursor")),
        };

        if input.width() != model.input_size() {
            return Err(ScribeError::invalid(format!(
                "encoder produces {} bits but the model expects {}",
                input.width(),
                model.input_size()
            )));
        }

        Ok(TextRuntime {
            model,
            input,
            name: self.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            active_layer: 0,
            log_text: false,
            last_char: 0,
            last_word: String::new(),
            correct_predictions: 0,
            total_predictions: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{ScalarParams, WordRowParams};
    use crate::model::CellMask;
    use std::sync::{Arc, Mutex};

    /// Model with four active columns out of eight, of which the first
    /// `predicted` are flagged predictive. Records every call it receives.
    struct ScriptedModel {
        width: usize,
        timestep: u64,
        predicted: usize,
        empty_snapshot: bool,
        no_active_columns: bool,
        fail_on_step: Option<u64>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ScriptedModel {
        fn new(width: usize, predicted: usize) -> (Self, Arc<Mutex<Vec<&'static str>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            let model = Self {
                width,
                timestep: 0,
                predicted,
                empty_snapshot: false,
                no_active_columns: false,
                fail_on_step: None,
                calls: Arc::clone(&calls),
            };
            (model, calls)
        }
    }

    impl ModelLayer for ScriptedModel {
        fn snapshot(&self) -> Snapshot {
            self.calls.lock().unwrap().push("snapshot");
            if self.empty_snapshot {
                return Snapshot::default();
            }
            let mut masks = vec![CellMask::default(); 8];
            for mask in masks.iter_mut().take(self.predicted) {
                mask.predictive = 1;
            }
            Snapshot {
                timestep: self.timestep,
                columns_x: 8,
                columns_y: 1,
                cells_per_column: 1,
                column_cell_masks: masks,
                active_column_indices: if self.no_active_columns {
                    Vec::new()
                } else {
                    vec![0, 1, 2, 3]
                },
            }
        }

        fn query_proximal(&self, _: usize, _: usize) -> ProximalSynapseQuery {
            ProximalSynapseQuery::default()
        }

        fn num_segments(&self, _: usize, _: usize, _: usize) -> usize {
            7
        }

        fn query_distal(&self, _: usize, _: usize, _: usize, _: usize) -> DistalSynapseQuery {
            DistalSynapseQuery::default()
        }

        fn activation_threshold(&self) -> usize {
            5
        }
    }

    impl SequenceModel for ScriptedModel {
        fn input_size(&self) -> usize {
            self.width
        }

        fn set_input(&mut self, sdr: &[u8]) -> anyhow::Result<()> {
            assert_eq!(sdr.len(), self.width);
            self.calls.lock().unwrap().push("set_input");
            Ok(())
        }

        fn step(&mut self, ticks: u64) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push("step");
            if self.fail_on_step == Some(self.timestep + 1) {
                anyhow::bail!("model fault at tick {}", self.timestep + 1);
            }
            self.timestep += ticks;
            Ok(())
        }

        fn timestep(&self) -> u64 {
            self.timestep
        }

        fn num_layers(&self) -> usize {
            1
        }

        fn layer(&self, index: usize) -> Option<&dyn ModelLayer> {
            (index == 0).then_some(self as &dyn ModelLayer)
        }
    }

    fn scalar(n: usize) -> ScalarEncoder {
        ScalarEncoder::new(ScalarParams {
            n,
            w: 3,
            min_val: 0,
            max_val: 127,
        })
        .unwrap()
    }

    fn char_runtime(model: ScriptedModel, text: &str) -> TextRuntime {
        let width = model.width;
        TextRuntime::builder()
            .name("scripted")
            .model(model)
            .text_chunker(TextChunker::from_string(text).unwrap())
            .scalar_encoder(scalar(width))
            .build()
            .unwrap()
    }

    // ─── Construction ───

    #[test]
    fn test_builder_reports_missing_collaborators() {
        let err = TextRuntime::builder()
            .text_chunker(TextChunker::from_string("ab").unwrap())
            .scalar_encoder(scalar(8))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ScribeError::NullDependency("sequence model")));

        let (model, _) = ScriptedModel::new(8, 0);
        let err = TextRuntime::builder().model(model).build().err().unwrap();
        assert!(matches!(err, ScribeError::NullDependency("corpus cursor")));

        let (model, _) = ScriptedModel::new(8, 0);
        let err = TextRuntime::builder()
            .model(model)
            .text_chunker(TextChunker::from_string("ab").unwrap())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ScribeError::NullDependency("scalar encoder")));

        let (model, _) = ScriptedModel::new(8, 0);
        let err = TextRuntime::builder()
            .model(model)
            .word_chunker(WordChunker::from_string("ab").unwrap())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ScribeError::NullDependency("word-row encoder")));
    }

    #[test]
    fn test_builder_rejects_width_mismatch_and_two_modes() {
        let (model, _) = ScriptedModel::new(8, 0);
        let err = TextRuntime::builder()
            .model(model)
            .text_chunker(TextChunker::from_string("ab").unwrap())
            .scalar_encoder(scalar(16))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ScribeError::InvalidConfiguration(_)));

        let (model, _) = ScriptedModel::new(8, 0);
        let err = TextRuntime::builder()
            .model(model)
            .text_chunker(TextChunker::from_string("ab").unwrap())
            .scalar_encoder(scalar(8))
            .word_chunker(WordChunker::from_string("ab").unwrap())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ScribeError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_default_name() {
        let (model, _) = ScriptedModel::new(8, 0);
        let rt = TextRuntime::builder()
            .model(model)
            .text_chunker(TextChunker::from_string("ab").unwrap())
            .scalar_encoder(scalar(8))
            .build()
            .unwrap();
        assert_eq!(rt.name(), "scribe (Layer 0/1)");
    }

    // ─── Step ordering ───

    #[test]
    fn test_check_precedes_feed_and_skips_first_step() {
        let (model, calls) = ScriptedModel::new(8, 0);
        let mut rt = char_runtime(model, "abc");

        rt.step(1).unwrap();
        assert_eq!(rt.total_predictions(), 0);
        rt.step(2).unwrap();
        assert_eq!(rt.total_predictions(), 2);

        let calls = calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                "set_input", "step",
                "snapshot", "set_input", "step",
                "snapshot", "set_input", "step",
            ]
        );
    }

    #[test]
    fn test_zero_steps_is_noop() {
        let (model, calls) = ScriptedModel::new(8, 4);
        let mut rt = char_runtime(model, "abc");
        rt.step(0).unwrap();
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(rt.input_total_steps(), 0);
    }

    // ─── Accuracy ───

    #[test]
    fn test_strict_majority_counts_as_correct() {
        // 3 of 4 active columns predicted
        let (model, _) = ScriptedModel::new(8, 3);
        let mut rt = char_runtime(model, "abc");
        assert_eq!(rt.prediction_accuracy(), 0.0);
        rt.step(5).unwrap();
        assert_eq!(rt.total_predictions(), 4);
        assert_eq!(rt.correct_predictions(), 4);
        assert_eq!(rt.prediction_accuracy(), 1.0);
    }

    #[test]
    fn test_half_is_not_a_majority() {
        let (model, _) = ScriptedModel::new(8, 2);
        let mut rt = char_runtime(model, "abc");
        rt.step(5).unwrap();
        assert_eq!(rt.total_predictions(), 4);
        assert_eq!(rt.correct_predictions(), 0);
        assert_eq!(rt.prediction_accuracy(), 0.0);
    }

    #[test]
    fn test_no_active_columns_counts_as_miss() {
        let (mut model, _) = ScriptedModel::new(8, 4);
        model.no_active_columns = true;
        let mut rt = char_runtime(model, "abc");
        rt.step(5).unwrap();
        assert_eq!(rt.total_predictions(), 4);
        assert_eq!(rt.correct_predictions(), 0);
        assert_eq!(rt.prediction_accuracy(), 0.0);
    }

    #[test]
    fn test_empty_snapshot_is_not_counted() {
        let (mut model, _) = ScriptedModel::new(8, 4);
        model.empty_snapshot = true;
        let mut rt = char_runtime(model, "abc");
        rt.step(4).unwrap();
        assert_eq!(rt.total_predictions(), 0);
        assert_eq!(rt.prediction_accuracy(), 0.0);
    }

    #[test]
    fn test_model_failure_propagates() {
        let (mut model, _) = ScriptedModel::new(8, 4);
        model.fail_on_step = Some(3);
        let mut rt = char_runtime(model, "abcdef");
        let err = rt.step(10).unwrap_err();
        assert!(err.to_string().contains("model fault at tick 3"));
        assert_eq!(rt.input_total_steps(), 3);
    }

    // ─── Display ───

    #[test]
    fn test_last_symbol_and_context() {
        let (model, _) = ScriptedModel::new(8, 0);
        let mut rt = char_runtime(model, "hello\tworld");
        assert_eq!(rt.last_char(), 0);
        rt.step(2).unwrap();
        assert_eq!(rt.last_char(), b'e');
        let ctx = rt.input_context();
        assert!(ctx.contains("h[e]llo world"), "context was {:?}", ctx);
        assert_eq!(rt.input_epoch(), 0);
        assert_eq!(rt.input_mode(), TextMode::Character);
    }

    #[test]
    fn test_word_mode_tracks_last_word() {
        let enc = WordRowEncoder::new(WordRowParams {
            rows: 2,
            cols: 4,
            letter_bits: 1,
            alphabet: "abc".to_string(),
        })
        .unwrap();
        let (model, _) = ScriptedModel::new(8, 0);
        let mut rt = TextRuntime::builder()
            .model(model)
            .word_chunker(WordChunker::from_string("Cab, bad; ACE").unwrap())
            .word_encoder(enc)
            .build()
            .unwrap();
        rt.step(4).unwrap();
        assert_eq!(rt.last_word(), "cab");
        assert_eq!(rt.input_epoch(), 1);
        assert_eq!(rt.input_size(), 3);
        assert_eq!(rt.input_mode(), TextMode::WordRows);
        assert!(rt.chunker().is_none());
        assert!(rt.word_encoder().is_some());
        assert!(rt.input_context().contains("[cab]"));
    }

    #[test]
    fn test_layer_selection_and_delegation() {
        let (model, _) = ScriptedModel::new(8, 0);
        let mut rt = char_runtime(model, "abc");
        assert_eq!(rt.name(), "scripted (Layer 0/1)");
        rt.set_active_layer(3);
        assert_eq!(rt.active_layer(), 0);
        assert_eq!(
            rt.layer_options(),
            vec![InputSequence { id: 0, name: "Layer 0".to_string() }]
        );
        assert_eq!(rt.num_segments(0, 0, 0), 7);
        assert_eq!(rt.activation_threshold(), 5);
        assert_eq!(rt.input_sequences()[0].name, "Text: <memory>");
        assert_eq!(rt.input_sequence(), 0);
    }

    // ─── Logging ───

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn text_lines(log: &CapturedLog) -> Vec<String> {
        String::from_utf8(log.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .filter(|l| l.contains("[text]"))
            .map(str::to_string)
            .collect()
    }

    fn run_logged(rt: &mut TextRuntime, steps: usize) -> CapturedLog {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, || rt.step(steps).unwrap());
        log
    }

    #[test]
    fn test_one_log_line_per_fed_symbol() {
        let (model, _) = ScriptedModel::new(8, 4);
        let mut rt = char_runtime(model, "abc");
        rt.set_log_text(true);
        assert!(rt.log_text());

        let lines = text_lines(&run_logged(&mut rt, 3));
        assert_eq!(lines.len(), 3, "{:#?}", lines);

        assert!(lines[0].contains("step=1  epoch=0  accuracy=0.0%  |"), "{}", lines[0]);
        assert!(lines[0].contains("[a]"));
        assert!(lines[1].contains("step=2  epoch=0  accuracy=100.0%  |"), "{}", lines[1]);
        assert!(lines[1].contains("[b]"));
        assert!(lines[2].contains("step=3  epoch=1  accuracy=100.0%  |"), "{}", lines[2]);
        assert!(lines[2].contains("[c]"));
    }

    #[test]
    fn test_logging_off_emits_nothing() {
        let (model, _) = ScriptedModel::new(8, 4);
        let mut rt = char_runtime(model, "abc");
        assert!(!rt.log_text());
        assert!(text_lines(&run_logged(&mut rt, 3)).is_empty());
        assert_eq!(rt.input_total_steps(), 3);
    }
}
