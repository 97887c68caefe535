// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Runtime configuration for the scribe text runtime
//!
//! A YAML document selects the input mode, the encoder parameters and the
//! sequence-memory layers. Encoder widths are always derived from the first
//! layer's input grid so encoder output and model input cannot disagree.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::encoding::{ScalarParams, WordRowParams};
use crate::error::{Result, ScribeError};

/// How corpus text is split into symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// One byte per symbol, scalar-encoded
    #[default]
    Character,
    /// One lowercase word per symbol, word-row encoded
    WordRows,
}

impl TextMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::WordRows => "word_rows",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub mode: TextMode,
}

/// Encoder parameters that are not implied by the layer geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Scalar mode: active bits per symbol
    pub active_bits: usize,
    /// Scalar mode: smallest encodable byte value
    pub min_value: i64,
    /// Scalar mode: largest encodable byte value
    pub max_value: i64,
    /// Word mode: bits per letter block
    pub letter_bits: usize,
    /// Word mode: letters with a dedicated block
    pub alphabet: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        let scalar = ScalarParams::default();
        let words = WordRowParams::default();
        Self {
            active_bits: scalar.w,
            min_value: scalar.min_val,
            max_value: scalar.max_val,
            letter_bits: words.letter_bits,
            alphabet: words.alphabet,
        }
    }
}

/// Configuration for one layer of the reference sequence memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Input grid rows (0 = inherit the previous layer's column grid)
    pub num_input_rows: usize,
    /// Input grid columns (0 = inherit the previous layer's column grid)
    pub num_input_cols: usize,
    /// Cells per column (1..=32)
    pub cells_per_column: usize,
    /// Distal segments per cell before the least recently used is replaced
    pub max_segments_per_cell: usize,
    /// Synapses sampled when a segment is grown
    pub max_synapses_per_segment: usize,
    /// Connected synapses onto active columns needed to predict a cell
    pub activation_threshold: usize,
    /// Permanence at which a synapse counts as connected
    pub connected_permanence: f32,
    /// Permanence given to newly grown synapses
    pub initial_permanence: f32,
    /// Reinforcement applied to synapses that supported a correct prediction
    pub permanence_inc: f32,
    /// Decay applied to synapses that did not
    pub permanence_dec: f32,
    /// Seed for synapse sampling
    pub seed: u64,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            num_input_rows: 0,
            num_input_cols: 0,
            cells_per_column: 4,
            max_segments_per_cell: 3,
            max_synapses_per_segment: 15,
            activation_threshold: 4,
            connected_permanence: 0.3,
            initial_permanence: 0.4,
            permanence_inc: 0.1,
            permanence_dec: 0.05,
            seed: 42,
        }
    }
}

impl LayerConfig {
    /// Default layer reading an explicit `rows × cols` input grid.
    pub fn with_input(rows: usize, cols: usize) -> Self {
        Self {
            num_input_rows: rows,
            num_input_cols: cols,
            ..Self::default()
        }
    }

    /// Check the learning parameters. Input geometry is resolved by the model.
    pub fn validate(&self) -> Result<()> {
        if self.cells_per_column == 0 || self.cells_per_column > 32 {
            return Err(ScribeError::invalid(format!(
                "cells_per_column must be in 1..=32, got {}",
                self.cells_per_column
            )));
        }
        if self.max_segments_per_cell == 0 {
            return Err(ScribeError::invalid("max_segments_per_cell must be > 0"));
        }
        if self.max_synapses_per_segment == 0 {
            return Err(ScribeError::invalid("max_synapses_per_segment must be > 0"));
        }
        if self.activation_threshold == 0 {
            return Err(ScribeError::invalid("activation_threshold must be > 0"));
        }
        let perms = [
            ("connected_permanence", self.connected_permanence),
            ("initial_permanence", self.initial_permanence),
            ("permanence_inc", self.permanence_inc),
            ("permanence_dec", self.permanence_dec),
        ];
        for (name, value) in perms {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScribeError::invalid(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Full configuration for a text runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Display name (defaults to the config file stem)
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
    /// Sequence-memory layers, bottom first
    pub layers: Vec<LayerConfig>,
}

impl RuntimeConfig {
    /// Small single-layer character configuration (100 input bits).
    pub fn small_text() -> Self {
        Self {
            name: Some("small_text".to_string()),
            text: TextConfig::default(),
            encoder: EncoderConfig {
                active_bits: 9,
                ..EncoderConfig::default()
            },
            layers: vec![LayerConfig::with_input(10, 10)],
        }
    }

    /// Two-layer character configuration at the default encoder width.
    pub fn default_text() -> Self {
        Self {
            name: Some("default_text".to_string()),
            text: TextConfig::default(),
            encoder: EncoderConfig::default(),
            layers: vec![
                LayerConfig::with_input(20, 20),
                LayerConfig {
                    cells_per_column: 3,
                    max_segments_per_cell: 2,
                    activation_threshold: 6,
                    ..LayerConfig::default()
                },
            ],
        }
    }

    /// Word-row configuration: five letter rows over a 26-letter alphabet.
    pub fn word_rows() -> Self {
        let words = WordRowParams::default();
        Self {
            name: Some("word_rows".to_string()),
            text: TextConfig {
                mode: TextMode::WordRows,
            },
            encoder: EncoderConfig::default(),
            layers: vec![LayerConfig {
                activation_threshold: 3,
                ..LayerConfig::with_input(words.rows, words.cols)
            }],
        }
    }

    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| ScribeError::invalid(format!("malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file; the name falls back to the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ScribeError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&yaml)?;
        if config.name.is_none() {
            config.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| ScribeError::invalid("config must declare at least one layer"))?;
        if first.num_input_rows == 0 || first.num_input_cols == 0 {
            return Err(ScribeError::invalid(
                "layer 0 must declare num_input_rows and num_input_cols",
            ));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.validate().map_err(|e| match e {
                ScribeError::InvalidConfiguration(msg) => {
                    ScribeError::invalid(format!("layer {}: {}", i, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("scribe")
    }

    pub fn input_rows(&self) -> usize {
        self.layers.first().map_or(0, |l| l.num_input_rows)
    }

    pub fn input_cols(&self) -> usize {
        self.layers.first().map_or(0, |l| l.num_input_cols)
    }

    /// Bits in the bottom layer's input, which every encoder must produce.
    pub fn input_bits(&self) -> usize {
        self.input_rows() * self.input_cols()
    }

    /// Scalar encoder parameters with `n` taken from the bottom layer.
    pub fn scalar_params(&self) -> ScalarParams {
        ScalarParams {
            n: self.input_bits(),
            w: self.encoder.active_bits,
            min_val: self.encoder.min_value,
            max_val: self.encoder.max_value,
        }
    }

    /// Word-row encoder parameters with rows/cols taken from the bottom layer.
    pub fn word_row_params(&self) -> WordRowParams {
        WordRowParams {
            rows: self.input_rows(),
            cols: self.input_cols(),
            letter_bits: self.encoder.letter_bits,
            alphabet: self.encoder.alphabet.clone(),
        }
    }
}

/// YAML config files in `dir`, sorted by path.
pub fn list_config_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|source| ScribeError::NotFound {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && matches!(
                    p.extension().and_then(|ext| ext.to_str()),
                    Some("yaml") | Some("yml")
                )
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for config in [
            RuntimeConfig::small_text(),
            RuntimeConfig::default_text(),
            RuntimeConfig::word_rows(),
        ] {
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_encoder_width_follows_layer_zero() {
        let config = RuntimeConfig::small_text();
        assert_eq!(config.input_bits(), 100);
        assert_eq!(config.scalar_params().n, 100);
        assert_eq!(config.scalar_params().w, 9);

        let words = RuntimeConfig::word_rows();
        let p = words.word_row_params();
        assert_eq!((p.rows, p.cols), (5, 108));
        assert_eq!(p.cols, p.letter_bits * (p.alphabet.len() + 1));
    }

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = "layers:\n  - num_input_rows: 4\n    num_input_cols: 8\n";
        let config = RuntimeConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.text.mode, TextMode::Character);
        assert_eq!(config.encoder, EncoderConfig::default());
        assert_eq!(config.input_bits(), 32);
        assert_eq!(config.layers[0].cells_per_column, 4);
        assert_eq!(config.display_name(), "scribe");
    }

    #[test]
    fn test_parse_word_rows_yaml() {
        let yaml = r#"
name: tiny_words
text:
  mode: word_rows
encoder:
  letter_bits: 2
  alphabet: "abc"
layers:
  - num_input_rows: 3
    num_input_cols: 8
    activation_threshold: 2
  - cells_per_column: 2
"#;
        let config = RuntimeConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.text.mode, TextMode::WordRows);
        assert_eq!(config.display_name(), "tiny_words");
        assert_eq!(config.layers.len(), 2);
        assert_eq!(config.layers[1].num_input_rows, 0);
        let p = config.word_row_params();
        assert_eq!(p.alphabet, "abc");
        assert_eq!(p.letter_bits, 2);
    }

    #[test]
    fn test_rejects_bad_configs() {
        let cases = [
            "layers: []\n",
            "layers:\n  - cells_per_column: 4\n",
            "layers:\n  - num_input_rows: 2\n    num_input_cols: 2\n    cells_per_column: 40\n",
            "layers:\n  - num_input_rows: 2\n    num_input_cols: 2\n    connected_permanence: 1.5\n",
            "text:\n  mode: pictures\nlayers:\n  - num_input_rows: 2\n    num_input_cols: 2\n",
            "not: [valid",
        ];
        for yaml in cases {
            assert!(
                matches!(
                    RuntimeConfig::from_yaml_str(yaml),
                    Err(ScribeError::InvalidConfiguration(_))
                ),
                "should reject: {}",
                yaml
            );
        }
    }

    #[test]
    fn test_load_uses_file_stem_as_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.yaml");
        std::fs::write(&path, "layers:\n  - num_input_rows: 2\n    num_input_cols: 5\n").unwrap();
        let config = RuntimeConfig::load(&path).unwrap();
        assert_eq!(config.display_name(), "tiny");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            RuntimeConfig::load("/nonexistent/config.yaml"),
            Err(ScribeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_config_files_sorted_yaml_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.yaml", "a.yml", "notes.txt", "c.yaml"] {
            std::fs::write(dir.path().join(name), "layers: []\n").unwrap();
        }
        let files = list_config_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.yml", "b.yaml", "c.yaml"]);
    }

    #[test]
    fn test_yaml_roundtrip_of_preset() {
        let config = RuntimeConfig::default_text();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(RuntimeConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
