// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! TransitionMemory: first-order reference sequence memory
//!
//! Columns map one-to-one onto input bits. Each column holds a few cells, each
//! cell a few distal segments whose synapses point at columns that were active
//! on the previous tick. Per tick:
//! 1. Remember which cells were predictive when this input arrived
//! 2. Predicted columns activate their predicted cells and reinforce the
//!    segments that predicted them
//! 3. Unpredicted columns burst; their least-used cell grows a segment onto a
//!    sample of the previously active columns
//! 4. Cells with a segment reaching `activation_threshold` connected synapses
//!    onto the now-active columns become predictive for the next tick
//!
//! Upper layers read the active-column bitmap of the layer below.

use anyhow::bail;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use super::{
    CellMask, DistalSynapse, DistalSynapseQuery, ModelLayer, ProximalSynapse,
    ProximalSynapseQuery, SequenceModel, Snapshot,
};
use crate::config::{LayerConfig, RuntimeConfig};
use crate::encoding::Sdr;
use crate::error::{Result, ScribeError};

#[derive(Debug, Clone)]
struct Synapse {
    column: usize,
    permanence: f32,
}

#[derive(Debug, Clone)]
struct Segment {
    synapses: Vec<Synapse>,
    last_used: u64,
}

impl Segment {
    fn connected_overlap(&self, active: &[bool], connected: f32) -> usize {
        self.synapses
            .iter()
            .filter(|s| s.permanence >= connected && active[s.column])
            .count()
    }
}

// ─── Layer ──────────────────────────────────────────

/// One layer of the transition memory.
pub struct SequenceLayer {
    config: LayerConfig,
    columns_x: usize,
    columns_y: usize,
    /// Distal segments, indexed by `column * cells_per_column + cell`
    segments: Vec<Vec<Segment>>,
    active_columns: Vec<usize>,
    prev_active_columns: Vec<usize>,
    active_cells: Vec<bool>,
    /// Predictions made for the next tick
    predictive_cells: Vec<bool>,
    /// Predictions that were in force when the current input arrived
    predicted_cells: Vec<bool>,
    tick: u64,
    rng: StdRng,
}

impl SequenceLayer {
    /// Create a layer with a `columns_y × columns_x` column grid.
    pub fn new(config: LayerConfig, columns_y: usize, columns_x: usize) -> Result<Self> {
        config.validate()?;
        if columns_x == 0 || columns_y == 0 {
            return Err(ScribeError::invalid("layer column grid must be non-empty"));
        }
        let num_cells = columns_x * columns_y * config.cells_per_column;
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            columns_x,
            columns_y,
            segments: vec![Vec::new(); num_cells],
            active_columns: Vec::new(),
            prev_active_columns: Vec::new(),
            active_cells: vec![false; num_cells],
            predictive_cells: vec![false; num_cells],
            predicted_cells: vec![false; num_cells],
            tick: 0,
            rng,
        })
    }

    pub fn num_columns(&self) -> usize {
        self.columns_x * self.columns_y
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn active_columns(&self) -> &[usize] {
        &self.active_columns
    }

    /// Active columns as an input vector for the layer above.
    pub fn active_bitmap(&self) -> Sdr {
        let mut bitmap = vec![0u8; self.num_columns()];
        for &c in &self.active_columns {
            bitmap[c] = 1;
        }
        bitmap
    }

    /// Columns holding at least one cell predicted for the next tick.
    pub fn predicted_columns(&self) -> Vec<usize> {
        let cpc = self.config.cells_per_column;
        (0..self.num_columns())
            .filter(|&col| self.predictive_cells[col * cpc..(col + 1) * cpc].iter().any(|&p| p))
            .collect()
    }

    /// Total distal segments grown across all cells.
    pub fn total_segments(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    fn column_index(&self, column_x: usize, column_y: usize) -> Option<usize> {
        (column_x < self.columns_x && column_y < self.columns_y)
            .then(|| column_y * self.columns_x + column_x)
    }

    fn cell_index(&self, column_x: usize, column_y: usize, cell: usize) -> Option<usize> {
        let col = self.column_index(column_x, column_y)?;
        (cell < self.config.cells_per_column).then(|| col * self.config.cells_per_column + cell)
    }

    fn columns_mask(&self, columns: &[usize]) -> Vec<bool> {
        let mut mask = vec![false; self.num_columns()];
        for &c in columns {
            mask[c] = true;
        }
        mask
    }

    /// Process one input vector. Bits past the column count are ignored.
    pub fn compute(&mut self, input: &[u8]) {
        let n = self.num_columns();
        let cpc = self.config.cells_per_column;
        self.tick += 1;

        self.prev_active_columns = std::mem::take(&mut self.active_columns);
        self.active_columns = input
            .iter()
            .take(n)
            .enumerate()
            .filter(|(_, &b)| b != 0)
            .map(|(i, _)| i)
            .collect();
        let prev_mask = self.columns_mask(&self.prev_active_columns);

        self.predicted_cells = std::mem::replace(&mut self.predictive_cells, vec![false; n * cpc]);
        self.active_cells.fill(false);

        let active = self.active_columns.clone();
        for col in active {
            let cells = col * cpc..(col + 1) * cpc;
            let predicted: Vec<usize> = cells.clone().filter(|&c| self.predicted_cells[c]).collect();
            if predicted.is_empty() {
                for c in cells {
                    self.active_cells[c] = true;
                }
                if !self.prev_active_columns.is_empty() {
                    let winner = self.least_used_cell(col);
                    self.grow_segment(winner);
                }
            } else {
                for c in predicted {
                    self.active_cells[c] = true;
                    self.reinforce(c, &prev_mask);
                }
            }
        }

        self.predictive_cells = self.compute_predictions();
    }

    fn least_used_cell(&self, column: usize) -> usize {
        let cpc = self.config.cells_per_column;
        (column * cpc..(column + 1) * cpc)
            .min_by_key(|&c| self.segments[c].len())
            .unwrap_or(column * cpc)
    }

    fn grow_segment(&mut self, cell: usize) {
        let mut sample: Vec<usize> = self
            .prev_active_columns
            .choose_multiple(&mut self.rng, self.config.max_synapses_per_segment)
            .copied()
            .collect();
        sample.sort_unstable();

        let segment = Segment {
            synapses: sample
                .into_iter()
                .map(|column| Synapse {
                    column,
                    permanence: self.config.initial_permanence,
                })
                .collect(),
            last_used: self.tick,
        };

        let segments = &mut self.segments[cell];
        if segments.len() < self.config.max_segments_per_cell {
            segments.push(segment);
        } else {
            let lru = segments
                .iter()
                .enumerate()
                .min_by_key(|(_, s)| s.last_used)
                .map_or(0, |(i, _)| i);
            segments[lru] = segment;
        }
    }

    fn reinforce(&mut self, cell: usize, prev_mask: &[bool]) {
        let threshold = self.config.activation_threshold;
        let connected = self.config.connected_permanence;
        let inc = self.config.permanence_inc;
        let dec = self.config.permanence_dec;
        let tick = self.tick;

        for segment in &mut self.segments[cell] {
            if segment.connected_overlap(prev_mask, connected) < threshold {
                continue;
            }
            for syn in &mut segment.synapses {
                syn.permanence = if prev_mask[syn.column] {
                    (syn.permanence + inc).min(1.0)
                } else {
                    (syn.permanence - dec).max(0.0)
                };
            }
            segment.last_used = tick;
        }
    }

    fn compute_predictions(&self) -> Vec<bool> {
        let mask = self.columns_mask(&self.active_columns);
        let threshold = self.config.activation_threshold;
        let connected = self.config.connected_permanence;
        self.segments
            .iter()
            .map(|segs| {
                segs.iter()
                    .any(|s| s.connected_overlap(&mask, connected) >= threshold)
            })
            .collect()
    }
}

impl ModelLayer for SequenceLayer {
    fn snapshot(&self) -> Snapshot {
        let cpc = self.config.cells_per_column;
        let column_cell_masks = (0..self.num_columns())
            .map(|col| {
                let mut mask = CellMask::default();
                for i in 0..cpc {
                    let c = col * cpc + i;
                    if self.active_cells[c] {
                        mask.active |= 1u32 << i;
                    }
                    if self.predicted_cells[c] {
                        mask.predictive |= 1u32 << i;
                    }
                }
                mask
            })
            .collect();

        Snapshot {
            timestep: self.tick,
            columns_x: self.columns_x,
            columns_y: self.columns_y,
            cells_per_column: cpc,
            column_cell_masks,
            active_column_indices: self.active_columns.clone(),
        }
    }

    fn query_proximal(&self, column_x: usize, column_y: usize) -> ProximalSynapseQuery {
        match self.column_index(column_x, column_y) {
            Some(col) => ProximalSynapseQuery {
                column_x,
                column_y,
                synapses: vec![ProximalSynapse {
                    input_index: col,
                    permanence: 1.0,
                    connected: true,
                }],
            },
            None => ProximalSynapseQuery::default(),
        }
    }

    fn num_segments(&self, column_x: usize, column_y: usize, cell: usize) -> usize {
        self.cell_index(column_x, column_y, cell)
            .map_or(0, |c| self.segments[c].len())
    }

    fn query_distal(
        &self,
        column_x: usize,
        column_y: usize,
        cell: usize,
        segment: usize,
    ) -> DistalSynapseQuery {
        let Some(seg) = self
            .cell_index(column_x, column_y, cell)
            .and_then(|c| self.segments[c].get(segment))
        else {
            return DistalSynapseQuery::default();
        };

        DistalSynapseQuery {
            column_x,
            column_y,
            cell,
            segment,
            synapses: seg
                .synapses
                .iter()
                .map(|s| DistalSynapse {
                    presynaptic_column: s.column,
                    permanence: s.permanence,
                    connected: s.permanence >= self.config.connected_permanence,
                })
                .collect(),
        }
    }

    fn activation_threshold(&self) -> usize {
        self.config.activation_threshold
    }
}

// ─── Model ──────────────────────────────────────────

/// Stack of [`SequenceLayer`]s driven by a single input SDR.
pub struct TransitionMemory {
    layers: Vec<SequenceLayer>,
    input: Sdr,
    timestep: u64,
}

impl TransitionMemory {
    /// Build the layer stack. Layer 0 must declare its input grid; upper
    /// layers inherit the grid below unless they declare a same-sized one.
    pub fn new(configs: &[LayerConfig]) -> Result<Self> {
        let mut layers: Vec<SequenceLayer> = Vec::with_capacity(configs.len());
        for (i, cfg) in configs.iter().enumerate() {
            let declared = (cfg.num_input_rows, cfg.num_input_cols);
            let (rows, cols) = match layers.last() {
                None if declared.0 == 0 || declared.1 == 0 => {
                    return Err(ScribeError::invalid(
                        "layer 0 must declare num_input_rows and num_input_cols",
                    ));
                }
                None => declared,
                Some(below) if declared.0 == 0 || declared.1 == 0 => {
                    (below.columns_y, below.columns_x)
                }
                Some(below) if declared.0 * declared.1 != below.num_columns() => {
                    return Err(ScribeError::invalid(format!(
                        "layer {} input {}x{} does not match {} columns below",
                        i,
                        declared.0,
                        declared.1,
                        below.num_columns()
                    )));
                }
                Some(_) => declared,
            };
            layers.push(SequenceLayer::new(cfg.clone(), rows, cols)?);
        }

        let input_size = layers
            .first()
            .map(SequenceLayer::num_columns)
            .ok_or_else(|| ScribeError::invalid("model needs at least one layer"))?;

        Ok(Self {
            layers,
            input: vec![0; input_size],
            timestep: 0,
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        Self::new(&config.layers)
    }

    pub fn layers(&self) -> &[SequenceLayer] {
        &self.layers
    }
}

impl SequenceModel for TransitionMemory {
    fn input_size(&self) -> usize {
        self.input.len()
    }

    fn set_input(&mut self, sdr: &[u8]) -> anyhow::Result<()> {
        if sdr.len() != self.input.len() {
            bail!(
                "input SDR has {} bits, model expects {}",
                sdr.len(),
                self.input.len()
            );
        }
        self.input.copy_from_slice(sdr);
        Ok(())
    }

    fn step(&mut self, ticks: u64) -> anyhow::Result<()> {
        for _ in 0..ticks {
            let mut feed = self.input.clone();
            for layer in &mut self.layers {
                layer.compute(&feed);
                feed = layer.active_bitmap();
            }
            self.timestep += 1;
        }
        debug!(timestep = self.timestep, ticks, "transition memory stepped");
        Ok(())
    }

    fn timestep(&self) -> u64 {
        self.timestep
    }

    fn num_layers(&self) -> usize {
        self.layers.len()
    }

    fn layer(&self, index: usize) -> Option<&dyn ModelLayer> {
        self.layers.get(index).map(|l| l as &dyn ModelLayer)
    }
}
