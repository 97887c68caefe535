// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Sequence-memory contract consumed by the text runtime
//!
//! The runtime treats the model as an opaque stateful box: it sets an input
//! SDR, advances time, and reads per-layer snapshots. Everything about how
//! the model learns lives behind [`SequenceModel`].
//!
//! [`TransitionMemory`] is a small first-order implementation used by the
//! command-line driver and the tests.

pub mod transition;

pub use transition::{SequenceLayer, TransitionMemory};

use serde::Serialize;

/// Per-column cell state: bit `i` refers to cell `i` of the column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellMask {
    /// Cells active at the current timestep
    pub active: u32,
    /// Cells that were predictive when the current input arrived
    pub predictive: u32,
}

/// Read-only view of one layer at one timestep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub timestep: u64,
    /// Column grid width
    pub columns_x: usize,
    /// Column grid height
    pub columns_y: usize,
    pub cells_per_column: usize,
    /// One mask per column, row-major over the grid
    pub column_cell_masks: Vec<CellMask>,
    /// Active columns, ascending
    pub active_column_indices: Vec<usize>,
}

impl Snapshot {
    /// True when the snapshot carries no per-column data.
    pub fn is_empty(&self) -> bool {
        self.column_cell_masks.is_empty()
    }

    /// Whether any cell of `column` was predicted, `None` when out of range.
    pub fn column_predicted(&self, column: usize) -> Option<bool> {
        self.column_cell_masks.get(column).map(|m| m.predictive != 0)
    }
}

/// Feed-forward connection from an input bit to a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProximalSynapse {
    pub input_index: usize,
    pub permanence: f32,
    pub connected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProximalSynapseQuery {
    pub column_x: usize,
    pub column_y: usize,
    pub synapses: Vec<ProximalSynapse>,
}

/// Lateral connection from a distal segment to a presynaptic column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistalSynapse {
    pub presynaptic_column: usize,
    pub permanence: f32,
    pub connected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistalSynapseQuery {
    pub column_x: usize,
    pub column_y: usize,
    pub cell: usize,
    pub segment: usize,
    pub synapses: Vec<DistalSynapse>,
}

/// Read-only introspection of a single model layer.
///
/// None of these calls may mutate model state.
pub trait ModelLayer {
    fn snapshot(&self) -> Snapshot;

    /// Feed-forward synapses of the column at grid position `(x, y)`.
    fn query_proximal(&self, column_x: usize, column_y: usize) -> ProximalSynapseQuery;

    fn num_segments(&self, column_x: usize, column_y: usize, cell: usize) -> usize;

    fn query_distal(
        &self,
        column_x: usize,
        column_y: usize,
        cell: usize,
        segment: usize,
    ) -> DistalSynapseQuery;

    fn activation_threshold(&self) -> usize;
}

/// A stateful sequence memory driven one input at a time.
///
/// Implementors are not expected to tolerate concurrent calls; the runtime
/// owns the model exclusively.
pub trait SequenceModel: Send {
    /// Length of the SDR accepted by [`set_input`](Self::set_input).
    fn input_size(&self) -> usize;

    /// Replace the current input vector.
    fn set_input(&mut self, sdr: &[u8]) -> anyhow::Result<()>;

    /// Advance `ticks` timesteps on the current input.
    fn step(&mut self, ticks: u64) -> anyhow::Result<()>;

    /// Ticks processed so far.
    fn timestep(&self) -> u64;

    fn num_layers(&self) -> usize;

    /// Layer `index`, bottom first.
    fn layer(&self, index: usize) -> Option<&dyn ModelLayer>;
}
