// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Runtime surface shared by every front end
//!
//! Debuggers and the command-line shell talk to a runtime only through
//! [`HtmRuntime`], whichever input mode is active underneath.

pub mod text;

pub use text::{TextRuntime, TextRuntimeBuilder};

use serde::Serialize;

use crate::model::{DistalSynapseQuery, ProximalSynapseQuery, Snapshot};

/// A labelled choice offered to front ends (input source or layer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSequence {
    pub id: usize,
    pub name: String,
}

/// Capability surface of a steppable sequence-memory runtime.
///
/// Introspection calls are answered by the currently selected layer.
pub trait HtmRuntime {
    /// Snapshot of the selected layer, empty when the selection is invalid.
    fn snapshot(&self) -> Snapshot;

    /// Feed `n` input symbols.
    fn step(&mut self, n: usize) -> anyhow::Result<()>;

    fn query_proximal(&self, column_x: usize, column_y: usize) -> ProximalSynapseQuery;

    fn num_segments(&self, column_x: usize, column_y: usize, cell: usize) -> usize;

    fn query_distal(
        &self,
        column_x: usize,
        column_y: usize,
        cell: usize,
        segment: usize,
    ) -> DistalSynapseQuery;

    fn input_sequences(&self) -> Vec<InputSequence>;

    fn input_sequence(&self) -> usize {
        0
    }

    fn set_input_sequence(&mut self, _id: usize) {}

    fn activation_threshold(&self) -> usize;

    /// Human-readable name including the selected layer.
    fn name(&self) -> String;

    fn layer_options(&self) -> Vec<InputSequence>;

    fn num_layers(&self) -> usize;

    fn active_layer(&self) -> usize;

    /// Select the layer used for introspection; out-of-range indices are ignored.
    fn set_active_layer(&mut self, idx: usize);

    /// Fraction of checked steps whose active columns were mostly predicted.
    fn prediction_accuracy(&self) -> f64;

    /// Symbols around the one most recently fed, centre bracketed.
    fn input_context(&self) -> String;
}
