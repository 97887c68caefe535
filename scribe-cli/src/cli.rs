// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Command-line arguments for the `scribe` driver.

use std::path::PathBuf;

use clap::Parser;

/// Stream a text corpus through a sequence memory and report how well it
/// predicts the next symbol.
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Corpus to replay
    #[arg(short = 'i', long, required_unless_present = "list_configs")]
    pub input: Option<PathBuf>,

    /// YAML runtime configuration
    #[arg(short = 'c', long, required_unless_present = "list_configs")]
    pub config: Option<PathBuf>,

    /// Symbols to feed (default: corpus size × epochs)
    #[arg(short = 's', long)]
    pub steps: Option<u64>,

    /// Passes over the corpus when --steps is not given
    #[arg(short = 'e', long, default_value_t = 1)]
    pub epochs: u64,

    /// Log every step and periodic progress
    #[arg(long)]
    pub log: bool,

    /// List available configs and exit
    #[arg(long)]
    pub list_configs: bool,

    /// Directory searched by --list-configs
    #[arg(long, default_value = "configs")]
    pub config_dir: PathBuf,
}

impl Cli {
    /// Steps to run for a corpus of `corpus_size` symbols.
    pub fn total_steps(&self, corpus_size: usize) -> u64 {
        self.steps
            .unwrap_or_else(|| (corpus_size as u64).saturating_mul(self.epochs))
    }
}
