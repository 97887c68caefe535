// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Headless text runtime driver
//!
//! Loads a config and a corpus, replays the corpus through the reference
//! sequence memory and prints the final prediction accuracy.

mod cli;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scribe_engine::{list_config_files, HtmRuntime, RuntimeConfig, TextMode, TextRuntime};

use cli::Cli;

/// Progress lines printed over a logged run.
const PROGRESS_LINES: usize = 20;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scribe=info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.list_configs {
        return list_configs(&cli.config_dir);
    }

    let (Some(input), Some(config_path)) = (cli.input.as_deref(), cli.config.as_deref()) else {
        anyhow::bail!("--input and --config are required");
    };

    let config = RuntimeConfig::load(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let mut runtime = TextRuntime::from_config(&config, input)
        .with_context(|| format!("building runtime for {}", input.display()))?;
    runtime.set_log_text(cli.log);

    print_summary(&config, &runtime, input);

    let steps = usize::try_from(cli.total_steps(runtime.input_size()))
        .context("step count does not fit in usize on this platform")?;
    let start = Instant::now();
    if cli.log {
        let chunk = (steps / PROGRESS_LINES).max(1);
        let mut done = 0usize;
        while done < steps {
            let n = chunk.min(steps - done);
            runtime.step(n)?;
            done += n;
            info!(
                "progress {}/{}  epoch={}  accuracy={:.1}%",
                done,
                steps,
                runtime.input_epoch(),
                runtime.prediction_accuracy() * 100.0
            );
        }
    } else {
        runtime.step(steps)?;
    }
    let elapsed = start.elapsed();

    println!();
    println!(
        "Ran {} steps in {:.2}s ({} epochs)",
        runtime.input_total_steps(),
        elapsed.as_secs_f64(),
        runtime.input_epoch()
    );
    println!(
        "Prediction accuracy: {:.1}% ({}/{})",
        runtime.prediction_accuracy() * 100.0,
        runtime.correct_predictions(),
        runtime.total_predictions()
    );
    Ok(())
}

fn list_configs(dir: &Path) -> Result<()> {
    let files = list_config_files(dir)
        .with_context(|| format!("listing configs in {}", dir.display()))?;
    if files.is_empty() {
        println!("No configs found in {}", dir.display());
        return Ok(());
    }
    println!("Configs in {}:", dir.display());
    for file in files {
        match RuntimeConfig::load(&file) {
            Ok(config) => println!(
                "  {:<24} {:<10} {} layer(s), {} input bits",
                config.display_name(),
                config.text.mode.label(),
                config.layers.len(),
                config.input_bits()
            ),
            Err(e) => println!("  {:<24} (invalid: {})", file.display(), e),
        }
    }
    Ok(())
}

fn print_summary(config: &RuntimeConfig, runtime: &TextRuntime, input: &Path) {
    println!("=== {} ===", runtime.name());
    println!(
        "Layers: {}  input grid {}x{}",
        config.layers.len(),
        config.input_rows(),
        config.input_cols()
    );
    println!("Mode: {}", config.text.mode.label());
    match config.text.mode {
        TextMode::Character => {
            let p = config.scalar_params();
            println!(
                "Encoder: scalar n={} w={} range=[{}, {}]",
                p.n, p.w, p.min_val, p.max_val
            );
            println!("Corpus: {} ({} characters)", input.display(), runtime.input_size());
        }
        TextMode::WordRows => {
            let p = config.word_row_params();
            println!(
                "Encoder: word rows {}x{} letter_bits={} alphabet={:?}",
                p.rows, p.cols, p.letter_bits, p.alphabet
            );
            println!("Corpus: {} ({} words)", input.display(), runtime.input_size());
        }
    }
}
