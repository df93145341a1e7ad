// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Configuration layering: defaults, then the --config file, then flags.

use anyhow::{Context, Result};
use printprep_core::ProcessingConfig;

use crate::{Cli, Commands};

pub fn resolve(cli: &Cli) -> Result<ProcessingConfig> {
    let mut config = match &cli.config {
        Some(path) => ProcessingConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ProcessingConfig::default(),
    };

    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(dir) = &cli.input_dir {
        config.input_dir = Some(dir.clone());
    }

    match &cli.command {
        Commands::Qr(args) => {
            if let Some(level) = args.ec_level {
                config.qr.error_correction = level;
            }
            if let Some(size) = args.module_size {
                config.qr.module_size = size;
            }
            if let Some(border) = args.border {
                config.qr.border = border;
            }
        }
        Commands::Underbase(args) => {
            if let Some(threshold) = args.threshold {
                config.underbase.threshold = threshold;
            }
        }
        Commands::Enhance(_) | Commands::Cmyk(_) => {}
    }

    config.validate()?;
    Ok(config)
}
