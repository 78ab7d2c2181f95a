use clap::Parser;
use std::path::PathBuf;

use crate::config::{FigureConfig, OutputFormat};
use crate::error::Result;
use crate::layout::StateId;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML (written with commented defaults if missing)
    #[arg(long, default_value = "gridfigure.toml")]
    pub config: String,

    /// Output file (overrides config)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Output format; inferred from the output extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// State the marker sits on, e.g. S0 (overrides config)
    #[arg(long)]
    pub marker: Option<String>,

    /// Print the scene as JSON instead of rendering
    #[arg(long, default_value_t = false)]
    pub dump_scene: bool,
}

impl Args {
    /// Layers command-line overrides on top of the file config.
    pub fn apply(&self, mut cfg: FigureConfig) -> Result<FigureConfig> {
        if let Some(out) = &self.out {
            cfg.output.path = out.clone();
            cfg.output.format = None;
        }
        if let Some(format) = self.format {
            cfg.output.format = Some(format);
        }
        if let Some(marker) = &self.marker {
            cfg.marker.state = StateId::parse(marker)?.label();
        }
        Ok(cfg)
    }
}
