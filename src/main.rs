// Entry point: loads config, builds the grid-world scene and renders it.
use std::error::Error;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridfigure::cli::Args;
use gridfigure::config::FigureConfig;
use gridfigure::layout::Scene;
use gridfigure::render::render_to_path;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = args.apply(FigureConfig::load_or_default(&args.config))?;
    cfg.validate()?;
    let scene = Scene::from_config(&cfg)?;

    if args.dump_scene {
        println!("{}", scene.to_json_pretty()?);
        return Ok(());
    }

    let format = cfg.output.resolved_format()?;
    render_to_path(&scene, &cfg, &cfg.output.path, format)?;
    info!(
        marker = %scene.marker.state.label(),
        "Saved grid figure to {}",
        cfg.output.path.display()
    );
    Ok(())
}
