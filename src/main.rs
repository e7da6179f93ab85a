use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use playlift::cli::Cli;
use playlift::export::export_playlists;
use playlift::library::load_library;
use playlift::platform::default_library_path;
use playlift::select::select_playlists;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let library_path = match &cli.library {
        Some(path) => path.clone(),
        None => default_library_path().context("unable to determine default library path")?,
    };

    info!("loading library {}", library_path.display());
    let library = load_library(&library_path)
        .with_context(|| format!("failed to load library {}", library_path.display()))?;
    info!(
        "library loaded with {} playlists and {} tracks",
        library.playlists.len(),
        library.tracks.len()
    );

    let playlists = select_playlists(&library, &cli.selection_policy());
    info!("exporting {} playlists", playlists.len());

    let settings = cli.export_settings(&library, playlists)?;
    export_playlists(&settings, &library).context("export failed")?;

    Ok(())
}
