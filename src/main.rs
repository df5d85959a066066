use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use ltdunpack::export::kotlin;
use ltdunpack::game_data::GameData;
use rootcause::prelude::*;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Extracts Legion TD 2 balance data from the game's map archive and
/// generates equivalent Kotlin source.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the game's map archive, e.g.
    /// `Legion TD 2_Data/StreamingAssets/Maps/legiontd2.zip`
    archive: PathBuf,

    /// Where the generated source is written
    #[clap(short, long, default_value = "ltd2_defs.kt")]
    output: PathBuf,
}

fn main() -> Result<(), Report> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let data = GameData::load(&args.archive).context("Failed to load balance dataset")?;
    info!(
        units = data.units.len(),
        waves = data.waves.len(),
        "extracted balance dataset"
    );

    let file = File::create(&args.output).context("Failed to create output file")?;
    let mut out = BufWriter::new(file);
    kotlin::write_defs(&mut out, &data).context("Failed to write generated source")?;
    out.flush()?;

    info!(output = %args.output.display(), "wrote generated source");
    Ok(())
}
