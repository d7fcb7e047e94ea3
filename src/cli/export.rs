use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mugenchars::{open_container_with, preview::to_display_image, substitute_palette};

use super::*;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct ExportCli {
    // This is just dummy command because we are already in the command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Export {
        /// Path to .sff file
        sff: PathBuf,
        /// Path to the .png to write
        out: PathBuf,
        /// Index of the sprite in the file
        #[arg(short, long, default_value_t = 0)]
        index: usize,
        /// Recolor with this .act color table
        #[arg(short, long)]
        act: Option<PathBuf>,
        /// Keep the top left color opaque
        #[arg(long)]
        no_key: bool,
        /// Config file to use instead of the one next to the binary
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub struct Export;

impl Cli for Export {
    fn name(&self) -> &'static str {
        "export"
    }

    fn cli(&self) -> CliRes {
        let cli = ExportCli::parse();

        let Commands::Export {
            sff,
            out,
            index,
            act,
            no_key,
            config,
        } = cli.command;

        match export(&sff, &out, index, act.as_deref(), no_key, config.as_deref()) {
            Ok(_) => CliRes::Ok,
            Err(err) => {
                println!("{}", err);
                CliRes::Err
            }
        }
    }

    fn cli_help(&self) {
        // the rest is handled by clap
        println!("Exports one sprite as .png, see `export --help`");
    }
}

fn export(
    sff: &Path,
    out: &Path,
    index: usize,
    act: Option<&Path>,
    no_key: bool,
    config: Option<&Path>,
) -> eyre::Result<()> {
    let config = load_config(config)?;

    let mut collection = open_container_with(sff, &config)?;
    let sprite = collection.image_at(index)?;

    let image = match act {
        Some(act) => substitute_palette(&sprite, act)?,
        None => (*sprite).clone(),
    };

    let display = to_display_image(&image, config.transparent_key && !no_key);
    display.save(out)?;

    log::info!(
        "Wrote sprite {index} ({}x{}) to `{}`",
        image.width(),
        image.height(),
        out.display()
    );

    Ok(())
}
