use std::path::Path;

use mugenchars::config::{parse_config, parse_config_from_file, Config};

use self::{export::Export, info::Info, palettes::Palettes};

mod export;
mod info;
mod palettes;

pub enum CliRes {
    Ok,
    Err,
    /// Nothing was asked of the command line.
    NoCli,
}

pub trait Cli {
    fn name(&self) -> &'static str;
    /// Each module has to handle the arguments by itself.
    ///
    /// Arguments for the module start at `args[2]`.
    fn cli(&self) -> CliRes;
    fn cli_help(&self);
}

// Add new modules here.
const MODULES: &[&dyn Cli] = &[&Info, &Export, &Palettes];

pub fn help() {
    println!(
        "\
mugenchars

Available modules:"
    );

    for module in MODULES {
        println!("{}", module.name());
    }
}

/// Runs command-line options
pub fn cli() -> CliRes {
    let args: Vec<String> = std::env::args().collect();

    // No arguments
    if args.len() <= 1 {
        return CliRes::NoCli;
    }

    for module in MODULES {
        if args[1] == module.name() {
            return module.cli();
        }
    }

    // In case nothing fits then prints this again.
    help();

    CliRes::Err
}

/// Config from `path`, or from next to the binary.
fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    match path {
        Some(path) => parse_config_from_file(path),
        None => parse_config(),
    }
}
