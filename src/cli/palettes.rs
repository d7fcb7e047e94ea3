use mugenchars::paths::find_palette_files;

use super::{load_config, Cli, CliRes};

pub struct Palettes;
impl Cli for Palettes {
    fn name(&self) -> &'static str {
        "palettes"
    }

    // In: path to .def
    fn cli(&self) -> CliRes {
        let args: Vec<String> = std::env::args().skip(2).collect();

        if args.len() != 1 {
            self.cli_help();
            return CliRes::Err;
        }

        let config = match load_config(None) {
            Ok(config) => config,
            Err(err) => {
                println!("Cannot read config: {}", err);
                return CliRes::Err;
            }
        };

        let tables = find_palette_files(&args[0], &config.palette_extension);

        if tables.is_empty() {
            println!("No color tables found");
        }

        tables.iter().for_each(|table| println!("{}", table));

        CliRes::Ok
    }

    fn cli_help(&self) {
        println!(
            "\
Lists the color tables a character can be previewed with

<path to .def>
"
        )
    }
}
