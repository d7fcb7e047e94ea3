use mugenchars::{open_container_with, sff::RecordPayload};

use super::{load_config, Cli, CliRes};

pub struct Info;
impl Cli for Info {
    fn name(&self) -> &'static str {
        "info"
    }

    // In: path to .sff
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

        let mut collection = match open_container_with(&args[0], &config) {
            Ok(collection) => collection,
            Err(err) => {
                println!("{}", err);
                return CliRes::Err;
            }
        };

        let header = collection.header();

        println!("version: {}", header.version());
        if let Some(signature) = header.signature() {
            println!("signature: {}", signature);
        }
        if let Some(group_count) = header.group_count() {
            println!("groups: {}", group_count);
        }
        println!("images: {}", header.image_count());
        println!("first record: {}", header.first_record_offset());
        println!("shared palette: {}", header.shared_palette());

        // whatever was read before a failure is still listed
        let res = collection.records().map(|_| ());

        for (index, record) in collection.visited().iter().enumerate() {
            let payload = match record.payload {
                RecordPayload::Owned(ref bytes) => format!("{} bytes", bytes.len()),
                RecordPayload::AliasOf(shared_index) => format!("linked to {}", shared_index),
            };

            println!(
                "{:>5} @ {:>8}: group {:>5} image {:>4} axis ({}, {}) {}",
                index,
                record.offset,
                record.group,
                record.image_number,
                record.axis.x,
                record.axis.y,
                payload
            );
        }

        if let Err(err) = res {
            println!("{}", err);
            return CliRes::Err;
        }

        CliRes::Ok
    }

    fn cli_help(&self) {
        println!(
            "\
Lists the header and the sprite records of a sprite file

<path to .sff>
"
        )
    }
}
