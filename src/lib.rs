//! Sprite previews for fighting game character packages.
//!
//! Opens a character's sprite container, decodes sprites on demand and recolors them with
//! the `.act` color tables shipped next to the character definition.
use std::path::Path;

use eyre::eyre;
use pcx::{Palette, RasterImage};
use sff::SpriteCollection;

pub mod config;
pub mod paths;
pub mod preview;

pub use pcx;
pub use sff;

use config::Config;

/// Opens a sprite container with the default configuration.
pub fn open_container(path: impl AsRef<Path>) -> eyre::Result<SpriteCollection> {
    open_container_with(path, &Config::default())
}

pub fn open_container_with(
    path: impl AsRef<Path>,
    config: &Config,
) -> eyre::Result<SpriteCollection> {
    let path = path.as_ref();

    SpriteCollection::open_from_file_with(path, config.rle_mode())
        .map_err(|err| eyre!("Cannot open sprite file `{}`: {}", path.display(), err))
}

/// Same pixel indices as `image`, colors from the `.act` table at `table_path`.
///
/// `image` is left untouched, so it stays usable when the table is rejected.
pub fn substitute_palette(
    image: &RasterImage,
    table_path: impl AsRef<Path>,
) -> eyre::Result<RasterImage> {
    let table_path = table_path.as_ref();

    let palette = Palette::open_act_file(table_path)
        .map_err(|err| eyre!("Cannot read color table `{}`: {}", table_path.display(), err))?;

    Ok(image.with_palette(palette)?)
}
