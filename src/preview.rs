use std::path::Path;

use image::{Rgba, RgbaImage};
use pcx::RasterImage;

use crate::{config::Config, open_container_with, paths::resolve, substitute_palette};

/// Converts to RGBA. With `transparent_key`, every pixel sharing the color of the top left
/// pixel becomes fully transparent.
pub fn to_display_image(image: &RasterImage, transparent_key: bool) -> RgbaImage {
    let key = if transparent_key {
        image.rgb(0, 0)
    } else {
        None
    };

    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let rgb = image.rgb(x, y).unwrap_or([0, 0, 0]);
        let alpha = if key == Some(rgb) { 0 } else { 255 };

        Rgba([rgb[0], rgb[1], rgb[2], alpha])
    })
}

/// First sprite of a character, optionally recolored, ready for display.
///
/// `sprite` and `act` are paths relative to the definition file, as written inside it.
pub fn sprite_preview(
    def_path: impl AsRef<Path>,
    sprite: &str,
    act: Option<&str>,
    config: &Config,
) -> eyre::Result<RgbaImage> {
    let def_path = def_path.as_ref();

    let mut collection = open_container_with(resolve(def_path, sprite), config)?;
    let first = collection.first()?;

    let image = match act {
        Some(act) => substitute_palette(&first, resolve(def_path, act))?,
        None => (*first).clone(),
    };

    Ok(to_display_image(&image, config.transparent_key))
}

#[cfg(test)]
mod test {
    use std::fs;

    use pcx::ColorDepth;
    use sff::{Axis, SffWriter};

    use crate::test::{act_table, sample_image, scratch_dir};

    use super::*;

    #[test]
    fn top_left_color_is_transparent() {
        let display = to_display_image(&sample_image(), true);

        assert_eq!(display.get_pixel(0, 0).0, [9, 0, 246, 0]);
        assert_eq!(display.get_pixel(2, 1).0, [9, 0, 246, 0]);
        assert_eq!(display.get_pixel(0, 1).0, [1, 0, 254, 255]);
    }

    #[test]
    fn no_key_keeps_everything_opaque() {
        let display = to_display_image(&sample_image(), false);

        assert!(display.pixels().all(|pixel| pixel.0[3] == 255));
    }

    #[test]
    fn direct_images_are_keyed_too() {
        let pixels = vec![1, 2, 3, 4, 5, 6, 1, 2, 3];
        let image = RasterImage::new(3, 1, ColorDepth::Direct24, pixels, None).unwrap();

        let display = to_display_image(&image, true);

        assert_eq!(display.get_pixel(1, 0).0, [4, 5, 6, 255]);
        assert_eq!(display.get_pixel(2, 0).0, [1, 2, 3, 0]);
    }

    #[test]
    fn preview_from_definition_folder() {
        let dir = scratch_dir("preview");
        fs::create_dir_all(dir.join("pal")).unwrap();

        let mut sff = SffWriter::new();
        sff.push_image(0, 0, Axis::default(), &sample_image()).unwrap();
        sff.write_to_file(dir.join("kfm.sff")).unwrap();
        fs::write(dir.join("pal").join("kfm1.act"), act_table()).unwrap();

        let def = dir.join("kfm.def");
        let config = Config::default();

        let plain = sprite_preview(&def, "kfm.sff", None, &config).unwrap();
        assert_eq!(plain.get_pixel(0, 1).0, [1, 0, 254, 255]);

        let recolored = sprite_preview(&def, "kfm.sff", Some("pal\\kfm1.act"), &config).unwrap();
        assert_eq!(recolored.get_pixel(0, 1).0, [254, 254, 254, 255]);
        assert_eq!(recolored.get_pixel(0, 0).0[3], 0);
    }
}
