//! PCX images as stored inside sprite containers.
//!
//! Decodes and encodes the run-length scheme, the 8-bit indexed and 24-bit three-plane
//! layouts, and swaps palettes in from `.act` color tables.
pub mod error;
mod palette;
mod parser;
pub mod rle;
mod types;
mod utils;
mod writer;

pub use palette::splice_act;
pub use parser::parse_header;
pub use rle::{decode_rle_image, encode_scanline, RleDecoder, RleMode};
pub use types::*;

#[cfg(test)]
mod test {
    use crate::{
        error::PcxError, parse_header, splice_act, ColorDepth, Palette, PcxHeader, RasterImage,
        RleMode, PALETTE_LENGTH, PCX_HEADER_LENGTH,
    };

    fn ramp_palette() -> Palette {
        Palette::new((0..=255u8).map(|i| [i, 255 - i, i / 2]).collect::<Vec<_>>())
    }

    fn checker(width: u32, height: u32) -> RasterImage {
        let pixels = (0..width * height)
            .map(|i| if (i % width + i / width) % 2 == 0 { 0 } else { 200 })
            .collect();

        RasterImage::new(width, height, ColorDepth::Indexed8, pixels, Some(ramp_palette())).unwrap()
    }

    fn act_table() -> Vec<u8> {
        (0..=255u8).flat_map(|i| [i, i.wrapping_add(1), i.wrapping_add(2)]).collect()
    }

    #[test]
    fn indexed_round_trip() {
        let image = checker(13, 7);

        let bytes = image.write_to_bytes().unwrap();
        let decoded = RasterImage::open_from_bytes_with(&bytes, RleMode::Strict).unwrap();

        assert_eq!(decoded, image);
        assert_eq!(decoded.pixels().len(), 13 * 7);
        assert_eq!(decoded.rgb(1, 0), Some([200, 55, 100]));
    }

    #[test]
    fn direct_round_trip() {
        let pixels: Vec<u8> = (0..4 * 3)
            .flat_map(|i: u8| [i * 20, 7, 255 - i])
            .collect();
        let image = RasterImage::new(4, 3, ColorDepth::Direct24, pixels, None).unwrap();

        let bytes = image.write_to_bytes().unwrap();
        let decoded = RasterImage::open_from_bytes_with(&bytes, RleMode::Strict).unwrap();

        assert_eq!(decoded, image);
        assert!(decoded.palette().is_none());
        assert_eq!(decoded.rgb(1, 0), Some([20, 7, 254]));
    }

    #[test]
    fn header_fields() {
        let bytes = checker(5, 2).write_to_bytes().unwrap();
        let (rest, header) = parse_header(&bytes).unwrap();

        assert_eq!(rest.len(), bytes.len() - PCX_HEADER_LENGTH);
        assert_eq!(header.manufacturer, 0x0a);
        assert_eq!(header.width(), Some(5));
        assert_eq!(header.height(), Some(2));
        assert_eq!(header.color_planes, 1);
        assert_eq!(header.bytes_per_line, 5);

        // palette marker right before the palette
        assert_eq!(bytes[bytes.len() - PALETTE_LENGTH - 1], 0x0c);
    }

    #[test]
    fn inverted_bounds_fail() {
        let mut bytes = checker(5, 2).write_to_bytes().unwrap();
        // x_min = 9 while x_max = 4
        bytes[4..6].copy_from_slice(&9u16.to_le_bytes());

        let (_, header) = parse_header(&bytes).unwrap();

        assert_eq!(header.width(), None);
        assert_eq!(header.height(), Some(2));

        let err = RasterImage::open_from_bytes(&bytes).unwrap_err();

        assert!(matches!(
            err,
            PcxError::InvalidBounds {
                x_min: 9,
                x_max: 4,
                ..
            }
        ));
    }

    #[test]
    fn empty_image_cannot_be_written() {
        let image =
            RasterImage::new(0, 3, ColorDepth::Indexed8, vec![], Some(ramp_palette())).unwrap();

        let err = image.write_to_bytes().unwrap_err();

        assert!(matches!(
            err,
            PcxError::UnencodableDimensions {
                width: 0,
                height: 3
            }
        ));
    }

    #[test]
    fn wide_header_cannot_be_built() {
        let err = PcxHeader::new(70000, 1, ColorDepth::Direct24).unwrap_err();

        assert!(matches!(
            err,
            PcxError::UnencodableDimensions {
                width: 70000,
                height: 1
            }
        ));

        let header = PcxHeader::new(65535, 1, ColorDepth::Direct24).unwrap();

        assert_eq!(header.width(), Some(65535));
        assert_eq!(header.bytes_per_line, 65535);
    }

    #[test]
    fn short_header_fails() {
        let err = RasterImage::open_from_bytes(&[0x0a; 100]).unwrap_err();

        assert!(matches!(err, PcxError::ParseHeader));
    }

    #[test]
    fn wrong_manufacturer_fails() {
        let mut bytes = checker(2, 2).write_to_bytes().unwrap();
        bytes[0] = 0x0b;

        let err = RasterImage::open_from_bytes(&bytes).unwrap_err();

        assert!(matches!(
            err,
            PcxError::UnknownManufacturer { manufacturer: 0x0b }
        ));
    }

    #[test]
    fn four_planes_unsupported() {
        let mut bytes = checker(2, 2).write_to_bytes().unwrap();
        bytes[65] = 4;

        let err = RasterImage::open_from_bytes(&bytes).unwrap_err();

        assert!(matches!(
            err,
            PcxError::UnsupportedLayout {
                bits_per_pixel: 8,
                planes: 4
            }
        ));
    }

    #[test]
    fn pixel_buffer_size_is_checked() {
        let err = RasterImage::new(2, 2, ColorDepth::Direct24, vec![0; 4], None).unwrap_err();

        assert!(matches!(err, PcxError::PixelBufferSize { expect: 12, have: 4 }));
    }

    #[test]
    fn act_triples_are_reversed() {
        let palette = Palette::from_act_bytes(&act_table()).unwrap();

        assert_eq!(palette.get_bytes()[0], [255, 0, 1]);
        assert_eq!(palette.get_bytes()[255], [0, 1, 2]);
    }

    #[test]
    fn substitution_keeps_indices() {
        let image = checker(4, 4);
        let palette = Palette::from_act_bytes(&act_table()).unwrap();

        let recolored = image.with_palette(palette.clone()).unwrap();

        assert_eq!(recolored.pixels(), image.pixels());
        assert_eq!(recolored.palette(), Some(&palette));
        assert_eq!(image.palette(), Some(&ramp_palette()));
    }

    #[test]
    fn substitution_on_direct_fails() {
        let image = RasterImage::new(1, 1, ColorDepth::Direct24, vec![1, 2, 3], None).unwrap();
        let palette = Palette::from_act_bytes(&act_table()).unwrap();

        assert!(matches!(
            image.with_palette(palette),
            Err(PcxError::MissingPalette)
        ));
    }

    #[test]
    fn short_act_table_fails() {
        let err = Palette::from_act_bytes(&[0; 767]).unwrap_err();

        assert!(matches!(
            err,
            PcxError::PaletteTableSizeMismatch {
                expect: 768,
                have: 767
            }
        ));
    }

    #[test]
    fn splice_matches_substitution() {
        let image = checker(6, 3);
        let pcx = image.write_to_bytes().unwrap();
        let act = act_table();

        let spliced = splice_act(&pcx, &act).unwrap();

        assert_eq!(spliced.len(), pcx.len());
        assert_eq!(&spliced[spliced.len() - PALETTE_LENGTH..][..3], &[255, 0, 1]);
        assert_eq!(&spliced[spliced.len() - 3..], &[0, 1, 2]);

        let decoded = RasterImage::open_from_bytes(&spliced).unwrap();
        let expected = image
            .with_palette(Palette::from_act_bytes(&act).unwrap())
            .unwrap();

        assert_eq!(decoded, expected);
    }

    #[test]
    fn rgb8_conversion_uses_palette() {
        let image = checker(2, 1);
        let rgb = image.to_rgb8();

        assert_eq!(rgb.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [200, 55, 100]);
    }
}
