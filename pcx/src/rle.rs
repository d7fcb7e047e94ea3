//! The PCX-style run-length scheme used by sprite payloads.
//!
//! A byte above `0xC0` is a run marker: its low six bits are a repeat count and the next byte
//! is the value to repeat. Every other byte, `0xC0` included, is one literal pixel.
//!
//! Runs are not bound to scanlines. A run that does not fit in the remaining part of a
//! scanline carries over into the next one (the next plane of the same row for Direct24,
//! the next row for Indexed8), so no pixel is lost or duplicated.

use byte_writer::ByteWriter;

use crate::{
    error::PcxError,
    types::{ColorDepth, Palette, PlaneLayout, RasterImage, PALETTE_LENGTH},
};

pub const RUN_MARKER: u8 = 0xc0;
pub const MAX_RUN_LENGTH: usize = 63;

/// What to do when the stream runs out before the image is filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RleMode {
    /// Zero-fill the rest of the image, like the legacy tools do.
    #[default]
    Lenient,
    /// Fail with [`PcxError::TruncatedStream`].
    Strict,
}

#[derive(Debug, Clone, Copy)]
struct PendingRun {
    value: u8,
    remaining: usize,
}

/// Read cursor over one RLE stream.
///
/// The only state kept between scanlines is the stream position and the unfinished part
/// of a run that crossed the previous scanline's end.
#[derive(Debug, Clone)]
pub struct RleDecoder<'a> {
    data: &'a [u8],
    position: usize,
    pending: Option<PendingRun>,
}

impl<'a> RleDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            pending: None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.pending.is_none() && self.position >= self.data.len()
    }

    /// Fills `scanline` from the stream and returns how many bytes were written.
    ///
    /// Anything less than `scanline.len()` means the stream ended; the rest of the scanline
    /// is left untouched.
    pub fn decode_scanline(&mut self, scanline: &mut [u8]) -> usize {
        let mut filled = 0;

        while filled < scanline.len() {
            if let Some(run) = self.pending.as_mut() {
                let take = run.remaining.min(scanline.len() - filled);

                scanline[filled..filled + take].fill(run.value);
                filled += take;
                run.remaining -= take;

                if run.remaining == 0 {
                    self.pending = None;
                }

                continue;
            }

            let Some(&byte) = self.data.get(self.position) else {
                break;
            };
            self.position += 1;

            if byte > RUN_MARKER {
                // a marker without its value byte is the end of the stream
                let Some(&value) = self.data.get(self.position) else {
                    break;
                };
                self.position += 1;

                self.pending = Some(PendingRun {
                    value,
                    remaining: (byte - RUN_MARKER) as usize,
                });
            } else {
                scanline[filled] = byte;
                filled += 1;
            }
        }

        filled
    }
}

/// Decodes a bare RLE stream into an image.
///
/// For Indexed8 the last 768 bytes of `stream` are the palette and the pixel stream stops
/// strictly before them. For Direct24 every row holds three planes, red first.
pub fn decode_rle_image(
    stream: &[u8],
    layout: &PlaneLayout,
    mode: RleMode,
) -> Result<RasterImage, PcxError> {
    let (pixel_stream, palette) = match layout.depth {
        ColorDepth::Indexed8 => {
            let Some(palette_start) = stream.len().checked_sub(PALETTE_LENGTH) else {
                return Err(PcxError::MissingPalette);
            };

            (
                &stream[..palette_start],
                Some(Palette::from_bytes(&stream[palette_start..])),
            )
        }
        ColorDepth::Direct24 => (stream, None),
    };

    let pixels = decode_planes(pixel_stream, layout, mode)?;

    RasterImage::new(
        layout.width as u32,
        layout.height as u32,
        layout.depth,
        pixels,
        palette,
    )
}

fn decode_planes(stream: &[u8], layout: &PlaneLayout, mode: RleMode) -> Result<Vec<u8>, PcxError> {
    let buffer_length = layout.pixel_buffer_length()?;

    if mode == RleMode::Strict {
        let needed = layout.scanline_bytes().unwrap_or(usize::MAX);
        let available = max_decoded_length(stream.len());

        if needed > available {
            return Err(PcxError::StreamTooShort { needed, available });
        }
    }

    let bpp = layout.depth.bytes_per_pixel();
    let row_length = layout.width * bpp;

    let mut pixels = vec![0u8; buffer_length];
    let mut scanline = vec![0u8; layout.bytes_per_line];
    let mut decoder = RleDecoder::new(stream);
    let mut warned = false;

    for (row, row_pixels) in pixels.chunks_exact_mut(row_length.max(1)).enumerate() {
        for plane in 0..layout.depth.planes() {
            scanline.fill(0);

            let filled = decoder.decode_scanline(&mut scanline);

            if filled < scanline.len() {
                if mode == RleMode::Strict {
                    return Err(PcxError::TruncatedStream { row, plane });
                }

                if !warned {
                    log::warn!(
                        "RLE stream ended at row {row}, plane {plane}; filling the rest with zeroes"
                    );
                    warned = true;
                }
            }

            scanline
                .iter()
                .take(layout.width)
                .enumerate()
                .for_each(|(x, &value)| row_pixels[x * bpp + plane] = value);
        }
    }

    Ok(pixels)
}

/// Most bytes a stream of `length` bytes can expand to: nothing but full runs.
fn max_decoded_length(length: usize) -> usize {
    (length / 2)
        .saturating_mul(MAX_RUN_LENGTH)
        .saturating_add(length % 2)
}

/// Appends the RLE encoding of one scanline.
///
/// A lone pixel is written as a literal only when it is non-zero and below `0xC0`. Longer
/// runs are split into markers of at most 63.
pub fn encode_scanline(scanline: &[u8], writer: &mut ByteWriter) {
    for run in scanline.chunk_by(|a, b| a == b) {
        let value = run[0];

        if run.len() == 1 && value < RUN_MARKER && value != 0 {
            writer.append_u8(value);
            continue;
        }

        for piece in run.chunks(MAX_RUN_LENGTH) {
            writer.append_u8(RUN_MARKER + piece.len() as u8);
            writer.append_u8(value);
        }
    }
}

/// Encodes every row of `image`, one scanline per plane, without palette.
pub(crate) fn encode_planes(image: &RasterImage, writer: &mut ByteWriter) {
    let bpp = image.color_depth().bytes_per_pixel();
    let row_length = image.width() as usize * bpp;
    let mut scanline = Vec::with_capacity(image.width() as usize);

    for row in image.pixels().chunks_exact(row_length.max(1)) {
        for plane in 0..bpp {
            scanline.clear();
            scanline.extend(row.iter().skip(plane).step_by(bpp));

            encode_scanline(&scanline, writer);
        }
    }
}

#[cfg(test)]
mod test {
    use byte_writer::ByteWriter;

    use super::*;
    use crate::types::MAX_DIMENSION;

    fn encode(scanline: &[u8]) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        encode_scanline(scanline, &mut writer);
        writer.data
    }

    fn grey_palette() -> Palette {
        Palette::new((0..=255u8).map(|i| [i, i, i]).collect::<Vec<_>>())
    }

    #[test]
    fn sixty_three_is_one_marker() {
        assert_eq!(encode(&[7; 63]), [0xff, 7]);
    }

    #[test]
    fn sixty_four_is_two_markers() {
        assert_eq!(encode(&[7; 64]), [0xff, 7, 0xc1, 7]);
    }

    #[test]
    fn zero_is_never_a_literal() {
        assert_eq!(encode(&[0]), [0xc1, 0]);
        assert_eq!(encode(&[5, 0, 5]), [5, 0xc1, 0, 5]);
    }

    #[test]
    fn high_values_are_escaped() {
        assert_eq!(encode(&[0xc0]), [0xc1, 0xc0]);
        assert_eq!(encode(&[0xbf, 0xc5]), [0xbf, 0xc1, 0xc5]);
    }

    #[test]
    fn literal_c0_decodes_as_pixel() {
        let mut decoder = RleDecoder::new(&[0xc0, 0xc2, 9]);
        let mut scanline = [0u8; 3];

        assert_eq!(decoder.decode_scanline(&mut scanline), 3);
        assert_eq!(scanline, [0xc0, 9, 9]);
        assert!(decoder.is_exhausted());
    }

    #[test]
    fn run_wraps_into_next_scanline() {
        // 2 literals, then a run of 5 that overflows a 4 wide scanline by 3
        let stream = [1, 2, 0xc5, 3, 4];
        let mut decoder = RleDecoder::new(&stream);

        let mut first = [0u8; 4];
        let mut second = [0u8; 4];

        assert_eq!(decoder.decode_scanline(&mut first), 4);
        assert_eq!(decoder.decode_scanline(&mut second), 4);

        assert_eq!(first, [1, 2, 3, 3]);
        assert_eq!(second, [3, 3, 3, 4]);
    }

    #[test]
    fn wrapped_run_fills_image_exactly() {
        let layout = PlaneLayout::unpadded(3, 3, ColorDepth::Indexed8);

        // 9 pixels: one run of 7 spanning three rows, then two literals
        let mut stream = vec![0xc7, 4, 1, 2];
        stream.extend(grey_palette().get_bytes().as_flattened());

        let image = decode_rle_image(&stream, &layout, RleMode::Strict).unwrap();

        assert_eq!(image.pixels().len(), 9);
        assert_eq!(image.pixels(), [4, 4, 4, 4, 4, 4, 4, 1, 2]);
    }

    #[test]
    fn direct_run_wraps_into_next_plane() {
        let layout = PlaneLayout::unpadded(2, 1, ColorDepth::Direct24);

        // red plane [10, 20], then one run of 4 covering green and blue
        let stream = [10, 20, 0xc4, 30];

        let image = decode_rle_image(&stream, &layout, RleMode::Strict).unwrap();

        assert_eq!(image.pixels(), [10, 30, 30, 20, 30, 30]);
        assert_eq!(image.rgb(1, 0), Some([20, 30, 30]));
    }

    #[test]
    fn truncated_stream_is_zero_filled() {
        let layout = PlaneLayout::unpadded(4, 2, ColorDepth::Indexed8);

        let mut stream = vec![0xc6, 8];
        stream.extend(grey_palette().get_bytes().as_flattened());

        let image = decode_rle_image(&stream, &layout, RleMode::Lenient).unwrap();

        assert_eq!(image.pixels(), [8, 8, 8, 8, 8, 8, 0, 0]);
    }

    #[test]
    fn truncated_stream_fails_when_strict() {
        let layout = PlaneLayout::unpadded(4, 2, ColorDepth::Indexed8);

        let mut stream = vec![0xc6, 8];
        stream.extend(grey_palette().get_bytes().as_flattened());

        let err = decode_rle_image(&stream, &layout, RleMode::Strict).unwrap_err();

        assert!(matches!(err, PcxError::TruncatedStream { row: 1, plane: 0 }));
    }

    #[test]
    fn oversized_layout_is_rejected_before_allocating() {
        let layout = PlaneLayout::unpadded(65535, 65535, ColorDepth::Direct24);

        let err = decode_rle_image(&[0xff, 0], &layout, RleMode::Lenient).unwrap_err();

        assert!(matches!(
            err,
            PcxError::ImageTooLarge {
                width: 65535,
                height: 65535,
                ..
            }
        ));
    }

    #[test]
    fn largest_side_is_accepted() {
        let layout = PlaneLayout::unpadded(MAX_DIMENSION, 1, ColorDepth::Direct24);

        assert_eq!(layout.pixel_buffer_length().unwrap(), MAX_DIMENSION * 3);

        let layout = PlaneLayout::unpadded(MAX_DIMENSION + 1, 1, ColorDepth::Direct24);

        assert!(layout.pixel_buffer_length().is_err());
    }

    #[test]
    fn impossibly_short_stream_fails_when_strict() {
        // two bytes expand to 63 pixels at most
        let layout = PlaneLayout::unpadded(100, 100, ColorDepth::Indexed8);

        let mut stream = vec![0xff, 8];
        stream.extend(grey_palette().get_bytes().as_flattened());

        let err = decode_rle_image(&stream, &layout, RleMode::Strict).unwrap_err();

        assert!(matches!(
            err,
            PcxError::StreamTooShort {
                needed: 10000,
                available: 63
            }
        ));

        let image = decode_rle_image(&stream, &layout, RleMode::Lenient).unwrap();

        assert_eq!(image.pixels()[..63], [8; 63]);
        assert!(image.pixels()[63..].iter().all(|&pixel| pixel == 0));
    }

    #[test]
    fn marker_without_value_ends_stream() {
        let mut decoder = RleDecoder::new(&[3, 0xc4]);
        let mut scanline = [0u8; 4];

        assert_eq!(decoder.decode_scanline(&mut scanline), 1);
        assert_eq!(scanline, [3, 0, 0, 0]);
    }

    #[test]
    fn padded_scanlines_are_cropped() {
        let layout = PlaneLayout::new(3, 2, 4, ColorDepth::Indexed8).unwrap();

        let mut stream = vec![1, 2, 3, 0xc1, 0, 4, 5, 6, 0xc1, 0];
        stream.extend(grey_palette().get_bytes().as_flattened());

        let image = decode_rle_image(&stream, &layout, RleMode::Strict).unwrap();

        assert_eq!(image.pixels(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn indexed_without_palette_is_rejected() {
        let layout = PlaneLayout::unpadded(2, 2, ColorDepth::Indexed8);

        let err = decode_rle_image(&[1, 2, 3, 4], &layout, RleMode::Lenient).unwrap_err();

        assert!(matches!(err, PcxError::MissingPalette));
    }

    #[test]
    fn encoded_planes_decode_back() {
        let pixels = vec![
            0, 0, 0, 9, 9, 200, //
            1, 2, 3, 3, 3, 3, //
        ];
        let image =
            RasterImage::new(6, 2, ColorDepth::Indexed8, pixels, Some(grey_palette())).unwrap();

        let mut writer = ByteWriter::new();
        encode_planes(&image, &mut writer);
        writer.append_u8_slice(grey_palette().get_bytes().as_flattened());

        let layout = PlaneLayout::unpadded(6, 2, ColorDepth::Indexed8);
        let decoded = decode_rle_image(&writer.data, &layout, RleMode::Strict).unwrap();

        assert_eq!(decoded, image);
    }
}
