use byte_writer::ByteWriter;

use crate::{
    error::PcxError,
    rle::encode_planes,
    types::{ColorDepth, Palette, PcxHeader, RasterImage, PALETTE_COLORS, PALETTE_MARKER},
};

trait WriteToWriter {
    fn write_to_bytes(&self, writer: &mut ByteWriter);
}

impl RasterImage {
    /// Encodes a complete PCX file.
    ///
    /// Fails for images the 16-bit header cannot describe, empty ones included.
    pub fn write_to_bytes(&self) -> Result<Vec<u8>, PcxError> {
        let header = PcxHeader::new(self.width(), self.height(), self.color_depth())?;
        let mut writer = ByteWriter::new();

        header.write_to_bytes(&mut writer);
        encode_planes(self, &mut writer);

        if let Some(palette) = self.palette() {
            writer.append_u8(PALETTE_MARKER);
            palette.write_to_bytes(&mut writer);
        }

        Ok(writer.data)
    }

    /// Encodes the pixels as a bare RLE stream followed by the palette for Indexed8 images.
    pub fn write_rle_stream(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();

        encode_planes(self, &mut writer);

        if let (ColorDepth::Indexed8, Some(palette)) = (self.color_depth(), self.palette()) {
            palette.write_to_bytes(&mut writer);
        }

        writer.data
    }
}

impl WriteToWriter for PcxHeader {
    fn write_to_bytes(&self, writer: &mut ByteWriter) {
        let Self {
            manufacturer,
            version,
            encoding,
            bits_per_pixel,
            x_min,
            y_min,
            x_max,
            y_max,
            h_dpi,
            v_dpi,
            ega_palette,
            reserved,
            color_planes,
            bytes_per_line,
            palette_type,
        } = self;

        writer.append_u8(*manufacturer);
        writer.append_u8(*version);
        writer.append_u8(*encoding);
        writer.append_u8(*bits_per_pixel);
        writer.append_u16(*x_min);
        writer.append_u16(*y_min);
        writer.append_u16(*x_max);
        writer.append_u16(*y_max);
        writer.append_u16(*h_dpi);
        writer.append_u16(*v_dpi);

        let ega_start = writer.get_offset();
        writer.append_u8_slice(&ega_palette[..ega_palette.len().min(48)]);
        writer.pad_to(ega_start + 48);

        writer.append_u8(*reserved);
        writer.append_u8(*color_planes);
        writer.append_u16(*bytes_per_line);
        writer.append_u16(*palette_type);
        writer.append_zeroes(58);
    }
}

impl WriteToWriter for Palette {
    fn write_to_bytes(&self, writer: &mut ByteWriter) {
        let colors = &self.get_bytes()[..self.get_bytes().len().min(PALETTE_COLORS)];

        writer.append_u8_slice(colors.as_flattened());

        // always 256 entries on disk
        writer.append_zeroes((PALETTE_COLORS - colors.len()) * 3);
    }
}
