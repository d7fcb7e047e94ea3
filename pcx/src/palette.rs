//! Re-coloring Indexed8 images with an alternate color table (`.act` file).
//!
//! An `.act` table holds 256 RGB triples stored back to front relative to the palette
//! embedded in a PCX file, so the triples are reversed before use.

use std::path::Path;

use crate::{
    error::PcxError,
    parser::parse_header,
    types::{ColorDepth, Palette, RasterImage, PALETTE_LENGTH},
};

impl Palette {
    /// Reads an alternate color table. The table must be exactly 768 bytes.
    pub fn from_act_bytes(bytes: &[u8]) -> Result<Self, PcxError> {
        if bytes.len() != PALETTE_LENGTH {
            return Err(PcxError::PaletteTableSizeMismatch {
                expect: PALETTE_LENGTH,
                have: bytes.len(),
            });
        }

        Ok(Self(
            bytes
                .chunks_exact(3)
                .rev()
                .map(|rgb| [rgb[0], rgb[1], rgb[2]])
                .collect(),
        ))
    }

    pub fn open_act_file(path: impl AsRef<Path>) -> Result<Self, PcxError> {
        let bytes = std::fs::read(path)?;

        Self::from_act_bytes(&bytes)
    }
}

impl RasterImage {
    /// New image with the same pixel indices and `palette`. Direct24 images have no palette to replace.
    pub fn with_palette(&self, palette: Palette) -> Result<RasterImage, PcxError> {
        match self.color_depth() {
            ColorDepth::Indexed8 => Ok(self.replace_palette(palette)),
            ColorDepth::Direct24 => Err(PcxError::MissingPalette),
        }
    }

    pub fn with_act_file(&self, path: impl AsRef<Path>) -> Result<RasterImage, PcxError> {
        self.with_palette(Palette::open_act_file(path)?)
    }
}

/// Splices an alternate color table into an encoded PCX file.
///
/// Everything but the trailing 768 palette bytes is kept, then the reversed table is appended.
pub fn splice_act(pcx: &[u8], act: &[u8]) -> Result<Vec<u8>, PcxError> {
    let palette = Palette::from_act_bytes(act)?;

    let (stream, header) = parse_header(pcx).map_err(|_| PcxError::ParseHeader)?;

    if header.color_depth()? != ColorDepth::Indexed8 || stream.len() < PALETTE_LENGTH {
        return Err(PcxError::MissingPalette);
    }

    let mut res = pcx[..pcx.len() - PALETTE_LENGTH].to_vec();
    res.extend(palette.get_bytes().as_flattened());

    Ok(res)
}
