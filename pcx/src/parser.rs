use nom::{
    bytes::complete::take,
    number::complete::{le_u16, le_u8},
    IResult as _IResult, Parser,
};

use crate::{
    error::PcxError,
    rle::{decode_rle_image, RleMode},
    types::{PcxHeader, RasterImage},
};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

pub fn parse_header(i: &'_ [u8]) -> IResult<'_, PcxHeader> {
    let (i, (manufacturer, version, encoding, bits_per_pixel)) =
        (le_u8, le_u8, le_u8, le_u8).parse(i)?;
    let (i, (x_min, y_min, x_max, y_max, h_dpi, v_dpi)) =
        (le_u16, le_u16, le_u16, le_u16, le_u16, le_u16).parse(i)?;
    let (i, ega_palette) = take(48usize).parse(i)?;
    let (i, (reserved, color_planes, bytes_per_line, palette_type)) =
        (le_u8, le_u8, le_u16, le_u16).parse(i)?;
    let (i, _filler) = take(58usize).parse(i)?;

    Ok((
        i,
        PcxHeader {
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
            ega_palette: ega_palette.to_vec(),
            reserved,
            color_planes,
            bytes_per_line,
            palette_type,
        },
    ))
}

/// Decodes a whole PCX file: header, RLE stream and, for Indexed8, the trailing palette.
pub fn parse_pcx(i: &[u8], mode: RleMode) -> Result<RasterImage, PcxError> {
    let (stream, header) = parse_header(i).map_err(|_| PcxError::ParseHeader)?;
    let layout = header.layout()?;

    decode_rle_image(stream, &layout, mode)
}
