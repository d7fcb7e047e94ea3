#[derive(Debug, thiserror::Error)]
pub enum PcxError {
    #[error("Failed to parse PCX header")]
    ParseHeader,
    #[error("Unknown PCX manufacturer byte: {manufacturer:#04x}")]
    UnknownManufacturer { manufacturer: u8 },
    #[error("Unsupported PCX layout: {bits_per_pixel} bits per pixel, {planes} plane(s)")]
    UnsupportedLayout { bits_per_pixel: u8, planes: u8 },
    #[error("Invalid PCX bounds: ({x_min}, {y_min}) to ({x_max}, {y_max})")]
    InvalidBounds {
        x_min: u16,
        y_min: u16,
        x_max: u16,
        y_max: u16,
    },
    #[error("Scanline of {bytes_per_line} bytes cannot hold {width} pixels")]
    ShortScanline { bytes_per_line: usize, width: usize },
    #[error("Image of {width}x{height} exceeds the {limit} pixel limit per side")]
    ImageTooLarge {
        width: usize,
        height: usize,
        limit: usize,
    },
    #[error("RLE stream of {available} bytes cannot hold the {needed} bytes the header declares")]
    StreamTooShort { needed: usize, available: usize },
    #[error("Image of {width}x{height} cannot be written as PCX")]
    UnencodableDimensions { width: u32, height: u32 },
    #[error("Image has no embedded palette")]
    MissingPalette,
    #[error("RLE stream ended early at row {row}, plane {plane}")]
    TruncatedStream { row: usize, plane: usize },
    #[error("Mismatched palette table size. Expect ({expect}). Have ({have})")]
    PaletteTableSizeMismatch { expect: usize, have: usize },
    #[error("Mismatched pixel buffer size. Expect ({expect}). Have ({have})")]
    PixelBufferSize { expect: usize, have: usize },
    #[error("IOError: {source}")]
    IOError {
        #[from]
        source: std::io::Error,
    },
}
