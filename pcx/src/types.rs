use crate::error::PcxError;

pub const PCX_HEADER_LENGTH: usize = 128;
pub const PCX_MANUFACTURER: u8 = 0x0a;
pub const PALETTE_MARKER: u8 = 0x0c;
pub const PALETTE_COLORS: usize = 256;
pub const PALETTE_LENGTH: usize = PALETTE_COLORS * 3;

/// Largest width or height the decoder allocates for.
pub const MAX_DIMENSION: usize = 1 << 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    /// One palette index per pixel.
    Indexed8,
    /// Three bytes per pixel, R then G then B.
    Direct24,
}

impl ColorDepth {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorDepth::Indexed8 => 1,
            ColorDepth::Direct24 => 3,
        }
    }

    /// Number of RLE planes stored per image row.
    pub fn planes(self) -> usize {
        self.bytes_per_pixel()
    }

    pub fn from_planes(bits_per_pixel: u8, planes: u8) -> Result<Self, PcxError> {
        match (bits_per_pixel, planes) {
            (8, 1) => Ok(ColorDepth::Indexed8),
            (8, 3) => Ok(ColorDepth::Direct24),
            _ => Err(PcxError::UnsupportedLayout {
                bits_per_pixel,
                planes,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(pub Vec<[u8; 3]>);

impl Palette {
    pub fn new(s: impl Into<Vec<[u8; 3]>>) -> Self {
        Self(s.into())
    }

    /// Reads RGB triples in file order. Trailing bytes that do not form a triple are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(
            bytes
                .chunks_exact(3)
                .map(|rgb| [rgb[0], rgb[1], rgb[2]])
                .collect(),
        )
    }

    pub fn get_bytes(&self) -> &Vec<[u8; 3]> {
        &self.0
    }

    pub fn color(&self, index: u8) -> [u8; 3] {
        self.0.get(index as usize).copied().unwrap_or([0, 0, 0])
    }
}

/// The 128-byte header in front of every PCX file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcxHeader {
    pub manufacturer: u8,
    pub version: u8,
    pub encoding: u8,
    pub bits_per_pixel: u8,
    pub x_min: u16,
    pub y_min: u16,
    pub x_max: u16,
    pub y_max: u16,
    pub h_dpi: u16,
    pub v_dpi: u16,
    pub ega_palette: Vec<u8>,
    pub reserved: u8,
    pub color_planes: u8,
    pub bytes_per_line: u16,
    pub palette_type: u16,
}

impl PcxHeader {
    /// Header for an image written by this crate: origin at zero, one scanline per row
    /// without padding.
    ///
    /// Fails when a side is zero or does not fit the 16-bit header fields.
    pub fn new(width: u32, height: u32, depth: ColorDepth) -> Result<Self, PcxError> {
        let unencodable = || PcxError::UnencodableDimensions { width, height };

        let bytes_per_line = u16::try_from(width).map_err(|_| unencodable())?;
        let rows = u16::try_from(height).map_err(|_| unencodable())?;

        let (Some(x_max), Some(y_max)) = (bytes_per_line.checked_sub(1), rows.checked_sub(1))
        else {
            return Err(unencodable());
        };

        Ok(Self {
            manufacturer: PCX_MANUFACTURER,
            version: 5,
            encoding: 1,
            bits_per_pixel: 8,
            x_min: 0,
            y_min: 0,
            x_max,
            y_max,
            h_dpi: bytes_per_line,
            v_dpi: rows,
            ega_palette: vec![0; 48],
            reserved: 0,
            color_planes: depth.planes() as u8,
            bytes_per_line,
            palette_type: 1,
        })
    }

    /// `None` when the bounds are inverted.
    pub fn width(&self) -> Option<usize> {
        self.x_max
            .checked_sub(self.x_min)
            .map(|span| span as usize + 1)
    }

    /// `None` when the bounds are inverted.
    pub fn height(&self) -> Option<usize> {
        self.y_max
            .checked_sub(self.y_min)
            .map(|span| span as usize + 1)
    }

    pub fn color_depth(&self) -> Result<ColorDepth, PcxError> {
        ColorDepth::from_planes(self.bits_per_pixel, self.color_planes)
    }

    /// Checks everything the decoder relies on and returns the plane layout.
    pub fn layout(&self) -> Result<PlaneLayout, PcxError> {
        if self.manufacturer != PCX_MANUFACTURER {
            return Err(PcxError::UnknownManufacturer {
                manufacturer: self.manufacturer,
            });
        }

        let (Some(width), Some(height)) = (self.width(), self.height()) else {
            return Err(PcxError::InvalidBounds {
                x_min: self.x_min,
                y_min: self.y_min,
                x_max: self.x_max,
                y_max: self.y_max,
            });
        };

        PlaneLayout::new(
            width,
            height,
            self.bytes_per_line as usize,
            self.color_depth()?,
        )
    }
}

/// Geometry of an RLE-coded image: how many rows, how many planes per row and how long each plane is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    pub width: usize,
    pub height: usize,
    pub bytes_per_line: usize,
    pub depth: ColorDepth,
}

impl PlaneLayout {
    pub fn new(
        width: usize,
        height: usize,
        bytes_per_line: usize,
        depth: ColorDepth,
    ) -> Result<Self, PcxError> {
        if bytes_per_line < width {
            return Err(PcxError::ShortScanline {
                bytes_per_line,
                width,
            });
        }

        Ok(Self {
            width,
            height,
            bytes_per_line,
            depth,
        })
    }

    /// Layout with scanlines exactly as wide as the image.
    pub fn unpadded(width: usize, height: usize, depth: ColorDepth) -> Self {
        Self {
            width,
            height,
            bytes_per_line: width,
            depth,
        }
    }

    /// Length of the decoded pixel buffer, refusing anything past [`MAX_DIMENSION`].
    pub fn pixel_buffer_length(&self) -> Result<usize, PcxError> {
        let too_large = || PcxError::ImageTooLarge {
            width: self.width,
            height: self.height,
            limit: MAX_DIMENSION,
        };

        if self.width > MAX_DIMENSION
            || self.height > MAX_DIMENSION
            || self.bytes_per_line > u16::MAX as usize
        {
            return Err(too_large());
        }

        self.width
            .checked_mul(self.height)
            .and_then(|pixels| pixels.checked_mul(self.depth.bytes_per_pixel()))
            .ok_or_else(too_large)
    }

    /// Bytes the RLE stream has to produce, scanline padding included.
    pub fn scanline_bytes(&self) -> Option<usize> {
        self.bytes_per_line
            .checked_mul(self.depth.planes())?
            .checked_mul(self.height)
    }
}

/// Decoded pixels.
///
/// `pixels` is row-major and always `width * height * bytes_per_pixel` long. Indexed8 images
/// carry their 256-entry palette, Direct24 images never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    depth: ColorDepth,
    pixels: Vec<u8>,
    palette: Option<Palette>,
}

impl RasterImage {
    pub fn new(
        width: u32,
        height: u32,
        depth: ColorDepth,
        pixels: Vec<u8>,
        palette: Option<Palette>,
    ) -> Result<Self, PcxError> {
        let expect = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(depth.bytes_per_pixel()))
            .unwrap_or(usize::MAX);

        if pixels.len() != expect {
            return Err(PcxError::PixelBufferSize {
                expect,
                have: pixels.len(),
            });
        }

        let palette = match depth {
            ColorDepth::Indexed8 => Some(palette.ok_or(PcxError::MissingPalette)?),
            ColorDepth::Direct24 => None,
        };

        Ok(Self {
            width,
            height,
            depth,
            pixels,
            palette,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_depth(&self) -> ColorDepth {
        self.depth
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Raw bytes of the pixel at (x, y): one palette index, or an R, G, B triple.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let bpp = self.depth.bytes_per_pixel();
        let start = (y as usize * self.width as usize + x as usize) * bpp;

        Some(&self.pixels[start..start + bpp])
    }

    /// Display color of the pixel at (x, y).
    pub fn rgb(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let pixel = self.pixel(x, y)?;

        match &self.palette {
            Some(palette) => Some(palette.color(pixel[0])),
            None => Some([pixel[0], pixel[1], pixel[2]]),
        }
    }

    /// Same pixels, different palette.
    pub(crate) fn replace_palette(&self, palette: Palette) -> Self {
        Self {
            palette: Some(palette),
            ..self.clone()
        }
    }
}
