use std::{ffi::OsStr, path::Path};

use image::RgbImage;

use crate::{
    error::PcxError,
    parser::parse_pcx,
    rle::RleMode,
    types::RasterImage,
};

impl RasterImage {
    pub fn open_from_bytes(i: &[u8]) -> Result<RasterImage, PcxError> {
        Self::open_from_bytes_with(i, RleMode::default())
    }

    pub fn open_from_bytes_with(i: &[u8], mode: RleMode) -> Result<RasterImage, PcxError> {
        parse_pcx(i, mode)
    }

    pub fn open_from_file(path: impl AsRef<OsStr> + AsRef<Path>) -> Result<RasterImage, PcxError> {
        let file = std::fs::read(path)?;

        Self::open_from_bytes(&file)
    }

    pub fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            self.rgb(x, y).unwrap_or([0, 0, 0]).into()
        })
    }
}
