use std::{collections::HashSet, fs::OpenOptions, io::Write, path::Path};

use byte_writer::ByteWriter;
use pcx::RasterImage;

use crate::{
    error::SffError,
    types::{Axis, HEADER_PADDED_LENGTH_V1, RECORD_HEADER_LENGTH_V1, SIGNATURE, TAG_V1_01},
};

trait WriteToWriter {
    fn write_to_bytes(&self, writer: &mut ByteWriter) -> Result<(), SffError>;
}

fn fit<T: TryFrom<usize>>(field: &'static str, value: usize) -> Result<T, SffError> {
    T::try_from(value).map_err(|_| SffError::ValueTooLarge { field, value })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteSource {
    /// A complete PCX file.
    Pcx(Vec<u8>),
    /// Reuse the image of the sprite at this index.
    Linked(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteEntry {
    pub group: i16,
    pub image_number: i16,
    pub axis: Axis,
    pub copy_last_palette: bool,
    pub source: SpriteSource,
}

/// Builds a version 1.01 sprite file.
#[derive(Debug, Clone, Default)]
pub struct SffWriter {
    pub shared_palette: bool,
    pub entries: Vec<SpriteEntry>,
}

impl SffWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an image and returns its sprite index.
    pub fn push_image(
        &mut self,
        group: i16,
        image_number: i16,
        axis: Axis,
        image: &RasterImage,
    ) -> Result<usize, SffError> {
        let pcx = image.write_to_bytes().map_err(|source| SffError::Image {
            index: self.entries.len(),
            source,
        })?;

        Ok(self.push(SpriteEntry {
            group,
            image_number,
            axis,
            copy_last_palette: false,
            source: SpriteSource::Pcx(pcx),
        }))
    }

    /// Adds a sprite that shows the image of an earlier sprite.
    pub fn push_linked(
        &mut self,
        group: i16,
        image_number: i16,
        axis: Axis,
        shared_index: usize,
    ) -> Result<usize, SffError> {
        let index = self.entries.len();

        if shared_index >= index {
            return Err(SffError::LinkOutOfRange {
                index,
                shared_index,
            });
        }

        fit::<i16>("Linked sprite index", shared_index)?;

        Ok(self.push(SpriteEntry {
            group,
            image_number,
            axis,
            copy_last_palette: false,
            source: SpriteSource::Linked(shared_index),
        }))
    }

    pub fn push(&mut self, entry: SpriteEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Entries added with [`SffWriter::push`] are written as they are, links included.
    pub fn write_to_bytes(&self) -> Result<Vec<u8>, SffError> {
        let mut writer = ByteWriter::new();

        let group_count = self
            .entries
            .iter()
            .map(|entry| entry.group)
            .collect::<HashSet<_>>()
            .len();

        let first_record_offset = if self.entries.is_empty() {
            0
        } else {
            HEADER_PADDED_LENGTH_V1 as u32
        };

        writer.append_u8_slice(SIGNATURE);
        writer.append_u8(0);
        writer.append_u8_slice(&TAG_V1_01);
        writer.append_i32(fit("Group count", group_count)?);
        writer.append_i32(fit("Image count", self.entries.len())?);
        writer.append_u32(first_record_offset);
        writer.append_i32(RECORD_HEADER_LENGTH_V1 as i32);
        writer.append_u8(self.shared_palette as u8);
        writer.pad_to(HEADER_PADDED_LENGTH_V1);

        for (index, entry) in self.entries.iter().enumerate() {
            let next_offset_slot = writer.get_offset();

            entry.write_to_bytes(&mut writer)?;

            // the last record keeps a zero next offset
            if index + 1 < self.entries.len() {
                let next = fit("Record offset", writer.get_offset())?;
                writer.replace_with_u32(next_offset_slot, next);
            }
        }

        Ok(writer.data)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), SffError> {
        let bytes = self.write_to_bytes()?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        file.write_all(&bytes)?;
        file.flush()?;

        Ok(())
    }
}

impl WriteToWriter for SpriteEntry {
    fn write_to_bytes(&self, writer: &mut ByteWriter) -> Result<(), SffError> {
        let Self {
            group,
            image_number,
            axis,
            copy_last_palette,
            source,
        } = self;

        let (payload, shared_index): (&[u8], i16) = match source {
            SpriteSource::Pcx(bytes) => (bytes.as_slice(), 0),
            SpriteSource::Linked(index) => (&[], fit("Linked sprite index", *index)?),
        };

        let record_start = writer.get_offset();

        // next offset, patched once the following record's position is known
        writer.append_u32(0);
        writer.append_u32(fit("Payload length", payload.len())?);
        writer.append_i16(axis.x);
        writer.append_i16(axis.y);
        writer.append_i16(*group);
        writer.append_i16(*image_number);
        writer.append_i16(shared_index);
        writer.append_u8(*copy_last_palette as u8);
        writer.pad_to(record_start + RECORD_HEADER_LENGTH_V1);

        writer.append_u8_slice(payload);

        Ok(())
    }
}
