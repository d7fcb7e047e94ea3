use std::{
    collections::{HashMap, HashSet},
    ffi::OsStr,
    path::Path,
    rc::Rc,
};

use pcx::{decode_rle_image, ColorDepth, PlaneLayout, RasterImage, RleMode};

use crate::{
    error::SffError,
    parser::{parse_header, read_record},
    types::{RecordLayout, RecordPayload, SffHeader, SffVersion, SpriteRecord},
};

/// A sprite container opened for reading.
///
/// Records are read the first time something asks for them and never before, images are
/// decoded the first time they are requested and cached afterwards. A record that links to
/// an earlier one hands out the very same decoded image.
#[derive(Debug)]
pub struct SpriteCollection {
    header: SffHeader,
    data: Vec<u8>,
    mode: RleMode,
    records: Vec<SpriteRecord>,
    images: HashMap<usize, Rc<RasterImage>>,
    visited: HashSet<usize>,
    /// Offset of the next record to read. `None` once traversal is over.
    next_offset: Option<usize>,
    decoded: usize,
}

impl SpriteCollection {
    pub fn from_bytes(data: Vec<u8>, mode: RleMode) -> Result<Self, SffError> {
        let header = parse_header(&data)?;
        let first = header.first_record_offset();

        let next_offset = if first == 0 || first >= data.len() {
            log::warn!(
                "First record offset {first} is outside of a {} byte file",
                data.len()
            );
            None
        } else {
            Some(first)
        };

        log::debug!(
            "Opened sprite file version {} declaring {} images",
            header.version(),
            header.image_count()
        );

        Ok(Self {
            header,
            data,
            mode,
            records: vec![],
            images: HashMap::new(),
            visited: HashSet::new(),
            next_offset,
            decoded: 0,
        })
    }

    pub fn open_from_bytes(i: &[u8]) -> Result<Self, SffError> {
        Self::from_bytes(i.to_vec(), RleMode::default())
    }

    pub fn open_from_bytes_with(i: &[u8], mode: RleMode) -> Result<Self, SffError> {
        Self::from_bytes(i.to_vec(), mode)
    }

    pub fn open_from_file(path: impl AsRef<OsStr> + AsRef<Path>) -> Result<Self, SffError> {
        Self::open_from_file_with(path, RleMode::default())
    }

    /// The whole file is read up front and the handle is closed before this returns.
    pub fn open_from_file_with(
        path: impl AsRef<OsStr> + AsRef<Path>,
        mode: RleMode,
    ) -> Result<Self, SffError> {
        let data = std::fs::read(path)?;

        Self::from_bytes(data, mode)
    }

    pub fn header(&self) -> &SffHeader {
        &self.header
    }

    pub fn version(&self) -> SffVersion {
        self.header.version()
    }

    /// Images decoded so far. Aliases and cache hits do not count.
    pub fn decoded_count(&self) -> usize {
        self.decoded
    }

    /// Records read so far, in file order.
    pub fn visited(&self) -> &[SpriteRecord] {
        &self.records
    }

    /// Reads every remaining record and returns all of them.
    pub fn records(&mut self) -> Result<&[SpriteRecord], SffError> {
        while self.visit_next()? {}

        Ok(&self.records)
    }

    /// Number of readable records. Reads through to the end of the file.
    pub fn len(&mut self) -> Result<usize, SffError> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&mut self) -> Result<bool, SffError> {
        Ok(self.len()? == 0)
    }

    pub fn record(&mut self, index: usize) -> Result<&SpriteRecord, SffError> {
        self.visit_until(index)?;

        Ok(&self.records[index])
    }

    /// Index of the first record with this group and image number.
    pub fn find(&mut self, group: i16, image_number: i16) -> Result<Option<usize>, SffError> {
        let mut index = 0;

        loop {
            if index >= self.records.len() && !self.visit_next()? {
                return Ok(None);
            }

            let record = &self.records[index];

            if record.group == group && record.image_number == image_number {
                return Ok(Some(index));
            }

            index += 1;
        }
    }

    /// The first sprite in the file.
    pub fn first(&mut self) -> Result<Rc<RasterImage>, SffError> {
        self.image_at(0)
    }

    /// Decoded image of a sprite. Links are followed back to the record that owns the pixels.
    pub fn image_at(&mut self, index: usize) -> Result<Rc<RasterImage>, SffError> {
        self.visit_until(index)?;

        // every link on the way gets the same image once it is found
        let mut chain = vec![];
        let mut current = index;

        let image = loop {
            if let Some(image) = self.images.get(&current) {
                log::debug!("Sprite {current} served from cache");
                break Rc::clone(image);
            }

            match self.records[current].payload {
                RecordPayload::AliasOf(shared_index) => {
                    if shared_index >= current {
                        return Err(SffError::AliasResolutionFailure {
                            index: current,
                            shared_index,
                        });
                    }

                    log::debug!("Sprite {current} links to sprite {shared_index}");
                    chain.push(current);
                    current = shared_index;
                }
                RecordPayload::Owned(_) => {
                    let image = decode_record(
                        &self.records[current],
                        current,
                        self.version(),
                        self.mode,
                    )?;
                    let image = Rc::new(image);

                    self.decoded += 1;
                    self.images.insert(current, Rc::clone(&image));

                    break image;
                }
            }
        };

        for linked in chain {
            self.images.insert(linked, Rc::clone(&image));
        }

        Ok(image)
    }

    fn visit_until(&mut self, index: usize) -> Result<(), SffError> {
        while self.records.len() <= index {
            if !self.visit_next()? {
                return Err(SffError::NoSuchSprite { index });
            }
        }

        Ok(())
    }

    /// Reads one more record. `false` once there is nothing left to read.
    ///
    /// A record that fails to read leaves the cursor where it is, so asking again reports
    /// the same error while earlier records stay usable.
    fn visit_next(&mut self) -> Result<bool, SffError> {
        let Some(offset) = self.next_offset else {
            return Ok(false);
        };

        let record = read_record(&self.data, offset, self.version())?;

        log::debug!(
            "Record {} at offset {offset}: group {} image {}",
            self.records.len(),
            record.group,
            record.image_number
        );

        self.visited.insert(offset);
        self.next_offset = self.following_offset(&record);
        self.records.push(record);

        Ok(true)
    }

    fn following_offset(&self, record: &SpriteRecord) -> Option<usize> {
        let next = match record.next_record_offset() {
            Some(next) => next,
            None => {
                // v2 records sit back to back, and only the header knows how many there are
                if self.records.len() + 1 >= self.header.image_count() {
                    return None;
                }

                record.offset + record.stored_length()
            }
        };

        if next == 0 {
            return None;
        }

        if next == record.offset {
            log::debug!("Record at offset {next} points at itself, stopping");
            return None;
        }

        if next >= self.data.len() {
            log::warn!(
                "Record at offset {} points past the end of the file ({next})",
                record.offset
            );
            return None;
        }

        if self.visited.contains(&next) {
            log::warn!(
                "Record at offset {} points back at offset {next}, stopping",
                record.offset
            );
            return None;
        }

        Some(next)
    }
}

fn decode_record(
    record: &SpriteRecord,
    index: usize,
    version: SffVersion,
    mode: RleMode,
) -> Result<RasterImage, SffError> {
    let RecordPayload::Owned(bytes) = &record.payload else {
        return Err(SffError::NoSuchSprite { index });
    };

    let image = match record.layout {
        RecordLayout::V2 {
            width,
            height,
            color_depth,
            ..
        } if !version.uses_pcx_payloads() => {
            let depth = match color_depth {
                8 => ColorDepth::Indexed8,
                24 => ColorDepth::Direct24,
                depth => {
                    return Err(SffError::UnsupportedColorDepth {
                        offset: record.offset,
                        depth,
                    })
                }
            };

            let layout = PlaneLayout::unpadded(width as usize, height as usize, depth);

            decode_rle_image(bytes, &layout, mode)
        }
        _ => RasterImage::open_from_bytes_with(bytes, mode),
    };

    image.map_err(|source| SffError::Image { index, source })
}
