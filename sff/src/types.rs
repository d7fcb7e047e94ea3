use std::fmt;

pub const SIGNATURE: &[u8; 11] = b"ElecbyteSpr";
pub const SIGNATURE_LENGTH: usize = 11;
pub const VERSION_OFFSET: usize = 12;
pub const VERSION_TAG_LENGTH: usize = 4;

/// Version bytes at offset 12, one digit each.
pub const TAG_V1_01: [u8; 4] = [0, 1, 0, 1];
pub const TAG_V1_02: [u8; 4] = [0, 1, 0, 2];
pub const TAG_V2_00: [u8; 4] = [0, 0, 0, 2];

pub const HEADER_LENGTH_V1: usize = 33;
pub const HEADER_LENGTH_V2: usize = 53;
/// Files written by Elecbyte tools put the first record here.
pub const HEADER_PADDED_LENGTH_V1: usize = 512;

pub const RECORD_HEADER_LENGTH_V1: usize = 32;
pub const RECORD_HEADER_LENGTH_V2: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SffVersion {
    Unknown,
    V1_01,
    V1_02,
    V2_00,
}

impl SffVersion {
    pub fn from_tag(tag: [u8; 4]) -> Self {
        match tag {
            TAG_V1_01 => SffVersion::V1_01,
            TAG_V1_02 => SffVersion::V1_02,
            TAG_V2_00 => SffVersion::V2_00,
            _ => SffVersion::Unknown,
        }
    }

    /// v1.02 keeps PCX payloads even with v2-shaped records.
    pub fn uses_pcx_payloads(self) -> bool {
        matches!(self, SffVersion::V1_01 | SffVersion::V1_02)
    }
}

impl fmt::Display for SffVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SffVersion::V1_01 => "1.01",
            SffVersion::V1_02 => "1.02",
            SffVersion::V2_00 => "2.00",
            SffVersion::Unknown => "unknown",
        };

        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SffHeaderV1 {
    pub signature: String,
    pub group_count: i32,
    pub image_count: i32,
    pub first_record_offset: u32,
    pub record_header_size: i32,
    pub shared_palette: bool,
}

/// Only the first record offset and the image count are read from the 53-byte v2 header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SffHeaderV2 {
    pub version: SffVersion,
    pub first_record_offset: u32,
    pub image_count: u32,
}

/// Container header, one variant per on-disk layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SffHeader {
    V1(SffHeaderV1),
    V2(SffHeaderV2),
}

impl SffHeader {
    pub fn version(&self) -> SffVersion {
        match self {
            SffHeader::V1(_) => SffVersion::V1_01,
            SffHeader::V2(header) => header.version,
        }
    }

    pub fn first_record_offset(&self) -> usize {
        match self {
            SffHeader::V1(header) => header.first_record_offset as usize,
            SffHeader::V2(header) => header.first_record_offset as usize,
        }
    }

    pub fn image_count(&self) -> usize {
        match self {
            SffHeader::V1(header) => header.image_count.max(0) as usize,
            SffHeader::V2(header) => header.image_count as usize,
        }
    }

    pub fn group_count(&self) -> Option<i32> {
        match self {
            SffHeader::V1(header) => Some(header.group_count),
            SffHeader::V2(_) => None,
        }
    }

    pub fn signature(&self) -> Option<&str> {
        match self {
            SffHeader::V1(header) => Some(&header.signature),
            SffHeader::V2(_) => None,
        }
    }

    pub fn shared_palette(&self) -> bool {
        match self {
            SffHeader::V1(header) => header.shared_palette,
            SffHeader::V2(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Axis {
    pub x: i16,
    pub y: i16,
}

/// Fields that only exist in one of the two record layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLayout {
    V1 {
        next_record_offset: u32,
    },
    V2 {
        width: u16,
        height: u16,
        format: u8,
        color_depth: u8,
        data_offset: u32,
        palette_index: u16,
        flags: u16,
    },
}

/// Pixel data of a record: its own RLE payload, or a link to an earlier record's image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordPayload {
    Owned(Vec<u8>),
    AliasOf(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRecord {
    /// Absolute offset of the record header.
    pub offset: usize,
    pub group: i16,
    pub image_number: i16,
    pub axis: Axis,
    pub shared_index: i32,
    pub copy_last_palette: bool,
    pub layout: RecordLayout,
    pub payload: RecordPayload,
}

impl SpriteRecord {
    pub fn payload_length(&self) -> usize {
        match &self.payload {
            RecordPayload::Owned(bytes) => bytes.len(),
            RecordPayload::AliasOf(_) => 0,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.payload, RecordPayload::AliasOf(_))
    }

    /// Offset stored in a v1 record header. v2 records have none.
    pub fn next_record_offset(&self) -> Option<usize> {
        match self.layout {
            RecordLayout::V1 { next_record_offset } => Some(next_record_offset as usize),
            RecordLayout::V2 { .. } => None,
        }
    }

    /// Bytes the record takes up in the file, header included.
    pub fn stored_length(&self) -> usize {
        let header = match self.layout {
            RecordLayout::V1 { .. } => RECORD_HEADER_LENGTH_V1,
            RecordLayout::V2 { .. } => RECORD_HEADER_LENGTH_V2,
        };

        header + self.payload_length()
    }
}
