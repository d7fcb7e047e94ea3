use nom::{
    bytes::complete::take,
    number::complete::{le_i16, le_i32, le_u16, le_u32, le_u8},
    IResult as _IResult, Parser,
};

use crate::{
    error::SffError,
    types::{
        Axis, RecordLayout, RecordPayload, SffHeader, SffHeaderV1, SffHeaderV2, SffVersion,
        SpriteRecord, HEADER_LENGTH_V1, HEADER_LENGTH_V2, SIGNATURE_LENGTH, VERSION_OFFSET,
        VERSION_TAG_LENGTH,
    },
};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

/// Where the v2 header keeps the two fields that matter.
const V2_FIRST_RECORD_OFFSET: usize = 36;
const V2_HEADER_TAIL: usize = HEADER_LENGTH_V2 - V2_FIRST_RECORD_OFFSET - 8;

pub fn parse_version_tag(i: &[u8]) -> Option<[u8; 4]> {
    let tag = i.get(VERSION_OFFSET..VERSION_OFFSET + VERSION_TAG_LENGTH)?;

    Some([tag[0], tag[1], tag[2], tag[3]])
}

fn parse_header_v1(i: &'_ [u8]) -> IResult<'_, SffHeaderV1> {
    let (i, signature) = take(SIGNATURE_LENGTH).parse(i)?;
    // NUL terminator, then the version tag
    let (i, _) = take(1 + VERSION_TAG_LENGTH).parse(i)?;
    let (i, (group_count, image_count, first_record_offset, record_header_size, palette_type)) =
        (le_i32, le_i32, le_u32, le_i32, le_u8).parse(i)?;

    Ok((
        i,
        SffHeaderV1 {
            signature: String::from_utf8_lossy(signature).into_owned(),
            group_count,
            image_count,
            first_record_offset,
            record_header_size,
            shared_palette: palette_type != 0,
        },
    ))
}

fn parse_header_v2(i: &'_ [u8], version: SffVersion) -> IResult<'_, SffHeaderV2> {
    let (i, _) = take(V2_FIRST_RECORD_OFFSET).parse(i)?;
    let (i, (first_record_offset, image_count)) = (le_u32, le_u32).parse(i)?;
    let (i, _) = take(V2_HEADER_TAIL).parse(i)?;

    Ok((
        i,
        SffHeaderV2 {
            version,
            first_record_offset,
            image_count,
        },
    ))
}

/// Reads the container header from the start of the file.
pub fn parse_header(i: &[u8]) -> Result<SffHeader, SffError> {
    let Some(tag) = parse_version_tag(i) else {
        return Err(SffError::MalformedHeader {
            expect: VERSION_OFFSET + VERSION_TAG_LENGTH,
            have: i.len(),
        });
    };

    match SffVersion::from_tag(tag) {
        SffVersion::V1_01 => parse_header_v1(i)
            .map(|(_, header)| SffHeader::V1(header))
            .map_err(|_| SffError::MalformedHeader {
                expect: HEADER_LENGTH_V1,
                have: i.len(),
            }),
        version @ (SffVersion::V1_02 | SffVersion::V2_00) => parse_header_v2(i, version)
            .map(|(_, header)| SffHeader::V2(header))
            .map_err(|_| SffError::MalformedHeader {
                expect: HEADER_LENGTH_V2,
                have: i.len(),
            }),
        SffVersion::Unknown => Err(SffError::UnsupportedFormat {
            version: tag.iter().map(|digit| digit.to_string()).collect(),
        }),
    }
}

impl SffHeader {
    pub fn parse(i: &[u8]) -> Result<Self, SffError> {
        parse_header(i)
    }
}

struct RecordHeader {
    group: i16,
    image_number: i16,
    axis: Axis,
    shared_index: i32,
    copy_last_palette: bool,
    layout: RecordLayout,
    payload_length: u32,
}

fn parse_record_header_v1(i: &'_ [u8]) -> IResult<'_, RecordHeader> {
    let (i, (next_record_offset, payload_length)) = (le_u32, le_u32).parse(i)?;
    let (i, (axis_x, axis_y, group, image_number, shared_index)) =
        (le_i16, le_i16, le_i16, le_i16, le_i16).parse(i)?;
    let (i, copy_last_palette) = le_u8(i)?;
    let (i, _blank) = take(13usize).parse(i)?;

    Ok((
        i,
        RecordHeader {
            group,
            image_number,
            axis: Axis {
                x: axis_x,
                y: axis_y,
            },
            shared_index: shared_index as i32,
            copy_last_palette: copy_last_palette != 0,
            layout: RecordLayout::V1 { next_record_offset },
            payload_length,
        },
    ))
}

// group and image number come first here, the other way around from v1
fn parse_record_header_v2(i: &'_ [u8]) -> IResult<'_, RecordHeader> {
    let (i, (group, image_number, width, height, axis_x, axis_y)) =
        (le_i16, le_i16, le_u16, le_u16, le_i16, le_i16).parse(i)?;
    let (i, (linked_index, format, color_depth)) = (le_u16, le_u8, le_u8).parse(i)?;
    let (i, (data_offset, payload_length, palette_index, flags)) =
        (le_u32, le_u32, le_u16, le_u16).parse(i)?;

    Ok((
        i,
        RecordHeader {
            group,
            image_number,
            axis: Axis {
                x: axis_x,
                y: axis_y,
            },
            shared_index: linked_index as i32,
            copy_last_palette: false,
            layout: RecordLayout::V2 {
                width,
                height,
                format,
                color_depth,
                data_offset,
                palette_index,
                flags,
            },
            payload_length,
        },
    ))
}

/// Reads the record at `offset` together with its still-encoded payload.
///
/// A zero-length payload is a link to the record named by the shared index; with a
/// negative shared index there is nothing to link to and the record is rejected.
pub fn read_record(
    data: &[u8],
    offset: usize,
    version: SffVersion,
) -> Result<SpriteRecord, SffError> {
    let parse_record_header = match version {
        SffVersion::V1_01 => parse_record_header_v1,
        SffVersion::V1_02 | SffVersion::V2_00 => parse_record_header_v2,
        SffVersion::Unknown => {
            return Err(SffError::UnsupportedFormat {
                version: version.to_string(),
            })
        }
    };

    let record_start = data
        .get(offset..)
        .ok_or(SffError::TruncatedRecord { offset })?;

    let (payload_start, header) =
        parse_record_header(record_start).map_err(|_| SffError::TruncatedRecord { offset })?;

    let RecordHeader {
        group,
        image_number,
        axis,
        shared_index,
        copy_last_palette,
        layout,
        payload_length,
    } = header;

    let payload = if payload_length == 0 {
        if shared_index < 0 {
            return Err(SffError::EmptyRecord { offset });
        }

        RecordPayload::AliasOf(shared_index as usize)
    } else {
        let declared = payload_length as usize;

        let Some(bytes) = payload_start.get(..declared) else {
            return Err(SffError::TruncatedPayload {
                offset,
                declared,
                available: payload_start.len(),
            });
        };

        RecordPayload::Owned(bytes.to_vec())
    };

    Ok(SpriteRecord {
        offset,
        group,
        image_number,
        axis,
        shared_index,
        copy_last_palette,
        layout,
        payload,
    })
}
