use pcx::error::PcxError;

#[derive(Debug, thiserror::Error)]
pub enum SffError {
    #[error("Unsupported sprite file version: {version}")]
    UnsupportedFormat { version: String },
    #[error("Malformed sprite file header. Expect ({expect}) bytes. Have ({have})")]
    MalformedHeader { expect: usize, have: usize },
    #[error("Truncated sprite record at offset {offset}")]
    TruncatedRecord { offset: usize },
    #[error("Truncated payload at offset {offset}: declared {declared} bytes, {available} available")]
    TruncatedPayload {
        offset: usize,
        declared: usize,
        available: usize,
    },
    #[error("Sprite record at offset {offset} has no payload and nothing to link to")]
    EmptyRecord { offset: usize },
    #[error("Sprite {index} links to sprite {shared_index}, which is not an earlier sprite")]
    AliasResolutionFailure { index: usize, shared_index: usize },
    #[error("Unsupported color depth {depth} in sprite record at offset {offset}")]
    UnsupportedColorDepth { offset: usize, depth: u8 },
    #[error("Sprite {index} cannot link to sprite {shared_index}, only to one written before it")]
    LinkOutOfRange { index: usize, shared_index: usize },
    #[error("{field} of {value} does not fit in a sprite file")]
    ValueTooLarge { field: &'static str, value: usize },
    #[error("No sprite at index {index}")]
    NoSuchSprite { index: usize },
    #[error("Failed to decode sprite {index}: {source}")]
    Image {
        index: usize,
        #[source]
        source: PcxError,
    },
    #[error("IOError: {source}")]
    IOError {
        #[from]
        source: std::io::Error,
    },
}
