//! Decoding of a single ASTC mipmap level

use cmip_core::{window, AstcLevelHeader, Error, PixelFormat, Result, ASTC_HEADER_LENGTH};

/// Outcome of decoding one level, folded into the descriptor by the caller
#[derive(Debug, Clone, Copy)]
pub struct LevelResult<'a> {
    /// Validated ASTC header of the level
    pub header: AstcLevelHeader,
    /// Format implied by the level's block footprint
    pub format: PixelFormat,
    /// Color data following the header
    pub data: &'a [u8],
    /// Whether the level size was declared by a container header.
    /// Undeclared levels run to the end of the buffer.
    pub declared: bool,
}

/// Decodes the level starting at `begin_offset`.
///
/// `declared_size` is the level length listed in the container header,
/// including the 16-byte ASTC header. A size of 0 means the level has no
/// container entry and its color data runs to the end of `buffer`.
pub fn decode_level(
    buffer: &[u8],
    level_index: usize,
    begin_offset: usize,
    declared_size: u32,
) -> Result<LevelResult<'_>> {
    let header = AstcLevelHeader::parse(window(buffer, begin_offset, ASTC_HEADER_LENGTH)?)?;
    let format = header.format();
    let data_offset = begin_offset + ASTC_HEADER_LENGTH;

    let (data, declared) = if declared_size > 0 {
        let len = (declared_size as usize)
            .checked_sub(ASTC_HEADER_LENGTH)
            .ok_or(Error::LevelTooSmall {
                level: level_index,
                declared: declared_size,
            })?;
        (window(buffer, data_offset, len)?, true)
    } else {
        (&buffer[data_offset..], false)
    };

    tracing::debug!(
        level = level_index,
        offset = begin_offset,
        declared_size,
        block_x = header.block_dim_x,
        block_y = header.block_dim_y,
        data_len = data.len(),
        "decoded ASTC level"
    );

    Ok(LevelResult {
        header,
        format,
        data,
        declared,
    })
}
