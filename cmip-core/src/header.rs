//! ASTC level header serialization and deserialization

use crate::format::{classify, is_valid_block_size, PixelFormat};
use crate::{window, Error, Result};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;

/// Magic number opening every ASTC header
pub const ASTC_MAGIC: u32 = 0x5CA1_AB13;

/// Size of the ASTC header in bytes
pub const ASTC_HEADER_LENGTH: usize = 16;

const BLOCK_DIM_OFFSET: usize = 4;
const SIZE_X_OFFSET: usize = 7;
const SIZE_Y_OFFSET: usize = 10;
const SIZE_Z_OFFSET: usize = 13;

/// Header preceding the color data of a single ASTC level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AstcLevelHeader {
    /// Block width in texels
    pub block_dim_x: u8,
    /// Block height in texels
    pub block_dim_y: u8,
    /// Block depth in texels (1 for 2D textures)
    pub block_dim_z: u8,
    /// Image width in pixels (24-bit)
    pub size_x: u32,
    /// Image height in pixels (24-bit)
    pub size_y: u32,
    /// Image depth (24-bit, unused for 2D textures)
    pub size_z: u32,
}

impl AstcLevelHeader {
    /// Creates a header for a 2D texture
    pub fn new(block_dim_x: u8, block_dim_y: u8, width: u32, height: u32) -> Self {
        Self {
            block_dim_x,
            block_dim_y,
            block_dim_z: 1,
            size_x: width,
            size_y: height,
            size_z: 1,
        }
    }

    /// Parses and validates a header from the first 16 bytes of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let bytes = window(bytes, 0, ASTC_HEADER_LENGTH)?;

        let magic = LittleEndian::read_u32(bytes);
        if magic != ASTC_MAGIC {
            return Err(Error::BadMagic { found: magic });
        }

        let x = bytes[BLOCK_DIM_OFFSET];
        let y = bytes[BLOCK_DIM_OFFSET + 1];
        let z = bytes[BLOCK_DIM_OFFSET + 2];
        if !is_valid_block_size(x, y, z) {
            return Err(Error::BadBlockSize { x, y, z });
        }

        Ok(Self {
            block_dim_x: x,
            block_dim_y: y,
            block_dim_z: z,
            size_x: LittleEndian::read_u24(&bytes[SIZE_X_OFFSET..]),
            size_y: LittleEndian::read_u24(&bytes[SIZE_Y_OFFSET..]),
            size_z: LittleEndian::read_u24(&bytes[SIZE_Z_OFFSET..]),
        })
    }

    /// Splits a standalone `.astc` file into its header and color data
    pub fn parse_file(data: &[u8]) -> Result<(Self, &[u8])> {
        let header = Self::parse(data)?;
        Ok((header, &data[ASTC_HEADER_LENGTH..]))
    }

    /// Writes the header to a writer
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(ASTC_MAGIC)?;
        writer.write_all(&[self.block_dim_x, self.block_dim_y, self.block_dim_z])?;
        writer.write_u24::<LittleEndian>(self.size_x)?;
        writer.write_u24::<LittleEndian>(self.size_y)?;
        writer.write_u24::<LittleEndian>(self.size_z)?;
        Ok(())
    }

    /// Returns the 2D block footprint (x, y)
    pub fn block_dimensions(&self) -> (u8, u8) {
        (self.block_dim_x, self.block_dim_y)
    }

    /// Pixel format implied by the block footprint
    pub fn format(&self) -> PixelFormat {
        classify(self.block_dim_x, self.block_dim_y)
    }
}
