//! CMIP container format serialization and deserialization

use crate::header::{AstcLevelHeader, ASTC_HEADER_LENGTH};
use crate::{window, Error, Result};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::Write;

/// Magic number of a multi-level container: "CMIP" read as little-endian
pub const CONTAINER_MAGIC: u32 = 0x5049_4D43;

const MAGIC_LENGTH: usize = 4;
const LEVEL_COUNT_LENGTH: usize = 4;
const LEVEL_SIZE_LENGTH: usize = 4;

/// Header of a multi-level container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Declared byte length of each level, including its ASTC header
    pub level_sizes: Vec<u32>,
}

impl ContainerHeader {
    /// Creates a header from per-level byte lengths
    pub fn new(level_sizes: Vec<u32>) -> Self {
        Self { level_sizes }
    }

    /// Number of mipmap levels
    pub fn level_count(&self) -> usize {
        self.level_sizes.len()
    }

    /// Offset at which the first level begins
    pub fn byte_length(&self) -> usize {
        MAGIC_LENGTH + LEVEL_COUNT_LENGTH + self.level_sizes.len() * LEVEL_SIZE_LENGTH
    }

    /// Writes the header to a writer
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(CONTAINER_MAGIC)?;
        writer.write_u32::<LittleEndian>(level_count_field(self.level_sizes.len())?)?;
        for &size in &self.level_sizes {
            writer.write_u32::<LittleEndian>(size)?;
        }
        Ok(())
    }
}

/// Converts a level count into the 32-bit header field
fn level_count_field(count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| Error::TooManyLevels { count })
}

/// Shape of an input buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerKind {
    /// Starts with the container magic and lists its levels
    Wrapped(ContainerHeader),
    /// A single ASTC level with no container header
    Bare,
}

impl ContainerKind {
    /// Inspects the start of `data` and reads the container header if present
    pub fn read(data: &[u8]) -> Result<Self> {
        let magic = LittleEndian::read_u32(window(data, 0, MAGIC_LENGTH)?);
        if magic != CONTAINER_MAGIC {
            tracing::trace!(magic, "no container header");
            return Ok(Self::Bare);
        }

        let level_count =
            LittleEndian::read_u32(window(data, MAGIC_LENGTH, LEVEL_COUNT_LENGTH)?) as usize;
        if level_count == 0 {
            return Err(Error::NoLevels);
        }

        let sizes_offset = MAGIC_LENGTH + LEVEL_COUNT_LENGTH;
        let sizes_length = level_count
            .checked_mul(LEVEL_SIZE_LENGTH)
            .ok_or(Error::Truncated {
                offset: sizes_offset,
                needed: usize::MAX,
                available: data.len().saturating_sub(sizes_offset),
            })?;
        let raw_sizes = window(data, sizes_offset, sizes_length)?;

        let mut level_sizes = vec![0u32; level_count];
        LittleEndian::read_u32_into(raw_sizes, &mut level_sizes);
        tracing::trace!(level_count, ?level_sizes, "read container header");

        Ok(Self::Wrapped(ContainerHeader::new(level_sizes)))
    }
}

/// A single level ready to be written into a container
#[derive(Debug, Clone)]
pub struct MipmapLevel {
    /// ASTC header of the level
    pub header: AstcLevelHeader,
    /// Compressed color data
    pub data: Vec<u8>,
}

impl MipmapLevel {
    /// Creates a new level
    pub fn new(header: AstcLevelHeader, data: Vec<u8>) -> Self {
        Self { header, data }
    }

    /// Size of the level as declared in the container header
    pub fn declared_size(&self) -> usize {
        ASTC_HEADER_LENGTH + self.data.len()
    }
}

/// Complete multi-level container, base level first
#[derive(Debug, Clone, Default)]
pub struct MipmapContainer {
    /// Levels in storage order
    pub levels: Vec<MipmapLevel>,
}

impl MipmapContainer {
    /// Creates a new container
    pub fn new(levels: Vec<MipmapLevel>) -> Self {
        Self { levels }
    }

    /// Builds the container header describing the levels
    pub fn header(&self) -> Result<ContainerHeader> {
        let level_sizes = self
            .levels
            .iter()
            .enumerate()
            .map(|(level, l)| {
                u32::try_from(l.declared_size()).map_err(|_| Error::LevelTooLarge {
                    level,
                    len: l.declared_size(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ContainerHeader::new(level_sizes))
    }

    /// Writes the container to a writer
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        if self.levels.is_empty() {
            return Err(Error::NoLevels);
        }

        self.header()?.write(&mut writer)?;

        for level in &self.levels {
            level.header.write(&mut writer)?;
            writer.write_all(&level.data)?;
        }

        Ok(())
    }

    /// Serializes the container into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }
}
