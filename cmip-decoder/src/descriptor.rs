//! In-memory image descriptor produced by the decoder

use crate::level_decoder::LevelResult;
use crate::{DecoderConfig, ResourceType};
use cmip_core::{Error, PixelFormat, Result};
use std::borrow::Cow;

/// Decoded texture ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor<'a> {
    /// Width of the base level in pixels
    pub width: u32,
    /// Height of the base level in pixels
    pub height: u32,
    /// Format of the base level
    pub format: PixelFormat,
    /// Color data of every level, concatenated in level order.
    /// Borrowed from the input when a single level was decoded.
    pub payload: Cow<'a, [u8]>,
    /// Byte length of each level inside `payload`, indexed by level.
    /// Empty for a bare ASTC file.
    pub level_byte_sizes: Vec<u32>,
    /// Tag supplied by the caller
    pub resource_type: ResourceType,
}

/// Size and format information of a descriptor, without the payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageSummary {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub payload_len: usize,
    pub level_byte_sizes: Vec<u32>,
    pub resource_type: ResourceType,
}

impl<'a> ImageDescriptor<'a> {
    /// Number of mipmap levels in the payload
    pub fn level_count(&self) -> usize {
        self.level_byte_sizes.len().max(1)
    }

    /// Iterates over the color data of each level
    pub fn levels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let sizes: Vec<usize> = if self.level_byte_sizes.is_empty() {
            vec![self.payload.len()]
        } else {
            self.level_byte_sizes.iter().map(|&s| s as usize).collect()
        };

        let payload: &[u8] = &self.payload;
        sizes.into_iter().scan(0usize, move |offset, len| {
            let level = payload.get(*offset..offset.checked_add(len)?)?;
            *offset += len;
            Some(level)
        })
    }

    /// Detaches the descriptor from the input buffer
    pub fn into_owned(self) -> ImageDescriptor<'static> {
        ImageDescriptor {
            width: self.width,
            height: self.height,
            format: self.format,
            payload: Cow::Owned(self.payload.into_owned()),
            level_byte_sizes: self.level_byte_sizes,
            resource_type: self.resource_type,
        }
    }

    /// Returns the descriptor metadata without the payload
    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            width: self.width,
            height: self.height,
            format: self.format,
            payload_len: self.payload.len(),
            level_byte_sizes: self.level_byte_sizes.clone(),
            resource_type: self.resource_type,
        }
    }
}

/// Base level properties latched from level 0
#[derive(Debug, Clone, Copy)]
struct BaseLevel {
    width: u32,
    height: u32,
    format: PixelFormat,
    block_dimensions: (u8, u8),
}

/// Accumulates decoded levels into a descriptor
#[derive(Debug)]
pub(crate) struct DescriptorBuilder<'a> {
    base: Option<BaseLevel>,
    payload: Cow<'a, [u8]>,
    level_byte_sizes: Vec<u32>,
}

impl<'a> DescriptorBuilder<'a> {
    /// Builder for a bare ASTC file, which records no level sizes
    pub(crate) fn new() -> Self {
        Self {
            base: None,
            payload: Cow::Borrowed(&[][..]),
            level_byte_sizes: Vec::new(),
        }
    }

    /// Builder for a container listing `level_count` levels
    pub(crate) fn with_level_count(level_count: usize) -> Self {
        Self {
            level_byte_sizes: vec![0; level_count],
            ..Self::new()
        }
    }

    /// Folds the next level into the builder
    pub(crate) fn push(
        mut self,
        level_index: usize,
        level: LevelResult<'a>,
        config: &DecoderConfig,
    ) -> Result<Self> {
        match self.base {
            None => {
                self.base = Some(BaseLevel {
                    width: level.header.size_x,
                    height: level.header.size_y,
                    format: level.format,
                    block_dimensions: level.header.block_dimensions(),
                });
            }
            Some(base) => {
                let found = level.header.block_dimensions();
                if found != base.block_dimensions {
                    if config.strict_block_size {
                        return Err(Error::MismatchedBlockSize {
                            level: level_index,
                            expected: base.block_dimensions,
                            found,
                        });
                    }
                    tracing::warn!(
                        level = level_index,
                        expected = ?base.block_dimensions,
                        ?found,
                        "level block size differs from the base level"
                    );
                }
            }
        }

        if self.payload.is_empty() {
            self.payload = Cow::Borrowed(level.data);
        } else {
            self.payload.to_mut().extend_from_slice(level.data);
        }

        if let Some(slot) = self.level_byte_sizes.get_mut(level_index) {
            *slot = u32::try_from(level.data.len()).map_err(|_| Error::LevelTooLarge {
                level: level_index,
                len: level.data.len(),
            })?;
        }

        Ok(self)
    }

    pub(crate) fn finish(self, resource_type: ResourceType) -> Result<ImageDescriptor<'a>> {
        let base = self.base.ok_or(Error::NoLevels)?;
        Ok(ImageDescriptor {
            width: base.width,
            height: base.height,
            format: base.format,
            payload: self.payload,
            level_byte_sizes: self.level_byte_sizes,
            resource_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmip_core::AstcLevelHeader;

    fn level(dims: (u8, u8), width: u32, data: &[u8]) -> LevelResult<'_> {
        let header = AstcLevelHeader::new(dims.0, dims.1, width, width);
        LevelResult {
            header,
            format: header.format(),
            data,
            declared: true,
        }
    }

    #[test]
    fn base_level_latches_dimensions_and_format() {
        let config = DecoderConfig::default();
        let descriptor = DescriptorBuilder::with_level_count(2)
            .push(0, level((6, 6), 64, &[1, 2]), &config)
            .unwrap()
            .push(1, level((6, 6), 32, &[3]), &config)
            .unwrap()
            .finish(ResourceType::ASTC)
            .unwrap();

        assert_eq!((descriptor.width, descriptor.height), (64, 64));
        assert_eq!(descriptor.format, PixelFormat::Astc6x6);
        assert_eq!(&*descriptor.payload, &[1u8, 2, 3]);
        assert_eq!(descriptor.level_byte_sizes, vec![2, 1]);
    }

    #[test]
    fn single_level_payload_is_borrowed() {
        let data = [7u8; 16];
        let descriptor = DescriptorBuilder::new()
            .push(0, level((4, 4), 4, &data), &DecoderConfig::default())
            .unwrap()
            .finish(ResourceType::ASTC)
            .unwrap();

        assert!(matches!(descriptor.payload, Cow::Borrowed(_)));
        assert!(matches!(descriptor.into_owned().payload, Cow::Owned(_)));
    }

    #[test]
    fn lenient_mode_keeps_mismatched_levels() {
        let descriptor = DescriptorBuilder::with_level_count(2)
            .push(0, level((6, 6), 64, &[1]), &DecoderConfig::default())
            .unwrap()
            .push(1, level((8, 8), 32, &[2]), &DecoderConfig::default())
            .unwrap()
            .finish(ResourceType::ASTC)
            .unwrap();

        assert_eq!(descriptor.format, PixelFormat::Astc6x6);
        assert_eq!(descriptor.level_byte_sizes, vec![1, 1]);
    }

    #[test]
    fn strict_mode_rejects_mismatched_levels() {
        let config = DecoderConfig {
            strict_block_size: true,
        };
        let result = DescriptorBuilder::new()
            .push(0, level((6, 6), 64, &[1]), &config)
            .unwrap()
            .push(1, level((8, 8), 32, &[2]), &config);

        assert!(matches!(
            result,
            Err(Error::MismatchedBlockSize {
                level: 1,
                expected: (6, 6),
                found: (8, 8),
            })
        ));
    }

    #[test]
    fn empty_level_keeps_its_slot() {
        let config = DecoderConfig::default();
        let descriptor = DescriptorBuilder::with_level_count(3)
            .push(0, level((4, 4), 8, &[1, 1]), &config)
            .unwrap()
            .push(1, level((4, 4), 4, &[]), &config)
            .unwrap()
            .push(2, level((4, 4), 2, &[3]), &config)
            .unwrap()
            .finish(ResourceType::ASTC)
            .unwrap();

        assert_eq!(descriptor.level_byte_sizes, vec![2, 0, 1]);
        assert_eq!(descriptor.level_count(), 3);
        let levels: Vec<&[u8]> = descriptor.levels().collect();
        assert_eq!(levels, vec![&[1u8, 1][..], &[][..], &[3][..]]);
    }

    #[test]
    fn bare_builder_records_no_sizes() {
        let descriptor = DescriptorBuilder::new()
            .push(0, level((4, 4), 4, &[9; 4]), &DecoderConfig::default())
            .unwrap()
            .finish(ResourceType::ASTC)
            .unwrap();

        assert!(descriptor.level_byte_sizes.is_empty());
        assert_eq!(descriptor.level_count(), 1);
    }

    #[test]
    fn finish_without_levels_fails() {
        assert!(matches!(
            DescriptorBuilder::new().finish(ResourceType::ASTC),
            Err(Error::NoLevels)
        ));
    }

    #[test]
    fn levels_splits_payload_by_recorded_sizes() {
        let descriptor = ImageDescriptor {
            width: 8,
            height: 8,
            format: PixelFormat::Astc4x4,
            payload: Cow::Owned(vec![1, 1, 1, 2, 2, 3]),
            level_byte_sizes: vec![3, 2, 1],
            resource_type: ResourceType::ASTC,
        };

        let levels: Vec<&[u8]> = descriptor.levels().collect();
        assert_eq!(levels, vec![&[1u8, 1, 1][..], &[2, 2][..], &[3][..]]);
        assert_eq!(descriptor.level_count(), 3);
    }

    #[test]
    fn bare_descriptor_has_one_level() {
        let descriptor = ImageDescriptor {
            width: 4,
            height: 4,
            format: PixelFormat::Astc4x4,
            payload: Cow::Borrowed(&[5, 5]),
            level_byte_sizes: Vec::new(),
            resource_type: ResourceType::ASTC,
        };

        assert_eq!(descriptor.level_count(), 1);
        assert_eq!(descriptor.levels().collect::<Vec<_>>(), vec![&[5u8, 5][..]]);
    }
}
