//! Container decoding: walks the mipmap levels and assembles the descriptor

use crate::descriptor::{DescriptorBuilder, ImageDescriptor};
use crate::level_decoder::decode_level;
use crate::{DecoderConfig, ResourceType};
use cmip_core::{ContainerKind, Error, Result};

/// Decodes CMIP containers and bare ASTC files
#[derive(Debug, Clone, Default)]
pub struct ContainerDecoder {
    config: DecoderConfig,
}

impl ContainerDecoder {
    /// Creates a decoder with the given configuration
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Gets the decoder configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes `buffer` into an image descriptor.
    ///
    /// Any level failing validation aborts the whole decode.
    pub fn decode<'a>(
        &self,
        buffer: &'a [u8],
        resource_type: ResourceType,
    ) -> Result<ImageDescriptor<'a>> {
        let mut builder = DescriptorBuilder::new();

        match ContainerKind::read(buffer)? {
            ContainerKind::Bare => {
                let level = decode_level(buffer, 0, 0, 0)?;
                builder = builder.push(0, level, &self.config)?;
            }
            ContainerKind::Wrapped(header) => {
                tracing::debug!(
                    levels = header.level_count(),
                    header_len = header.byte_length(),
                    "decoding mipmap container"
                );

                builder = DescriptorBuilder::with_level_count(header.level_count());
                let last = header.level_count() - 1;
                let mut begin_offset = header.byte_length();
                for (index, &size) in header.level_sizes.iter().enumerate() {
                    // A zero size reads to the end of the buffer, leaving no room for later levels
                    if size == 0 && index != last {
                        return Err(Error::UnsizedLevel { level: index });
                    }
                    let level = decode_level(buffer, index, begin_offset, size)?;
                    builder = builder.push(index, level, &self.config)?;
                    begin_offset = begin_offset
                        .checked_add(size as usize)
                        .ok_or(Error::Truncated {
                            offset: begin_offset,
                            needed: size as usize,
                            available: buffer.len().saturating_sub(begin_offset),
                        })?;
                }
            }
        }

        builder.finish(resource_type)
    }
}
