//! CMIP Decoder Library
//!
//! This library turns a CMIP container (or a bare ASTC file) into an
//! [`ImageDescriptor`] ready to be handed to a texture upload pipeline.

pub mod container_decoder;
pub mod descriptor;
pub mod level_decoder;

pub use cmip_core::{Error, FormatError, PixelFormat, Result};
pub use container_decoder::ContainerDecoder;
pub use descriptor::{ImageDescriptor, ImageSummary};
pub use level_decoder::{decode_level, LevelResult};

/// Resource type tag supplied by the asset pipeline.
///
/// The decoder does not interpret it; it is recorded on the descriptor so the
/// caller can dispatch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceType(pub u32);

impl ResourceType {
    /// Tag used by the asset parser for `.astc` resources
    pub const ASTC: ResourceType = ResourceType(2);
}

impl Default for ResourceType {
    fn default() -> Self {
        Self::ASTC
    }
}

/// Decoder configuration
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    /// Fail when a later level's block footprint differs from the base level
    /// instead of logging a warning
    pub strict_block_size: bool,
}

/// Decodes `buffer` with the default configuration
pub fn decode(buffer: &[u8], resource_type: ResourceType) -> Result<ImageDescriptor<'_>> {
    ContainerDecoder::default().decode(buffer, resource_type)
}
