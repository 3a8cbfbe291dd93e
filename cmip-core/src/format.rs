//! Pixel formats and ASTC block-size classification

use std::fmt;

/// Pixel formats known to the texture pipeline.
///
/// Only the ASTC variants are produced by the container decoder; the others
/// exist so that callers can dispatch on a single enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PixelFormat {
    /// 16-bit RGB
    Rgb565,
    /// 16-bit RGB with 5 bits per channel and a 1-bit alpha
    Rgb5A1,
    /// 16-bit RGBA
    Rgba4444,
    /// 24-bit RGB
    Rgb888,
    /// 32-bit float RGB
    Rgb32F,
    /// 32-bit RGBA
    Rgba8888,
    /// 32-bit float RGBA
    Rgba32F,
    /// 8-bit alpha mask
    A8,
    /// 8-bit intensity
    I8,
    /// 16-bit intensity + alpha
    Ai8,
    RgbPvrtc2Bppv1,
    RgbaPvrtc2Bppv1,
    /// RGB PVRTC 2bpp at twice the height, alpha stored in the bottom half
    RgbAPvrtc2Bppv1,
    RgbPvrtc4Bppv1,
    RgbaPvrtc4Bppv1,
    /// RGB PVRTC 4bpp at twice the height, alpha stored in the bottom half
    RgbAPvrtc4Bppv1,
    RgbEtc1,
    /// ETC1 with a separate alpha atlas
    RgbaEtc1,
    RgbEtc2,
    RgbaEtc2,
    Astc4x4,
    Astc5x4,
    Astc5x5,
    Astc6x5,
    Astc6x6,
    Astc8x5,
    Astc8x6,
    Astc8x8,
    Astc10x5,
    Astc10x6,
    Astc10x8,
    Astc10x10,
    Astc12x10,
    Astc12x12,
}

/// Format the asset pipeline prefers when the platform samples it
pub const TARGET_FORMAT: PixelFormat = PixelFormat::Astc6x6;

impl PixelFormat {
    /// Returns true for the ASTC block-compressed variants
    pub fn is_astc(self) -> bool {
        self.astc_block_dimensions().is_some()
    }

    /// Returns the (width, height) footprint of an ASTC block in texels
    pub fn astc_block_dimensions(self) -> Option<(u8, u8)> {
        use PixelFormat::*;
        let dims = match self {
            Astc4x4 => (4, 4),
            Astc5x4 => (5, 4),
            Astc5x5 => (5, 5),
            Astc6x5 => (6, 5),
            Astc6x6 => (6, 6),
            Astc8x5 => (8, 5),
            Astc8x6 => (8, 6),
            Astc8x8 => (8, 8),
            Astc10x5 => (10, 5),
            Astc10x6 => (10, 6),
            Astc10x8 => (10, 8),
            Astc10x10 => (10, 10),
            Astc12x10 => (12, 10),
            Astc12x12 => (12, 12),
            _ => return None,
        };
        Some(dims)
    }

    /// Engine-facing name of the format
    pub fn name(self) -> &'static str {
        use PixelFormat::*;
        match self {
            Rgb565 => "RGB565",
            Rgb5A1 => "RGB5A1",
            Rgba4444 => "RGBA4444",
            Rgb888 => "RGB888",
            Rgb32F => "RGB32F",
            Rgba8888 => "RGBA8888",
            Rgba32F => "RGBA32F",
            A8 => "A8",
            I8 => "I8",
            Ai8 => "AI8",
            RgbPvrtc2Bppv1 => "RGB_PVRTC_2BPPV1",
            RgbaPvrtc2Bppv1 => "RGBA_PVRTC_2BPPV1",
            RgbAPvrtc2Bppv1 => "RGB_A_PVRTC_2BPPV1",
            RgbPvrtc4Bppv1 => "RGB_PVRTC_4BPPV1",
            RgbaPvrtc4Bppv1 => "RGBA_PVRTC_4BPPV1",
            RgbAPvrtc4Bppv1 => "RGB_A_PVRTC_4BPPV1",
            RgbEtc1 => "RGB_ETC1",
            RgbaEtc1 => "RGBA_ETC1",
            RgbEtc2 => "RGB_ETC2",
            RgbaEtc2 => "RGBA_ETC2",
            Astc4x4 => "RGBA_ASTC_4x4",
            Astc5x4 => "RGBA_ASTC_5x4",
            Astc5x5 => "RGBA_ASTC_5x5",
            Astc6x5 => "RGBA_ASTC_6x5",
            Astc6x6 => "RGBA_ASTC_6x6",
            Astc8x5 => "RGBA_ASTC_8x5",
            Astc8x6 => "RGBA_ASTC_8x6",
            Astc8x8 => "RGBA_ASTC_8x8",
            Astc10x5 => "RGBA_ASTC_10x5",
            Astc10x6 => "RGBA_ASTC_10x6",
            Astc10x8 => "RGBA_ASTC_10x8",
            Astc10x10 => "RGBA_ASTC_10x10",
            Astc12x10 => "RGBA_ASTC_12x10",
            Astc12x12 => "RGBA_ASTC_12x12",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Block footprints of the 2D ASTC profile
const CANONICAL_BLOCK_DIMS: [u8; 6] = [4, 5, 6, 8, 10, 12];

/// Checks the block dimensions of an ASTC header.
///
/// Two ranges are accepted: the small uniform blocks `3..=6` on every axis
/// used by older tooling, and the canonical 2D footprints with a depth of 1.
pub fn is_valid_block_size(x: u8, y: u8, z: u8) -> bool {
    let uniform = (3..=6).contains(&x) && (3..=6).contains(&y) && (3..=6).contains(&z);
    let canonical =
        CANONICAL_BLOCK_DIMS.contains(&x) && CANONICAL_BLOCK_DIMS.contains(&y) && z == 1;
    uniform || canonical
}

/// Maps ASTC block dimensions to a pixel format.
///
/// This is a decision table evaluated top to bottom rather than an exact
/// lookup: an `x` of 4 always yields 4x4 and anything that falls through
/// the known widths is treated as 12-wide.
pub fn classify(x: u8, y: u8) -> PixelFormat {
    use PixelFormat::*;
    match (x, y) {
        (4, _) => Astc4x4,
        (5, 4) => Astc5x4,
        (5, _) => Astc5x5,
        (6, 5) => Astc6x5,
        (6, _) => Astc6x6,
        (8, 5) => Astc8x5,
        (8, 6) => Astc8x6,
        (8, _) => Astc8x8,
        (10, 5) => Astc10x5,
        (10, 6) => Astc10x6,
        (10, 8) => Astc10x8,
        (10, _) => Astc10x10,
        (_, 10) => Astc12x10,
        _ => Astc12x12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4, 4, PixelFormat::Astc4x4)]
    #[case(5, 4, PixelFormat::Astc5x4)]
    #[case(5, 5, PixelFormat::Astc5x5)]
    #[case(6, 5, PixelFormat::Astc6x5)]
    #[case(6, 6, PixelFormat::Astc6x6)]
    #[case(8, 5, PixelFormat::Astc8x5)]
    #[case(8, 6, PixelFormat::Astc8x6)]
    #[case(8, 8, PixelFormat::Astc8x8)]
    #[case(10, 5, PixelFormat::Astc10x5)]
    #[case(10, 6, PixelFormat::Astc10x6)]
    #[case(10, 8, PixelFormat::Astc10x8)]
    #[case(10, 10, PixelFormat::Astc10x10)]
    #[case(12, 10, PixelFormat::Astc12x10)]
    #[case(12, 12, PixelFormat::Astc12x12)]
    fn classify_maps_canonical_footprints(#[case] x: u8, #[case] y: u8, #[case] expected: PixelFormat) {
        assert_eq!(classify(x, y), expected);
        assert_eq!(expected.astc_block_dimensions(), Some((x, y)));
    }

    #[rstest]
    fn classify_width_four_is_always_4x4(#[values(3, 4, 5, 6, 8, 10, 12)] y: u8) {
        assert_eq!(classify(4, y), PixelFormat::Astc4x4);
    }

    #[rstest]
    #[case(5, 6, PixelFormat::Astc5x5)]
    #[case(6, 4, PixelFormat::Astc6x6)]
    #[case(8, 12, PixelFormat::Astc8x8)]
    #[case(10, 12, PixelFormat::Astc10x10)]
    #[case(12, 4, PixelFormat::Astc12x12)]
    #[case(3, 3, PixelFormat::Astc12x12)]
    #[case(3, 10, PixelFormat::Astc12x10)]
    fn classify_falls_through_in_table_order(#[case] x: u8, #[case] y: u8, #[case] expected: PixelFormat) {
        assert_eq!(classify(x, y), expected);
    }

    #[rstest]
    #[case(4, 4, 1)]
    #[case(6, 6, 1)]
    #[case(12, 12, 1)]
    #[case(3, 3, 3)]
    #[case(6, 6, 6)]
    #[case(5, 4, 3)]
    #[case(10, 5, 1)]
    fn block_size_accepts_legal_dimensions(#[case] x: u8, #[case] y: u8, #[case] z: u8) {
        assert!(is_valid_block_size(x, y, z));
    }

    #[rstest]
    #[case(7, 4, 1)]
    #[case(4, 7, 1)]
    #[case(6, 6, 2)]
    #[case(3, 3, 1)]
    #[case(2, 4, 1)]
    #[case(13, 12, 1)]
    #[case(8, 8, 0)]
    #[case(9, 9, 1)]
    fn block_size_rejects_illegal_dimensions(#[case] x: u8, #[case] y: u8, #[case] z: u8) {
        assert!(!is_valid_block_size(x, y, z));
    }

    #[test]
    fn non_astc_formats_have_no_block_dimensions() {
        assert!(!PixelFormat::Rgba8888.is_astc());
        assert!(!PixelFormat::RgbaEtc2.is_astc());
        assert!(TARGET_FORMAT.is_astc());
    }

    #[test]
    fn display_uses_engine_names() {
        assert_eq!(PixelFormat::Astc6x6.to_string(), "RGBA_ASTC_6x6");
        assert_eq!(PixelFormat::RgbAPvrtc4Bppv1.to_string(), "RGB_A_PVRTC_4BPPV1");
    }
}
