//! DXGI pixel formats and the per-format facts the viewer needs: names,
//! storage size, and whether a format shows a single data channel.

use std::fmt;

use crate::error::{DdsViewError, Result};

/// A DXGI_FORMAT code as stored in DX10 DDS headers.
///
/// Kept as a raw code so that files carrying formats this crate has no name
/// for still parse; such formats are rejected later as unsupported.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Default)]
pub struct DxgiFormat(pub u32);

macro_rules! dxgi_formats {
    ($($name:ident = $value:literal,)*) => {
        #[allow(dead_code)]
        impl DxgiFormat {
            $(pub const $name: DxgiFormat = DxgiFormat($value);)*

            /// Format name without the `DXGI_FORMAT_` prefix.
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some(stringify!($name)),)*
                    _ => None,
                }
            }
        }
    };
}

dxgi_formats! {
    UNKNOWN = 0,
    R32G32B32A32_TYPELESS = 1,
    R32G32B32A32_FLOAT = 2,
    R32G32B32A32_UINT = 3,
    R32G32B32A32_SINT = 4,
    R32G32B32_TYPELESS = 5,
    R32G32B32_FLOAT = 6,
    R32G32B32_UINT = 7,
    R32G32B32_SINT = 8,
    R16G16B16A16_TYPELESS = 9,
    R16G16B16A16_FLOAT = 10,
    R16G16B16A16_UNORM = 11,
    R16G16B16A16_UINT = 12,
    R16G16B16A16_SNORM = 13,
    R16G16B16A16_SINT = 14,
    R32G32_TYPELESS = 15,
    R32G32_FLOAT = 16,
    R32G32_UINT = 17,
    R32G32_SINT = 18,
    R32G8X24_TYPELESS = 19,
    D32_FLOAT_S8X24_UINT = 20,
    R32_FLOAT_X8X24_TYPELESS = 21,
    X32_TYPELESS_G8X24_UINT = 22,
    R10G10B10A2_TYPELESS = 23,
    R10G10B10A2_UNORM = 24,
    R10G10B10A2_UINT = 25,
    R11G11B10_FLOAT = 26,
    R8G8B8A8_TYPELESS = 27,
    R8G8B8A8_UNORM = 28,
    R8G8B8A8_UNORM_SRGB = 29,
    R8G8B8A8_UINT = 30,
    R8G8B8A8_SNORM = 31,
    R8G8B8A8_SINT = 32,
    R16G16_TYPELESS = 33,
    R16G16_FLOAT = 34,
    R16G16_UNORM = 35,
    R16G16_UINT = 36,
    R16G16_SNORM = 37,
    R16G16_SINT = 38,
    R32_TYPELESS = 39,
    D32_FLOAT = 40,
    R32_FLOAT = 41,
    R32_UINT = 42,
    R32_SINT = 43,
    R24G8_TYPELESS = 44,
    D24_UNORM_S8_UINT = 45,
    R24_UNORM_X8_TYPELESS = 46,
    X24_TYPELESS_G8_UINT = 47,
    R8G8_TYPELESS = 48,
    R8G8_UNORM = 49,
    R8G8_UINT = 50,
    R8G8_SNORM = 51,
    R8G8_SINT = 52,
    R16_TYPELESS = 53,
    R16_FLOAT = 54,
    D16_UNORM = 55,
    R16_UNORM = 56,
    R16_UINT = 57,
    R16_SNORM = 58,
    R16_SINT = 59,
    R8_TYPELESS = 60,
    R8_UNORM = 61,
    R8_UINT = 62,
    R8_SNORM = 63,
    R8_SINT = 64,
    A8_UNORM = 65,
    R1_UNORM = 66,
    R9G9B9E5_SHAREDEXP = 67,
    R8G8_B8G8_UNORM = 68,
    G8R8_G8B8_UNORM = 69,
    BC1_TYPELESS = 70,
    BC1_UNORM = 71,
    BC1_UNORM_SRGB = 72,
    BC2_TYPELESS = 73,
    BC2_UNORM = 74,
    BC2_UNORM_SRGB = 75,
    BC3_TYPELESS = 76,
    BC3_UNORM = 77,
    BC3_UNORM_SRGB = 78,
    BC4_TYPELESS = 79,
    BC4_UNORM = 80,
    BC4_SNORM = 81,
    BC5_TYPELESS = 82,
    BC5_UNORM = 83,
    BC5_SNORM = 84,
    B5G6R5_UNORM = 85,
    B5G5R5A1_UNORM = 86,
    B8G8R8A8_UNORM = 87,
    B8G8R8X8_UNORM = 88,
    R10G10B10_XR_BIAS_A2_UNORM = 89,
    B8G8R8A8_TYPELESS = 90,
    B8G8R8A8_UNORM_SRGB = 91,
    B8G8R8X8_TYPELESS = 92,
    B8G8R8X8_UNORM_SRGB = 93,
    BC6H_TYPELESS = 94,
    BC6H_UF16 = 95,
    BC6H_SF16 = 96,
    BC7_TYPELESS = 97,
    BC7_UNORM = 98,
    BC7_UNORM_SRGB = 99,
    B4G4R4A4_UNORM = 115,
}

impl DxgiFormat {
    /// Storage cost in bits per texel; 0 for formats this crate cannot lay out.
    pub fn bits_per_pixel(self) -> u32 {
        match self.0 {
            1..=4 => 128,
            5..=8 => 96,
            9..=22 => 64,
            23..=47 | 67 | 87..=93 => 32,
            48..=59 | 68 | 69 | 85 | 86 | 115 => 16,
            60..=65 | 73..=78 | 82..=84 | 94..=99 => 8,
            70..=72 | 79..=81 => 4,
            66 => 1,
            _ => 0,
        }
    }

    /// Block-compressed (BCn) formats store 4x4 texel blocks.
    pub fn is_compressed(self) -> bool {
        matches!(self.0, 70..=84 | 94..=99)
    }

    /// Bytes per 4x4 block for BCn formats.
    pub fn block_bytes(self) -> Option<u32> {
        match self.0 {
            70..=72 | 79..=81 => Some(8),
            73..=78 | 82..=84 | 94..=99 => Some(16),
            _ => None,
        }
    }

    /// Formats that pack two texels into one 32-bit word.
    pub fn is_packed(self) -> bool {
        matches!(self.0, 68 | 69)
    }

    /// Formats that hold one data channel. These are displayed in depth mode.
    pub fn is_single_channel(self) -> bool {
        matches!(
            self,
            Self::R32_TYPELESS
                | Self::D32_FLOAT
                | Self::R32_FLOAT
                | Self::R32_UINT
                | Self::R32_SINT
                | Self::R16_TYPELESS
                | Self::R16_FLOAT
                | Self::D16_UNORM
                | Self::R16_UNORM
                | Self::R16_UINT
                | Self::R16_SNORM
                | Self::R16_SINT
                | Self::R8_TYPELESS
                | Self::R8_UNORM
                | Self::R8_UINT
                | Self::R8_SNORM
                | Self::R8_SINT
                | Self::A8_UNORM
        )
    }

    /// Formats carrying a stencil component.
    pub fn has_stencil(self) -> bool {
        matches!(
            self,
            Self::R32G8X24_TYPELESS
                | Self::D32_FLOAT_S8X24_UINT
                | Self::X32_TYPELESS_G8X24_UINT
                | Self::R24G8_TYPELESS
                | Self::D24_UNORM_S8_UINT
                | Self::X24_TYPELESS_G8_UINT
        )
    }

    pub fn is_srgb(self) -> bool {
        matches!(
            self,
            Self::R8G8B8A8_UNORM_SRGB
                | Self::BC1_UNORM_SRGB
                | Self::BC2_UNORM_SRGB
                | Self::BC3_UNORM_SRGB
                | Self::B8G8R8A8_UNORM_SRGB
                | Self::B8G8R8X8_UNORM_SRGB
                | Self::BC7_UNORM_SRGB
        )
    }

    /// Row and slice pitch in bytes of one `width` x `height` image, tightly packed.
    pub fn compute_pitch(self, width: u32, height: u32) -> Result<(usize, usize)> {
        let width = width as usize;
        let height = height as usize;

        if let Some(block) = self.block_bytes() {
            let blocks_wide = width.div_ceil(4).max(1);
            let blocks_high = height.div_ceil(4).max(1);
            let row = blocks_wide * block as usize;
            return Ok((row, row * blocks_high));
        }

        if self.is_packed() {
            let row = width.div_ceil(2) * 4;
            return Ok((row, row * height));
        }

        match self.bits_per_pixel() {
            0 => Err(DdsViewError::UnsupportedFormat(format!(
                "no storage layout for DXGI format {self}"
            ))),
            bpp => {
                let row = (width * bpp as usize).div_ceil(8);
                Ok((row, row * height))
            }
        }
    }
}

impl fmt::Display for DxgiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN({})", self.0),
        }
    }
}
