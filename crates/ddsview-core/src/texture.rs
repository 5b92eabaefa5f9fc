use std::fmt;

use crate::format::DxgiFormat;

/// Resource misc flag marking a 2D texture array as a cube map.
pub const TEX_MISC_TEXTURECUBE: u32 = 0x4;

/// Texture dimensionality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TexDimension {
    Texture1D,
    Texture2D,
    Texture3D,
}

impl TexDimension {
    /// Map a D3D10/11 resource dimension code (2, 3, 4).
    pub fn from_resource_dimension(code: u32) -> Option<Self> {
        match code {
            2 => Some(Self::Texture1D),
            3 => Some(Self::Texture2D),
            4 => Some(Self::Texture3D),
            _ => None,
        }
    }
}

impl fmt::Display for TexDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Texture1D => write!(f, "1D"),
            Self::Texture2D => write!(f, "2D"),
            Self::Texture3D => write!(f, "3D"),
        }
    }
}

/// Description of a texture as stored in a DDS file.
#[derive(Clone, Debug, PartialEq)]
pub struct TexMetadata {
    pub width: u32,
    pub height: u32,
    /// Depth of a volume texture; 1 otherwise.
    pub depth: u32,
    /// Array elements; a cube map counts six per cube.
    pub array_size: u32,
    pub mip_levels: u32,
    pub misc_flags: u32,
    pub format: DxgiFormat,
    pub dimension: TexDimension,
}

impl TexMetadata {
    pub fn is_cubemap(&self) -> bool {
        self.misc_flags & TEX_MISC_TEXTURECUBE != 0
    }

    pub fn is_volume(&self) -> bool {
        self.dimension == TexDimension::Texture3D
    }

    /// Number of selectable slices: depth for volumes, array size otherwise.
    pub fn max_slices(&self) -> u32 {
        if self.is_volume() {
            self.depth
        } else {
            self.array_size
        }
    }

    /// Drop the cube flag so a cube map is treated as a plain 6-element array.
    pub fn normalize_cube(&mut self) {
        self.misc_flags &= !TEX_MISC_TEXTURECUBE;
    }

    /// Width, height and depth of a mip level, never smaller than 1.
    pub fn mip_extent(&self, mip: u32) -> (u32, u32, u32) {
        (
            (self.width >> mip).max(1),
            (self.height >> mip).max(1),
            (self.depth >> mip).max(1),
        )
    }
}
