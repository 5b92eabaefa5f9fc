use std::fmt;

use crate::format::DxgiFormat;
use crate::texture::{TexDimension, TexMetadata};

/// Pixel shader programs, one per way a texture is bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderVariant {
    Tex1D,
    Tex1DArray,
    Tex2D,
    Tex2DR8Uint,
    Tex2DArray,
    Tex3D,
    Cube,
    /// Shows the stencil bits of a depth-stencil texture.
    Stencil,
}

impl ShaderVariant {
    pub const ALL: [ShaderVariant; 8] = [
        Self::Tex1D,
        Self::Tex1DArray,
        Self::Tex2D,
        Self::Tex2DR8Uint,
        Self::Tex2DArray,
        Self::Tex3D,
        Self::Cube,
        Self::Stencil,
    ];

    pub fn is_1d(self) -> bool {
        matches!(self, Self::Tex1D | Self::Tex1DArray)
    }
}

impl fmt::Display for ShaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tex1D => "1D",
            Self::Tex1DArray => "1D array",
            Self::Tex2D => "2D",
            Self::Tex2DR8Uint => "2D R8_UINT",
            Self::Tex2DArray => "2D array",
            Self::Tex3D => "3D",
            Self::Cube => "cube",
            Self::Stencil => "stencil",
        };
        f.write_str(name)
    }
}

/// Pick the shader for a loaded texture.
///
/// `source_format` is the format as read from the file, before any patching.
/// The cube rule only fires if the cube flag survived normalization, which
/// the loader never allows; it is kept so such a texture still renders.
pub fn select_shader(meta: &TexMetadata, source_format: DxgiFormat) -> ShaderVariant {
    match meta.dimension {
        TexDimension::Texture1D if meta.array_size > 1 => ShaderVariant::Tex1DArray,
        TexDimension::Texture1D => ShaderVariant::Tex1D,
        TexDimension::Texture2D if source_format == DxgiFormat::R8_UINT => {
            ShaderVariant::Tex2DR8Uint
        }
        TexDimension::Texture2D if meta.is_cubemap() => ShaderVariant::Cube,
        TexDimension::Texture2D if meta.array_size > 1 => ShaderVariant::Tex2DArray,
        TexDimension::Texture2D => ShaderVariant::Tex2D,
        TexDimension::Texture3D => ShaderVariant::Tex3D,
    }
}
