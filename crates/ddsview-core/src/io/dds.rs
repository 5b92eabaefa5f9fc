use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;

use crate::consts::{DDS_DX10_HEADER_SIZE, DDS_HEADER_SIZE, DDS_MAGIC, DDS_PIXEL_FORMAT_SIZE};
use crate::error::{DdsViewError, Result};
use crate::format::DxgiFormat;
use crate::scratch::ScratchImage;
use crate::texture::{TexDimension, TexMetadata, TEX_MISC_TEXTURECUBE};

/// Header flag: `depth` is valid (volume texture).
pub const DDSD_DEPTH: u32 = 0x80_0000;
/// Header flag: `height` is valid.
pub const DDSD_HEIGHT: u32 = 0x2;

pub const DDPF_ALPHAPIXELS: u32 = 0x1;
pub const DDPF_ALPHA: u32 = 0x2;
pub const DDPF_FOURCC: u32 = 0x4;
pub const DDPF_RGB: u32 = 0x40;
pub const DDPF_LUMINANCE: u32 = 0x2_0000;
pub const DDPF_BUMPDUDV: u32 = 0x8_0000;

pub const DDSCAPS2_CUBEMAP: u32 = 0x200;
pub const DDSCAPS2_CUBEMAP_ALLFACES: u32 = 0xFC00;
pub const DDSCAPS2_VOLUME: u32 = 0x20_0000;

/// Legacy DDS pixel format block.
#[derive(Clone, Debug, Default)]
pub struct PixelFormat {
    pub flags: u32,
    pub four_cc: [u8; 4],
    pub rgb_bit_count: u32,
    pub r_mask: u32,
    pub g_mask: u32,
    pub b_mask: u32,
    pub a_mask: u32,
}

impl PixelFormat {
    fn has(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    fn masks(&self) -> (u32, u32, u32, u32) {
        (self.r_mask, self.g_mask, self.b_mask, self.a_mask)
    }
}

/// DX10 extension header, present when the FourCC is `DX10`.
#[derive(Clone, Debug, Default)]
pub struct Dx10Header {
    pub dxgi_format: u32,
    pub resource_dimension: u32,
    pub misc_flag: u32,
    pub array_size: u32,
    pub misc_flags2: u32,
}

/// DDS file header (124 bytes after the magic, plus the optional DX10 block).
#[derive(Clone, Debug, Default)]
pub struct DdsHeader {
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub depth: u32,
    pub mip_map_count: u32,
    pub pixel_format: PixelFormat,
    pub caps: u32,
    pub caps2: u32,
    pub dx10: Option<Dx10Header>,
}

impl DdsHeader {
    /// Offset of the first texel byte from the start of the file.
    pub fn data_offset(&self) -> usize {
        let dx10 = if self.dx10.is_some() { DDS_DX10_HEADER_SIZE } else { 0 };
        4 + DDS_HEADER_SIZE + dx10
    }

    /// Derive texture metadata from the header.
    pub fn metadata(&self) -> Result<TexMetadata> {
        let mip_levels = self.mip_map_count.max(1);

        let meta = match &self.dx10 {
            Some(dx10) => self.dx10_metadata(dx10, mip_levels)?,
            None => self.legacy_metadata(mip_levels)?,
        };

        if meta.width == 0 || meta.height == 0 || meta.depth == 0 {
            return Err(DdsViewError::InvalidDimensions {
                width: meta.width,
                height: meta.height,
                depth: meta.depth,
            });
        }

        let largest = meta.width.max(meta.height).max(meta.depth);
        let max_mips = 32 - largest.leading_zeros();
        if meta.mip_levels > max_mips {
            return Err(DdsViewError::InvalidDds(format!(
                "{} mip levels declared, at most {} possible",
                meta.mip_levels, max_mips
            )));
        }

        if meta.format.bits_per_pixel() == 0 {
            return Err(DdsViewError::UnsupportedFormat(format!(
                "DXGI format {} cannot be laid out",
                meta.format
            )));
        }

        Ok(meta)
    }

    fn dx10_metadata(&self, dx10: &Dx10Header, mip_levels: u32) -> Result<TexMetadata> {
        if dx10.array_size == 0 {
            return Err(DdsViewError::InvalidDds("DX10 header declares zero array size".into()));
        }

        let dimension = TexDimension::from_resource_dimension(dx10.resource_dimension)
            .ok_or_else(|| {
                DdsViewError::UnsupportedFormat(format!(
                    "resource dimension {}",
                    dx10.resource_dimension
                ))
            })?;

        let format = DxgiFormat(dx10.dxgi_format);
        let mut meta = TexMetadata {
            width: self.width,
            height: self.height,
            depth: 1,
            array_size: dx10.array_size,
            mip_levels,
            misc_flags: 0,
            format,
            dimension,
        };

        match dimension {
            TexDimension::Texture1D => {
                if self.flags & DDSD_HEIGHT != 0 && self.height != 1 {
                    return Err(DdsViewError::InvalidDds(format!(
                        "1D texture with height {}",
                        self.height
                    )));
                }
                meta.height = 1;
            }
            TexDimension::Texture2D => {
                if dx10.misc_flag & TEX_MISC_TEXTURECUBE != 0 {
                    meta.misc_flags |= TEX_MISC_TEXTURECUBE;
                    meta.array_size = meta.array_size.checked_mul(6).ok_or_else(|| {
                        DdsViewError::InvalidDds(format!(
                            "cube array of {} cubes is too large",
                            dx10.array_size
                        ))
                    })?;
                }
            }
            TexDimension::Texture3D => {
                if self.flags & DDSD_DEPTH == 0 {
                    return Err(DdsViewError::InvalidDds(
                        "volume texture without depth flag".into(),
                    ));
                }
                // Arrays of volumes are passed through; the inspector rejects them.
                meta.depth = self.depth;
            }
        }

        Ok(meta)
    }

    fn legacy_metadata(&self, mip_levels: u32) -> Result<TexMetadata> {
        let format = legacy_format(&self.pixel_format).ok_or_else(|| {
            DdsViewError::UnsupportedFormat(describe_pixel_format(&self.pixel_format))
        })?;

        let mut meta = TexMetadata {
            width: self.width,
            height: self.height,
            depth: 1,
            array_size: 1,
            mip_levels,
            misc_flags: 0,
            format,
            dimension: TexDimension::Texture2D,
        };

        if self.caps2 & DDSCAPS2_CUBEMAP != 0 {
            if self.caps2 & DDSCAPS2_CUBEMAP_ALLFACES != DDSCAPS2_CUBEMAP_ALLFACES {
                return Err(DdsViewError::UnsupportedFormat(
                    "partial cube maps are not supported".into(),
                ));
            }
            meta.array_size = 6;
            meta.misc_flags |= TEX_MISC_TEXTURECUBE;
        } else if self.flags & DDSD_DEPTH != 0 && self.caps2 & DDSCAPS2_VOLUME != 0 {
            meta.dimension = TexDimension::Texture3D;
            meta.depth = self.depth;
        }

        Ok(meta)
    }
}

/// Memory-mapped DDS file reader.
pub struct DdsReader {
    mmap: Mmap,
    path: PathBuf,
    pub header: DdsHeader,
    metadata: TexMetadata,
}

impl DdsReader {
    /// Open a DDS file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| DdsViewError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let len = file.metadata()?.len() as usize;
        if len < 4 + DDS_HEADER_SIZE {
            return Err(DdsViewError::InvalidDds(format!(
                "file too small for a DDS header ({len} bytes)"
            ))
            .with_path(path));
        }

        let mmap = unsafe { Mmap::map(&file)? };
        let header = parse_header(&mmap).map_err(|e| e.with_path(path))?;
        let metadata = header.metadata().map_err(|e| e.with_path(path))?;

        tracing::debug!(
            "{}: {}x{}x{} {} array={} mips={} format={}",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.depth,
            metadata.dimension,
            metadata.array_size,
            metadata.mip_levels,
            metadata.format
        );

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            header,
            metadata,
        })
    }

    pub fn metadata(&self) -> &TexMetadata {
        &self.metadata
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate the payload against the header and build the subresource table.
    pub fn load(self) -> Result<ScratchImage> {
        let offset = self.header.data_offset();
        ScratchImage::from_mapped(self.mmap, offset, self.metadata)
            .map_err(|e| e.with_path(&self.path))
    }
}

/// Read only the metadata of a DDS file.
pub fn read_metadata(path: &Path) -> Result<TexMetadata> {
    Ok(DdsReader::open(path)?.metadata)
}

/// Parse the magic, the legacy header and the optional DX10 header.
pub fn parse_header(buf: &[u8]) -> Result<DdsHeader> {
    if buf.len() < 4 + DDS_HEADER_SIZE {
        return Err(DdsViewError::InvalidDds("file too small for a DDS header".into()));
    }

    let mut cursor = Cursor::new(buf);
    let magic = cursor.read_u32::<LittleEndian>()?;
    if magic != DDS_MAGIC {
        return Err(DdsViewError::InvalidDds("missing 'DDS ' magic".into()));
    }

    let size = cursor.read_u32::<LittleEndian>()?;
    if size as usize != DDS_HEADER_SIZE {
        return Err(DdsViewError::InvalidDds(format!("header size {size}, expected 124")));
    }

    let flags = cursor.read_u32::<LittleEndian>()?;
    let height = cursor.read_u32::<LittleEndian>()?;
    let width = cursor.read_u32::<LittleEndian>()?;
    let pitch_or_linear_size = cursor.read_u32::<LittleEndian>()?;
    let depth = cursor.read_u32::<LittleEndian>()?;
    let mip_map_count = cursor.read_u32::<LittleEndian>()?;
    cursor.set_position(cursor.position() + 11 * 4); // reserved1

    let pf_size = cursor.read_u32::<LittleEndian>()?;
    if pf_size as usize != DDS_PIXEL_FORMAT_SIZE {
        return Err(DdsViewError::InvalidDds(format!(
            "pixel format size {pf_size}, expected 32"
        )));
    }
    let pf_flags = cursor.read_u32::<LittleEndian>()?;
    let mut four_cc = [0u8; 4];
    four_cc.copy_from_slice(&buf[cursor.position() as usize..cursor.position() as usize + 4]);
    cursor.set_position(cursor.position() + 4);
    let pixel_format = PixelFormat {
        flags: pf_flags,
        four_cc,
        rgb_bit_count: cursor.read_u32::<LittleEndian>()?,
        r_mask: cursor.read_u32::<LittleEndian>()?,
        g_mask: cursor.read_u32::<LittleEndian>()?,
        b_mask: cursor.read_u32::<LittleEndian>()?,
        a_mask: cursor.read_u32::<LittleEndian>()?,
    };

    let caps = cursor.read_u32::<LittleEndian>()?;
    let caps2 = cursor.read_u32::<LittleEndian>()?;
    // caps3, caps4 and reserved2 are unused.

    let dx10 = if pixel_format.has(DDPF_FOURCC) && &pixel_format.four_cc == b"DX10" {
        let start = 4 + DDS_HEADER_SIZE;
        if buf.len() < start + DDS_DX10_HEADER_SIZE {
            return Err(DdsViewError::InvalidDds("truncated DX10 header".into()));
        }
        let mut cursor = Cursor::new(&buf[start..]);
        Some(Dx10Header {
            dxgi_format: cursor.read_u32::<LittleEndian>()?,
            resource_dimension: cursor.read_u32::<LittleEndian>()?,
            misc_flag: cursor.read_u32::<LittleEndian>()?,
            array_size: cursor.read_u32::<LittleEndian>()?,
            misc_flags2: cursor.read_u32::<LittleEndian>()?,
        })
    } else {
        None
    };

    Ok(DdsHeader {
        flags,
        height,
        width,
        pitch_or_linear_size,
        depth,
        mip_map_count,
        pixel_format,
        caps,
        caps2,
        dx10,
    })
}

/// Map a legacy (pre-DX10) pixel format to its DXGI equivalent.
pub fn legacy_format(pf: &PixelFormat) -> Option<DxgiFormat> {
    if pf.has(DDPF_FOURCC) {
        return four_cc_format(&pf.four_cc);
    }

    let masks = pf.masks();
    if pf.has(DDPF_RGB) {
        return match (pf.rgb_bit_count, masks) {
            (32, (0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000)) => {
                Some(DxgiFormat::R8G8B8A8_UNORM)
            }
            (32, (0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000)) => {
                Some(DxgiFormat::B8G8R8A8_UNORM)
            }
            (32, (0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0)) => Some(DxgiFormat::B8G8R8X8_UNORM),
            // Older writers stored 10:10:10:2 with red and blue swapped.
            (32, (0x3ff0_0000, 0x000f_fc00, 0x0000_03ff, 0xc000_0000))
            | (32, (0x0000_03ff, 0x000f_fc00, 0x3ff0_0000, 0xc000_0000)) => {
                Some(DxgiFormat::R10G10B10A2_UNORM)
            }
            (32, (0x0000_ffff, 0xffff_0000, 0, 0)) => Some(DxgiFormat::R16G16_UNORM),
            (32, (0xffff_ffff, 0, 0, 0)) => Some(DxgiFormat::R32_FLOAT),
            (16, (0x7c00, 0x03e0, 0x001f, 0x8000)) => Some(DxgiFormat::B5G5R5A1_UNORM),
            (16, (0xf800, 0x07e0, 0x001f, 0)) => Some(DxgiFormat::B5G6R5_UNORM),
            (16, (0x0f00, 0x00f0, 0x000f, 0xf000)) => Some(DxgiFormat::B4G4R4A4_UNORM),
            (16, (0x00ff, 0, 0, 0xff00)) => Some(DxgiFormat::R8G8_UNORM),
            (16, (0xffff, 0, 0, 0)) => Some(DxgiFormat::R16_UNORM),
            (8, (0xff, 0, 0, 0)) => Some(DxgiFormat::R8_UNORM),
            _ => None,
        };
    }

    if pf.has(DDPF_LUMINANCE) {
        return match (pf.rgb_bit_count, masks) {
            (8, (0xff, 0, 0, 0)) => Some(DxgiFormat::R8_UNORM),
            (16, (0xffff, 0, 0, 0)) => Some(DxgiFormat::R16_UNORM),
            (16, (0x00ff, 0, 0, 0xff00)) => Some(DxgiFormat::R8G8_UNORM),
            _ => None,
        };
    }

    if pf.has(DDPF_ALPHA) {
        return (pf.rgb_bit_count == 8).then_some(DxgiFormat::A8_UNORM);
    }

    if pf.has(DDPF_BUMPDUDV) {
        return match (pf.rgb_bit_count, masks) {
            (16, (0x00ff, 0xff00, 0, 0)) => Some(DxgiFormat::R8G8_SNORM),
            (32, (0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000)) => {
                Some(DxgiFormat::R8G8B8A8_SNORM)
            }
            (32, (0x0000_ffff, 0xffff_0000, 0, 0)) => Some(DxgiFormat::R16G16_SNORM),
            _ => None,
        };
    }

    None
}

fn four_cc_format(four_cc: &[u8; 4]) -> Option<DxgiFormat> {
    let format = match four_cc {
        b"DXT1" => DxgiFormat::BC1_UNORM,
        b"DXT2" | b"DXT3" => DxgiFormat::BC2_UNORM,
        b"DXT4" | b"DXT5" => DxgiFormat::BC3_UNORM,
        b"ATI1" | b"BC4U" => DxgiFormat::BC4_UNORM,
        b"BC4S" => DxgiFormat::BC4_SNORM,
        b"ATI2" | b"BC5U" => DxgiFormat::BC5_UNORM,
        b"BC5S" => DxgiFormat::BC5_SNORM,
        b"RGBG" => DxgiFormat::R8G8_B8G8_UNORM,
        b"GRGB" => DxgiFormat::G8R8_G8B8_UNORM,
        _ => {
            // D3DFMT codes stored numerically in the FourCC field.
            return match u32::from_le_bytes(*four_cc) {
                36 => Some(DxgiFormat::R16G16B16A16_UNORM),
                110 => Some(DxgiFormat::R16G16B16A16_SNORM),
                111 => Some(DxgiFormat::R16_FLOAT),
                112 => Some(DxgiFormat::R16G16_FLOAT),
                113 => Some(DxgiFormat::R16G16B16A16_FLOAT),
                114 => Some(DxgiFormat::R32_FLOAT),
                115 => Some(DxgiFormat::R32G32_FLOAT),
                116 => Some(DxgiFormat::R32G32B32A32_FLOAT),
                _ => None,
            };
        }
    };
    Some(format)
}

fn describe_pixel_format(pf: &PixelFormat) -> String {
    if pf.has(DDPF_FOURCC) {
        format!("legacy FourCC {:?}", String::from_utf8_lossy(&pf.four_cc))
    } else {
        format!(
            "legacy pixel format flags={:#x} bits={} masks=({:#x}, {:#x}, {:#x}, {:#x})",
            pf.flags, pf.rgb_bit_count, pf.r_mask, pf.g_mask, pf.b_mask, pf.a_mask
        )
    }
}
