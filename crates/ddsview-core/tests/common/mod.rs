use std::path::{Path, PathBuf};

use ddsview_core::format::DxgiFormat;
use ddsview_core::io::dds::{DDPF_FOURCC, DDSCAPS2_CUBEMAP, DDSCAPS2_CUBEMAP_ALLFACES, DDSD_DEPTH};
use ddsview_core::scratch::payload_size;
use ddsview_core::texture::{TexDimension, TexMetadata};

const DDSD_CAPS: u32 = 0x1;
const DDSD_HEIGHT: u32 = 0x2;
const DDSD_WIDTH: u32 = 0x4;
const DDSD_PIXELFORMAT: u32 = 0x1000;
const DDSD_MIPMAPCOUNT: u32 = 0x2_0000;

/// Legacy pixel format block contents.
#[derive(Clone, Debug, Default)]
pub struct LegacyPixelFormat {
    pub flags: u32,
    pub four_cc: [u8; 4],
    pub bits: u32,
    pub masks: [u32; 4],
}

/// Describes a synthetic DDS file.
#[derive(Clone, Debug)]
pub struct DdsBuilder {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mips: u32,
    pub array_size: u32,
    pub format: DxgiFormat,
    pub dimension: TexDimension,
    pub misc_flag: u32,
    /// When set, write a legacy header with this pixel format instead of DX10.
    pub legacy: Option<LegacyPixelFormat>,
    pub caps2: u32,
}

impl DdsBuilder {
    pub fn tex2d(format: DxgiFormat, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 1,
            mips: 1,
            array_size: 1,
            format,
            dimension: TexDimension::Texture2D,
            misc_flag: 0,
            legacy: None,
            caps2: 0,
        }
    }

    pub fn tex1d(format: DxgiFormat, width: u32) -> Self {
        Self {
            dimension: TexDimension::Texture1D,
            ..Self::tex2d(format, width, 1)
        }
    }

    pub fn tex3d(format: DxgiFormat, width: u32, height: u32, depth: u32) -> Self {
        Self {
            depth,
            dimension: TexDimension::Texture3D,
            ..Self::tex2d(format, width, height)
        }
    }

    pub fn array(mut self, array_size: u32) -> Self {
        self.array_size = array_size;
        self
    }

    pub fn mips(mut self, mips: u32) -> Self {
        self.mips = mips;
        self
    }

    /// DX10 cube map; `array_size` counts cubes.
    pub fn cube(mut self) -> Self {
        self.misc_flag |= 0x4;
        self
    }

    /// Legacy header; `format` must be what the pixel format maps to.
    pub fn legacy(mut self, pixel_format: LegacyPixelFormat) -> Self {
        self.legacy = Some(pixel_format);
        self
    }

    pub fn legacy_fourcc(self, four_cc: &[u8; 4]) -> Self {
        self.legacy(LegacyPixelFormat {
            flags: DDPF_FOURCC,
            four_cc: *four_cc,
            ..Default::default()
        })
    }

    /// Legacy cube map with all six faces.
    pub fn legacy_cube(mut self) -> Self {
        self.caps2 = DDSCAPS2_CUBEMAP | DDSCAPS2_CUBEMAP_ALLFACES;
        self
    }

    /// Metadata the reader should report for this file.
    pub fn metadata(&self) -> TexMetadata {
        let cube = self.misc_flag & 0x4 != 0 || self.caps2 & DDSCAPS2_CUBEMAP != 0;
        let array_size = match (&self.legacy, cube) {
            (Some(_), true) => 6,
            (Some(_), false) => 1,
            (None, true) => self.array_size * 6,
            (None, false) => self.array_size,
        };
        TexMetadata {
            width: self.width,
            height: self.height,
            depth: self.depth,
            array_size,
            mip_levels: self.mips,
            misc_flags: if cube { 0x4 } else { 0 },
            format: self.format,
            dimension: self.dimension,
        }
    }

    /// Texel payload size implied by the metadata.
    pub fn payload_len(&self) -> usize {
        payload_size(&self.metadata()).expect("payload size")
    }

    pub fn header(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(148);
        let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;
        if self.mips > 1 {
            flags |= DDSD_MIPMAPCOUNT;
        }
        if self.dimension == TexDimension::Texture3D {
            flags |= DDSD_DEPTH;
        }

        buf.extend_from_slice(b"DDS ");
        push(&mut buf, 124);
        push(&mut buf, flags);
        push(&mut buf, self.height);
        push(&mut buf, self.width);
        push(&mut buf, 0); // pitch
        push(&mut buf, self.depth);
        push(&mut buf, self.mips);
        buf.extend_from_slice(&[0u8; 44]);

        let pf = self.legacy.clone().unwrap_or(LegacyPixelFormat {
            flags: DDPF_FOURCC,
            four_cc: *b"DX10",
            ..Default::default()
        });
        push(&mut buf, 32);
        push(&mut buf, pf.flags);
        buf.extend_from_slice(&pf.four_cc);
        push(&mut buf, pf.bits);
        for mask in pf.masks {
            push(&mut buf, mask);
        }

        let volume_caps2 = if self.legacy.is_some() && self.dimension == TexDimension::Texture3D {
            0x20_0000
        } else {
            0
        };
        push(&mut buf, 0x1000); // caps: texture
        push(&mut buf, self.caps2 | volume_caps2);
        buf.extend_from_slice(&[0u8; 12]); // caps3, caps4, reserved2
        assert_eq!(buf.len(), 128);

        if self.legacy.is_none() {
            let resource_dimension = match self.dimension {
                TexDimension::Texture1D => 2,
                TexDimension::Texture2D => 3,
                TexDimension::Texture3D => 4,
            };
            push(&mut buf, self.format.0);
            push(&mut buf, resource_dimension);
            push(&mut buf, self.misc_flag);
            push(&mut buf, self.array_size);
            push(&mut buf, 0);
        }
        buf
    }

    pub fn build(&self, payload: &[u8]) -> Vec<u8> {
        let mut buf = self.header();
        buf.extend_from_slice(payload);
        buf
    }

    /// Complete file whose payload bytes count up from zero.
    pub fn build_counting(&self) -> Vec<u8> {
        let payload: Vec<u8> = (0..self.payload_len()).map(|i| i as u8).collect();
        self.build(&payload)
    }
}

fn push(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Write a DDS buffer to a temporary file.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_dds(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(".dds")
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write DDS data");
    f.flush().expect("flush");
    f
}

/// Write `data` as `dir/name`.
pub fn write_named(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("write file");
    path
}
