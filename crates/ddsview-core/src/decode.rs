//! CPU decoding of uncompressed DXGI texels to RGBA `f32`.
//!
//! Values come out the way a shader would sample them: UNORM in `[0, 1]`,
//! SNORM in `[-1, 1]`, floats unchanged, missing channels as `(0, 0, 0, 1)`.
//! `R8_UINT` is divided by 255. Depth-stencil formats put depth in R and the
//! stencil value (divided by 255) in G. sRGB formats are returned without
//! linearization.

use byteorder::{ByteOrder, LittleEndian};
use ndarray::Array3;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{DdsViewError, Result};
use crate::format::DxgiFormat;
use crate::scratch::{ScratchImage, Subresource};

type TexelFn = fn(&[u8]) -> [f32; 4];

/// Bytes per texel and decoder for `format`, if it can be decoded.
fn texel_decoder(format: DxgiFormat) -> Option<(usize, TexelFn)> {
    let decoder: (usize, TexelFn) = match format {
        DxgiFormat::R32G32B32A32_FLOAT => (16, |b| {
            [f32_at(b, 0), f32_at(b, 4), f32_at(b, 8), f32_at(b, 12)]
        }),
        DxgiFormat::R32G32B32_FLOAT => (12, |b| [f32_at(b, 0), f32_at(b, 4), f32_at(b, 8), 1.0]),
        DxgiFormat::R16G16B16A16_FLOAT => (8, |b| {
            [f16_at(b, 0), f16_at(b, 2), f16_at(b, 4), f16_at(b, 6)]
        }),
        DxgiFormat::R16G16B16A16_UNORM => (8, |b| {
            [unorm16_at(b, 0), unorm16_at(b, 2), unorm16_at(b, 4), unorm16_at(b, 6)]
        }),
        DxgiFormat::R16G16B16A16_SNORM => (8, |b| {
            [snorm16_at(b, 0), snorm16_at(b, 2), snorm16_at(b, 4), snorm16_at(b, 6)]
        }),
        DxgiFormat::R32G32_FLOAT => (8, |b| [f32_at(b, 0), f32_at(b, 4), 0.0, 1.0]),
        DxgiFormat::R10G10B10A2_UNORM => (4, |b| {
            let v = LittleEndian::read_u32(b);
            [
                (v & 0x3ff) as f32 / 1023.0,
                ((v >> 10) & 0x3ff) as f32 / 1023.0,
                ((v >> 20) & 0x3ff) as f32 / 1023.0,
                (v >> 30) as f32 / 3.0,
            ]
        }),
        DxgiFormat::R11G11B10_FLOAT => (4, |b| {
            let v = LittleEndian::read_u32(b);
            [
                small_float(v & 0x7ff, 6),
                small_float((v >> 11) & 0x7ff, 6),
                small_float(v >> 22, 5),
                1.0,
            ]
        }),
        DxgiFormat::R8G8B8A8_UNORM | DxgiFormat::R8G8B8A8_UNORM_SRGB => (4, |b| {
            [unorm8(b[0]), unorm8(b[1]), unorm8(b[2]), unorm8(b[3])]
        }),
        DxgiFormat::R8G8B8A8_SNORM => (4, |b| {
            [snorm8(b[0]), snorm8(b[1]), snorm8(b[2]), snorm8(b[3])]
        }),
        DxgiFormat::R16G16_FLOAT => (4, |b| [f16_at(b, 0), f16_at(b, 2), 0.0, 1.0]),
        DxgiFormat::R16G16_UNORM => (4, |b| [unorm16_at(b, 0), unorm16_at(b, 2), 0.0, 1.0]),
        DxgiFormat::R16G16_SNORM => (4, |b| [snorm16_at(b, 0), snorm16_at(b, 2), 0.0, 1.0]),
        DxgiFormat::D32_FLOAT | DxgiFormat::R32_FLOAT => (4, |b| [f32_at(b, 0), 0.0, 0.0, 1.0]),
        DxgiFormat::D24_UNORM_S8_UINT
        | DxgiFormat::R24G8_TYPELESS
        | DxgiFormat::R24_UNORM_X8_TYPELESS
        | DxgiFormat::X24_TYPELESS_G8_UINT => (4, |b| {
            let v = LittleEndian::read_u32(b);
            [
                (v & 0xff_ffff) as f32 / 16_777_215.0,
                unorm8((v >> 24) as u8),
                0.0,
                1.0,
            ]
        }),
        DxgiFormat::D32_FLOAT_S8X24_UINT
        | DxgiFormat::R32G8X24_TYPELESS
        | DxgiFormat::R32_FLOAT_X8X24_TYPELESS
        | DxgiFormat::X32_TYPELESS_G8X24_UINT => (8, |b| [f32_at(b, 0), unorm8(b[4]), 0.0, 1.0]),
        DxgiFormat::R8G8_UNORM => (2, |b| [unorm8(b[0]), unorm8(b[1]), 0.0, 1.0]),
        DxgiFormat::R8G8_SNORM => (2, |b| [snorm8(b[0]), snorm8(b[1]), 0.0, 1.0]),
        DxgiFormat::R16_FLOAT => (2, |b| [f16_at(b, 0), 0.0, 0.0, 1.0]),
        DxgiFormat::D16_UNORM | DxgiFormat::R16_UNORM => (2, |b| [unorm16_at(b, 0), 0.0, 0.0, 1.0]),
        DxgiFormat::R16_SNORM => (2, |b| [snorm16_at(b, 0), 0.0, 0.0, 1.0]),
        DxgiFormat::R8_UNORM | DxgiFormat::R8_UINT => (1, |b| [unorm8(b[0]), 0.0, 0.0, 1.0]),
        DxgiFormat::R8_SNORM => (1, |b| [snorm8(b[0]), 0.0, 0.0, 1.0]),
        DxgiFormat::A8_UNORM => (1, |b| [0.0, 0.0, 0.0, unorm8(b[0])]),
        DxgiFormat::R9G9B9E5_SHAREDEXP => (4, |b| {
            let v = LittleEndian::read_u32(b);
            let scale = 2f32.powi((v >> 27) as i32 - 15 - 9);
            [
                (v & 0x1ff) as f32 * scale,
                ((v >> 9) & 0x1ff) as f32 * scale,
                ((v >> 18) & 0x1ff) as f32 * scale,
                1.0,
            ]
        }),
        DxgiFormat::B5G6R5_UNORM => (2, |b| {
            let v = LittleEndian::read_u16(b);
            [
                (v >> 11) as f32 / 31.0,
                ((v >> 5) & 0x3f) as f32 / 63.0,
                (v & 0x1f) as f32 / 31.0,
                1.0,
            ]
        }),
        DxgiFormat::B5G5R5A1_UNORM => (2, |b| {
            let v = LittleEndian::read_u16(b);
            [
                ((v >> 10) & 0x1f) as f32 / 31.0,
                ((v >> 5) & 0x1f) as f32 / 31.0,
                (v & 0x1f) as f32 / 31.0,
                (v >> 15) as f32,
            ]
        }),
        DxgiFormat::B8G8R8A8_UNORM | DxgiFormat::B8G8R8A8_UNORM_SRGB => (4, |b| {
            [unorm8(b[2]), unorm8(b[1]), unorm8(b[0]), unorm8(b[3])]
        }),
        DxgiFormat::B8G8R8X8_UNORM | DxgiFormat::B8G8R8X8_UNORM_SRGB => (4, |b| {
            [unorm8(b[2]), unorm8(b[1]), unorm8(b[0]), 1.0]
        }),
        DxgiFormat::B4G4R4A4_UNORM => (2, |b| {
            let v = LittleEndian::read_u16(b);
            [
                ((v >> 8) & 0xf) as f32 / 15.0,
                ((v >> 4) & 0xf) as f32 / 15.0,
                (v & 0xf) as f32 / 15.0,
                (v >> 12) as f32 / 15.0,
            ]
        }),
        _ => return None,
    };
    Some(decoder)
}

/// Whether texels of `format` can be decoded on the CPU.
pub fn can_decode(format: DxgiFormat) -> bool {
    texel_decoder(format).is_some()
}

/// Decode one 2D image into an `(height, width, 4)` array.
pub fn decode_texels(
    format: DxgiFormat,
    width: usize,
    height: usize,
    row_pitch: usize,
    bytes: &[u8],
) -> Result<Array3<f32>> {
    let (texel_bytes, decode) = texel_decoder(format).ok_or_else(|| {
        DdsViewError::UnsupportedFormat(format!("no CPU decoder for DXGI format {format}"))
    })?;

    let needed = row_pitch * height.saturating_sub(1) + texel_bytes * width;
    if bytes.len() < needed || row_pitch < texel_bytes * width {
        return Err(DdsViewError::Decode(format!(
            "{width}x{height} {format} image needs {needed} bytes, got {}",
            bytes.len()
        )));
    }

    let decode_row = |row: usize| -> Vec<f32> {
        let start = row * row_pitch;
        bytes[start..start + texel_bytes * width]
            .chunks_exact(texel_bytes)
            .flat_map(decode)
            .collect()
    };

    let rows: Vec<Vec<f32>> = if width * height >= PARALLEL_PIXEL_THRESHOLD {
        (0..height).into_par_iter().map(decode_row).collect()
    } else {
        (0..height).map(decode_row).collect()
    };

    Array3::from_shape_vec((height, width, 4), rows.concat())
        .map_err(|e| DdsViewError::Decode(e.to_string()))
}

/// Decode one subresource of a loaded image.
pub fn decode_subresource(image: &ScratchImage, sub: &Subresource) -> Result<Array3<f32>> {
    let bytes = image.image(sub.item, sub.mip, sub.slice)?;
    decode_texels(
        image.metadata().format,
        sub.width as usize,
        sub.height as usize,
        sub.row_pitch,
        bytes,
    )
}

fn f32_at(b: &[u8], offset: usize) -> f32 {
    LittleEndian::read_f32(&b[offset..])
}

fn f16_at(b: &[u8], offset: usize) -> f32 {
    f16_to_f32(LittleEndian::read_u16(&b[offset..]))
}

fn unorm16_at(b: &[u8], offset: usize) -> f32 {
    LittleEndian::read_u16(&b[offset..]) as f32 / 65535.0
}

fn snorm16_at(b: &[u8], offset: usize) -> f32 {
    (LittleEndian::read_i16(&b[offset..]) as f32 / 32767.0).max(-1.0)
}

fn unorm8(v: u8) -> f32 {
    v as f32 / 255.0
}

fn snorm8(v: u8) -> f32 {
    (v as i8 as f32 / 127.0).max(-1.0)
}

/// IEEE 754 half to single precision.
pub fn f16_to_f32(bits: u16) -> f32 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = ((bits >> 10) & 0x1f) as i32;
    let mantissa = (bits & 0x3ff) as f32;
    match exponent {
        0 => sign * mantissa * 2f32.powi(-24),
        0x1f if mantissa == 0.0 => sign * f32::INFINITY,
        0x1f => f32::NAN,
        _ => sign * (1.0 + mantissa / 1024.0) * 2f32.powi(exponent - 15),
    }
}

/// Unsigned float with a 5-bit exponent and `mantissa_bits` of mantissa.
fn small_float(bits: u32, mantissa_bits: u32) -> f32 {
    let exponent = (bits >> mantissa_bits) as i32;
    let mantissa = (bits & ((1 << mantissa_bits) - 1)) as f32;
    let one = (1u32 << mantissa_bits) as f32;
    match exponent {
        0 => mantissa / one * 2f32.powi(-14),
        0x1f if mantissa == 0.0 => f32::INFINITY,
        0x1f => f32::NAN,
        _ => (1.0 + mantissa / one) * 2f32.powi(exponent - 15),
    }
}
