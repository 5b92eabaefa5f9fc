use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgba, RgbaImage};
use ndarray::{Array3, ArrayViewMut2, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::decode::decode_subresource;
use crate::error::{DdsViewError, Result};
use crate::inspector::params::Channel;
use crate::scratch::ScratchImage;

/// Inspection settings applied when shading on the CPU.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadeParams {
    pub channel: Channel,
    pub scale: f32,
    pub bias: f32,
}

impl Default for ShadeParams {
    fn default() -> Self {
        Self {
            channel: Channel::Rgba,
            scale: 1.0,
            bias: 0.0,
        }
    }
}

/// Same arithmetic as the viewer's pixel shaders.
pub fn shade_texel(texel: [f32; 4], params: &ShadeParams) -> [f32; 4] {
    let value = match params.channel {
        Channel::Rgba => texel,
        channel => {
            let v = texel[channel.index() as usize - 1];
            [v, v, v, 1.0]
        }
    };
    value.map(|c| c * params.scale + params.bias)
}

/// Shade an `(h, w, 4)` texel array in place.
pub fn shade(texels: &mut Array3<f32>, params: &ShadeParams) {
    let (h, w, _) = texels.dim();
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        texels
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .for_each(|row| shade_row(row, params));
    } else {
        texels
            .axis_iter_mut(Axis(0))
            .for_each(|row| shade_row(row, params));
    }
}

fn shade_row(mut row: ArrayViewMut2<f32>, params: &ShadeParams) {
    for mut px in row.axis_iter_mut(Axis(0)) {
        let out = shade_texel([px[0], px[1], px[2], px[3]], params);
        for (dst, src) in px.iter_mut().zip(out) {
            *dst = src;
        }
    }
}

/// Decode and shade the image the viewer would show for `slice` at `mip`.
///
/// `slice` is the depth slice of a volume or the array item otherwise.
pub fn render_slice(
    image: &ScratchImage,
    slice: u32,
    mip: u32,
    params: &ShadeParams,
) -> Result<Array3<f32>> {
    let meta = image.metadata();
    let (item, depth_slice) = if meta.is_volume() {
        let (_, _, depth) = meta.mip_extent(mip);
        if slice >= depth {
            return Err(DdsViewError::SubresourceOutOfRange {
                item: 0,
                mip: mip as usize,
                slice: slice as usize,
            });
        }
        (0, slice)
    } else {
        (slice, 0)
    };

    let sub = image.subresource(item, mip, depth_slice)?;
    let mut texels = decode_subresource(image, sub)?;
    shade(&mut texels, params);
    Ok(texels)
}

/// Save shaded pixels as 16-bit TIFF (`.tif`/`.tiff`) or 8-bit PNG,
/// clamped to `[0, 1]`.
pub fn save_rgba(pixels: &Array3<f32>, path: &Path) -> Result<()> {
    let (h, w, _) = pixels.dim();
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => {
            let data: Vec<u16> = pixels
                .iter()
                .map(|v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
                .collect();
            let img = ImageBuffer::<Rgba<u16>, Vec<u16>>::from_raw(w as u32, h as u32, data)
                .ok_or_else(|| DdsViewError::Decode("pixel buffer size mismatch".into()))?;
            img.save_with_format(path, ImageFormat::Tiff)?;
        }
        _ => {
            let data: Vec<u8> = pixels
                .iter()
                .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect();
            let img = RgbaImage::from_raw(w as u32, h as u32, data)
                .ok_or_else(|| DdsViewError::Decode("pixel buffer size mismatch".into()))?;
            img.save_with_format(path, ImageFormat::Png)?;
        }
    }
    tracing::info!("Saved {}x{} image to {}", w, h, path.display());
    Ok(())
}
