#[allow(dead_code)]
mod common;

use approx::assert_abs_diff_eq;
use common::{write_test_dds, DdsBuilder};
use ddsview_core::decode::{can_decode, decode_texels};
use ddsview_core::error::DdsViewError;
use ddsview_core::format::DxgiFormat;
use ddsview_core::inspector::Channel;
use ddsview_core::io::dds::DdsReader;
use ddsview_core::shading::{render_slice, save_rgba, shade, ShadeParams};
use tempfile::TempDir;

#[test]
fn test_rgba8_rows_honor_pitch() {
    // 2x2 image with 4 bytes of row padding
    let bytes = [
        255, 0, 0, 255, 0, 255, 0, 255, 9, 9, 9, 9, //
        0, 0, 255, 255, 0, 0, 0, 0,
    ];
    let px = decode_texels(DxgiFormat::R8G8B8A8_UNORM, 2, 2, 12, &bytes).unwrap();
    assert_eq!(px.dim(), (2, 2, 4));
    assert_eq!(px[[0, 1, 1]], 1.0);
    assert_eq!(px[[1, 0, 2]], 1.0);
    assert_eq!(px[[1, 1, 3]], 0.0);
}

#[test]
fn test_single_channel_formats_fill_red() {
    let px = decode_texels(DxgiFormat::R32_FLOAT, 1, 1, 4, &0.25f32.to_le_bytes()).unwrap();
    assert_eq!(px.as_slice().unwrap(), &[0.25, 0.0, 0.0, 1.0]);

    let px = decode_texels(DxgiFormat::R8_UINT, 1, 1, 1, &[51]).unwrap();
    assert_abs_diff_eq!(px[[0, 0, 0]], 0.2, epsilon = 1e-6);

    let px = decode_texels(DxgiFormat::R16_SNORM, 1, 1, 2, &i16::MIN.to_le_bytes()).unwrap();
    assert_eq!(px[[0, 0, 0]], -1.0);
}

#[test]
fn test_depth_stencil_splits_into_red_and_green() {
    let texel: u32 = (255 << 24) | 0xff_ffff;
    let px = decode_texels(DxgiFormat::D24_UNORM_S8_UINT, 1, 1, 4, &texel.to_le_bytes()).unwrap();
    assert_abs_diff_eq!(px[[0, 0, 0]], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(px[[0, 0, 1]], 1.0, epsilon = 1e-6);
}

#[test]
fn test_packed_16bit_formats() {
    // pure red in 5:6:5
    let px = decode_texels(DxgiFormat::B5G6R5_UNORM, 1, 1, 2, &0xf800u16.to_le_bytes()).unwrap();
    assert_eq!(px.as_slice().unwrap(), &[1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_short_buffer_is_decode_error() {
    let err = decode_texels(DxgiFormat::R8G8B8A8_UNORM, 4, 4, 16, &[0; 60]).unwrap_err();
    assert!(matches!(err, DdsViewError::Decode(_)));
}

#[test]
fn test_compressed_formats_are_not_decodable() {
    assert!(!can_decode(DxgiFormat::BC3_UNORM));
    let err = decode_texels(DxgiFormat::BC3_UNORM, 4, 4, 16, &[0; 16]).unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn test_large_images_decode_in_parallel_identically() {
    let (w, h) = (300, 300);
    let bytes: Vec<u8> = (0..w * h * 4).map(|i| (i % 251) as u8).collect();
    let px = decode_texels(DxgiFormat::R8G8B8A8_UNORM, w, h, w * 4, &bytes).unwrap();
    let i = (123 * w + 45) * 4 + 2;
    assert_abs_diff_eq!(px[[123, 45, 2]], (i % 251) as f32 / 255.0, epsilon = 1e-6);
}

#[test]
fn test_shade_matches_viewer_math() {
    let mut px = decode_texels(DxgiFormat::R8G8B8A8_UNORM, 1, 1, 4, &[0, 51, 102, 255]).unwrap();
    shade(
        &mut px,
        &ShadeParams {
            channel: Channel::G,
            scale: 2.0,
            bias: 0.1,
        },
    );
    for c in 0..3 {
        assert_abs_diff_eq!(px[[0, 0, c]], 0.5, epsilon = 1e-6);
    }
    assert_abs_diff_eq!(px[[0, 0, 3]], 2.1, epsilon = 1e-6);
}

#[test]
fn test_render_slice_of_array_and_volume() {
    let builder = DdsBuilder::tex2d(DxgiFormat::R8_UNORM, 2, 2).array(3);
    let file = write_test_dds(&builder.build_counting());
    let image = DdsReader::open(file.path()).unwrap().load().unwrap();
    // item 2 starts at byte 8
    let px = render_slice(&image, 2, 0, &ShadeParams::default()).unwrap();
    assert_abs_diff_eq!(px[[0, 0, 0]], 8.0 / 255.0, epsilon = 1e-6);

    let builder = DdsBuilder::tex3d(DxgiFormat::R8_UNORM, 2, 2, 2);
    let file = write_test_dds(&builder.build_counting());
    let image = DdsReader::open(file.path()).unwrap().load().unwrap();
    let px = render_slice(&image, 1, 0, &ShadeParams::default()).unwrap();
    assert_abs_diff_eq!(px[[0, 0, 0]], 4.0 / 255.0, epsilon = 1e-6);
    assert!(render_slice(&image, 2, 0, &ShadeParams::default()).is_err());
}

#[test]
fn test_save_png_and_tiff() {
    let dir = TempDir::new().unwrap();
    let builder = DdsBuilder::tex2d(DxgiFormat::R8G8B8A8_UNORM, 4, 2);
    let file = write_test_dds(&builder.build_counting());
    let image = DdsReader::open(file.path()).unwrap().load().unwrap();
    let px = render_slice(&image, 0, 0, &ShadeParams::default()).unwrap();

    for name in ["out.png", "out.tiff"] {
        let path = dir.path().join(name);
        save_rgba(&px, &path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (4, 2));
    }
}
