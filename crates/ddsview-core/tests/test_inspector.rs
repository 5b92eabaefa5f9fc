#[allow(dead_code)]
mod common;

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use common::{write_named, DdsBuilder};
use ddsview_core::config::ViewerConfig;
use ddsview_core::error::{DdsViewError, Result};
use ddsview_core::format::DxgiFormat;
use ddsview_core::inspector::{
    select_shader, Channel, Direction, DisplayMetrics, EventSink, Inspector, Key, Navigation,
    RenderBackend, ShaderVariant, Vertex,
};
use ddsview_core::scratch::ScratchImage;
use ddsview_core::texture::{TexDimension, TexMetadata, TEX_MISC_TEXTURECUBE};
use tempfile::TempDir;

/// Records what the controller asks of the GPU side.
#[derive(Default)]
struct MockBackend {
    unsupported: Vec<DxgiFormat>,
    installs: Vec<(TexMetadata, ShaderVariant, [Vertex; 4])>,
    prepared: Option<u32>,
    /// Width of the texture on screen.
    live: Option<u32>,
    commits: usize,
    fail_install: bool,
}

impl RenderBackend for MockBackend {
    fn supports_format(&self, format: DxgiFormat, _dimension: TexDimension) -> bool {
        !self.unsupported.contains(&format)
    }

    fn display_metrics(&self) -> DisplayMetrics {
        DisplayMetrics {
            screen: Some([1920, 1080]),
            remote_session: false,
        }
    }

    fn prepare(
        &mut self,
        image: &ScratchImage,
        metadata: &TexMetadata,
        variant: ShaderVariant,
        vertices: &[Vertex; 4],
    ) -> Result<()> {
        self.prepared = None;
        if self.fail_install {
            return Err(DdsViewError::Backend("exceeds device limit".into()));
        }
        assert_eq!(image.metadata().format, metadata.format);
        self.prepared = Some(metadata.width);
        self.installs.push((metadata.clone(), variant, *vertices));
        Ok(())
    }

    fn commit(&mut self) {
        if let Some(width) = self.prepared.take() {
            self.live = Some(width);
            self.commits += 1;
        }
    }
}

fn write(dir: &TempDir, name: &str, builder: DdsBuilder) -> PathBuf {
    write_named(dir.path(), name, &builder.build_counting())
}

fn rgba(w: u32, h: u32) -> DdsBuilder {
    DdsBuilder::tex2d(DxgiFormat::R8G8B8A8_UNORM, w, h)
}

fn depth(w: u32, h: u32) -> DdsBuilder {
    DdsBuilder::tex2d(DxgiFormat::R32_FLOAT, w, h)
}

fn open(path: &Path) -> (Inspector, MockBackend) {
    let mut inspector = Inspector::new(ViewerConfig::default());
    let mut backend = MockBackend::default();
    inspector.open(path, &mut backend).unwrap();
    (inspector, backend)
}

#[test]
fn test_first_load_enters_loaded_state() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.dds", rgba(256, 128));

    let mut inspector = Inspector::new(ViewerConfig::default());
    assert!(!inspector.state().is_loaded());

    let mut backend = MockBackend::default();
    inspector.open(&path, &mut backend).unwrap();

    let state = inspector.state();
    assert!(state.is_loaded());
    assert_eq!(state.view.channel, Channel::Rgba);
    assert!(!state.view.depth_mode);
    assert_eq!(state.title().as_deref(), Some("a.dds"));
    assert_eq!(inspector.window_size(), Some([640, 320]));
    assert_eq!(backend.installs.len(), 1);
    assert_eq!(backend.installs[0].1, ShaderVariant::Tex2D);
}

#[test]
fn test_depth_transitions_force_channel() {
    let dir = TempDir::new().unwrap();
    let color = write(&dir, "a.dds", rgba(8, 8));
    let depth_a = write(&dir, "b.dds", depth(8, 8));
    let depth_b = write(&dir, "c.dds", DdsBuilder::tex2d(DxgiFormat::R16_UNORM, 8, 8));

    let (mut inspector, mut backend) = open(&color);
    inspector.on_channel_selected(Channel::B);

    inspector.load_image(&depth_a, &mut backend).unwrap();
    assert!(inspector.state().view.depth_mode);
    assert_eq!(inspector.state().view.channel, Channel::R);

    // depth -> depth keeps the user's choice
    inspector.on_channel_selected(Channel::A);
    inspector.load_image(&depth_b, &mut backend).unwrap();
    assert_eq!(inspector.state().view.channel, Channel::A);

    inspector.load_image(&color, &mut backend).unwrap();
    assert!(!inspector.state().view.depth_mode);
    assert_eq!(inspector.state().view.channel, Channel::Rgba);
}

#[test]
fn test_page_down_clamps_to_last_file() {
    let dir = TempDir::new().unwrap();
    let _a = write(&dir, "a.dds", rgba(4, 4));
    let b = write(&dir, "b.dds", rgba(4, 4));
    let c = write(&dir, "c.dds", rgba(4, 4));

    let (mut inspector, mut backend) = open(&b);
    assert_eq!(inspector.images().index(), 1);

    let loaded = inspector
        .navigate(Navigation::PageDown, &mut backend)
        .unwrap();
    assert!(loaded);
    assert_eq!(inspector.images().index(), 2);
    assert_eq!(inspector.state().image.as_ref().unwrap().path, c);
}

#[test]
fn test_navigation_at_edges_does_not_reload() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.dds", rgba(4, 4));
    write(&dir, "b.dds", rgba(4, 4));

    let (mut inspector, mut backend) = open(&a);
    for nav in [Navigation::Up, Navigation::PageUp, Navigation::Home] {
        assert!(!inspector.navigate(nav, &mut backend).unwrap());
    }
    assert_eq!(backend.installs.len(), 1);

    assert!(inspector.navigate(Navigation::End, &mut backend).unwrap());
    assert_eq!(inspector.images().index(), 1);
    assert!(!inspector.navigate(Navigation::Down, &mut backend).unwrap());
    assert_eq!(backend.installs.len(), 2);
}

#[test]
fn test_volume_array_is_rejected_before_any_gpu_work() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "vol.dds",
        DdsBuilder::tex3d(DxgiFormat::R8G8B8A8_UNORM, 4, 4, 4).array(2),
    );

    let mut inspector = Inspector::new(ViewerConfig::default());
    let mut backend = MockBackend::default();
    let err = inspector.open(&path, &mut backend).unwrap_err();

    assert!(err.is_unsupported(), "{err}");
    assert!(err.to_string().contains("vol.dds"));
    assert!(backend.installs.is_empty());
    assert_eq!(backend.commits, 0);
    assert!(!inspector.state().is_loaded());
}

#[test]
fn test_failed_load_keeps_previous_state() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.dds", rgba(4, 4).array(3));
    let broken = write_named(dir.path(), "b.dds", b"not a dds file at all");

    let (mut inspector, mut backend) = open(&a);
    inspector.adjust_scale(Direction::Forward);
    inspector.step_slice(Direction::Forward);
    let before = inspector.state().view.clone();

    let err = inspector.load_image(&broken, &mut backend).unwrap_err();
    assert!(matches!(err, DdsViewError::InvalidDds(_)));
    assert_eq!(inspector.state().view, before);
    assert_eq!(inspector.state().image.as_ref().unwrap().path, a);
    assert_eq!(backend.installs.len(), 1);
}

#[test]
fn test_cursor_moves_past_a_broken_file() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.dds", rgba(4, 4));
    write_named(dir.path(), "b.dds", b"broken");
    let c = write(&dir, "c.dds", rgba(4, 4));

    let (mut inspector, mut backend) = open(&a);
    assert!(inspector.navigate(Navigation::Down, &mut backend).is_err());
    assert_eq!(inspector.images().index(), 1);
    assert_eq!(inspector.state().image.as_ref().unwrap().path, a);

    assert!(inspector.navigate(Navigation::Down, &mut backend).unwrap());
    assert_eq!(inspector.state().image.as_ref().unwrap().path, c);
}

#[test]
fn test_unsupported_by_backend() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bc7.dds", DdsBuilder::tex2d(DxgiFormat::BC7_UNORM, 8, 8));

    let mut inspector = Inspector::new(ViewerConfig::default());
    let mut backend = MockBackend {
        unsupported: vec![DxgiFormat::BC7_UNORM],
        ..MockBackend::default()
    };
    let err = inspector.load_image(&path, &mut backend).unwrap_err();
    assert!(err.is_unsupported());
    assert!(err.to_string().contains("98"));
    assert!(backend.installs.is_empty());
}

#[test]
fn test_install_failure_is_not_committed() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.dds", rgba(4, 4));

    let mut inspector = Inspector::new(ViewerConfig::default());
    let mut backend = MockBackend {
        fail_install: true,
        ..MockBackend::default()
    };
    assert!(inspector.load_image(&path, &mut backend).is_err());
    assert!(!inspector.state().is_loaded());
    assert_eq!(backend.live, None);
}

#[test]
fn test_install_failure_keeps_previous_image_on_screen() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.dds", rgba(4, 4));
    let b = write(&dir, "b.dds", rgba(8, 8));

    let (mut inspector, mut backend) = open(&a);
    backend.fail_install = true;

    let err = inspector.load_image(&b, &mut backend).unwrap_err();
    assert!(matches!(err, DdsViewError::Backend(_)));
    assert_eq!(backend.live, Some(4));
    assert_eq!(backend.commits, 1);
    assert_eq!(inspector.state().image.as_ref().unwrap().path, a);
    assert_eq!(inspector.window_size(), Some([480, 480]));

    backend.fail_install = false;
    inspector.load_image(&b, &mut backend).unwrap();
    assert_eq!(backend.live, Some(8));
}

#[test]
fn test_each_load_replaces_the_displayed_resource() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.dds", rgba(4, 4));
    let b = write(&dir, "b.dds", rgba(8, 8));

    let (mut inspector, mut backend) = open(&a);
    inspector.load_image(&b, &mut backend).unwrap();
    assert_eq!(backend.live, Some(8));
    inspector.load_image(&a, &mut backend).unwrap();

    assert_eq!(backend.installs.len(), 3);
    assert_eq!(backend.commits, 3);
    assert_eq!(backend.live, Some(4));
    assert_eq!(backend.prepared, None);
}

#[test]
fn test_reopening_the_same_file_reports_a_load() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.dds", rgba(4, 4));
    write(&dir, "b.dds", rgba(4, 4));

    let (mut inspector, mut backend) = open(&a);
    inspector.open(&a, &mut backend).unwrap();
    assert_eq!(backend.commits, 2);

    assert!(inspector
        .on_key(Key::Navigate(Navigation::Down), &mut backend)
        .unwrap());
    assert!(!inspector
        .on_key(Key::Navigate(Navigation::Down), &mut backend)
        .unwrap());
    assert!(!inspector.on_key(Key::ScaleUp, &mut backend).unwrap());
}

#[test]
fn test_reset_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "d.dds", depth(4, 4).array(4));

    let (mut inspector, _backend) = open(&path);
    inspector.adjust_scale(Direction::Forward);
    inspector.adjust_bias(Direction::Backward);
    inspector.step_slice(Direction::Forward);
    inspector.on_channel_selected(Channel::G);

    inspector.reset();
    let once = inspector.state().view.clone();
    inspector.reset();
    assert_eq!(inspector.state().view, once);

    assert_eq!(once.slice_index, 0.0);
    assert_eq!(once.scale, 1.0);
    assert_eq!(once.bias, 0.0);
    assert_eq!(once.channel, Channel::R);
}

#[test]
fn test_scale_and_bias_steps() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.dds", rgba(4, 4));
    let (mut inspector, mut backend) = open(&path);

    for _ in 0..3 {
        inspector.on_key(Key::ScaleUp, &mut backend).unwrap();
    }
    assert_relative_eq!(inspector.state().view.scale, 8.0);

    inspector.on_key(Key::ScaleDown, &mut backend).unwrap();
    assert_relative_eq!(inspector.state().view.scale, 4.0);

    inspector.on_key(Key::BiasUp, &mut backend).unwrap();
    inspector.on_key(Key::BiasUp, &mut backend).unwrap();
    inspector.on_key(Key::BiasDown, &mut backend).unwrap();
    assert_relative_eq!(inspector.state().view.bias, 0.05, epsilon = 1e-6);

    let params = inspector.frame_params();
    assert_relative_eq!(params.scale, 4.0);
    assert_eq!(params.normalized, 0);
}

#[test]
fn test_channel_cycling_is_clamped() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.dds", rgba(4, 4));
    let (mut inspector, mut backend) = open(&path);

    inspector.on_key(Key::ChannelPrev, &mut backend).unwrap();
    assert_eq!(inspector.state().view.channel, Channel::Rgba);

    for _ in 0..10 {
        inspector.on_key(Key::ChannelNext, &mut backend).unwrap();
    }
    assert_eq!(inspector.state().view.channel, Channel::A);
    assert_eq!(inspector.frame_params().channel, 4);
}

#[test]
fn test_slice_steps_stay_in_range() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "arr.dds", rgba(4, 4).array(3));
    let (mut inspector, mut backend) = open(&path);

    inspector.on_key(Key::SliceLeft, &mut backend).unwrap();
    assert_eq!(inspector.state().view.slice_index, 0.0);
    for _ in 0..5 {
        inspector.on_key(Key::SliceRight, &mut backend).unwrap();
    }
    assert_eq!(inspector.state().view.slice_index, 2.0);
    assert_eq!(backend.installs.len(), 1);
}

#[test]
fn test_out_of_range_slice_is_reset_on_load() {
    let dir = TempDir::new().unwrap();
    let deep = write(&dir, "a.dds", DdsBuilder::tex3d(DxgiFormat::R8G8B8A8_UNORM, 4, 4, 4));
    let shallow = write(&dir, "b.dds", rgba(4, 4).array(2));
    let deeper = write(&dir, "c.dds", rgba(4, 4).array(8));

    let (mut inspector, mut backend) = open(&deep);
    inspector.step_slice(Direction::Forward);
    inspector.step_slice(Direction::Forward);
    inspector.step_slice(Direction::Forward);
    assert_eq!(inspector.state().view.slice_index, 3.0);

    inspector.load_image(&shallow, &mut backend).unwrap();
    assert_eq!(inspector.state().view.slice_index, 0.0);

    inspector.step_slice(Direction::Forward);
    inspector.load_image(&deeper, &mut backend).unwrap();
    assert_eq!(inspector.state().view.slice_index, 1.0);
}

#[test]
fn test_cube_maps_render_as_arrays() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "cube.dds", rgba(4, 4).cube());
    let (inspector, backend) = open(&path);

    let (meta, variant, _) = &backend.installs[0];
    assert!(!meta.is_cubemap());
    assert_eq!(meta.array_size, 6);
    assert_eq!(*variant, ShaderVariant::Tex2DArray);
    assert_eq!(inspector.state().max_slices(), 6);
}

#[test]
fn test_stencil_mode_switches_shader_on_green() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "ds.dds", DdsBuilder::tex2d(DxgiFormat::D24_UNORM_S8_UINT, 4, 4));
    let (mut inspector, _backend) = open(&path);

    assert!(inspector.state().view.stencil_mode);
    assert_eq!(inspector.active_variant(), Some(ShaderVariant::Tex2D));

    inspector.on_channel_selected(Channel::G);
    assert_eq!(inspector.active_variant(), Some(ShaderVariant::Stencil));
}

#[test]
fn test_one_d_texture_gets_strip_quad() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "line.dds", DdsBuilder::tex1d(DxgiFormat::R8G8B8A8_UNORM, 64));
    let (inspector, backend) = open(&path);

    let (_, variant, quad) = &backend.installs[0];
    assert_eq!(*variant, ShaderVariant::Tex1D);

    let [win_w, win_h] = inspector.window_size().unwrap();
    let cell_height = 64.0 * win_h as f32 / win_w as f32;
    assert_relative_eq!(quad[0].pos[1], 1.0 / cell_height);
    assert_relative_eq!(quad[2].pos[1], -1.0 / cell_height);
    assert_eq!(quad[2].tex[1], 0.0);
}

#[test]
fn test_strip_quad_follows_painted_viewport() {
    let dir = TempDir::new().unwrap();
    let line = write(&dir, "line.dds", DdsBuilder::tex1d(DxgiFormat::R8G8B8A8_UNORM, 64));
    let flat = write(&dir, "flat.dds", rgba(64, 32));

    let (mut inspector, mut backend) = open(&line);
    let [win_w, _] = inspector.window_size().unwrap();

    // Menu, controls and status bars take height from the window.
    let panel = [win_w, 180];
    let quad = inspector.state().quad(panel).unwrap();
    let cell_height = 64.0 * 180.0 / win_w as f32;
    assert_relative_eq!(quad[0].pos[1], 1.0 / cell_height);
    assert_relative_eq!(quad[3].pos[1], -1.0 / cell_height);
    assert_ne!(quad, backend.installs[0].2);

    inspector.load_image(&flat, &mut backend).unwrap();
    let quad = inspector.state().quad(panel).unwrap();
    assert_eq!(quad[0].pos[1], 1.0);
    assert_eq!(quad[3].tex[..2], [1.0, 1.0]);
}

#[test]
fn test_info_lines_for_arrays() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "arr.dds", rgba(16, 8).array(4));
    let (mut inspector, mut backend) = open(&path);
    inspector.on_key(Key::SliceRight, &mut backend).unwrap();

    let lines = inspector.state().info_lines();
    assert_eq!(
        lines,
        [
            "Scale(A/S)= 1.000, Bias(Q/W)= 0.000",
            "R8G8B8A8_UNORM",
            "16 X 8 X 4",
            "[#1 of 4] Press LEFT|RIGHT",
        ]
    );
}

#[test]
fn test_toggle_info() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.dds", rgba(4, 4));
    let (mut inspector, mut backend) = open(&path);

    assert!(inspector.state().show_info);
    inspector.on_key(Key::ToggleInfo, &mut backend).unwrap();
    assert!(!inspector.state().show_info);
    inspector.on_show_info(true);
    assert!(inspector.state().show_info);
}

fn meta(dimension: TexDimension, array_size: u32, misc_flags: u32, format: DxgiFormat) -> TexMetadata {
    TexMetadata {
        width: 4,
        height: if dimension == TexDimension::Texture1D { 1 } else { 4 },
        depth: if dimension == TexDimension::Texture3D { 4 } else { 1 },
        array_size,
        mip_levels: 1,
        misc_flags,
        format,
        dimension,
    }
}

#[test]
fn test_shader_selection_priority() {
    let rgba8 = DxgiFormat::R8G8B8A8_UNORM;
    let r8u = DxgiFormat::R8_UINT;
    let cube = TEX_MISC_TEXTURECUBE;
    let cases = [
        (meta(TexDimension::Texture1D, 1, 0, rgba8), ShaderVariant::Tex1D),
        (meta(TexDimension::Texture1D, 2, 0, rgba8), ShaderVariant::Tex1DArray),
        (meta(TexDimension::Texture2D, 6, cube, r8u), ShaderVariant::Tex2DR8Uint),
        (meta(TexDimension::Texture2D, 6, cube, rgba8), ShaderVariant::Cube),
        (meta(TexDimension::Texture2D, 2, 0, rgba8), ShaderVariant::Tex2DArray),
        (meta(TexDimension::Texture2D, 1, 0, rgba8), ShaderVariant::Tex2D),
        (meta(TexDimension::Texture3D, 1, 0, rgba8), ShaderVariant::Tex3D),
    ];
    for (m, expected) in cases {
        assert_eq!(select_shader(&m, m.format), expected, "{m:?}");
    }
}
