use std::path::PathBuf;

use crate::config::AdjustConfig;
use crate::consts::{DEFAULT_BIAS, DEFAULT_SCALE, DEFAULT_SLICE_INDEX};
use crate::format::DxgiFormat;
use crate::inspector::layout::{quad_vertices, Vertex};
use crate::inspector::params::{Channel, Direction, RenderParams, ViewParameters};
use crate::inspector::shader::ShaderVariant;
use crate::texture::TexMetadata;

/// The image currently on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedImage {
    pub path: PathBuf,
    /// Metadata with the cube flag removed.
    pub metadata: TexMetadata,
    /// Format as read from the file.
    pub source_format: DxgiFormat,
    pub max_slices: u32,
    pub variant: ShaderVariant,
}

/// Everything the inspector knows between frames.
#[derive(Clone, Debug, Default)]
pub struct InspectorState {
    pub view: ViewParameters,
    pub show_info: bool,
    pub image: Option<LoadedImage>,
}

impl InspectorState {
    pub fn new() -> Self {
        Self {
            show_info: true,
            ..Self::default()
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn max_slices(&self) -> u32 {
        self.image.as_ref().map_or(1, |img| img.max_slices)
    }

    pub fn cycle_channel(&mut self, direction: Direction) {
        self.view.channel = self.view.channel.offset(direction.sign());
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.view.channel = channel;
    }

    /// Move one slice, staying in `[0, max_slices-1]`.
    pub fn step_slice(&mut self, direction: Direction) {
        let last = self.max_slices().saturating_sub(1) as f32;
        let next = self.view.slice_index + direction.sign() as f32;
        if (0.0..=last).contains(&next) {
            self.view.slice_index = next;
        }
    }

    pub fn adjust_scale(&mut self, direction: Direction, adjust: &AdjustConfig) {
        match direction {
            Direction::Forward => self.view.scale *= adjust.scale_factor,
            Direction::Backward => self.view.scale /= adjust.scale_factor,
        }
    }

    pub fn adjust_bias(&mut self, direction: Direction, adjust: &AdjustConfig) {
        self.view.bias += direction.sign() as f32 * adjust.bias_step;
    }

    pub fn reset(&mut self) {
        self.view.slice_index = DEFAULT_SLICE_INDEX;
        self.view.bias = DEFAULT_BIAS;
        self.view.scale = DEFAULT_SCALE;
        self.view.channel = self.default_channel();
    }

    fn default_channel(&self) -> Channel {
        if self.view.depth_mode {
            Channel::R
        } else {
            Channel::Rgba
        }
    }

    /// Adopt a freshly installed image.
    pub fn commit_load(&mut self, image: LoadedImage, window_size: [u32; 2]) {
        let depth_mode = image.source_format.is_single_channel();
        if depth_mode && !self.view.depth_mode {
            self.view.channel = Channel::R;
        } else if !depth_mode && self.view.depth_mode {
            self.view.channel = Channel::Rgba;
        }
        self.view.depth_mode = depth_mode;
        self.view.stencil_mode = image.source_format.has_stencil();

        if self.view.slice_index > image.max_slices.saturating_sub(1) as f32 {
            self.view.slice_index = DEFAULT_SLICE_INDEX;
        }

        self.view.viewport_width = window_size[0] as f32;
        self.view.viewport_height = window_size[1] as f32;
        self.image = Some(image);
    }

    pub fn render_params(&self) -> RenderParams {
        RenderParams::from_view(&self.view)
    }

    /// Shader for this frame; the stencil program replaces the main one while
    /// the G channel of a depth-stencil texture is selected.
    pub fn active_variant(&self) -> Option<ShaderVariant> {
        let image = self.image.as_ref()?;
        if self.view.stencil_mode && self.view.channel == Channel::G {
            Some(ShaderVariant::Stencil)
        } else {
            Some(image.variant)
        }
    }

    /// Quad for the loaded image drawn into a `viewport` of physical pixels.
    pub fn quad(&self, viewport: [u32; 2]) -> Option<[Vertex; 4]> {
        let image = self.image.as_ref()?;
        Some(quad_vertices(
            image.variant.is_1d(),
            image.metadata.width,
            viewport,
        ))
    }

    /// Overlay lines shown while the info toggle is on.
    pub fn info_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Scale(A/S)= {:.3}, Bias(Q/W)= {:.3}",
            self.view.scale, self.view.bias
        )];

        if let Some(image) = &self.image {
            let meta = &image.metadata;
            lines.push(meta.format.to_string());
            if image.max_slices == 1 {
                lines.push(format!("{} X {}", meta.width, meta.height));
            } else {
                lines.push(format!(
                    "{} X {} X {}",
                    meta.width, meta.height, image.max_slices
                ));
                lines.push(format!(
                    "[#{} of {}] Press LEFT|RIGHT",
                    self.view.slice_index as u32, image.max_slices
                ));
            }
        }

        lines
    }

    /// Window title: the file name of the loaded image.
    pub fn title(&self) -> Option<String> {
        let image = self.image.as_ref()?;
        image
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}
