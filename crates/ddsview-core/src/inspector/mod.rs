//! The inspector state controller.
//!
//! [`Inspector`] owns the view parameters and the directory listing. Hosts
//! feed it input through [`EventSink`] and hand it a [`RenderBackend`] that
//! owns the GPU side of the loaded image. A load either completes and is
//! committed, or fails and leaves the state untouched.

pub mod layout;
pub mod params;
pub mod shader;
pub mod state;

use std::path::Path;

use crate::config::ViewerConfig;
use crate::error::{DdsViewError, Result};
use crate::format::DxgiFormat;
use crate::io::dds::DdsReader;
use crate::io::image_set::ImageSet;
use crate::scratch::ScratchImage;
use crate::texture::{TexDimension, TexMetadata};

pub use layout::{quad_vertices, suggest_window_size, DisplayMetrics, Vertex};
pub use params::{Channel, Direction, Key, Navigation, RenderParams, ViewParameters};
pub use shader::{select_shader, ShaderVariant};
pub use state::{InspectorState, LoadedImage};

/// GPU side of the viewer: displays at most one image resource at a time.
///
/// Loading is two-phase. [`prepare`](Self::prepare) does all fallible work
/// off to the side, and [`commit`](Self::commit) swaps the result in.
pub trait RenderBackend {
    /// Whether textures of `format` with `dimension` can be sampled.
    fn supports_format(&self, format: DxgiFormat, dimension: TexDimension) -> bool;

    fn display_metrics(&self) -> DisplayMetrics;

    /// Build the image resource and quad for a loaded texture. The displayed
    /// resource is not touched; on error nothing is kept.
    fn prepare(
        &mut self,
        image: &ScratchImage,
        metadata: &TexMetadata,
        variant: ShaderVariant,
        vertices: &[Vertex; 4],
    ) -> Result<()>;

    /// Release the displayed resource and show the prepared one instead.
    fn commit(&mut self);
}

/// Input entry points called by the host loop.
pub trait EventSink {
    /// Apply a key press. Returns whether a new image was loaded.
    fn on_key(&mut self, key: Key, backend: &mut dyn RenderBackend) -> Result<bool>;

    /// The channel slider moved.
    fn on_channel_selected(&mut self, channel: Channel);

    /// The "Show info" checkbox changed.
    fn on_show_info(&mut self, show: bool);

    /// Constants for the frame about to be drawn.
    fn frame_params(&self) -> RenderParams;
}

pub struct Inspector {
    state: InspectorState,
    images: ImageSet,
    config: ViewerConfig,
}

impl Inspector {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            state: InspectorState::new(),
            images: ImageSet::default(),
            config,
        }
    }

    pub fn state(&self) -> &InspectorState {
        &self.state
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Suggested window size of the loaded image.
    pub fn window_size(&self) -> Option<[u32; 2]> {
        self.state.image.as_ref()?;
        Some([
            self.state.view.viewport_width as u32,
            self.state.view.viewport_height as u32,
        ])
    }

    /// Load `path` and list its directory for navigation.
    pub fn open(&mut self, path: &Path, backend: &mut dyn RenderBackend) -> Result<()> {
        self.load_image(path, backend)?;
        self.images = match ImageSet::scan(path, &self.config.files) {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!("Cannot list directory of {}: {e}", path.display());
                ImageSet::from_paths(vec![path.to_path_buf()], 0)
            }
        };
        Ok(())
    }

    /// Replace the displayed image with `path`.
    pub fn load_image(&mut self, path: &Path, backend: &mut dyn RenderBackend) -> Result<()> {
        let reader = DdsReader::open(path)?;
        let mut metadata = reader.metadata().clone();
        let source_format = metadata.format;

        if metadata.is_volume() && metadata.array_size > 1 {
            return Err(DdsViewError::UnsupportedFormat(format!(
                "arrays of volume textures are not supported (array size {})",
                metadata.array_size
            ))
            .with_path(path));
        }
        let max_slices = metadata.max_slices();

        if !backend.supports_format(metadata.format, metadata.dimension) {
            return Err(DdsViewError::UnsupportedFormat(format!(
                "DXGI format {} ({}) cannot be displayed as a {} texture",
                metadata.format.0, metadata.format, metadata.dimension
            ))
            .with_path(path));
        }

        metadata.normalize_cube();

        let window_size = suggest_window_size(
            metadata.width,
            metadata.height,
            &backend.display_metrics(),
            &self.config.window,
        );

        let scratch = reader.load()?;
        let variant = select_shader(&metadata, source_format);
        let vertices = quad_vertices(variant.is_1d(), metadata.width, window_size);

        backend.prepare(&scratch, &metadata, variant, &vertices)?;
        backend.commit();

        tracing::info!(
            "Loaded {} ({} {}x{}, {} slices, {} shader)",
            path.display(),
            metadata.format,
            metadata.width,
            metadata.height,
            max_slices,
            variant
        );

        self.state.commit_load(
            LoadedImage {
                path: path.to_path_buf(),
                metadata,
                source_format,
                max_slices,
                variant,
            },
            window_size,
        );
        Ok(())
    }

    /// Move through the directory listing. Returns whether a new file was loaded.
    ///
    /// The cursor stays on the target even if its load fails, so a broken
    /// file can be stepped over.
    pub fn navigate(&mut self, nav: Navigation, backend: &mut dyn RenderBackend) -> Result<bool> {
        let delta = self.navigation_delta(nav);
        let Some(path) = self.images.step(delta).map(Path::to_path_buf) else {
            return Ok(false);
        };
        self.load_image(&path, backend)?;
        Ok(true)
    }

    fn navigation_delta(&self, nav: Navigation) -> isize {
        let n = self.images.len();
        let nav_config = &self.config.navigation;
        let step = match nav {
            Navigation::Up | Navigation::Down => 1,
            Navigation::PageUp | Navigation::PageDown => nav_config.page_step(n),
            Navigation::Home | Navigation::End => nav_config.jump_step(n),
        } as isize;
        match nav {
            Navigation::Up | Navigation::PageUp | Navigation::Home => -step,
            Navigation::Down | Navigation::PageDown | Navigation::End => step,
        }
    }

    pub fn cycle_channel(&mut self, direction: Direction) {
        self.state.cycle_channel(direction);
    }

    pub fn step_slice(&mut self, direction: Direction) {
        self.state.step_slice(direction);
    }

    pub fn adjust_scale(&mut self, direction: Direction) {
        self.state.adjust_scale(direction, &self.config.adjust);
    }

    pub fn adjust_bias(&mut self, direction: Direction) {
        self.state.adjust_bias(direction, &self.config.adjust);
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn active_variant(&self) -> Option<ShaderVariant> {
        self.state.active_variant()
    }
}

impl EventSink for Inspector {
    fn on_key(&mut self, key: Key, backend: &mut dyn RenderBackend) -> Result<bool> {
        match key {
            Key::ChannelPrev => self.cycle_channel(Direction::Backward),
            Key::ChannelNext => self.cycle_channel(Direction::Forward),
            Key::Navigate(nav) => return self.navigate(nav, backend),
            Key::SliceLeft => self.step_slice(Direction::Backward),
            Key::SliceRight => self.step_slice(Direction::Forward),
            Key::BiasUp => self.adjust_bias(Direction::Forward),
            Key::BiasDown => self.adjust_bias(Direction::Backward),
            Key::ScaleUp => self.adjust_scale(Direction::Forward),
            Key::ScaleDown => self.adjust_scale(Direction::Backward),
            Key::Reset => self.reset(),
            Key::ToggleInfo => self.state.show_info = !self.state.show_info,
        }
        Ok(false)
    }

    fn on_channel_selected(&mut self, channel: Channel) {
        self.state.set_channel(channel);
    }

    fn on_show_info(&mut self, show: bool) {
        self.state.show_info = show;
    }

    fn frame_params(&self) -> RenderParams {
        self.state.render_params()
    }
}
