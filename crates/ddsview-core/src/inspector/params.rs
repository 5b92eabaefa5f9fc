use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::consts::{DEFAULT_BIAS, DEFAULT_SCALE, DEFAULT_SLICE_INDEX};

/// Which part of the texel the pixel shader shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Channel {
    #[default]
    Rgba = 0,
    R = 1,
    G = 2,
    B = 3,
    A = 4,
}

impl Channel {
    pub const ALL: [Channel; 5] = [Self::Rgba, Self::R, Self::G, Self::B, Self::A];

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Channel `offset` steps away, clamped to `[Rgba, A]`.
    pub fn offset(self, offset: i32) -> Self {
        let index = (self.index() as i32 + offset).clamp(0, Self::A.index() as i32);
        Self::ALL[index as usize]
    }

    /// Overlay text colour for this channel.
    pub fn text_color(self) -> [f32; 4] {
        match self {
            Self::Rgba => [1.0, 1.0, 1.0, 1.0],
            Self::R => [1.0, 0.0, 0.0, 1.0],
            Self::G => [0.0, 1.0, 0.0, 1.0],
            Self::B => [0.0, 0.0, 1.0, 1.0],
            Self::A => [0.5, 0.5, 0.5, 1.0],
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgba => write!(f, "RGBA"),
            Self::R => write!(f, "R"),
            Self::G => write!(f, "G"),
            Self::B => write!(f, "B"),
            Self::A => write!(f, "A"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Self::Backward => -1,
            Self::Forward => 1,
        }
    }
}

/// Directory navigation keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Every key the inspector reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// '1'
    ChannelPrev,
    /// '2'
    ChannelNext,
    Navigate(Navigation),
    SliceLeft,
    SliceRight,
    /// Q
    BiasUp,
    /// W
    BiasDown,
    /// A
    ScaleUp,
    /// S
    ScaleDown,
    /// Space
    Reset,
    /// I
    ToggleInfo,
}

/// Inspection parameters, mutated by input and image loads and read once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewParameters {
    pub slice_index: f32,
    pub scale: f32,
    pub bias: f32,
    pub channel: Channel,
    pub depth_mode: bool,
    pub stencil_mode: bool,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self {
            slice_index: DEFAULT_SLICE_INDEX,
            scale: DEFAULT_SCALE,
            bias: DEFAULT_BIAS,
            channel: Channel::Rgba,
            depth_mode: false,
            stencil_mode: false,
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }
}

/// Per-frame shader constants. Matches the `Params` uniform in the shaders.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RenderParams {
    pub slice_index: f32,
    pub scale: f32,
    pub bias: f32,
    pub depth_mode: u32,
    pub channel: u32,
    /// Reserved by the shader layout; always 0.
    pub normalized: u32,
    pub width: f32,
    pub height: f32,
}

impl RenderParams {
    pub fn from_view(view: &ViewParameters) -> Self {
        Self {
            slice_index: view.slice_index,
            scale: view.scale,
            bias: view.bias,
            depth_mode: view.depth_mode as u32,
            channel: view.channel.index(),
            normalized: 0,
            width: view.viewport_width,
            height: view.viewport_height,
        }
    }
}
