//! Window sizing and the full-screen quad.

use bytemuck::{Pod, Zeroable};

use crate::config::WindowConfig;

/// What the host knows about the display it runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayMetrics {
    /// Screen size in pixels, if the host can report it.
    pub screen: Option<[u32; 2]>,
    /// True when the session is displayed remotely.
    pub remote_session: bool,
}

/// On-screen size for an image of `width` x `height` texels.
///
/// Landscape images are bounded by the screen width and at least
/// `min_width` wide; others by the screen height and at least `min_height`
/// tall. The other axis follows the aspect ratio.
pub fn suggest_window_size(
    width: u32,
    height: u32,
    display: &DisplayMetrics,
    config: &WindowConfig,
) -> [u32; 2] {
    let [screen_w, screen_h] = display.screen.unwrap_or(config.fallback_screen);
    let max_w = screen_w.saturating_sub(config.screen_margin);
    let max_h = screen_h.saturating_sub(config.screen_margin);

    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let (mut w, mut h) = if aspect > 1.0 {
        let w = width.min(max_w).max(config.min_width);
        (w, (w as f32 / aspect) as u32)
    } else {
        let h = height.min(max_h).max(config.min_height);
        ((h as f32 * aspect) as u32, h)
    };

    let remote = config.remote_session.unwrap_or(display.remote_session);
    if remote && config.halve_when_remote {
        w /= 2;
        h /= 2;
    }

    [w.max(1), h.max(1)]
}

/// Quad vertex: clip-space position and texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 4],
    pub tex: [f32; 4],
}

const fn vertex(x: f32, y: f32, u: f32, v: f32) -> Vertex {
    Vertex {
        pos: [x, y, 0.0, 1.0],
        tex: [u, v, 0.0, 0.0],
    }
}

/// Triangle-strip quad. 2D/3D textures fill the viewport; a 1D texture is a
/// horizontal strip whose half-height is one texel cell at the window's
/// aspect.
pub fn quad_vertices(is_1d: bool, image_width: u32, window_size: [u32; 2]) -> [Vertex; 4] {
    if !is_1d {
        return [
            vertex(-1.0, 1.0, 0.0, 0.0),
            vertex(1.0, 1.0, 1.0, 0.0),
            vertex(-1.0, -1.0, 0.0, 1.0),
            vertex(1.0, -1.0, 1.0, 1.0),
        ];
    }

    let [win_w, win_h] = window_size;
    let cell_height = image_width as f32 * win_h.max(1) as f32 / win_w.max(1) as f32;
    let y = 1.0 / cell_height.max(f32::EPSILON);
    [
        vertex(-1.0, y, 0.0, 0.0),
        vertex(1.0, y, 1.0, 0.0),
        vertex(-1.0, -y, 0.0, 0.0),
        vertex(1.0, -y, 1.0, 0.0),
    ]
}
