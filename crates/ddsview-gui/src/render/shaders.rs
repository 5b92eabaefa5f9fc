//! WGSL programs for the image quad. Every variant shares [`PRELUDE`] and
//! adds a texture binding plus `fs_main`. Texels are fetched with
//! `textureLoad`, so no sampler is bound and every format works unfiltered.

use ddsview_core::inspector::ShaderVariant;

const PRELUDE: &str = r"
struct Params {
    slice_index: f32,
    scale: f32,
    bias: f32,
    depth_mode: u32,
    channel: u32,
    normalized: u32,
    width: f32,
    height: f32,
}

@group(0) @binding(0) var<uniform> params: Params;

struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) tex: vec4<f32>,
}

@vertex
fn vs_main(@location(0) pos: vec4<f32>, @location(1) tex: vec4<f32>) -> VertexOut {
    var out: VertexOut;
    out.position = pos;
    out.tex = tex;
    return out;
}

fn shade(texel: vec4<f32>) -> vec4<f32> {
    var value = texel;
    switch params.channel {
        case 1u: { value = vec4<f32>(texel.rrr, 1.0); }
        case 2u: { value = vec4<f32>(texel.ggg, 1.0); }
        case 3u: { value = vec4<f32>(texel.bbb, 1.0); }
        case 4u: { value = vec4<f32>(texel.aaa, 1.0); }
        default: {}
    }
    return value * params.scale + params.bias;
}

fn texel_coord(tex: vec2<f32>, size: vec2<u32>) -> vec2<i32> {
    let last = vec2<i32>(size) - vec2<i32>(1);
    return clamp(vec2<i32>(tex * vec2<f32>(size)), vec2<i32>(0), last);
}

fn slice_of(count: u32) -> i32 {
    return clamp(i32(params.slice_index), 0, i32(count) - 1);
}
";

const TEX1D: &str = r"
@group(0) @binding(1) var image_texture: texture_2d<f32>;

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let coord = texel_coord(in.tex.xy, textureDimensions(image_texture));
    return shade(textureLoad(image_texture, vec2<i32>(coord.x, 0), 0));
}
";

const TEX1D_ARRAY: &str = r"
@group(0) @binding(1) var image_texture: texture_2d_array<f32>;

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let coord = texel_coord(in.tex.xy, textureDimensions(image_texture));
    let layer = slice_of(textureNumLayers(image_texture));
    return shade(textureLoad(image_texture, vec2<i32>(coord.x, 0), layer, 0));
}
";

const TEX2D: &str = r"
@group(0) @binding(1) var image_texture: texture_2d<f32>;

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let coord = texel_coord(in.tex.xy, textureDimensions(image_texture));
    return shade(textureLoad(image_texture, coord, 0));
}
";

const TEX2D_R8_UINT: &str = r"
@group(0) @binding(1) var image_texture: texture_2d<u32>;

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let coord = texel_coord(in.tex.xy, textureDimensions(image_texture));
    let raw = textureLoad(image_texture, coord, 0);
    return shade(vec4<f32>(f32(raw.r) / 255.0, 0.0, 0.0, 1.0));
}
";

const TEX2D_ARRAY: &str = r"
@group(0) @binding(1) var image_texture: texture_2d_array<f32>;

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let coord = texel_coord(in.tex.xy, textureDimensions(image_texture));
    let layer = slice_of(textureNumLayers(image_texture));
    return shade(textureLoad(image_texture, coord, layer, 0));
}
";

const TEX3D: &str = r"
@group(0) @binding(1) var image_texture: texture_3d<f32>;

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let size = textureDimensions(image_texture);
    let coord = texel_coord(in.tex.xy, size.xy);
    let z = slice_of(size.z);
    return shade(textureLoad(image_texture, vec3<i32>(coord, z), 0));
}
";

// Depth-stencil textures are uploaded with the stencil value in G.
const STENCIL: &str = r"
@group(0) @binding(1) var image_texture: texture_2d_array<f32>;

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let coord = texel_coord(in.tex.xy, textureDimensions(image_texture));
    let layer = slice_of(textureNumLayers(image_texture));
    let stencil = textureLoad(image_texture, coord, layer, 0).g;
    return vec4<f32>(stencil, stencil, stencil, 1.0) * params.scale + params.bias;
}
";

/// Complete WGSL source for `variant`.
pub fn source(variant: ShaderVariant) -> String {
    let body = match variant {
        ShaderVariant::Tex1D => TEX1D,
        ShaderVariant::Tex1DArray => TEX1D_ARRAY,
        ShaderVariant::Tex2D => TEX2D,
        ShaderVariant::Tex2DR8Uint => TEX2D_R8_UINT,
        // Cube maps are bound as six-layer arrays.
        ShaderVariant::Tex2DArray | ShaderVariant::Cube => TEX2D_ARRAY,
        ShaderVariant::Tex3D => TEX3D,
        ShaderVariant::Stencil => STENCIL,
    };
    format!("{PRELUDE}{body}")
}
