//! Vertex layout and quad geometry for glyph copies.
//!
//! Every [`Canvas::copy`](crate::renderer::backend::Canvas::copy) becomes one
//! textured quad: two triangles whose positions are the destination rectangle
//! in normalized device coordinates and whose UVs are the source cell divided
//! by the atlas size.

use crate::renderer::backend::Rect;
use std::mem;

/// One corner of a glyph quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphVertex {
    /// Position in normalized device coordinates [x, y]
    pub position: [f32; 2],
    /// Texture coordinates [u, v] where (0,0) is the atlas top-left
    pub uv: [f32; 2],
}

impl GlyphVertex {
    /// Returns the vertex buffer layout descriptor for the glyph pipeline.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<GlyphVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position (location 0)
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // uv (location 1)
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Builds the six vertices that copy `src` out of an `atlas_size` texture into
/// `dst` on a `screen_size` frame buffer. Both sizes are `(width, height)` in pixels.
pub fn glyph_quad(
    src: Rect,
    dst: Rect,
    atlas_size: (u32, u32),
    screen_size: (u32, u32),
) -> [GlyphVertex; 6] {
    let (screen_w, screen_h) = (screen_size.0 as f32, screen_size.1 as f32);
    let (atlas_w, atlas_h) = (atlas_size.0 as f32, atlas_size.1 as f32);

    // Screen y grows downward, NDC y grows upward.
    let left = dst.x as f32 / screen_w * 2.0 - 1.0;
    let right = (dst.x as f32 + dst.width as f32) / screen_w * 2.0 - 1.0;
    let top = 1.0 - dst.y as f32 / screen_h * 2.0;
    let bottom = 1.0 - (dst.y as f32 + dst.height as f32) / screen_h * 2.0;

    let u0 = src.x as f32 / atlas_w;
    let u1 = (src.x as f32 + src.width as f32) / atlas_w;
    let v0 = src.y as f32 / atlas_h;
    let v1 = (src.y as f32 + src.height as f32) / atlas_h;

    let top_left = GlyphVertex {
        position: [left, top],
        uv: [u0, v0],
    };
    let top_right = GlyphVertex {
        position: [right, top],
        uv: [u1, v0],
    };
    let bottom_right = GlyphVertex {
        position: [right, bottom],
        uv: [u1, v1],
    };
    let bottom_left = GlyphVertex {
        position: [left, bottom],
        uv: [u0, v1],
    };

    [
        top_left,
        bottom_left,
        bottom_right,
        top_left,
        bottom_right,
        top_right,
    ]
}
