//! Vertex types for 2D sprite rendering

use bytemuck::{Pod, Zeroable};

/// Textured 2D vertex. Solid fills sample a white texel, so `color` alone
/// decides their appearance.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    /// Two triangles covering `[x0, x1] x [y0, y1]` with the full texture
    pub fn quad(x0: f32, y0: f32, x1: f32, y1: f32, color: [f32; 4]) -> [Vertex; 6] {
        [
            Vertex::new(x0, y0, 0.0, 0.0, color),
            Vertex::new(x1, y0, 1.0, 0.0, color),
            Vertex::new(x0, y1, 0.0, 1.0, color),
            Vertex::new(x1, y0, 1.0, 0.0, color),
            Vertex::new(x1, y1, 1.0, 1.0, color),
            Vertex::new(x0, y1, 0.0, 1.0, color),
        ]
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: (2 * std::mem::size_of::<[f32; 2]>()) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Fallback fills when a sprite is missing
pub mod colors {
    pub const SKY: [f32; 4] = [0.53, 0.78, 0.92, 1.0];
    pub const GROUND: [f32; 4] = [0.36, 0.30, 0.24, 1.0];
    pub const GROUND_EDGE: [f32; 4] = [0.28, 0.55, 0.25, 1.0];
    pub const PLAYER: [f32; 4] = [0.95, 0.35, 0.25, 1.0];
    pub const CONE: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
    pub const CRATE: [f32; 4] = [0.6, 0.42, 0.22, 1.0];
    pub const BARRIER: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
    pub const LANDMARK: [f32; 4] = [0.45, 0.45, 0.6, 1.0];
    pub const LANDMARK_FINAL: [f32; 4] = [0.9, 0.75, 0.25, 1.0];
    pub const HITBOX: [f32; 4] = [1.0, 0.0, 1.0, 0.8];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
