//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
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
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for match elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.05, 0.18, 0.08, 1.0];
    pub const GRASS: [f32; 4] = [0.13, 0.55, 0.13, 1.0];
    pub const GRASS_STRIPE: [f32; 4] = [0.15, 0.6, 0.15, 1.0];
    pub const LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const GOAL_POST: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BEHIND_POST: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
    pub const BALL: [f32; 4] = [0.8, 0.1, 0.1, 1.0];
    pub const BALL_SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.3];
    pub const HIGHLIGHT: [f32; 4] = [1.0, 1.0, 0.2, 0.9];
    pub const HUD_PANEL: [f32; 4] = [0.0, 0.0, 0.0, 0.55];
}
