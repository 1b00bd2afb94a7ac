//! Typed vertex attribute arrays

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// 8-bit RGBA color, laid out exactly as stored in vertex blobs.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct ColorRGBA32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorRGBA32 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        bytemuck::cast(bytes)
    }

    pub fn to_bytes(self) -> [u8; 4] {
        bytemuck::cast(self)
    }

    /// Quantize a normalized float color.
    pub fn from_normalized(color: Vec4) -> Self {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(quantize(color.x), quantize(color.y), quantize(color.z), quantize(color.w))
    }
}

/// Four bone influences of one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkinWeights4 {
    pub weights: [f32; 4],
    pub bone_indices: [i32; 4],
}

/// Contiguous vertex range of a sub-mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubMesh {
    pub first_vertex: u32,
    pub vertex_count: u32,
}

impl SubMesh {
    pub fn new(first_vertex: u32, vertex_count: u32) -> Self {
        Self { first_vertex, vertex_count }
    }

    /// The range covering every vertex.
    pub fn all(vertex_count: u32) -> Self {
        Self::new(0, vertex_count)
    }
}

/// Attribute arrays decoded from a vertex blob. Absent channels are empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexAttributes {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<ColorRGBA32>,
    pub uv0: Vec<Vec2>,
    pub uv1: Vec<Vec2>,
    pub tangents: Vec<Vec4>,
}

impl VertexAttributes {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
