use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::colour::Rgb;
use crate::config::TerrainConfig;

/// Per-vertex data read by the JS renderer straight out of WASM memory.
/// 6 floats = 24 bytes per vertex: position then colour.
///
/// `x`, `y` are planar grid coordinates; `z` is the height. The renderer
/// lays the plane flat (rotates it -90° about x), so grid `+y` ends up at
/// the far edge of the scene.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl TerrainVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4; // 24

    #[inline]
    pub fn grid(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn colour(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Square grid of `(resolution + 1)^2` vertices with a static triangle list.
///
/// Vertex order matches a standard plane geometry: rows run from `+size/2`
/// down to `-size/2` in y, columns from `-size/2` to `+size/2` in x. Only
/// heights and colours change after construction.
pub struct TerrainMesh {
    vertices: Vec<TerrainVertex>,
    indices: Vec<u32>,
    size: f32,
    resolution: u32,
}

impl TerrainMesh {
    pub fn new(config: &TerrainConfig) -> Self {
        let size = config.size;
        let resolution = config.resolution.max(1);
        let row = resolution + 1;
        let half = size / 2.0;
        let segment = size / resolution as f32;

        let mut vertices = Vec::with_capacity((row * row) as usize);
        for iy in 0..row {
            let y = half - iy as f32 * segment;
            for ix in 0..row {
                let x = -half + ix as f32 * segment;
                vertices.push(TerrainVertex { x, y, ..TerrainVertex::default() });
            }
        }

        let mut indices = Vec::with_capacity((resolution * resolution * 6) as usize);
        for iy in 0..resolution {
            for ix in 0..resolution {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = (ix + 1) + row * (iy + 1);
                let d = (ix + 1) + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { vertices, indices, size, resolution }
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    /// Mutable access for in-place field updates. Grid coordinates must not
    /// be changed by callers.
    pub fn vertices_mut(&mut self) -> &mut [TerrainVertex] {
        &mut self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex data as a flat float slice (`FLOATS` per vertex).
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Raw pointer to vertex data for zero-copy reads from JS.
    pub fn vertices_ptr(&self) -> *const f32 {
        self.vertices.as_ptr() as *const f32
    }

    /// Raw pointer to the triangle index list.
    pub fn indices_ptr(&self) -> *const u32 {
        self.indices.as_ptr()
    }
}
