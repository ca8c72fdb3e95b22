pub mod generator;
pub mod mesh;
pub mod noise;

pub use generator::{FieldGenerator, FieldSample};
pub use mesh::{TerrainMesh, TerrainVertex};
pub use noise::CoherentNoise;
