//! Scene building (parsed records -> textures + meshes)

mod builder;
mod types;


// Re-export public API
pub use builder::SceneBuilder;
pub use types::{FaceVertex, VertexKey, face_normal, fan_triangulate};
