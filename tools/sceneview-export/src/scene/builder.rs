//! Scene builder
//!
//! Consumes parsed scene records in file order and accumulates the texture and
//! mesh lists. All state lives in the builder; `finish` hands the collections over.

use hashbrown::HashMap;
use sceneview_common::{Mesh, Scene, Texture, Vertex};
use std::path::{Path, PathBuf};

use super::types::{FaceVertex, VertexKey, face_normal, fan_triangulate, table_index};
use crate::config::{ExportConfig, MissingTexturePolicy};
use crate::error::{EncodeError, ExportError, Result, UnresolvedReference};
use crate::texture::{DecodedImage, TextureDecoder};

/// Texture applied to faces until the next material switch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum ActiveTexture {
    /// No material used yet
    #[default]
    Untextured,
    Texture(u32),
    /// Material was declared without a texture
    Unresolved(String),
}

/// Mesh group under construction
#[derive(Debug, Default)]
struct MeshGroup {
    vertices: Vec<Vertex>,
    vertex_index: HashMap<VertexKey, u32>,
    indices: Vec<u32>,
}

impl MeshGroup {
    /// Index of `vertex`, appending it if this group has not seen it yet
    fn insert_vertex(&mut self, vertex: Vertex, mesh: usize) -> Result<u32> {
        let key = VertexKey::from(&vertex);
        if let Some(&index) = self.vertex_index.get(&key) {
            return Ok(index);
        }

        let index = u32::try_from(self.vertices.len()).map_err(|_| {
            EncodeError::TooManyVertices {
                index: mesh,
                count: self.vertices.len(),
            }
        })?;
        self.vertices.push(vertex);
        self.vertex_index.insert(key, index);
        Ok(index)
    }
}

/// Builds a [`Scene`] from positions, texture coordinates, faces and material directives
pub struct SceneBuilder<D> {
    decoder: D,
    parallel_decode: bool,
    missing_textures: MissingTexturePolicy,

    // Textures in registration order, decoded in `finish`
    texture_paths: Vec<PathBuf>,
    texture_by_path: HashMap<PathBuf, u32>,

    // Material name -> texture index (None until a texture line is seen)
    materials: HashMap<String, Option<u32>>,
    declaring: Option<String>,
    active: ActiveTexture,

    positions: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,

    group: MeshGroup,
    meshes: Vec<Mesh>,
}

impl<D: TextureDecoder> SceneBuilder<D> {
    pub fn new(decoder: D) -> Self {
        Self::with_config(decoder, &ExportConfig::default())
    }

    pub fn with_config(decoder: D, config: &ExportConfig) -> Self {
        Self {
            decoder,
            parallel_decode: config.parallel_decode,
            missing_textures: config.missing_textures,
            texture_paths: Vec::new(),
            texture_by_path: HashMap::new(),
            materials: HashMap::new(),
            declaring: None,
            active: ActiveTexture::default(),
            positions: Vec::new(),
            tex_coords: Vec::new(),
            group: MeshGroup::default(),
            meshes: Vec::new(),
        }
    }

    /// Register a texture file, returning its index
    ///
    /// A path that was already registered returns the existing index; the image
    /// is decoded once.
    pub fn register_texture(&mut self, path: &Path) -> Result<u32> {
        if let Some(&index) = self.texture_by_path.get(path) {
            return Ok(index);
        }
        let index = table_index("texture", self.texture_paths.len())?;
        self.texture_paths.push(path.to_path_buf());
        self.texture_by_path.insert(path.to_path_buf(), index);
        tracing::debug!("Registered texture {} -> {:?}", index, path);
        Ok(index)
    }

    /// Start reading a new material library
    ///
    /// Texture lines only apply to materials declared in the same library.
    pub fn begin_material_library(&mut self) {
        self.declaring = None;
    }

    /// Declare a material; its texture is unset until [`Self::set_material_texture`]
    pub fn declare_material(&mut self, name: &str) {
        self.materials.insert(name.to_string(), None);
        self.declaring = Some(name.to_string());
    }

    /// Assign a texture to the most recently declared material
    ///
    /// Returns the material name and texture index, or `None` if no material
    /// has been declared in the current library.
    pub fn set_material_texture(&mut self, path: &Path) -> Result<Option<(&str, u32)>> {
        let Some(name) = self.declaring.clone() else {
            return Ok(None);
        };
        let index = self.register_texture(path)?;
        self.materials.insert(name, Some(index));
        Ok(self.declaring.as_deref().map(|name| (name, index)))
    }

    /// Texture index a declared material resolves to
    pub fn material_texture(&self, name: &str) -> Option<Option<u32>> {
        self.materials.get(name).copied()
    }

    /// Switch the active material
    pub fn use_material(&mut self, name: &str) -> Result<()> {
        self.active = match self.materials.get(name) {
            Some(Some(index)) => ActiveTexture::Texture(*index),
            Some(None) => ActiveTexture::Unresolved(name.to_string()),
            None => {
                return Err(UnresolvedReference::UndeclaredMaterial(name.to_string()).into());
            }
        };
        Ok(())
    }

    pub fn add_position(&mut self, position: [f32; 3]) {
        self.positions.push(position);
    }

    pub fn add_tex_coord(&mut self, tex_coord: [f32; 2]) {
        self.tex_coords.push(tex_coord);
    }

    /// Add a polygon face to the current group
    ///
    /// The face gets one normal computed from its first three corners. Corners
    /// are deduplicated against the group's vertices, then the polygon is fanned
    /// from its first corner. Only convex, planar polygons triangulate correctly.
    pub fn add_face(&mut self, face: &[FaceVertex]) -> Result<()> {
        if face.len() < 3 {
            return Err(ExportError::FaceTooSmall(face.len()));
        }
        if let ActiveTexture::Unresolved(name) = &self.active {
            return Err(UnresolvedReference::UntexturedMaterial(name.clone()).into());
        }

        let normal = face_normal(
            self.position(face[0].position)?,
            self.position(face[1].position)?,
            self.position(face[2].position)?,
        );

        let mesh = self.meshes.len();
        let mut polygon = Vec::with_capacity(face.len());
        for corner in face {
            let vertex = Vertex::new(
                self.position(corner.position)?,
                self.tex_coord(corner.tex_coord)?,
                normal,
            );
            polygon.push(self.group.insert_vertex(vertex, mesh)?);
        }

        self.group.indices.extend(fan_triangulate(&polygon));
        Ok(())
    }

    /// Start a new group, finalizing the current one if it has triangles
    pub fn begin_group(&mut self) -> Result<()> {
        if !self.group.indices.is_empty() {
            self.finish_group()?;
        }
        Ok(())
    }

    /// Finalize the last group and decode every registered texture
    pub fn finish(mut self) -> Result<Scene> {
        self.begin_group()?;

        let textures = self.decode_textures()?;

        tracing::info!(
            "Built scene: {} textures, {} meshes",
            textures.len(),
            self.meshes.len()
        );

        Ok(Scene::new(textures, self.meshes))
    }

    fn finish_group(&mut self) -> Result<()> {
        let texture_index = match &self.active {
            ActiveTexture::Untextured => None,
            ActiveTexture::Texture(index) => Some(*index),
            ActiveTexture::Unresolved(name) => {
                return Err(UnresolvedReference::UntexturedMaterial(name.clone()).into());
            }
        };

        let group = std::mem::take(&mut self.group);
        tracing::debug!(
            "Mesh {}: texture {:?}, {} vertices, {} indices",
            self.meshes.len(),
            texture_index,
            group.vertices.len(),
            group.indices.len()
        );
        self.meshes
            .push(Mesh::new(texture_index, group.vertices, group.indices));
        Ok(())
    }

    fn decode_textures(&self) -> Result<Vec<Texture>> {
        use rayon::prelude::*;

        let decoder = &self.decoder;
        let decoded: Vec<anyhow::Result<DecodedImage>> = if self.parallel_decode {
            self.texture_paths
                .par_iter()
                .map(|path| decoder.decode(path))
                .collect()
        } else {
            self.texture_paths
                .iter()
                .map(|path| decoder.decode(path))
                .collect()
        };

        self.texture_paths
            .iter()
            .zip(decoded)
            .map(|(path, result)| match result {
                Ok(image) => Ok(Texture::rgba8(image.width, image.height, image.pixels)),
                Err(err) => match self.missing_textures {
                    MissingTexturePolicy::Error => Err(ExportError::DecodeFailure {
                        path: path.clone(),
                        source: err.into(),
                    }),
                    MissingTexturePolicy::Skip => {
                        tracing::warn!("Skipping texture {:?}: {:#}", path, err);
                        Ok(Texture::Missing)
                    }
                },
            })
            .collect()
    }

    fn position(&self, index: usize) -> Result<[f32; 3]> {
        self.positions.get(index).copied().ok_or_else(|| {
            UnresolvedReference::Position {
                index,
                count: self.positions.len(),
            }
            .into()
        })
    }

    fn tex_coord(&self, index: usize) -> Result<[f32; 2]> {
        self.tex_coords.get(index).copied().ok_or_else(|| {
            UnresolvedReference::TexCoord {
                index,
                count: self.tex_coords.len(),
            }
            .into()
        })
    }
}
