use crate::{
    error::{Error, Result},
    gl_wrappers::{self, BufferObject, VertexArrayObject},
    texture::{self, Texture},
};
use fxhash::FxHashMap;
use russimp::{
    material::{PropertyTypeInfo, TextureType},
    scene::{PostProcess, Scene},
    Vector2D, Vector3D,
};
use std::{
    mem::size_of,
    path::{Path, PathBuf},
};

#[repr(C)]
#[derive(Clone, Copy)]
pub struct Vertex {
    pub position: Vector3D,
    pub normal: Vector3D,
    pub tex_coord: Vector2D,
}

impl Vertex {
    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute::Position,
        VertexAttribute::Normal,
        VertexAttribute::TexCoord,
    ];

    fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position: vector3(position),
            normal: vector3(normal),
            tex_coord: Vector2D {
                x: tex_coord[0],
                y: tex_coord[1],
            },
        }
    }
}

fn vector3(v: [f32; 3]) -> Vector3D {
    Vector3D {
        x: v[0],
        y: v[1],
        z: v[2],
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VertexAttribute {
    Position = 0,
    Normal = 1,
    TexCoord = 2,
}

impl VertexAttribute {
    fn components(self) -> usize {
        match self {
            VertexAttribute::Position | VertexAttribute::Normal => 3,
            VertexAttribute::TexCoord => 2,
        }
    }
}

pub struct Mesh {
    vao: VertexArrayObject,
    _vbo: BufferObject,
    ebo: Option<BufferObject>,
    count: i32,
}

impl Mesh {
    /// Unit cube drawn around the camera as the skybox, positions only.
    #[rustfmt::skip]
    pub const SKYBOX_VERTICES: [f32; 108] = [
        -1.0,  1.0, -1.0,  -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,
         1.0, -1.0, -1.0,   1.0,  1.0, -1.0,  -1.0,  1.0, -1.0,

        -1.0, -1.0,  1.0,  -1.0, -1.0, -1.0,  -1.0,  1.0, -1.0,
        -1.0,  1.0, -1.0,  -1.0,  1.0,  1.0,  -1.0, -1.0,  1.0,

         1.0, -1.0, -1.0,   1.0, -1.0,  1.0,   1.0,  1.0,  1.0,
         1.0,  1.0,  1.0,   1.0,  1.0, -1.0,   1.0, -1.0, -1.0,

        -1.0, -1.0,  1.0,  -1.0,  1.0,  1.0,   1.0,  1.0,  1.0,
         1.0,  1.0,  1.0,   1.0, -1.0,  1.0,  -1.0, -1.0,  1.0,

        -1.0,  1.0, -1.0,   1.0,  1.0, -1.0,   1.0,  1.0,  1.0,
         1.0,  1.0,  1.0,  -1.0,  1.0,  1.0,  -1.0,  1.0, -1.0,

        -1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0, -1.0,
         1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0,  1.0,
    ];

    /// Non-indexed mesh drawn with `DrawArrays`. `data` is interleaved in the
    /// order given by `attributes`.
    pub fn arrays<T>(
        data: &[T],
        vertex_count: usize,
        attributes: &[VertexAttribute],
    ) -> Result<Self> {
        let vao = VertexArrayObject::new()?;
        vao.bind();

        let vbo = BufferObject::new(gl::ARRAY_BUFFER)?;
        vbo.bind();
        vbo.buffer_data(data, gl::STATIC_DRAW);

        Self::configure_vertex_attributes(attributes);
        VertexArrayObject::unbind();

        Ok(Self {
            vao,
            _vbo: vbo,
            ebo: None,
            count: vertex_count as i32,
        })
    }

    pub fn indexed(vertices: &[Vertex], indices: &[u32]) -> Result<Self> {
        let vao = VertexArrayObject::new()?;
        vao.bind();

        let vbo = BufferObject::new(gl::ARRAY_BUFFER)?;
        vbo.bind();
        vbo.buffer_data(vertices, gl::STATIC_DRAW);

        let ebo = BufferObject::new(gl::ELEMENT_ARRAY_BUFFER)?;
        ebo.bind();
        ebo.buffer_data(indices, gl::STATIC_DRAW);

        Self::configure_vertex_attributes(&Vertex::ATTRIBUTES);
        VertexArrayObject::unbind();

        Ok(Self {
            vao,
            _vbo: vbo,
            ebo: Some(ebo),
            count: indices.len() as i32,
        })
    }

    fn configure_vertex_attributes(attributes: &[VertexAttribute]) {
        let stride =
            attributes.iter().map(|a| a.components()).sum::<usize>() * size_of::<f32>();

        let mut offset = 0;
        for attribute in attributes {
            gl_wrappers::configure_attribute(
                *attribute as u32,
                attribute.components() as i32,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const _,
            );
            gl_wrappers::enable_attribute(*attribute as u32);
            offset += attribute.components() * size_of::<f32>();
        }
    }

    pub fn draw(&self) {
        self.vao.bind();
        unsafe {
            if self.ebo.is_some() {
                gl::DrawElements(gl::TRIANGLES, self.count, gl::UNSIGNED_INT, std::ptr::null());
            } else {
                gl::DrawArrays(gl::TRIANGLES, 0, self.count);
            }
        }
        VertexArrayObject::unbind();
    }
}

/// Box spanning `[-half_extent, half_extent]` on X and Z and `[bottom, top]`
/// on Y, as 36 counter-clockwise vertices with outward normals. Each face maps
/// the full texture once.
pub fn slab_vertices(half_extent: f32, bottom: f32, top: f32) -> Vec<Vertex> {
    let (l, r) = (-half_extent, half_extent);
    let (b, t) = (bottom, top);
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([ 0.0,  0.0, -1.0], [[r, b, l], [l, b, l], [l, t, l], [r, t, l]]),
        ([ 0.0,  0.0,  1.0], [[l, b, r], [r, b, r], [r, t, r], [l, t, r]]),
        ([-1.0,  0.0,  0.0], [[l, b, l], [l, b, r], [l, t, r], [l, t, l]]),
        ([ 1.0,  0.0,  0.0], [[r, b, r], [r, b, l], [r, t, l], [r, t, r]]),
        ([ 0.0, -1.0,  0.0], [[l, b, l], [r, b, l], [r, b, r], [l, b, r]]),
        ([ 0.0,  1.0,  0.0], [[l, t, r], [r, t, r], [r, t, l], [l, t, l]]),
    ];
    const UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut vertices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        for i in [0, 1, 2, 2, 3, 0] {
            vertices.push(Vertex::new(corners[i], normal, UV[i]));
        }
    }
    vertices
}

/// Texture unit model materials are sampled from.
pub const DIFFUSE_UNIT: u32 = 0;

pub struct Model {
    /// Sub-meshes with the index of their diffuse map in `textures`.
    meshes: Vec<(Mesh, Option<usize>)>,
    textures: Vec<Texture>,
}

impl Model {
    const POST_PROCESS: [PostProcess; 4] = [
        PostProcess::Triangulate,
        PostProcess::FlipUVs,
        PostProcess::GenerateSmoothNormals,
        PostProcess::JoinIdenticalVertices,
    ];

    pub fn load(path: &Path) -> Result<Self> {
        let model_error = |reason: String| Error::Model {
            path: path.to_path_buf(),
            reason,
        };
        let path_str = path
            .to_str()
            .ok_or_else(|| model_error("path is not valid UTF-8".to_string()))?;
        let scene = Scene::from_file(path_str, Self::POST_PROCESS.into())
            .map_err(|e| model_error(format!("{e:?}")))?;
        if scene.meshes.is_empty() {
            return Err(model_error("no meshes in file".to_string()));
        }

        let mut model = Self {
            meshes: Vec::with_capacity(scene.meshes.len()),
            textures: Vec::new(),
        };
        let mut loaded = FxHashMap::<PathBuf, usize>::default();
        let mut vertex_data = Vec::<Vertex>::new();
        let mut index_data = Vec::<u32>::new();

        for submesh in &scene.meshes {
            let tex_coords = submesh.texture_coords.first().and_then(|c| c.as_ref());
            for (i, position) in submesh.vertices.iter().enumerate() {
                let normal = submesh.normals.get(i).copied().unwrap_or(vector3([0.0; 3]));
                let tex_coord = tex_coords
                    .and_then(|coords| coords.get(i))
                    .map_or(Vector2D { x: 0.0, y: 0.0 }, |uv| Vector2D { x: uv.x, y: uv.y });

                vertex_data.push(Vertex {
                    position: *position,
                    normal,
                    tex_coord,
                });
            }

            for face in &submesh.faces {
                index_data.extend_from_slice(&face.0);
            }

            let mesh = Mesh::indexed(&vertex_data, &index_data)?;
            let diffuse = model.load_diffuse_map(&scene, submesh.material_index, path, &mut loaded);
            log::debug!(
                "{}: sub-mesh with {} vertices, {} indices",
                path.display(),
                vertex_data.len(),
                index_data.len()
            );
            model.meshes.push((mesh, diffuse));

            vertex_data.clear();
            index_data.clear();
        }

        log::info!(
            "loaded model {} ({} meshes, {} textures)",
            path.display(),
            model.meshes.len(),
            model.textures.len()
        );
        Ok(model)
    }

    fn load_diffuse_map(
        &mut self,
        scene: &Scene,
        material_index: u32,
        model_path: &Path,
        loaded: &mut FxHashMap<PathBuf, usize>,
    ) -> Option<usize> {
        let material = scene.materials.get(material_index as usize)?;
        let file = material
            .properties
            .iter()
            .filter(|p| p.key == "$tex.file" && p.semantic == TextureType::Diffuse)
            .find_map(|p| match &p.data {
                PropertyTypeInfo::String(s) => Some(s.clone()),
                _ => None,
            })?;
        let path = texture_path(model_path, &file);

        match texture_index(&mut self.textures, loaded, path, texture::load_texture_2d) {
            Ok(index) => Some(index),
            Err(e) => {
                log::warn!("{}: {e}", model_path.display());
                None
            }
        }
    }

    /// Draws every sub-mesh with its diffuse map, or `fallback` when it has
    /// none, bound to [`DIFFUSE_UNIT`].
    pub fn draw(&self, fallback: &Texture) {
        for (mesh, diffuse) in &self.meshes {
            select_map(*diffuse, &self.textures, fallback).bind_to_unit(DIFFUSE_UNIT);
            mesh.draw();
        }
    }
}

fn select_map<'a, T>(index: Option<usize>, textures: &'a [T], fallback: &'a T) -> &'a T {
    index.and_then(|i| textures.get(i)).unwrap_or(fallback)
}

/// Index of the texture at `path`, loading and appending it to `textures` on
/// first use. Failed loads are not remembered.
fn texture_index<T>(
    textures: &mut Vec<T>,
    loaded: &mut FxHashMap<PathBuf, usize>,
    path: PathBuf,
    load: impl FnOnce(&Path) -> Result<T>,
) -> Result<usize> {
    if let Some(&index) = loaded.get(&path) {
        return Ok(index);
    }
    let texture = load(&path)?;
    textures.push(texture);
    let index = textures.len() - 1;
    loaded.insert(path, index);
    Ok(index)
}

/// Material texture files are stored relative to the model file.
fn texture_path(model_path: &Path, file: &str) -> PathBuf {
    let file = file.replace('\\', "/");
    model_path
        .parent()
        .map_or_else(|| PathBuf::from(&file), |dir| dir.join(&file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v3(v: &Vector3D) -> glm::Vec3 {
        glm::vec3(v.x, v.y, v.z)
    }

    #[test]
    fn slab_has_twelve_triangles_inside_its_bounds() {
        let vertices = slab_vertices(10.5, -0.1, 0.0);
        assert_eq!(vertices.len(), 36);
        for v in &vertices {
            assert!(v.position.x.abs() <= 10.5);
            assert!(v.position.z.abs() <= 10.5);
            assert!(v.position.y == -0.1 || v.position.y == 0.0);
            assert!((glm::length(&v3(&v.normal)) - 1.0).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&v.tex_coord.x));
            assert!((0.0..=1.0).contains(&v.tex_coord.y));
        }
    }

    #[test]
    fn slab_triangles_wind_counter_clockwise_around_their_normals() {
        let vertices = slab_vertices(10.5, -0.1, 0.0);
        for tri in vertices.chunks(3) {
            let (a, b, c) = (v3(&tri[0].position), v3(&tri[1].position), v3(&tri[2].position));
            let face_normal = glm::cross(&(b - a), &(c - a));
            assert!(glm::dot(&face_normal, &v3(&tri[0].normal)) > 0.0);
        }
    }

    #[test]
    fn slab_top_is_the_walkable_surface() {
        let vertices = slab_vertices(10.5, -0.1, 0.0);
        let top: Vec<_> = vertices.iter().filter(|v| v.normal.y == 1.0).collect();
        assert_eq!(top.len(), 6);
        assert!(top.iter().all(|v| v.position.y == 0.0));
    }

    #[test]
    fn skybox_is_a_closed_unit_cube() {
        assert_eq!(Mesh::SKYBOX_VERTICES.len(), 36 * 3);
        assert!(Mesh::SKYBOX_VERTICES.iter().all(|c| c.abs() == 1.0));
    }

    #[test]
    fn sub_meshes_without_a_diffuse_map_use_the_fallback() {
        let textures = ["bark", "leaves"];
        assert_eq!(*select_map(Some(1), &textures, &"gray"), "leaves");
        assert_eq!(*select_map(None, &textures, &"gray"), "gray");
        assert_eq!(*select_map(Some(7), &textures, &"gray"), "gray");
    }

    #[test]
    fn shared_texture_files_load_once_per_model() {
        let mut textures = Vec::new();
        let mut loaded = FxHashMap::default();
        let mut loads = 0;
        let mut load = |path: &Path| -> Result<String> {
            loads += 1;
            Ok(path.display().to_string())
        };
        let log = PathBuf::from("assets/models/firecamp/log.png");
        let ash = PathBuf::from("assets/models/firecamp/ash.png");

        let first = texture_index(&mut textures, &mut loaded, log.clone(), &mut load).unwrap();
        let second = texture_index(&mut textures, &mut loaded, log.clone(), &mut load).unwrap();
        let other = texture_index(&mut textures, &mut loaded, ash, &mut load).unwrap();

        assert_eq!((first, second, other), (0, 0, 1));
        assert_eq!(loads, 2);
        assert_eq!(textures.len(), 2);
        assert_eq!(textures[first], log.display().to_string());
    }

    #[test]
    fn failed_texture_loads_are_retried() {
        let mut textures: Vec<String> = Vec::new();
        let mut loaded = FxHashMap::default();
        let path = PathBuf::from("assets/models/orb/missing.png");
        let fail = |p: &Path| -> Result<String> {
            Err(Error::Image {
                path: p.to_path_buf(),
                reason: "not found".to_string(),
            })
        };

        assert!(texture_index(&mut textures, &mut loaded, path.clone(), fail).is_err());
        assert!(loaded.is_empty());

        let index = texture_index(&mut textures, &mut loaded, path, |_| Ok("orb".to_string()));
        assert_eq!(index.unwrap(), 0);
    }

    #[test]
    fn texture_paths_resolve_next_to_the_model() {
        let model = Path::new("assets/models/mage/mage.obj");
        assert_eq!(
            texture_path(model, "mage_diffuse.png"),
            PathBuf::from("assets/models/mage/mage_diffuse.png")
        );
        assert_eq!(
            texture_path(model, "textures\\robe.png"),
            PathBuf::from("assets/models/mage/textures/robe.png")
        );
    }
}
