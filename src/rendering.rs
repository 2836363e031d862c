use crate::{
    camera::Camera,
    config::Config,
    data3d::{self, Mesh, Model, Vertex, VertexAttribute, DIFFUSE_UNIT},
    error::Result,
    gl_wrappers::{self, ShaderProgram},
    lighting::{self, MATERIAL_SHININESS},
    scene::{self, Prop, CLEAR_COLOR, GROUND_BOTTOM, GROUND_HALF_EXTENT, GROUND_TOP},
    texture::{self, Texture},
};
use fxhash::FxHashMap;
use nalgebra_glm::Mat4;
use strum::IntoEnumIterator;

const FALLBACK_COLOR: [u8; 3] = [128, 128, 128];

/// Scene sampler uniforms and the unit each reads. Specular highlights are
/// tinted by the diffuse map.
const MATERIAL_SAMPLERS: [(&str, u32); 2] = [
    ("material.diffuse", DIFFUSE_UNIT),
    ("material.specular", DIFFUSE_UNIT),
];

/// Every GPU resource the scene needs, loaded once at startup.
pub struct SceneRenderer {
    scene_program: ShaderProgram,
    skybox_program: ShaderProgram,
    props: FxHashMap<Prop, Model>,
    ground: Mesh,
    ground_texture: Texture,
    skybox: Mesh,
    skybox_texture: Texture,
    fallback: Texture,
}

impl SceneRenderer {
    pub fn new(config: &Config) -> Result<Self> {
        let shaders = &config.shaders;
        let scene_program =
            ShaderProgram::from_vert_frag_file(&shaders.scene_vertex, &shaders.scene_fragment)?;
        let skybox_program =
            ShaderProgram::from_vert_frag_file(&shaders.skybox_vertex, &shaders.skybox_fragment)?;

        let mut props = FxHashMap::default();
        for prop in Prop::iter() {
            log::debug!("loading {prop}");
            props.insert(prop, Model::load(config.models.path(prop))?);
        }

        let slab = data3d::slab_vertices(GROUND_HALF_EXTENT, GROUND_BOTTOM, GROUND_TOP);
        let ground = Mesh::arrays(&slab, slab.len(), &Vertex::ATTRIBUTES)?;
        let ground_texture = texture::load_texture_2d(&config.textures.ground)?;

        let skybox = Mesh::arrays(
            &Mesh::SKYBOX_VERTICES,
            Mesh::SKYBOX_VERTICES.len() / 3,
            &[VertexAttribute::Position],
        )?;
        let skybox_texture = texture::load_cubemap(&config.textures.skybox)?;

        scene_program.use_();
        for (name, unit) in MATERIAL_SAMPLERS {
            scene_program.set_int(name, unit as i32);
        }
        skybox_program.use_();
        skybox_program.set_int("skybox", 0);

        Ok(Self {
            scene_program,
            skybox_program,
            props,
            ground,
            ground_texture,
            skybox,
            skybox_texture,
            fallback: Texture::solid_color(FALLBACK_COLOR)?,
        })
    }

    pub fn draw_frame(&self, camera: &Camera, aspect: f32, time: f32) {
        gl_wrappers::clear(CLEAR_COLOR, gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);

        let view = camera.view_matrix();
        let projection = camera.projection(aspect);
        let lights = lighting::point_lights(time);
        let program = &self.scene_program;

        program.use_();
        program.set_vec3("viewPos", &camera.position);
        program.set_float("material.shininess", MATERIAL_SHININESS);
        lighting::sun().upload(program);
        for (i, light) in lights.iter().enumerate() {
            light.upload(program, i);
        }
        program.set_mat4("view", &view);
        program.set_mat4("projection", &projection);

        for (prop, model) in scene::prop_transforms(time, &lights) {
            program.set_mat4("model", &model);
            self.props[&prop].draw(&self.fallback);
        }

        program.set_mat4("model", &Mat4::identity());
        self.ground_texture.bind_to_unit(DIFFUSE_UNIT);
        self.ground.draw();

        self.draw_skybox(&view, &projection);
    }

    /// Drawn last at maximum depth, so it only fills pixels nothing else
    /// covered.
    fn draw_skybox(&self, view: &Mat4, projection: &Mat4) {
        gl_wrappers::depth_func(gl::LEQUAL);
        self.skybox_program.use_();
        self.skybox_program.set_mat4("view", &scene::skybox_view(view));
        self.skybox_program.set_mat4("projection", projection);
        self.skybox_texture.bind_to_unit(0);
        self.skybox.draw();
        gl_wrappers::depth_func(gl::LESS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specular_samples_the_diffuse_map() {
        for (name, unit) in MATERIAL_SAMPLERS {
            assert_eq!(unit, DIFFUSE_UNIT, "{name}");
        }
    }

    #[test]
    fn material_samplers_exist_in_the_scene_shader() {
        let frag = include_str!("../shaders/scene.frag");
        for (name, _) in MATERIAL_SAMPLERS {
            let field = name.trim_start_matches("material.");
            assert!(frag.contains(&format!("sampler2D {field};")), "{name}");
            assert!(frag.contains(&format!("texture({name}, TexCoords)")), "{name}");
        }
    }
}
