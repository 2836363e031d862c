use crate::gl_wrappers::ShaderProgram;
use nalgebra_glm::Vec3;

/// Must match `NR_POINT_LIGHTS` in `shaders/scene.frag`.
pub const NR_POINT_LIGHTS: usize = 4;

pub const MATERIAL_SHININESS: f32 = 32.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl DirectionalLight {
    pub fn upload(&self, program: &ShaderProgram) {
        program.set_vec3("dirLight.direction", &self.direction);
        program.set_vec3("dirLight.ambient", &self.ambient);
        program.set_vec3("dirLight.diffuse", &self.diffuse);
        program.set_vec3("dirLight.specular", &self.specular);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    /// Light with the short-range falloff used by the ground campfires.
    pub fn campfire(position: Vec3, color: Vec3) -> Self {
        Self {
            position,
            ambient: color,
            diffuse: Vec3::from_element(0.3),
            specular: color,
            constant: 1.0,
            linear: 0.07,
            quadratic: 0.017,
        }
    }

    pub fn upload(&self, program: &ShaderProgram, index: usize) {
        let field = |name: &str| format!("pointLights[{index}].{name}");
        program.set_vec3(&field("position"), &self.position);
        program.set_vec3(&field("ambient"), &self.ambient);
        program.set_vec3(&field("diffuse"), &self.diffuse);
        program.set_vec3(&field("specular"), &self.specular);
        program.set_float(&field("constant"), self.constant);
        program.set_float(&field("linear"), self.linear);
        program.set_float(&field("quadratic"), self.quadratic);
    }
}

pub fn sun() -> DirectionalLight {
    DirectionalLight {
        direction: glm::vec3(0.0, 1.0, 0.0),
        ambient: Vec3::from_element(0.1),
        diffuse: glm::vec3(1.0, 0.42, 0.0),
        specular: Vec3::from_element(1.0),
    }
}

/// Where the orb light is after `time` seconds: a radius-10 circle, 3 units
/// above the ground, one lap every 4π seconds.
pub fn orbit_position(time: f32) -> Vec3 {
    let angle = time * 0.5;
    glm::vec3(10.0 * angle.cos(), 3.0, 10.0 * angle.sin())
}

pub fn point_lights(time: f32) -> [PointLight; NR_POINT_LIGHTS] {
    let glow = glm::vec3(2.55, 2.46, 0.91);
    [
        PointLight {
            position: orbit_position(time),
            ambient: glow,
            diffuse: Vec3::from_element(1.0),
            specular: glow,
            constant: 1.0,
            linear: 0.22,
            quadratic: 0.20,
        },
        PointLight::campfire(glm::vec3(9.5, 0.0, -9.5), glm::vec3(0.0, 1.0, 0.0)),
        PointLight::campfire(glm::vec3(9.5, 0.0, 9.5), glm::vec3(1.0, 0.0, 0.0)),
        PointLight::campfire(glm::vec3(-9.5, 0.0, -9.5), glm::vec3(0.0, 0.0, 1.0)),
    ]
}
