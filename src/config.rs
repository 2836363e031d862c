use crate::{
    error::{Error, Result},
    scene::Prop,
};
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Looked up in the working directory at startup. Optional.
pub const CONFIG_PATH: &str = "campfire.json";

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub shaders: ShaderPaths,
    pub models: ModelPaths,
    pub textures: TexturePaths,
}

impl Config {
    /// Reads the config at `path`. A missing file is not an error and yields
    /// the built-in scene; fields absent from the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("{} not found, using built-in config", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&json).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
    /// Windows only: drop the console the process was started with.
    pub detach_console: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            title: "Campfire".to_string(),
            vsync: true,
            detach_console: false,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3 {
                x: 0.0,
                y: 1.0,
                z: 5.0,
            },
        }
    }
}

#[derive(Deserialize, Default, Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for glm::Vec3 {
    fn from(value: Vec3) -> Self {
        glm::vec3(value.x, value.y, value.z)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShaderPaths {
    pub scene_vertex: PathBuf,
    pub scene_fragment: PathBuf,
    pub skybox_vertex: PathBuf,
    pub skybox_fragment: PathBuf,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            scene_vertex: "shaders/scene.vert".into(),
            scene_fragment: "shaders/scene.frag".into(),
            skybox_vertex: "shaders/skybox.vert".into(),
            skybox_fragment: "shaders/skybox.frag".into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelPaths {
    pub campfire: PathBuf,
    pub red_campfire: PathBuf,
    pub blue_campfire: PathBuf,
    pub orb: PathBuf,
    pub demon_form: PathBuf,
    pub shooter: PathBuf,
    pub mage: PathBuf,
    pub frostbolt: PathBuf,
    pub dwarf: PathBuf,
    pub portal: PathBuf,
}

impl ModelPaths {
    pub fn path(&self, prop: Prop) -> &Path {
        match prop {
            Prop::Campfire => &self.campfire,
            Prop::RedCampfire => &self.red_campfire,
            Prop::BlueCampfire => &self.blue_campfire,
            Prop::Orb => &self.orb,
            Prop::DemonForm => &self.demon_form,
            Prop::Shooter => &self.shooter,
            Prop::Mage => &self.mage,
            Prop::Frostbolt => &self.frostbolt,
            Prop::Dwarf => &self.dwarf,
            Prop::Portal => &self.portal,
        }
    }
}

impl Default for ModelPaths {
    fn default() -> Self {
        fn obj(name: &str) -> PathBuf {
            PathBuf::from(format!("assets/models/{name}/{name}.obj"))
        }

        Self {
            campfire: obj("firecamp"),
            red_campfire: obj("red_campfire"),
            blue_campfire: obj("blue_campfire"),
            orb: obj("orb"),
            demon_form: obj("demonForm"),
            shooter: obj("shooter"),
            mage: obj("mage"),
            frostbolt: obj("frostbolt"),
            dwarf: obj("dwarf"),
            portal: obj("portal"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TexturePaths {
    pub ground: PathBuf,
    /// Cubemap faces in +X, -X, +Y, -Y, +Z, -Z order.
    pub skybox: [PathBuf; 6],
}

impl Default for TexturePaths {
    fn default() -> Self {
        let face = |suffix: &str| PathBuf::from(format!("assets/textures/mercury_{suffix}.jpg"));
        Self {
            ground: "assets/textures/ground.jpg".into(),
            skybox: [
                face("ft"),
                face("bk"),
                face("up"),
                face("dn"),
                face("rt"),
                face("lf"),
            ],
        }
    }
}
