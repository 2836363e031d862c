use crate::gl_wrappers::ShaderStage;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to initialize GLFW: {0:?}")]
    GlfwInit(glfw::InitError),

    #[error("failed to create a {width}x{height} window")]
    WindowCreation { width: u32, height: u32 },

    #[error("driver refused to allocate a {0}")]
    GlObjectAllocation(&'static str),

    #[error("couldn't read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader {} failed to compile:\n{log}", path.display())]
    ShaderCompile {
        stage: ShaderStage,
        path: PathBuf,
        log: String,
    },

    #[error("program link error:\n{log}")]
    ProgramLink { log: String },

    #[error("couldn't decode image {}: {reason}", path.display())]
    Image { path: PathBuf, reason: String },

    #[error("image {} has {channels} channels, expected 1, 3 or 4", path.display())]
    UnsupportedChannels { path: PathBuf, channels: usize },

    #[error("couldn't import model {}: {reason}", path.display())]
    Model { path: PathBuf, reason: String },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
