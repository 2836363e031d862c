use crate::{
    config::WindowConfig,
    error::{Error, Result},
};
use glfw::{
    fail_on_errors, Context as _, CursorMode, GlfwReceiver, OpenGlProfileHint, PWindow,
    SwapInterval, WindowEvent, WindowHint, WindowMode,
};
use std::{borrow::Cow, ffi::CStr};

const CONTEXT_VERSION: WindowHint = WindowHint::ContextVersion(3, 3);
const OPENGL_PROFILE: WindowHint = WindowHint::OpenGlProfile(OpenGlProfileHint::Core);

pub struct Application {
    pub receiver: GlfwReceiver<(f64, WindowEvent)>,
    pub window: PWindow,
}

impl Application {
    /// Opens the window, makes its GL context current and loads GL functions.
    pub fn new(config: &WindowConfig) -> Result<Self> {
        let mut glfw = glfw::init(fail_on_errors!()).map_err(Error::GlfwInit)?;
        glfw.window_hint(OPENGL_PROFILE);
        glfw.window_hint(CONTEXT_VERSION);
        glfw.window_hint(WindowHint::Resizable(false));
        #[cfg(target_os = "macos")]
        glfw.window_hint(WindowHint::OpenGlForwardCompat(true));

        let (mut window, receiver) = glfw
            .create_window(
                config.width,
                config.height,
                &config.title,
                WindowMode::Windowed,
            )
            .ok_or(Error::WindowCreation {
                width: config.width,
                height: config.height,
            })?;
        window.make_current();
        window.set_cursor_mode(CursorMode::Disabled);
        Self::enable_polling(&mut window);
        glfw.set_swap_interval(if config.vsync {
            SwapInterval::Sync(1)
        } else {
            SwapInterval::None
        });

        init_gl();
        log_context_info();

        Ok(Self { receiver, window })
    }

    fn enable_polling(window: &mut PWindow) {
        window.set_key_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_scroll_polling(true);
        window.set_framebuffer_size_polling(true);
    }
}

fn init_gl() {
    gl_loader::init_gl();
    gl::load_with(|symbol| gl_loader::get_proc_address(symbol) as *const _);
    unsafe {
        gl::Enable(gl::DEPTH_TEST);
    }
}

fn log_context_info() {
    let get = |name| unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            Cow::Borrowed("unknown")
        } else {
            CStr::from_ptr(ptr.cast()).to_string_lossy()
        }
    };
    log::info!(
        "OpenGL {} on {} ({})",
        get(gl::VERSION),
        get(gl::RENDERER),
        get(gl::VENDOR)
    );
}
