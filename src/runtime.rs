use crate::{
    application::Application,
    camera::{Camera, CameraMovement},
    config::{Config, WindowConfig},
    error::Result,
    gl_wrappers,
    input::{self, CursorTracker, CLOSE_KEY},
    rendering::SceneRenderer,
};
use glfw::{Context as _, PWindow, WindowEvent};
use strum::IntoEnumIterator;

const FPS_REPORT_INTERVAL: f64 = 5.0;

pub fn run(config: &Config) -> Result<()> {
    let mut app = Application::new(&config.window)?;
    // Declared after `app`: GL objects must be released while the context lives.
    let renderer = SceneRenderer::new(config)?;
    let mut viewer = Viewer::new(
        Camera::new(config.camera.position.into()),
        initial_framebuffer_size(app.window.get_framebuffer_size(), &config.window),
    );
    gl_wrappers::viewport(viewer.framebuffer_size);

    let mut clock = FrameClock::new(app.window.glfw.get_time());
    while !app.window.should_close() {
        let now = app.window.glfw.get_time();
        let delta_time = clock.tick(now);

        process_input(&mut app.window, &mut viewer.camera, delta_time);
        renderer.draw_frame(&viewer.camera, viewer.aspect(), now as f32);
        app.window.swap_buffers();

        app.window.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&app.receiver) {
            if let Some(size) = viewer.handle_event(event) {
                gl_wrappers::viewport(size);
            }
        }
    }

    log::info!("window closed after {} frames", clock.frames());
    if let Some(fps) = clock.fps() {
        log::debug!("last measured {fps:.1} fps");
    }
    log::debug!(
        "camera left at {:?} facing {:?}, fov {}",
        viewer.camera.position,
        viewer.camera.front(),
        viewer.camera.zoom()
    );
    Ok(())
}

fn process_input(window: &mut PWindow, camera: &mut Camera, delta_time: f32) {
    if input::is_pressed(window, CLOSE_KEY) {
        window.set_should_close(true);
    }
    for movement in CameraMovement::iter() {
        if input::is_pressed(window, movement.key()) {
            camera.process_keyboard(movement, delta_time);
        }
    }
}

/// The size GLFW reports, or the requested window size when the window
/// starts minimized.
fn initial_framebuffer_size(reported: (i32, i32), window: &WindowConfig) -> (i32, i32) {
    match reported {
        (w, h) if w > 0 && h > 0 => (w, h),
        _ => (window.width as i32, window.height as i32),
    }
}

/// Camera plus the window state that feeds it.
struct Viewer {
    camera: Camera,
    cursor: CursorTracker,
    framebuffer_size: (i32, i32),
}

impl Viewer {
    fn new(camera: Camera, framebuffer_size: (i32, i32)) -> Self {
        Self {
            camera,
            cursor: CursorTracker::default(),
            framebuffer_size,
        }
    }

    fn aspect(&self) -> f32 {
        self.framebuffer_size.0 as f32 / self.framebuffer_size.1 as f32
    }

    /// Returns the new viewport size when the framebuffer was resized.
    fn handle_event(&mut self, event: WindowEvent) -> Option<(i32, i32)> {
        match event {
            WindowEvent::CursorPos(x, y) => {
                let (dx, dy) = self.cursor.offset(x, y);
                self.camera.process_mouse_movement(dx, dy, true);
                None
            }
            WindowEvent::Scroll(_, y) => {
                self.camera.process_mouse_scroll(y as f32);
                None
            }
            // Minimized windows report 0x0.
            WindowEvent::FramebufferSize(w, h) if w > 0 && h > 0 => {
                self.framebuffer_size = (w, h);
                Some((w, h))
            }
            _ => None,
        }
    }
}

/// Frame delta timing with a periodic FPS line in the debug log.
#[derive(Debug)]
pub struct FrameClock {
    last: f64,
    frames: u64,
    report_start: f64,
    report_frames: u32,
    fps: Option<f64>,
}

impl FrameClock {
    pub fn new(now: f64) -> Self {
        Self {
            last: now,
            frames: 0,
            report_start: now,
            report_frames: 0,
            fps: None,
        }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self, now: f64) -> f32 {
        let delta = (now - self.last).max(0.0);
        self.last = now;
        self.frames += 1;
        self.report_frames += 1;

        let elapsed = now - self.report_start;
        if elapsed >= FPS_REPORT_INTERVAL {
            let fps = f64::from(self.report_frames) / elapsed;
            log::debug!("{fps:.1} fps");
            self.fps = Some(fps);
            self.report_start = now;
            self.report_frames = 0;
        }

        delta as f32
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Average over the last completed report interval.
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }
}
