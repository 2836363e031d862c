#![deny(rust_2018_compatibility)]

extern crate nalgebra_glm as glm;

mod application;
mod camera;
mod config;
mod data3d;
mod error;
mod gl_wrappers;
mod input;
mod lighting;
mod logging;
mod rendering;
mod runtime;
mod scene;
mod texture;

use config::{Config, CONFIG_PATH};
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    let config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if config.window.detach_console {
        detach_console();
    }

    match runtime::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(windows)]
fn detach_console() {
    if let Err(err) = unsafe { windows::Win32::System::Console::FreeConsole() } {
        log::warn!("could not detach console: {err}");
    }
}

#[cfg(not(windows))]
fn detach_console() {
    log::debug!("no console to detach on this platform");
}
