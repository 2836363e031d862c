use std::{env, sync::Once};

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger.
///
/// The filter comes from `RUST_LOG` when it is set (e.g.
/// `campfire_scene=debug`), otherwise everything at `info` and above is shown.
/// Repeated calls are ignored.
pub fn init() {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match env::var("RUST_LOG") {
            Ok(filter) => {
                builder.parse_filters(&filter);
            }
            Err(_) => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.format_timestamp_millis();
        builder.init();

        log::debug!("logging initialized");
    });
}
