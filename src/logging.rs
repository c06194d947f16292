use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the `env_logger` backend once per process.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .try_init();
    });
}
