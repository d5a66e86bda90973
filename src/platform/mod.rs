//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Canvas painting and DOM input (wasm32 only, see `web`)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Install the platform logger; later calls are ignored
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialised");
    }
}

/// Install the panic hook and console logger; later calls are ignored
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialised");
    }
}
