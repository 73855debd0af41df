#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sandbox
//!
//! The world core of a browser voxel sandbox: a sparse block store, procedural
//! terrain, voxel raycasting for picking, JSON snapshots, and a batched
//! instance representation kept in sync with the store for an external
//! renderer.
//!
//! The crate builds for both native targets and WebAssembly. On the web the
//! page drives a [`application_state::Sandbox`] through the `WebSandbox`
//! bindings; natively, [`run`] generates a world headlessly and can export it.
//!
//! ## Key Modules
//!
//! * `application_state` - The sandbox session, its configuration and viewpoint
//! * `core` - Shared single-threaded resource handles
//! * `engine_state` - Blocks, the store, terrain, raycasting, snapshots and render batches
//! * `error` - The error type every fallible operation returns
//!
//! ## Usage
//!
//! ```rust,no_run
//! // Native entry point
//! fn main() {
//!     voxel_sandbox::run();
//! }
//! ```
//!
//! From JavaScript:
//!
//! ```js
//! import init, { run_web, WebSandbox } from "./voxel_sandbox.js";
//! await init();
//! run_web();
//! const sandbox = new WebSandbox(null);
//! ```

pub mod application_state;
pub mod core;
pub mod engine_state;
pub mod error;

pub use application_state::{config::SandboxConfig, CommandOutcome, Sandbox, SandboxCommand};
pub use error::{Result, VoxelError};

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        use wasm_bindgen::prelude::wasm_bindgen;

        /// Installs the panic hook and the console logger. Call once before
        /// creating a `WebSandbox`.
        #[wasm_bindgen]
        pub fn run_web() {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Info).is_err() {
                log::warn!("Logger was already initialized");
            }
        }
    } else {
        use log::{error, info};

        /// Flag asking [`run`] to write the generated world to disk.
        pub const SAVE_FLAG: &str = "--save";

        /// Native entry point.
        ///
        /// Reads an optional JSON config path and the `--save` flag from the
        /// command line, generates the starting world, and with `--save` writes
        /// its snapshot into the working directory.
        pub fn run() {
            let mut log_builder = env_logger::Builder::new();
            log_builder
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .init();
            info!("Logger initialized");

            let mut save = false;
            let mut config_path = None;
            for arg in std::env::args().skip(1) {
                if arg == SAVE_FLAG {
                    save = true;
                } else {
                    config_path = Some(arg);
                }
            }

            let config = match config_path {
                Some(path) => match std::fs::read_to_string(&path) {
                    Ok(json) => SandboxConfig::from_json(&json),
                    Err(err) => {
                        error!("Could not read config {path}: {err}");
                        return;
                    }
                },
                None => Ok(SandboxConfig::default()),
            };

            let mut sandbox = match config.and_then(Sandbox::start) {
                Ok(sandbox) => sandbox,
                Err(err) => {
                    error!("Could not start sandbox: {err}");
                    return;
                }
            };

            let direction = sandbox.view().direction;
            let on_ground = sandbox.move_view(application_state::view::SPAWN_POSITION, direction);
            info!(
                "World ready: {} blocks in {} batches, spawn grounded: {on_ground}",
                sandbox.store().len(),
                sandbox.renderer().batch_count()
            );

            if save {
                match sandbox.handle(SandboxCommand::RequestSave) {
                    Ok(CommandOutcome::Saved(saved)) => {
                        match std::fs::write(&saved.file_name, &saved.bytes) {
                            Ok(()) => info!("Wrote {}", saved.file_name),
                            Err(err) => error!("Could not write {}: {err}", saved.file_name),
                        }
                    }
                    Ok(_) => {}
                    Err(err) => error!("Could not save world: {err}"),
                }
            }
        }
    }
}
