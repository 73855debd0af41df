//! # Voxel Sandbox Entry Point
//!
//! Native entry point. Generates the starting world headlessly and optionally
//! exports it. For the browser build, see `run_web()` and `WebSandbox` in the
//! library.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [config.json] [--save]
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    voxel_sandbox::run();
}
