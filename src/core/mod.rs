//! # Core Module
//!
//! Resource-sharing primitives used throughout the sandbox. Everything in the
//! voxel core runs on a single logical execution context, so only the
//! single-threaded variants exist.
//!
//! ## Key Components
//! - `StResource`: Single-threaded reference-counted resource with interior mutability

pub mod st_resource;

pub use st_resource::StResource;
