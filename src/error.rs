//! # Error Module
//!
//! Error types surfaced by the voxel world core. Every fallible operation in the
//! crate returns [`Result`], and errors are always handed back to the caller (the
//! input/UI layer), which decides how to notify the user.

use thiserror::Error;

use crate::engine_state::voxels::block::BlockId;

/// Errors produced by the voxel world core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VoxelError {
    /// A block id that is not present in the block registry was written.
    #[error("unknown block kind: {0}")]
    UnknownBlockKind(BlockId),

    /// An operation was called with an argument outside its domain.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// A snapshot document could not be parsed or referenced unknown data.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// A numeric argument was outside the accepted range.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VoxelError>;
