//! Shared value types for the voxstage workspace.

mod types;

pub use types::{Fill, GridCoord, ImageHandle, MountId, Rgba};
