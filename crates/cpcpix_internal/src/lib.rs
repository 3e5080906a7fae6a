//! This module is separated into its own crate to enable simple dynamic linking for `cpcpix`, and should not be used directly.

/// `use cpcpix::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export cpcpix_types for convenience
pub use cpcpix_types;

// Re-export commonly used types at crate root
pub use cpcpix_types::gfx::{
	Color, GfxError, Layout, Mode, PackedFrame, Palette, ScreenLayout, Size, frame::decode, frame::encode,
};
