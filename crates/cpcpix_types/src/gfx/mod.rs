//! Amstrad CPC graphics.
//!
//! # Components
//!
//! - [`palette`]: ink-ordered palettes, firmware colors and OCP palette files
//! - [`pixel`]: packing of pixel inks into gate array bytes, per mode
//! - [`address`]: interleaved screen memory addressing, standard and overscan
//! - [`frame`]: whole image encoding and decoding
//! - [`delta`]: byte deltas between frames and looping animations
//! - [`tile`]: tile deduplication, ranking and tile maps
//! - [`sprite`]: sprite boards, sprite masks and CPC+ hardware sprites
//! - [`export`]: assembly, AMSDOS, JSON and compression outputs
//! - [`config`]: conversion settings

pub mod address;
pub mod config;
pub mod delta;
pub mod error;
pub mod export;
pub mod frame;
pub mod mode;
pub mod palette;
pub mod pixel;
pub mod sprite;
pub mod tile;

pub use address::{ScreenLayout, ScreenPosition};
pub use config::ConvertConfig;
pub use delta::{DeltaAnimation, DeltaCollection, DeltaItem, Placement};
pub use error::GfxError;
pub use frame::{Layout, PackedFrame};
pub use mode::{Mode, Size};
pub use palette::{Color, FirmwareColor, InkSwap, OcpPalette, Palette};
pub use sprite::{MaskOp, SprFile, SpriteHard, SpriteMask};
pub use tile::{AnalyzeBoard, BoardTile, SortedTiles, Tile, TileCriteria, TileMap};
