//! Prelude module for `cpcpix_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and functions.
//!
//! # Examples
//!
//! ```
//! use cpcpix_types::prelude::*;
//!
//! let board = AnalyzeBoard::analyze(&image::RgbaImage::new(16, 16), Size::new(8, 8)).unwrap();
//! assert_eq!(board.sort().unwrap().len(), 1);
//! ```

#[doc(inline)]
pub use crate::gfx::{
	// Errors
	GfxError,

	// Geometry
	Mode,
	Size,
	ScreenLayout,
	ScreenPosition,

	// Palettes
	Color,
	Palette,
	FirmwareColor,
	OcpPalette,
	InkSwap,

	// Frames
	Layout,
	PackedFrame,

	// Deltas
	DeltaAnimation,
	DeltaCollection,
	DeltaItem,
	Placement,

	// Tiles
	AnalyzeBoard,
	BoardTile,
	SortedTiles,
	Tile,
	TileCriteria,
	TileMap,

	// Sprites
	MaskOp,
	SpriteMask,
	SpriteHard,
	SprFile,

	// Settings
	ConvertConfig,
};

#[doc(inline)]
pub use crate::gfx::{
	delta::{delta_chain, diff, diff_images},
	export::{AmsdosHeader, AsmFormat, Compression, Compressor, JsonExport},
	frame::{decode, encode},
	sprite::{encode_board, mask_is_allowed, split_board},
	tile::{choose_tile_size, imp_catcher, tile_index},
};
