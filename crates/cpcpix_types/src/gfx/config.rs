//! Conversion settings.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::gfx::{
	GfxError, Layout, Mode, PackedFrame, ScreenLayout,
	delta::{DEFAULT_MAX_FRAMES, Placement},
	export::{AsmFormat, Compression},
	palette::InkSwap,
	sprite::SpriteMask,
	tile::TileCriteria,
};

/// Settings shared by every conversion.
///
/// Every field has a default, so a configuration file only lists what it changes:
///
/// ```json
/// { "mode": 1, "overscan": true, "ink_swap": "0=3,3=0", "asm": { "byte_token": "BYTE" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
	/// Screen mode
	pub mode: Mode,
	/// Dual bank screen
	pub overscan: bool,
	/// Bytes per character row, when the CRTC is reprogrammed
	pub line_width: Option<u16>,
	/// Pack as a sprite instead of a screen
	pub sprite: bool,
	/// Produce CPC+ hardware sprites
	pub sprite_hard: bool,
	/// Hardware address of the top-left byte of an animation
	pub start_address: Option<u16>,
	/// Packer applied to binary outputs
	pub compression: Compression,
	/// Decimation limit of animations, `0` keeps every frame
	pub max_frames: usize,
	/// Merge threshold of tile reduction
	pub tile_threshold: Option<f64>,
	/// Tile size selection criteria
	pub tile_criteria: TileCriteria,
	/// Ink renumbering applied to packed frames
	pub ink_swap: InkSwap,
	/// Pixel mask applied to packed frames
	pub mask: Option<SpriteMask>,
	/// Assembly dialect
	pub asm: AsmFormat,
}

impl Default for ConvertConfig {
	fn default() -> Self {
		Self {
			mode: Mode::default(),
			overscan: false,
			line_width: None,
			sprite: false,
			sprite_hard: false,
			start_address: None,
			compression: Compression::default(),
			max_frames: DEFAULT_MAX_FRAMES,
			tile_threshold: None,
			tile_criteria: TileCriteria::default(),
			ink_swap: InkSwap::default(),
			mask: None,
			asm: AsmFormat::default(),
		}
	}
}

impl ConvertConfig {
	/// Parses a JSON configuration.
	///
	/// # Errors
	///
	/// Returns [`GfxError::Json`] for malformed input.
	pub fn from_json(json: &str) -> Result<Self, GfxError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Reads a JSON configuration.
	///
	/// # Errors
	///
	/// Returns [`GfxError::Json`] for malformed input or read failures.
	pub fn from_reader<R: Read>(reader: R) -> Result<Self, GfxError> {
		Ok(serde_json::from_reader(reader)?)
	}

	/// Serializes to pretty-printed JSON.
	///
	/// # Errors
	///
	/// Returns [`GfxError::Json`] on serialization failure.
	pub fn to_json(&self) -> Result<String, GfxError> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Returns the screen geometry.
	pub fn screen_layout(&self) -> ScreenLayout {
		let layout = if self.overscan { ScreenLayout::overscan() } else { ScreenLayout::standard() };
		match self.line_width {
			Some(line_width) => ScreenLayout::new(line_width, layout.overscan),
			None => layout,
		}
	}

	/// Returns the byte layout of packed frames.
	pub fn layout(&self) -> Layout {
		if self.sprite { Layout::Sprite } else { Layout::Screen(self.screen_layout()) }
	}

	/// Applies the ink swap, then the mask, to a packed frame.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InvalidInkSwap`] or [`GfxError::MaskNotAllowed`] when they do not
	/// fit the frame's mode.
	pub fn finish_frame(&self, frame: PackedFrame) -> Result<PackedFrame, GfxError> {
		let frame = if self.ink_swap.is_empty() { frame } else { self.ink_swap.apply(&frame)? };
		match &self.mask {
			Some(mask) => mask.apply(&frame),
			None => Ok(frame),
		}
	}

	/// Returns the addressing of animation deltas.
	///
	/// Screen deltas start at the configured address, or the top-left of the screen.
	pub fn placement(&self) -> Placement {
		if self.sprite {
			return Placement::Sprite;
		}
		let layout = self.screen_layout();
		Placement::Screen {
			start: self.start_address.unwrap_or(layout.base_address()),
			layout,
		}
	}
}
