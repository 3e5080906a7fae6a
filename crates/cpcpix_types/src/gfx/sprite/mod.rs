//! Sprite boards and sprite masks.
//!
//! A sprite board is one image holding a grid of equally sized sprites. [`split_board`] cuts
//! it into sprite images and [`encode_board`] packs each of them, in the order the sprites
//! are usually laid out in memory: column by column, each column top to bottom.
//!
//! [`SpriteMask`] combines every packed byte with a pixel mask, to punch or force the
//! pixels a drawing routine mixes with the background.
//!
//! CPC+ hardware sprites live in [`hard`].

pub mod hard;

use std::fmt;

use image::{RgbaImage, imageops};
use serde::{Deserialize, Serialize};

use crate::gfx::{GfxError, Layout, Mode, PackedFrame, Palette, frame};

pub use hard::{SprFile, SpriteHard};

/// Cuts a board of `columns` by `rows` sprites into sprite images.
///
/// Sprites are returned column by column. Pixels left over when the board is not a multiple
/// of the grid are ignored with a warning.
///
/// # Errors
///
/// Returns [`GfxError::InvalidDimensions`] for an empty grid or a board smaller than the
/// grid.
pub fn split_board(image: &RgbaImage, columns: u32, rows: u32) -> Result<Vec<RgbaImage>, GfxError> {
	if columns == 0 || rows == 0 {
		return Err(GfxError::invalid_dimensions(columns, rows, "empty sprite grid"));
	}
	let width = image.width() / columns;
	let height = image.height() / rows;
	if width == 0 || height == 0 {
		return Err(GfxError::invalid_dimensions(
			image.width(),
			image.height(),
			"board is smaller than the sprite grid",
		));
	}
	if image.width() % columns != 0 || image.height() % rows != 0 {
		log::warn!(
			"board {}x{} is not a multiple of {columns}x{rows} sprites, trailing pixels ignored",
			image.width(),
			image.height()
		);
	}

	let mut sprites = Vec::with_capacity((columns * rows) as usize);
	for column in 0..columns {
		for row in 0..rows {
			sprites.push(imageops::crop_imm(image, column * width, row * height, width, height).to_image());
		}
	}
	log::debug!("split board into {} sprites of {width}x{height}", sprites.len());
	Ok(sprites)
}

/// Splits a board and packs every sprite in raster order.
///
/// # Errors
///
/// Returns the errors of [`split_board`], and those of [`frame::encode`] when the sprite
/// width is not a whole number of bytes or the palette does not fit the mode.
pub fn encode_board(
	image: &RgbaImage,
	palette: &Palette,
	columns: u32,
	rows: u32,
	mode: Mode,
) -> Result<Vec<PackedFrame>, GfxError> {
	split_board(image, columns, rows)?
		.iter()
		.map(|sprite| frame::encode(sprite, palette, mode, Layout::Sprite))
		.collect()
}

/// Returns the mask bytes that select whole pixels in `mode`.
///
/// Mode 0 masks select the left or right pixel, mode 1 masks one of the four pixels. Mode 2
/// has no mask.
pub const fn allowed_masks(mode: Mode) -> &'static [u8] {
	match mode {
		Mode::Mode0 => &[0xAA, 0x55],
		Mode::Mode1 => &[0x88, 0x44, 0x22, 0x11],
		Mode::Mode2 => &[],
	}
}

/// Returns `true` if `value` is one of the [`allowed_masks`] of `mode`.
pub fn mask_is_allowed(mode: Mode, value: u8) -> bool {
	allowed_masks(mode).contains(&value)
}

/// How the mask is combined with each byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskOp {
	/// Keeps only the masked pixels
	#[default]
	And,
	/// Sets every bit of the masked pixels
	Or,
}

/// A pixel mask applied to every byte of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteMask {
	/// Mask byte, see [`allowed_masks`]
	pub value: u8,
	/// Combination with the sprite bytes
	#[serde(default)]
	pub op: MaskOp,
}

impl SpriteMask {
	/// Creates a mask.
	pub const fn new(value: u8, op: MaskOp) -> Self {
		Self {
			value,
			op,
		}
	}

	/// Combines one byte with the mask.
	#[inline]
	pub const fn apply_byte(&self, byte: u8) -> u8 {
		match self.op {
			MaskOp::And => byte & self.value,
			MaskOp::Or => byte | self.value,
		}
	}

	/// Returns a copy of `frame` with every byte combined with the mask.
	///
	/// # Errors
	///
	/// Returns [`GfxError::MaskNotAllowed`] if the mask does not select whole pixels in the
	/// frame's mode.
	pub fn apply(&self, frame: &PackedFrame) -> Result<PackedFrame, GfxError> {
		let mode = frame.mode();
		if !mask_is_allowed(mode, self.value) {
			return Err(GfxError::MaskNotAllowed {
				mode: u8::from(mode),
				value: self.value,
			});
		}
		let data = frame.as_bytes().iter().map(|&b| self.apply_byte(b)).collect();
		PackedFrame::from_raw(data, mode, frame.size(), frame.layout())
	}
}

impl fmt::Display for SpriteMask {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let op = match self.op {
			MaskOp::And => "and",
			MaskOp::Or => "or",
		};
		write!(f, "{op} #{:02X}", self.value)
	}
}
