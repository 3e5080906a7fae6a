//! Screen modes and frame geometry.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::gfx::GfxError;

/// One of the three gate array pixel packing schemes.
///
/// | Mode | Pixels per byte | Colors | Standard resolution |
/// |------|-----------------|--------|---------------------|
/// | 0    | 2               | 16     | 160x200             |
/// | 1    | 4               | 4      | 320x200             |
/// | 2    | 8               | 2      | 640x200             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Mode {
	/// 16 colors, 2 pixels per byte
	#[default]
	Mode0 = 0,

	/// 4 colors, 4 pixels per byte
	Mode1 = 1,

	/// 2 colors, 8 pixels per byte
	Mode2 = 2,
}

impl Mode {
	/// All modes, in firmware order.
	pub const ALL: [Mode; 3] = [Mode::Mode0, Mode::Mode1, Mode::Mode2];

	/// Returns the number of pixels packed in one byte.
	#[inline]
	pub const fn pixels_per_byte(self) -> u32 {
		match self {
			Mode::Mode0 => 2,
			Mode::Mode1 => 4,
			Mode::Mode2 => 8,
		}
	}

	/// Returns the number of inks the mode can display.
	#[inline]
	pub const fn colors_available(self) -> usize {
		match self {
			Mode::Mode0 => 16,
			Mode::Mode1 => 4,
			Mode::Mode2 => 2,
		}
	}

	/// Returns the number of bits used by each pixel.
	#[inline]
	pub const fn bits_per_pixel(self) -> u32 {
		8 / self.pixels_per_byte()
	}

	/// Step used when scanning candidate tile sizes for this mode.
	#[inline]
	pub const fn tile_step(self) -> u32 {
		match self {
			Mode::Mode0 => 8,
			Mode::Mode1 => 4,
			Mode::Mode2 => 2,
		}
	}
}

impl TryFrom<u8> for Mode {
	type Error = GfxError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Mode::Mode0),
			1 => Ok(Mode::Mode1),
			2 => Ok(Mode::Mode2),
			other => Err(GfxError::InvalidMode(other)),
		}
	}
}

impl From<Mode> for u8 {
	fn from(mode: Mode) -> Self {
		mode as u8
	}
}

impl Display for Mode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Mode {}", *self as u8)
	}
}

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
}

impl Size {
	/// Creates a new size.
	pub const fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
		}
	}

	/// Returns the width in bytes once packed for `mode`.
	#[inline]
	pub const fn mode_width(&self, mode: Mode) -> u32 {
		self.width / mode.pixels_per_byte()
	}

	/// Returns the packed length of a sprite buffer with these dimensions.
	#[inline]
	pub const fn packed_len(&self, mode: Mode) -> usize {
		self.mode_width(mode) as usize * self.height as usize
	}

	/// Returns the number of pixels.
	#[inline]
	pub const fn pixel_count(&self) -> usize {
		self.width as usize * self.height as usize
	}

	/// Checks that the width is a whole number of packed bytes for `mode`.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InvalidDimensions`] for empty sizes or when the width is not a
	/// multiple of the mode's pixel group.
	pub fn validate(&self, mode: Mode) -> Result<(), GfxError> {
		if self.width == 0 || self.height == 0 {
			return Err(GfxError::invalid_dimensions(self.width, self.height, "empty frame"));
		}
		if self.width % mode.pixels_per_byte() != 0 {
			return Err(GfxError::invalid_dimensions(
				self.width,
				self.height,
				"width is not a multiple of the mode pixel group",
			));
		}
		Ok(())
	}
}

impl Display for Size {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}x{}", self.width, self.height)
	}
}
