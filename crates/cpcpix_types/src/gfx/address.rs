//! Screen memory addressing.
//!
//! The CRTC scans video memory in character rows of 8 raster lines. Raster line `r` of a
//! character row lives in its own 2 KiB block (`r * 0x800`), and consecutive character rows
//! are `line_width` bytes apart inside each block:
//!
//! ```text
//! offset(column, y) = (y % 8) * 0x800 + (y / 8) * line_width + column
//! ```
//!
//! Going down one pixel line therefore adds `0x800`, except when crossing a character row
//! boundary, where the address goes back to block 0 and moves forward by `line_width`.
//!
//! # Overscan
//!
//! An overscan screen spans two 16 KiB banks (`0x8000-0xFFFF`). The CRTC address counter
//! runs linearly over the character rows; once the intra-block position passes `0x800`
//! the counter carries into the next bank. The position inside a bank is computed exactly
//! as in a standard screen:
//!
//! ```text
//! p      = (y / 8) * line_width + column
//! offset = (p / 0x800) * 0x4000 + (y % 8) * 0x800 + p % 0x800
//! ```

use serde::{Deserialize, Serialize};

use crate::gfx::GfxError;

/// Screen layout constants.
pub mod constants {
	/// Size of the block holding one raster line of every character row
	pub const BLOCK_SIZE: u32 = 0x800;

	/// Raster lines per character row
	pub const LINES_PER_ROW: u32 = 8;

	/// Size of one video memory bank
	pub const BANK_SIZE: u32 = 0x4000;

	/// Default line width of a standard screen (80 bytes, 40 characters)
	pub const STANDARD_LINE_WIDTH: u16 = 0x50;

	/// Default line width of an overscan screen (96 bytes, 48 characters)
	pub const OVERSCAN_LINE_WIDTH: u16 = 0x60;

	/// Hardware address of a standard screen
	pub const STANDARD_BASE: u16 = 0xC000;

	/// Hardware address of an overscan screen
	pub const OVERSCAN_BASE: u16 = 0x8000;
}

/// Geometry of a hardware screen buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenLayout {
	/// Bytes between two character rows (CRTC R1 * 2)
	pub line_width: u16,
	/// Whether the screen spans two banks
	pub overscan: bool,
}

impl Default for ScreenLayout {
	fn default() -> Self {
		Self::standard()
	}
}

/// Byte column and pixel line inside a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPosition {
	/// Column in bytes
	pub column: u32,
	/// Line in pixels
	pub line: u32,
}

impl ScreenLayout {
	/// The 80-byte wide single bank screen.
	pub const fn standard() -> Self {
		Self {
			line_width: constants::STANDARD_LINE_WIDTH,
			overscan: false,
		}
	}

	/// The 96-byte wide dual bank screen.
	pub const fn overscan() -> Self {
		Self {
			line_width: constants::OVERSCAN_LINE_WIDTH,
			overscan: true,
		}
	}

	/// Creates a layout with a custom line width.
	pub const fn new(line_width: u16, overscan: bool) -> Self {
		Self {
			line_width,
			overscan,
		}
	}

	/// Returns the number of memory banks used.
	#[inline]
	pub const fn banks(&self) -> u32 {
		if self.overscan { 2 } else { 1 }
	}

	/// Returns the size of the whole screen buffer.
	#[inline]
	pub const fn buffer_len(&self) -> usize {
		(self.banks() * constants::BANK_SIZE) as usize
	}

	/// Returns the hardware address of the first byte of the screen.
	#[inline]
	pub const fn base_address(&self) -> u16 {
		if self.overscan { constants::OVERSCAN_BASE } else { constants::STANDARD_BASE }
	}

	/// Returns the buffer offset of a byte column on a pixel line.
	///
	/// # Errors
	///
	/// Returns [`GfxError::CoordinatesOutOfRange`] when the column is wider than a line or
	/// the position escapes the available banks.
	pub fn offset(&self, column: u32, line: u32) -> Result<usize, GfxError> {
		let out_of_range = || GfxError::CoordinatesOutOfRange {
			column,
			line,
		};
		let line_width = u32::from(self.line_width);
		if column >= line_width {
			return Err(out_of_range());
		}

		let raster = line % constants::LINES_PER_ROW;
		let position = (line / constants::LINES_PER_ROW) * line_width + column;
		let bank = position / constants::BLOCK_SIZE;
		if bank >= self.banks() {
			return Err(out_of_range());
		}

		let offset = bank * constants::BANK_SIZE
			+ raster * constants::BLOCK_SIZE
			+ position % constants::BLOCK_SIZE;
		Ok(offset as usize)
	}

	/// Returns the hardware address of a byte column on a pixel line.
	///
	/// # Errors
	///
	/// Same as [`ScreenLayout::offset`].
	pub fn address(&self, column: u32, line: u32) -> Result<u16, GfxError> {
		let offset = self.offset(column, line)?;
		Ok(self.base_address().wrapping_add(offset as u16))
	}

	/// Returns the address the CRTC counter reaches for a position, without range checks.
	///
	/// Columns past the line width run into the next character row, positions past the
	/// last bank wrap to the first one and the result wraps at 64 KiB. Inside the screen
	/// this is [`ScreenLayout::address`].
	pub fn wrapping_address(&self, column: u32, line: u32) -> u16 {
		let raster = line % constants::LINES_PER_ROW;
		let position = (line / constants::LINES_PER_ROW)
			.wrapping_mul(u32::from(self.line_width))
			.wrapping_add(column);
		let bank = (position / constants::BLOCK_SIZE) % self.banks();
		let offset = bank * constants::BANK_SIZE
			+ raster * constants::BLOCK_SIZE
			+ position % constants::BLOCK_SIZE;
		self.base_address().wrapping_add(offset as u16)
	}

	/// Translates a buffer offset back to a screen position.
	///
	/// Offsets in the gap at the end of a block (past the last character row) decode to
	/// lines below the visible area; they are still valid memory.
	///
	/// # Errors
	///
	/// Returns [`GfxError::AddressOutOfRange`] when the offset is outside the buffer.
	pub fn position(&self, offset: usize) -> Result<ScreenPosition, GfxError> {
		if offset >= self.buffer_len() || self.line_width == 0 {
			return Err(GfxError::AddressOutOfRange {
				address: self.base_address().wrapping_add(offset as u16),
				origin: self.base_address(),
			});
		}

		let offset = offset as u32;
		let bank = offset / constants::BANK_SIZE;
		let within = offset % constants::BANK_SIZE;
		let raster = within / constants::BLOCK_SIZE;
		let position = bank * constants::BLOCK_SIZE + within % constants::BLOCK_SIZE;
		let line_width = u32::from(self.line_width);

		Ok(ScreenPosition {
			column: position % line_width,
			line: (position / line_width) * constants::LINES_PER_ROW + raster,
		})
	}

	/// Translates a hardware address into a screen position, relative to `origin`.
	///
	/// This is how an animation base address is converted into the coordinates where the
	/// animated sprite is drawn.
	///
	/// # Errors
	///
	/// Returns [`GfxError::AddressOutOfRange`] when `address` is before `origin` or past the
	/// screen buffer.
	pub fn coordinates(&self, address: u16, origin: u16) -> Result<ScreenPosition, GfxError> {
		let Some(offset) = address.checked_sub(origin) else {
			return Err(GfxError::AddressOutOfRange {
				address,
				origin,
			});
		};
		self.position(offset as usize).map_err(|_| GfxError::AddressOutOfRange {
			address,
			origin,
		})
	}

	/// Same as [`ScreenLayout::coordinates`], falling back to `(0, 0)` with a warning.
	pub fn coordinates_or_origin(&self, address: u16, origin: u16) -> ScreenPosition {
		self.coordinates(address, origin).unwrap_or_else(|err| {
			log::warn!("{err}, using screen position (0, 0)");
			ScreenPosition::default()
		})
	}
}
