//! Error types for pixel packing, delta computation and tile analysis.

use thiserror::Error;

use crate::gfx::palette::Color;

/// Errors that can occur while converting, diffing or tiling CPC graphics
#[derive(Debug, Error)]
pub enum GfxError {
	/// A colour is not part of the palette it was looked up in
	#[error("Color {0} not found in palette")]
	ColorNotFound(Color),

	/// A tile is not part of the sorted tile catalog
	#[error("Tile {width}x{height} not found in the tile catalog")]
	TileNotFound {
		/// Tile width in pixels
		width: u32,
		/// Tile height in pixels
		height: u32,
	},

	/// Two buffers (or a buffer and its declared geometry) have different sizes
	#[error("Size mismatch: expected {expected} bytes, got {actual} bytes")]
	SizeMismatch {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// A hardware address cannot be mapped back into the screen layout
	#[error("Address #{address:04X} is out of range for screen origin #{origin:04X}")]
	AddressOutOfRange {
		/// Hardware address that was requested
		address: u16,
		/// Screen origin the address was resolved against
		origin: u16,
	},

	/// A byte column / line pair falls outside the screen memory banks
	#[error("Coordinates (column {column}, line {line}) fall outside the screen memory")]
	CoordinatesOutOfRange {
		/// Byte column
		column: u32,
		/// Pixel line
		line: u32,
	},

	/// Too many entries for a single byte index
	#[error("Capacity exceeded: {count} entries, at most {max} can be indexed")]
	CapacityExceeded {
		/// Number of entries found
		count: usize,
		/// Maximum number of entries allowed
		max: usize,
	},

	/// Frame or tile dimensions unusable for the requested operation
	#[error("Invalid dimensions {width}x{height}: {reason}")]
	InvalidDimensions {
		/// Width in pixels
		width: u32,
		/// Height in pixels
		height: u32,
		/// Why the dimensions were rejected
		reason: &'static str,
	},

	/// Unknown screen mode number
	#[error("Invalid screen mode: {0}")]
	InvalidMode(u8),

	/// Palette holds more colours than the screen mode can address
	#[error("Palette has {len} colors, mode allows at most {max}")]
	PaletteOverflow {
		/// Number of colours in the palette
		len: usize,
		/// Maximum number of colours for the mode
		max: usize,
	},

	/// An animation needs at least two frames
	#[error("Need more than one frame to build an animation, got {0}")]
	NotEnoughFrames(usize),

	/// Not enough data to parse
	#[error("Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Header checksum does not match its content
	#[error("Invalid checksum: stored #{stored:04X}, computed #{computed:04X}")]
	InvalidChecksum {
		/// Checksum read from the data
		stored: u16,
		/// Checksum computed over the data
		computed: u16,
	},

	/// Ink swap table that cannot be parsed or applied
	#[error("Invalid ink swap: {0}")]
	InvalidInkSwap(String),

	/// Sprite mask value that does not select whole pixels in the mode
	#[error("Mask #{value:02X} is not allowed in mode {mode}")]
	MaskNotAllowed {
		/// Screen mode number
		mode: u8,
		/// Mask byte
		value: u8,
	},

	/// Compression algorithm not available
	#[error("Unsupported compression: {0}")]
	UnsupportedCompression(String),

	/// JSON (de)serialization error
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl GfxError {
	/// Returns `true` if the caller may substitute a fallback and continue.
	///
	/// Lookup misses, address translation failures and catalog overflows are recoverable;
	/// size and dimension errors abort the operation that raised them.
	pub fn is_recoverable(&self) -> bool {
		matches!(
			self,
			Self::ColorNotFound(_)
				| Self::TileNotFound {
					..
				} | Self::AddressOutOfRange {
				..
			} | Self::CoordinatesOutOfRange {
				..
			} | Self::CapacityExceeded {
				..
			}
		)
	}

	pub(crate) fn invalid_dimensions(width: u32, height: u32, reason: &'static str) -> Self {
		Self::InvalidDimensions {
			width,
			height,
			reason,
		}
	}
}
