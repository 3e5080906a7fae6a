//! OCP Art Studio `.PAL` palette files.
//!
//! # File Structure (239 bytes)
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  --------------------------------------------
//! 0x00    1     screen mode
//! 0x01    1     color animation flag
//! 0x02    1     color animation delay
//! 0x03    192   16 inks x 12 gate array values (one per animation step)
//! 0xC3    12    border x 12 gate array values
//! 0xCF    16    excluded ink flags
//! 0xDF    16    protected ink flags
//! ```
//!
//! Without color animation all 12 values of an ink are identical.

use crate::gfx::{GfxError, Mode};

use super::{Color, Palette, firmware};

/// OCP palette constants.
pub mod constants {
	/// Number of ink slots stored in the file
	pub const INK_COUNT: usize = 16;

	/// Number of animation steps per ink
	pub const STEPS: usize = 12;

	/// Offset of the first ink entry
	pub const INKS_OFFSET: usize = 3;

	/// Offset of the border entry
	pub const BORDER_OFFSET: usize = INKS_OFFSET + INK_COUNT * STEPS;

	/// Offset of the excluded ink flags
	pub const EXCLUDED_OFFSET: usize = BORDER_OFFSET + STEPS;

	/// Offset of the protected ink flags
	pub const PROTECTED_OFFSET: usize = EXCLUDED_OFFSET + INK_COUNT;

	/// Total file size
	pub const FILE_SIZE: usize = PROTECTED_OFFSET + INK_COUNT;
}

/// Gate array value for black, used for unset inks.
const BLACK_HARDWARE: u8 = 0x54;

/// An OCP Art Studio palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcpPalette {
	mode: Mode,
	animation: u8,
	animation_delay: u8,
	inks: [[u8; constants::STEPS]; constants::INK_COUNT],
	border: [u8; constants::STEPS],
	excluded: [u8; constants::INK_COUNT],
	protected: [u8; constants::INK_COUNT],
}

impl OcpPalette {
	/// Builds an OCP palette from an ink-ordered palette.
	///
	/// The border takes the color of ink 0. Inks beyond the palette length are black.
	///
	/// # Errors
	///
	/// Returns [`GfxError::PaletteOverflow`] if the palette does not fit the mode and
	/// [`GfxError::ColorNotFound`] if a color is not a firmware color.
	pub fn from_palette(palette: &Palette, mode: Mode) -> Result<Self, GfxError> {
		palette.check_mode(mode)?;
		let hardware = palette.hardware_values()?;

		let mut inks = [[BLACK_HARDWARE; constants::STEPS]; constants::INK_COUNT];
		for (ink, value) in inks.iter_mut().zip(hardware.iter()) {
			*ink = [*value; constants::STEPS];
		}
		let border = [hardware.first().copied().unwrap_or(BLACK_HARDWARE); constants::STEPS];

		Ok(Self {
			mode,
			animation: 0,
			animation_delay: 0,
			inks,
			border,
			excluded: [0; constants::INK_COUNT],
			protected: [0; constants::INK_COUNT],
		})
	}

	/// Parses an OCP palette.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InsufficientData`] if fewer than 239 bytes are given and
	/// [`GfxError::InvalidMode`] for an unknown mode byte.
	pub fn from_bytes(data: &[u8]) -> Result<Self, GfxError> {
		if data.len() < constants::FILE_SIZE {
			return Err(GfxError::InsufficientData {
				expected: constants::FILE_SIZE,
				actual: data.len(),
			});
		}

		let mode = Mode::try_from(data[0])?;
		let mut inks = [[0u8; constants::STEPS]; constants::INK_COUNT];
		for (i, ink) in inks.iter_mut().enumerate() {
			let offset = constants::INKS_OFFSET + i * constants::STEPS;
			ink.copy_from_slice(&data[offset..offset + constants::STEPS]);
		}
		let mut border = [0u8; constants::STEPS];
		border.copy_from_slice(
			&data[constants::BORDER_OFFSET..constants::BORDER_OFFSET + constants::STEPS],
		);
		let mut excluded = [0u8; constants::INK_COUNT];
		excluded.copy_from_slice(
			&data[constants::EXCLUDED_OFFSET..constants::EXCLUDED_OFFSET + constants::INK_COUNT],
		);
		let mut protected = [0u8; constants::INK_COUNT];
		protected.copy_from_slice(
			&data[constants::PROTECTED_OFFSET..constants::PROTECTED_OFFSET + constants::INK_COUNT],
		);

		Ok(Self {
			mode,
			animation: data[1],
			animation_delay: data[2],
			inks,
			border,
			excluded,
			protected,
		})
	}

	/// Serializes the palette to its 239-byte file layout.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut data = Vec::with_capacity(constants::FILE_SIZE);
		data.push(self.mode as u8);
		data.push(self.animation);
		data.push(self.animation_delay);
		for ink in &self.inks {
			data.extend_from_slice(ink);
		}
		data.extend_from_slice(&self.border);
		data.extend_from_slice(&self.excluded);
		data.extend_from_slice(&self.protected);
		data
	}

	/// Returns the screen mode stored in the file.
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Returns the first animation step of every ink the mode can display.
	///
	/// Unknown gate array values decode as black.
	pub fn palette(&self) -> Palette {
		self.inks
			.iter()
			.take(self.mode.colors_available())
			.map(|ink| firmware::color_of_hardware(ink[0]).unwrap_or(Color::rgb(0, 0, 0)))
			.collect()
	}

	/// Returns the border color.
	pub fn border(&self) -> Option<Color> {
		firmware::color_of_hardware(self.border[0])
	}
}
