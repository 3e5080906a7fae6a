//! The CPC firmware palette.
//!
//! The gate array can display 27 colors. Each color has a firmware number (the value passed
//! to `SCR SET INK` / BASIC `INK`) and a hardware value (the byte written to the gate array
//! port). The firmware number is `9 * G + 3 * R + B` with each component at one of three
//! levels: off, half, full.

use crate::gfx::GfxError;

use super::Color;

/// Component intensity levels (off, half, full).
pub const LEVELS: [u8; 3] = [0x00, 0x80, 0xFF];

/// A firmware color with its gate array encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FirmwareColor {
	/// Firmware color number (0-26)
	pub firmware: u8,
	/// Gate array hardware value (bit 6 set)
	pub hardware: u8,
	/// Name used by the firmware documentation
	pub name: &'static str,
	/// RGB value
	pub color: Color,
}

const fn entry(firmware: u8, hardware: u8, name: &'static str) -> FirmwareColor {
	let b = LEVELS[(firmware % 3) as usize];
	let r = LEVELS[((firmware / 3) % 3) as usize];
	let g = LEVELS[(firmware / 9) as usize];
	FirmwareColor {
		firmware,
		hardware,
		name,
		color: Color::rgb(r, g, b),
	}
}

/// The 27 firmware colors, indexed by firmware number.
pub const FIRMWARE_COLORS: [FirmwareColor; 27] = [
	entry(0, 0x54, "Black"),
	entry(1, 0x44, "Blue"),
	entry(2, 0x55, "Bright Blue"),
	entry(3, 0x5C, "Red"),
	entry(4, 0x58, "Magenta"),
	entry(5, 0x5D, "Mauve"),
	entry(6, 0x4C, "Bright Red"),
	entry(7, 0x45, "Purple"),
	entry(8, 0x4D, "Bright Magenta"),
	entry(9, 0x56, "Green"),
	entry(10, 0x46, "Cyan"),
	entry(11, 0x57, "Sky Blue"),
	entry(12, 0x5E, "Yellow"),
	entry(13, 0x40, "White"),
	entry(14, 0x5F, "Pastel Blue"),
	entry(15, 0x4E, "Orange"),
	entry(16, 0x47, "Pink"),
	entry(17, 0x4F, "Pastel Magenta"),
	entry(18, 0x52, "Bright Green"),
	entry(19, 0x42, "Sea Green"),
	entry(20, 0x53, "Bright Cyan"),
	entry(21, 0x5A, "Lime"),
	entry(22, 0x59, "Pastel Green"),
	entry(23, 0x5B, "Pastel Cyan"),
	entry(24, 0x4A, "Bright Yellow"),
	entry(25, 0x43, "Pastel Yellow"),
	entry(26, 0x4B, "Bright White"),
];

/// Looks up the firmware entry of an RGB color.
///
/// Alpha is ignored; RGB must match one of the 27 colors exactly.
pub fn lookup(color: &Color) -> Option<&'static FirmwareColor> {
	FIRMWARE_COLORS.iter().find(|fc| {
		fc.color.r == color.r && fc.color.g == color.g && fc.color.b == color.b
	})
}

/// Returns the firmware number of a color.
///
/// # Errors
///
/// Returns [`GfxError::ColorNotFound`] if the color is not a firmware color.
pub fn firmware_number(color: &Color) -> Result<u8, GfxError> {
	lookup(color).map(|fc| fc.firmware).ok_or(GfxError::ColorNotFound(*color))
}

/// Returns the gate array value of a color.
///
/// # Errors
///
/// Returns [`GfxError::ColorNotFound`] if the color is not a firmware color.
pub fn hardware_value(color: &Color) -> Result<u8, GfxError> {
	lookup(color).map(|fc| fc.hardware).ok_or(GfxError::ColorNotFound(*color))
}

/// Returns the color of a firmware number, if valid.
pub fn color_of_firmware(firmware: u8) -> Option<Color> {
	FIRMWARE_COLORS.get(firmware as usize).map(|fc| fc.color)
}

/// Returns the color of a gate array value, if valid.
///
/// Bits 6 and 7 of the value are ignored, as the gate array does.
pub fn color_of_hardware(hardware: u8) -> Option<Color> {
	let value = (hardware & 0x1F) | 0x40;
	FIRMWARE_COLORS.iter().find(|fc| fc.hardware == value).map(|fc| fc.color)
}
