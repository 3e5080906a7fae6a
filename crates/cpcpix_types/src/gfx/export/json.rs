//! JSON description of a converted frame.

use serde::{Deserialize, Serialize};

use crate::gfx::{GfxError, Palette};

/// A converted frame in the JSON export format.
///
/// ```json
/// {
///   "label": "logo",
///   "width": 160,
///   "height": 200,
///   "screen": ["0x00", "0xc0"],
///   "palette": ["00", "26"],
///   "hardwarepalette": ["0x54", "0x4b"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonExport {
	/// Frame name
	pub label: String,
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
	/// Packed bytes as `0x..` strings
	pub screen: Vec<String>,
	/// Firmware color numbers, two decimal digits
	pub palette: Vec<String>,
	/// Gate array values as `0x..` strings
	#[serde(rename = "hardwarepalette")]
	pub hardware_palette: Vec<String>,
}

impl JsonExport {
	/// Describes packed bytes and their palette.
	///
	/// # Errors
	///
	/// Returns [`GfxError::ColorNotFound`] if the palette has non firmware colors.
	pub fn new(
		label: impl Into<String>,
		width: u32,
		height: u32,
		data: &[u8],
		palette: &Palette,
	) -> Result<Self, GfxError> {
		Ok(Self {
			label: label.into(),
			width,
			height,
			screen: data.iter().map(|b| format!("0x{b:02x}")).collect(),
			palette: palette.firmware_numbers()?.iter().map(|n| format!("{n:02}")).collect(),
			hardware_palette: palette
				.hardware_values()?
				.iter()
				.map(|h| format!("0x{h:02x}"))
				.collect(),
		})
	}

	/// Serializes to pretty-printed JSON.
	///
	/// # Errors
	///
	/// Returns [`GfxError::Json`] on serialization failure.
	pub fn to_json(&self) -> Result<String, GfxError> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Parses the JSON export format.
	///
	/// # Errors
	///
	/// Returns [`GfxError::Json`] for malformed input.
	pub fn from_json(json: &str) -> Result<Self, GfxError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Decodes the `screen` strings back into bytes; malformed entries are skipped.
	pub fn screen_bytes(&self) -> Vec<u8> {
		self.screen
			.iter()
			.filter_map(|s| u8::from_str_radix(s.trim_start_matches("0x"), 16).ok())
			.collect()
	}
}
