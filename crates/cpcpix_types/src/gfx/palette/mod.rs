//! Palette support.
//!
//! A [`Palette`] is an ordered list of colors: the position of a color in the list is the
//! ink number written into packed pixels. Palettes are produced by an external quantization
//! step and are never reordered by this crate.
//!
//! Submodules:
//! - [`firmware`]: the 27 colors of the CPC firmware and their gate array values
//! - [`ocp`]: OCP Art Studio `.PAL` palette files
//! - [`swap`]: ink renumbering of packed data

use std::fmt;

use image::Rgba;

use crate::gfx::{GfxError, Mode};

pub mod firmware;
pub mod ocp;
pub mod swap;

pub use firmware::FirmwareColor;
pub use ocp::OcpPalette;
pub use swap::InkSwap;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Euclidean distance between the RGB components of two colors.
	pub fn distance(&self, other: &Color) -> f64 {
		let dr = f64::from(self.r) - f64::from(other.r);
		let dg = f64::from(self.g) - f64::from(other.g);
		let db = f64::from(self.b) - f64::from(other.b);
		(dr * dr + dg * dg + db * db).sqrt()
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

impl From<Rgba<u8>> for Color {
	fn from(pixel: Rgba<u8>) -> Self {
		let [r, g, b, a] = pixel.0;
		Self::new(r, g, b, a)
	}
}

impl From<Color> for Rgba<u8> {
	fn from(color: Color) -> Self {
		Rgba([color.r, color.g, color.b, color.a])
	}
}

/// Ordered palette; positions are ink numbers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
	colors: Vec<Color>,
}

impl Palette {
	/// Creates an empty palette.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a palette from an ordered list of colors.
	pub fn from_colors(colors: Vec<Color>) -> Self {
		Self {
			colors,
		}
	}

	/// Builds a palette from the distinct colors of an image, in first-seen raster order.
	///
	/// Only meaningful for images that are already quantized.
	pub fn from_image(image: &image::RgbaImage) -> Self {
		let mut colors: Vec<Color> = Vec::new();
		for pixel in image.pixels() {
			let color = Color::from(*pixel);
			if !colors.contains(&color) {
				colors.push(color);
			}
		}
		Self {
			colors,
		}
	}

	/// Returns the ink number of `color`.
	///
	/// All four channels must match exactly; there is no nearest-color fallback.
	///
	/// # Errors
	///
	/// Returns [`GfxError::ColorNotFound`] when the color is absent.
	pub fn index_of(&self, color: &Color) -> Result<u8, GfxError> {
		self.colors
			.iter()
			.position(|c| c == color)
			.and_then(|index| u8::try_from(index).ok())
			.ok_or(GfxError::ColorNotFound(*color))
	}

	/// Returns the color of an ink, if the palette defines it.
	#[inline]
	pub fn get(&self, index: u8) -> Option<Color> {
		self.colors.get(index as usize).copied()
	}

	/// Appends a color at the next ink number.
	pub fn push(&mut self, color: Color) {
		self.colors.push(color);
	}

	/// Returns the number of colors.
	#[inline]
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Returns `true` if the palette holds no color.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Returns the colors in ink order.
	#[inline]
	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Returns an iterator over palette colors.
	pub fn iter(&self) -> impl Iterator<Item = &Color> {
		self.colors.iter()
	}

	/// Checks that every ink of the palette can be encoded in `mode`.
	///
	/// # Errors
	///
	/// Returns [`GfxError::PaletteOverflow`] when the palette is too large.
	pub fn check_mode(&self, mode: Mode) -> Result<(), GfxError> {
		let max = mode.colors_available();
		if self.colors.len() > max {
			return Err(GfxError::PaletteOverflow {
				len: self.colors.len(),
				max,
			});
		}
		Ok(())
	}

	/// Returns the firmware color numbers of every ink.
	///
	/// # Errors
	///
	/// Returns [`GfxError::ColorNotFound`] for the first color outside the firmware palette.
	pub fn firmware_numbers(&self) -> Result<Vec<u8>, GfxError> {
		self.colors.iter().map(firmware::firmware_number).collect()
	}

	/// Returns the gate array hardware values of every ink.
	///
	/// # Errors
	///
	/// Returns [`GfxError::ColorNotFound`] for the first color outside the firmware palette.
	pub fn hardware_values(&self) -> Result<Vec<u8>, GfxError> {
		self.colors.iter().map(firmware::hardware_value).collect()
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Palette: {} colors", self.colors.len())
	}
}

impl FromIterator<Color> for Palette {
	fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
		Self {
			colors: iter.into_iter().collect(),
		}
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}
