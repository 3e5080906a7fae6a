//! Packed frames: images converted to gate array bytes.
//!
//! A frame is stored either as a sprite (bytes in raster order, `mode_width` bytes per line)
//! or as a screen (bytes at their [`ScreenLayout`] offsets inside a full video buffer).
//!
//! # Example
//!
//! ```
//! use cpcpix_types::gfx::{Color, Layout, Mode, Palette, frame};
//!
//! let palette = Palette::from_colors(vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]);
//! let image = image::RgbaImage::from_pixel(16, 4, image::Rgba([0, 0, 0, 255]));
//! let packed = frame::encode(&image, &palette, Mode::Mode2, Layout::Sprite).unwrap();
//! assert_eq!(packed.as_bytes(), &[0x00; 8]);
//!
//! // Mode 2 packs 8 pixels per byte, a 4 pixel wide image is not a whole byte
//! let narrow = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
//! assert!(frame::encode(&narrow, &palette, Mode::Mode2, Layout::Sprite).is_err());
//! ```

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::gfx::{Color, GfxError, Mode, Palette, ScreenLayout, Size, pixel};

/// Where the bytes of a frame live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layout {
	/// Raster order, no addressing transform
	#[default]
	Sprite,
	/// Interleaved hardware screen memory
	Screen(ScreenLayout),
}

impl Layout {
	/// Returns the buffer length needed for a frame of `size` in `mode`.
	pub fn buffer_len(&self, size: Size, mode: Mode) -> usize {
		match self {
			Layout::Sprite => size.packed_len(mode),
			Layout::Screen(screen) => screen.buffer_len(),
		}
	}

	/// Returns the buffer offset of a byte column on a pixel line.
	///
	/// # Errors
	///
	/// Returns [`GfxError::CoordinatesOutOfRange`] if the position is outside the frame.
	pub fn offset(&self, size: Size, mode: Mode, column: u32, line: u32) -> Result<usize, GfxError> {
		match self {
			Layout::Sprite => {
				let mode_width = size.mode_width(mode);
				if column >= mode_width || line >= size.height {
					return Err(GfxError::CoordinatesOutOfRange {
						column,
						line,
					});
				}
				Ok(line as usize * mode_width as usize + column as usize)
			}
			Layout::Screen(screen) => screen.offset(column, line),
		}
	}

	/// Checks that a frame of `size` fits in this layout.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InvalidDimensions`] if the frame does not fit the screen memory.
	pub fn check_fits(&self, size: Size, mode: Mode) -> Result<(), GfxError> {
		let Layout::Screen(screen) = self else {
			return Ok(());
		};
		// The last byte has the highest intra-bank position
		let last_column = size.mode_width(mode).saturating_sub(1);
		let last_line = size.height.saturating_sub(1);
		if screen.offset(last_column, last_line).is_err() {
			return Err(GfxError::invalid_dimensions(
				size.width,
				size.height,
				"frame does not fit the screen memory",
			));
		}
		Ok(())
	}
}

/// A frame packed into gate array bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFrame {
	mode: Mode,
	size: Size,
	layout: Layout,
	data: Vec<u8>,
}

impl PackedFrame {
	/// Wraps raw bytes (a sprite dump or a screen file body) as a frame.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InvalidDimensions`] for unusable dimensions and
	/// [`GfxError::SizeMismatch`] if `data` is not exactly the layout's buffer length.
	pub fn from_raw(data: Vec<u8>, mode: Mode, size: Size, layout: Layout) -> Result<Self, GfxError> {
		size.validate(mode)?;
		layout.check_fits(size, mode)?;
		let expected = layout.buffer_len(size, mode);
		if data.len() != expected {
			return Err(GfxError::SizeMismatch {
				expected,
				actual: data.len(),
			});
		}
		Ok(Self {
			mode,
			size,
			layout,
			data,
		})
	}

	/// Returns the screen mode.
	#[inline]
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Returns the frame dimensions in pixels.
	#[inline]
	pub fn size(&self) -> Size {
		self.size
	}

	/// Returns the byte layout.
	#[inline]
	pub fn layout(&self) -> Layout {
		self.layout
	}

	/// Returns the packed bytes.
	#[inline]
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	/// Consumes the frame, returning the packed bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.data
	}

	/// Returns the buffer length.
	#[inline]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if the buffer is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Returns the byte holding the pixels of `column` on `line`.
	///
	/// # Errors
	///
	/// Returns [`GfxError::CoordinatesOutOfRange`] if the position is outside the frame.
	pub fn byte_at(&self, column: u32, line: u32) -> Result<u8, GfxError> {
		let offset = self.layout.offset(self.size, self.mode, column, line)?;
		self.data.get(offset).copied().ok_or(GfxError::CoordinatesOutOfRange {
			column,
			line,
		})
	}

	/// Returns the frame bytes in raster order, whatever the layout.
	///
	/// # Errors
	///
	/// Returns [`GfxError::CoordinatesOutOfRange`] if the buffer is inconsistent with its
	/// geometry.
	pub fn to_sprite(&self) -> Result<PackedFrame, GfxError> {
		if self.layout == Layout::Sprite {
			return Ok(self.clone());
		}
		let mut data = Vec::with_capacity(self.size.packed_len(self.mode));
		for line in 0..self.size.height {
			for column in 0..self.size.mode_width(self.mode) {
				data.push(self.byte_at(column, line)?);
			}
		}
		Ok(Self {
			mode: self.mode,
			size: self.size,
			layout: Layout::Sprite,
			data,
		})
	}
}

/// Counts palette misses while packing one image.
#[derive(Debug, Default)]
pub(crate) struct InkResolver {
	misses: usize,
}

impl InkResolver {
	/// Resolves a color to its ink, substituting ink 0 when the palette lacks it.
	pub(crate) fn ink(&mut self, palette: &Palette, color: Color) -> u8 {
		palette.index_of(&color).unwrap_or_else(|_| {
			self.misses += 1;
			0
		})
	}

	/// Packs the pixel group of `column` on `line`.
	pub(crate) fn pack_group(
		&mut self,
		image: &RgbaImage,
		palette: &Palette,
		mode: Mode,
		column: u32,
		line: u32,
	) -> u8 {
		let pixels_per_byte = mode.pixels_per_byte();
		let mut inks = [0u8; 8];
		for (i, ink) in inks.iter_mut().take(pixels_per_byte as usize).enumerate() {
			let x = column * pixels_per_byte + i as u32;
			*ink = self.ink(palette, Color::from(*image.get_pixel(x, line)));
		}
		pixel::pack(mode, &inks[..pixels_per_byte as usize])
	}

	/// Logs the number of substitutions, if any.
	pub(crate) fn report(&self, what: &str) {
		if self.misses > 0 {
			log::warn!("{what}: {} pixels not found in palette, replaced by ink 0", self.misses);
		}
	}
}

/// Packs a quantized image.
///
/// Colors missing from the palette are replaced by ink 0; the number of replacements is
/// logged as a warning.
///
/// # Arguments
///
/// * `image` - Quantized image; its width must be a multiple of the mode's pixel group
/// * `palette` - Ink-ordered palette, at most `mode.colors_available()` colors
/// * `mode` - Target screen mode
/// * `layout` - Sprite order or screen addressing
///
/// # Errors
///
/// Returns [`GfxError::InvalidDimensions`] if the image cannot be packed or does not fit
/// the screen, and [`GfxError::PaletteOverflow`] if the palette has too many colors.
pub fn encode(
	image: &RgbaImage,
	palette: &Palette,
	mode: Mode,
	layout: Layout,
) -> Result<PackedFrame, GfxError> {
	let size = Size::new(image.width(), image.height());
	size.validate(mode)?;
	layout.check_fits(size, mode)?;
	palette.check_mode(mode)?;

	let mut data = vec![0u8; layout.buffer_len(size, mode)];
	let mut resolver = InkResolver::default();
	for line in 0..size.height {
		for column in 0..size.mode_width(mode) {
			let offset = layout.offset(size, mode, column, line)?;
			data[offset] = resolver.pack_group(image, palette, mode, column, line);
		}
	}
	resolver.report("encode");
	log::debug!("encoded {size} {mode} frame into {} bytes", data.len());

	Ok(PackedFrame {
		mode,
		size,
		layout,
		data,
	})
}

/// Unpacks a frame back into an image.
///
/// Inks beyond the palette length are drawn with ink 0 (transparent black for an empty
/// palette) and counted in a warning.
///
/// # Errors
///
/// Returns [`GfxError::CoordinatesOutOfRange`] if the buffer is inconsistent with its
/// geometry.
pub fn decode(frame: &PackedFrame, palette: &Palette) -> Result<RgbaImage, GfxError> {
	let size = frame.size();
	let mode = frame.mode();
	let fallback = palette.get(0).unwrap_or_default();
	let mut misses = 0usize;
	let mut image = RgbaImage::new(size.width, size.height);

	for line in 0..size.height {
		for column in 0..size.mode_width(mode) {
			let group = pixel::unpack(mode, frame.byte_at(column, line)?);
			for (i, &ink) in group.as_slice().iter().enumerate() {
				let color = palette.get(ink).unwrap_or_else(|| {
					misses += 1;
					fallback
				});
				let x = column * mode.pixels_per_byte() + i as u32;
				image.put_pixel(x, line, color.into());
			}
		}
	}
	if misses > 0 {
		log::warn!("decode: {misses} pixels use an ink outside the palette, drawn with ink 0");
	}
	Ok(image)
}
