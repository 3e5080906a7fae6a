//! CPC+ hardware sprites.
//!
//! The ASIC displays 16 sprites of 16x16 pixels, independently of the screen mode. Sprite
//! memory holds one byte per pixel whose low nibble is the ink, so a sprite is always 256
//! bytes. Ink 0 is transparent on screen.
//!
//! A `.SPR` file is a plain concatenation of sprites, optionally behind an AMSDOS header.
//!
//! ```
//! use cpcpix_types::gfx::{Color, Palette, sprite::SprFile};
//!
//! let palette = Palette::from_colors(vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]);
//! let board = image::RgbaImage::from_pixel(32, 16, image::Rgba([255, 255, 255, 255]));
//! let file = SprFile::split_board(&board, &palette, 2, 1).unwrap();
//! assert_eq!(file.sprites().len(), 2);
//! assert_eq!(file.to_bytes().len(), 512);
//! ```

use image::RgbaImage;

use crate::gfx::{
	Color, GfxError, Mode, Palette,
	export::{Compressor, amsdos},
	frame::InkResolver,
	sprite,
};

/// Hardware sprite constants.
pub mod constants {
	/// Width and height in pixels
	pub const SIZE: u32 = 16;

	/// Bytes of one sprite
	pub const DATA_LEN: usize = 256;

	/// Load address written in AMSDOS headers of sprite files
	pub const LOAD_ADDRESS: u16 = 0x4000;
}

/// One 16x16 hardware sprite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteHard {
	data: [u8; constants::DATA_LEN],
}

impl Default for SpriteHard {
	fn default() -> Self {
		Self {
			data: [0; constants::DATA_LEN],
		}
	}
}

impl SpriteHard {
	/// Creates a sprite from its 256 pixel bytes. Only the low nibble of each byte is kept.
	pub fn from_data(data: [u8; constants::DATA_LEN]) -> Self {
		Self {
			data: data.map(|b| b & 0x0F),
		}
	}

	/// Converts a 16x16 quantized image.
	///
	/// Colors missing from the palette become ink 0, like packed frames.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InvalidDimensions`] if the image is not 16x16 and
	/// [`GfxError::PaletteOverflow`] if the palette has more than 16 colors.
	pub fn from_image(image: &RgbaImage, palette: &Palette) -> Result<Self, GfxError> {
		if image.dimensions() != (constants::SIZE, constants::SIZE) {
			return Err(GfxError::invalid_dimensions(
				image.width(),
				image.height(),
				"hardware sprites are 16x16",
			));
		}
		palette.check_mode(Mode::Mode0)?;

		let mut resolver = InkResolver::default();
		let mut sprite = Self::default();
		for (i, pixel) in image.pixels().enumerate() {
			sprite.data[i] = resolver.ink(palette, Color::from(*pixel));
		}
		resolver.report("hardware sprite");
		Ok(sprite)
	}

	/// Returns the pixel bytes, row by row.
	#[inline]
	pub fn data(&self) -> &[u8; constants::DATA_LEN] {
		&self.data
	}

	/// Returns the ink of a pixel, `None` outside the sprite.
	pub fn ink_at(&self, x: u32, y: u32) -> Option<u8> {
		if x >= constants::SIZE || y >= constants::SIZE {
			return None;
		}
		Some(self.data[(y * constants::SIZE + x) as usize])
	}

	/// Draws the sprite with `palette`. Inks beyond the palette are drawn opaque black.
	pub fn to_image(&self, palette: &Palette) -> RgbaImage {
		RgbaImage::from_fn(constants::SIZE, constants::SIZE, |x, y| {
			let ink = self.data[(y * constants::SIZE + x) as usize];
			palette.get(ink).unwrap_or(Color::rgb(0, 0, 0)).into()
		})
	}
}

/// A list of hardware sprites, as stored in `.SPR` files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprFile {
	sprites: Vec<SpriteHard>,
}

impl SprFile {
	/// Creates a file from sprites.
	pub fn new(sprites: Vec<SpriteHard>) -> Self {
		Self {
			sprites,
		}
	}

	/// Parses sprite data, with or without an AMSDOS header.
	///
	/// A header is only looked for when the data is not a whole number of sprites, since the
	/// first half of a transparent sprite reads as a valid empty header.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InsufficientData`] if the data ends inside a sprite.
	pub fn from_bytes(data: &[u8]) -> Result<Self, GfxError> {
		let data = if data.len() % constants::DATA_LEN == 0 { data } else { amsdos::strip(data) };
		let remainder = data.len() % constants::DATA_LEN;
		if remainder != 0 {
			return Err(GfxError::InsufficientData {
				expected: data.len() - remainder + constants::DATA_LEN,
				actual: data.len(),
			});
		}

		let sprites = data
			.chunks_exact(constants::DATA_LEN)
			.map(|chunk| {
				let mut bytes = [0u8; constants::DATA_LEN];
				bytes.copy_from_slice(chunk);
				SpriteHard::from_data(bytes)
			})
			.collect::<Vec<_>>();
		log::debug!("read {} hardware sprites", sprites.len());
		Ok(Self::new(sprites))
	}

	/// Cuts a board of `columns` by `rows` 16x16 sprites, column by column.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InvalidDimensions`] if the grid cells are not 16x16, and
	/// [`GfxError::PaletteOverflow`] for palettes over 16 colors.
	pub fn split_board(
		image: &RgbaImage,
		palette: &Palette,
		columns: u32,
		rows: u32,
	) -> Result<Self, GfxError> {
		let sprites = sprite::split_board(image, columns, rows)?
			.iter()
			.map(|cell| SpriteHard::from_image(cell, palette))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self::new(sprites))
	}

	/// Returns the sprites.
	pub fn sprites(&self) -> &[SpriteHard] {
		&self.sprites
	}

	/// Appends a sprite.
	pub fn push(&mut self, sprite: SpriteHard) {
		self.sprites.push(sprite);
	}

	/// Returns the raw sprite data, without header.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.sprites.iter().flat_map(|s| s.data.iter().copied()).collect()
	}

	/// Draws every sprite with `palette`.
	pub fn images(&self, palette: &Palette) -> Vec<RgbaImage> {
		self.sprites.iter().map(|s| s.to_image(palette)).collect()
	}

	/// Packs the sprite data and prepends an AMSDOS header loading at `#4000`.
	///
	/// # Errors
	///
	/// Returns the compressor's errors.
	pub fn to_file(&self, filename: &str, compressor: &impl Compressor) -> Result<Vec<u8>, GfxError> {
		let data = compressor.compress(&self.to_bytes())?;
		Ok(amsdos::wrap(filename, &data, constants::LOAD_ADDRESS, 0))
	}
}
