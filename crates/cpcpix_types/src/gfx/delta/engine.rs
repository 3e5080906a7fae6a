use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::gfx::{
	GfxError, Mode, Palette, ScreenLayout, ScreenPosition, Size, frame::InkResolver,
	frame::PackedFrame,
};

use super::DeltaCollection;

/// How changed bytes are addressed in the delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Placement {
	/// Offsets into a raster ordered sprite buffer: `line * mode_width + column`
	#[default]
	Sprite,
	/// Hardware screen addresses of a sprite drawn at `start`
	Screen {
		/// Hardware address of the top-left byte of the animation
		start: u16,
		/// Screen geometry
		layout: ScreenLayout,
	},
}

impl Placement {
	/// Standard screen placement at `start`.
	pub const fn screen(start: u16) -> Self {
		Placement::Screen {
			start,
			layout: ScreenLayout::standard(),
		}
	}
}

/// Resolved placement for one comparison.
struct Target {
	kind: TargetKind,
	wrapped: usize,
}

enum TargetKind {
	Sprite {
		mode_width: u32,
	},
	Screen {
		origin: ScreenPosition,
		layout: ScreenLayout,
	},
}

impl Target {
	fn new(placement: Placement, size: Size, mode: Mode) -> Self {
		let kind = match placement {
			Placement::Sprite => TargetKind::Sprite {
				mode_width: size.mode_width(mode),
			},
			Placement::Screen {
				start,
				layout,
			} => TargetKind::Screen {
				origin: layout.coordinates_or_origin(start, layout.base_address()),
				layout,
			},
		};
		Self {
			kind,
			wrapped: 0,
		}
	}

	fn address(&mut self, column: u32, line: u32) -> u16 {
		match self.kind {
			// Sprite offsets wrap past 64 KiB
			TargetKind::Sprite {
				mode_width,
			} => (line.wrapping_mul(mode_width).wrapping_add(column) & 0xFFFF) as u16,
			TargetKind::Screen {
				origin,
				layout,
			} => {
				let (column, line) = (origin.column + column, origin.line + line);
				match layout.address(column, line) {
					Ok(address) => address,
					Err(_) => {
						self.wrapped += 1;
						layout.wrapping_address(column, line)
					}
				}
			}
		}
	}

	/// Logs the number of addresses that left the screen, if any.
	fn report(&self) {
		if self.wrapped > 0 {
			log::warn!(
				"diff: {} changed bytes fall outside the screen, their addresses wrap like the CRTC counter",
				self.wrapped
			);
		}
	}
}

/// Computes the delta that turns `previous` into `next`.
///
/// Bytes are compared in raster order. Each changed byte is recorded under its new value at
/// the address given by `placement`. Screen addresses that fall outside the screen memory
/// are wrapped with [`ScreenLayout::wrapping_address`] and counted in a warning.
///
/// # Errors
///
/// Returns [`GfxError::SizeMismatch`] if the buffers have different lengths and
/// [`GfxError::InvalidDimensions`] if the frames do not share the same geometry.
pub fn diff(
	previous: &PackedFrame,
	next: &PackedFrame,
	placement: Placement,
) -> Result<DeltaCollection, GfxError> {
	if previous.len() != next.len() {
		return Err(GfxError::SizeMismatch {
			expected: previous.len(),
			actual: next.len(),
		});
	}
	let size = next.size();
	let mode = next.mode();
	if previous.size() != size || previous.mode() != mode {
		return Err(GfxError::invalid_dimensions(
			size.width,
			size.height,
			"frames differ in size or mode",
		));
	}

	let mut target = Target::new(placement, size, mode);
	let mut delta = DeltaCollection::new();
	for line in 0..size.height {
		for column in 0..size.mode_width(mode) {
			let byte = next.byte_at(column, line)?;
			if previous.byte_at(column, line)? != byte {
				delta.add(byte, target.address(column, line));
			}
		}
	}
	target.report();
	log::debug!("diff {size} {mode}: {delta}");
	Ok(delta)
}

/// Computes the delta between two quantized images, each packed with its own palette.
///
/// Packing happens per byte position, so two frames showing the same pixels through
/// different palettes still produce a delta (color cycling).
///
/// # Errors
///
/// Returns [`GfxError::SizeMismatch`] if the images do not pack to the same length,
/// [`GfxError::InvalidDimensions`] for unpackable dimensions,
/// and [`GfxError::PaletteOverflow`] for oversized palettes.
pub fn diff_images(
	previous: &RgbaImage,
	previous_palette: &Palette,
	next: &RgbaImage,
	next_palette: &Palette,
	mode: Mode,
	placement: Placement,
) -> Result<DeltaCollection, GfxError> {
	let size = Size::new(next.width(), next.height());
	let previous_size = Size::new(previous.width(), previous.height());
	if previous_size != size {
		return Err(GfxError::SizeMismatch {
			expected: previous_size.packed_len(mode),
			actual: size.packed_len(mode),
		});
	}
	size.validate(mode)?;
	previous_palette.check_mode(mode)?;
	next_palette.check_mode(mode)?;

	let mut target = Target::new(placement, size, mode);
	let mut previous_inks = InkResolver::default();
	let mut next_inks = InkResolver::default();
	let mut delta = DeltaCollection::new();
	for line in 0..size.height {
		for column in 0..size.mode_width(mode) {
			let old = previous_inks.pack_group(previous, previous_palette, mode, column, line);
			let new = next_inks.pack_group(next, next_palette, mode, column, line);
			if old != new {
				delta.add(new, target.address(column, line));
			}
		}
	}
	previous_inks.report("diff (previous frame)");
	next_inks.report("diff (next frame)");
	target.report();
	log::debug!("diff {size} {mode}: {delta}");
	Ok(delta)
}
