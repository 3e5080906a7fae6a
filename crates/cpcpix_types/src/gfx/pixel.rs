//! Pixel packing for the three gate array modes.
//!
//! The gate array does not store the bits of an ink contiguously. Within a byte, the bits of
//! every pixel are interleaved:
//!
//! ```text
//! bit      7    6    5    4    3    2    1    0
//! mode 0   p0b0 p1b0 p0b2 p1b2 p0b1 p1b1 p0b3 p1b3
//! mode 1   p0b0 p1b0 p2b0 p3b0 p0b1 p1b1 p2b1 p3b1
//! mode 2   p0   p1   p2   p3   p4   p5   p6   p7
//! ```
//!
//! `pNbK` is bit `K` of the ink of pixel `N`, pixels numbered left to right.

use crate::gfx::Mode;

/// Byte masks of the left pixel of a mode 0 byte, indexed by ink.
///
/// The right pixel uses the same masks shifted right by one.
const MODE0_LEFT: [u8; 16] = build_mode0_left();

const fn build_mode0_left() -> [u8; 16] {
	// ink bit -> byte bit for the left pixel
	const BIT_POSITIONS: [u8; 4] = [7, 3, 5, 1];
	let mut table = [0u8; 16];
	let mut ink = 0;
	while ink < 16 {
		let mut mask = 0u8;
		let mut bit = 0;
		while bit < 4 {
			if ink & (1 << bit) != 0 {
				mask |= 1 << BIT_POSITIONS[bit];
			}
			bit += 1;
		}
		table[ink] = mask;
		ink += 1;
	}
	table
}

/// Inks of the pixels packed in one byte, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelGroup {
	inks: [u8; 8],
	len: u8,
}

impl PixelGroup {
	/// Returns the inks as a slice of `pixels_per_byte` entries.
	#[inline]
	pub fn as_slice(&self) -> &[u8] {
		&self.inks[..self.len as usize]
	}

	/// Returns the number of pixels in the group.
	#[inline]
	pub fn len(&self) -> usize {
		self.len as usize
	}

	/// Always `false`: a group holds at least two pixels.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

impl std::ops::Index<usize> for PixelGroup {
	type Output = u8;

	fn index(&self, index: usize) -> &Self::Output {
		&self.as_slice()[index]
	}
}

/// Packs two mode 0 pixels.
///
/// # Panics
///
/// Panics if an ink is 16 or more.
#[inline]
pub fn pack_mode0(p0: u8, p1: u8) -> u8 {
	assert!(p0 < 16 && p1 < 16, "mode 0 inks must be below 16, got {p0} and {p1}");
	MODE0_LEFT[p0 as usize] | (MODE0_LEFT[p1 as usize] >> 1)
}

/// Packs four mode 1 pixels.
///
/// # Panics
///
/// Panics if an ink is 4 or more.
#[inline]
pub fn pack_mode1(pixels: [u8; 4]) -> u8 {
	let mut byte = 0u8;
	for (n, &ink) in pixels.iter().enumerate() {
		assert!(ink < 4, "mode 1 inks must be below 4, got {ink}");
		byte |= (ink & 1) << (7 - n);
		byte |= ((ink >> 1) & 1) << (3 - n);
	}
	byte
}

/// Packs eight mode 2 pixels.
///
/// # Panics
///
/// Panics if an ink is 2 or more.
#[inline]
pub fn pack_mode2(pixels: [u8; 8]) -> u8 {
	let mut byte = 0u8;
	for (n, &ink) in pixels.iter().enumerate() {
		assert!(ink < 2, "mode 2 inks must be below 2, got {ink}");
		byte |= ink << (7 - n);
	}
	byte
}

/// Packs one byte worth of pixels for `mode`.
///
/// # Panics
///
/// Panics if `inks` does not hold exactly `mode.pixels_per_byte()` entries or if an ink is
/// out of range for the mode. Callers resolve colors through the palette first, so either
/// case is a programming error.
pub fn pack(mode: Mode, inks: &[u8]) -> u8 {
	assert_eq!(
		inks.len(),
		mode.pixels_per_byte() as usize,
		"{mode} packs {} pixels per byte",
		mode.pixels_per_byte()
	);
	match mode {
		Mode::Mode0 => pack_mode0(inks[0], inks[1]),
		Mode::Mode1 => pack_mode1([inks[0], inks[1], inks[2], inks[3]]),
		Mode::Mode2 => {
			let mut pixels = [0u8; 8];
			pixels.copy_from_slice(inks);
			pack_mode2(pixels)
		}
	}
}

/// Unpacks a mode 0 byte into its two inks.
#[inline]
pub fn unpack_mode0(byte: u8) -> (u8, u8) {
	let ink_at = |shift: u8| -> u8 {
		let b = byte << shift;
		((b >> 7) & 1) | (((b >> 3) & 1) << 1) | (((b >> 5) & 1) << 2) | (((b >> 1) & 1) << 3)
	};
	(ink_at(0), ink_at(1))
}

/// Unpacks a mode 1 byte into its four inks.
#[inline]
pub fn unpack_mode1(byte: u8) -> [u8; 4] {
	let mut inks = [0u8; 4];
	for (n, ink) in inks.iter_mut().enumerate() {
		*ink = ((byte >> (7 - n)) & 1) | (((byte >> (3 - n)) & 1) << 1);
	}
	inks
}

/// Unpacks a mode 2 byte into its eight inks.
#[inline]
pub fn unpack_mode2(byte: u8) -> [u8; 8] {
	let mut inks = [0u8; 8];
	for (n, ink) in inks.iter_mut().enumerate() {
		*ink = (byte >> (7 - n)) & 1;
	}
	inks
}

/// Unpacks one byte into the inks of its pixels, left to right.
pub fn unpack(mode: Mode, byte: u8) -> PixelGroup {
	let mut inks = [0u8; 8];
	match mode {
		Mode::Mode0 => {
			let (p0, p1) = unpack_mode0(byte);
			inks[0] = p0;
			inks[1] = p1;
		}
		Mode::Mode1 => inks[..4].copy_from_slice(&unpack_mode1(byte)),
		Mode::Mode2 => inks = unpack_mode2(byte),
	}
	PixelGroup {
		inks,
		len: mode.pixels_per_byte() as u8,
	}
}
