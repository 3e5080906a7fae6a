//! Benchmark helper utilities for cpcpix-rs
//!
//! This module provides synthetic quantized images for the benchmark suite. Images are
//! generated from a fixed pattern so every run measures the same workload.

use cpcpix_types::gfx::{Color, Mode, Palette};
use image::RgbaImage;

/// Returns a palette using every ink of `mode`, as firmware colors.
pub fn mode_palette(mode: Mode) -> Palette {
	cpcpix_types::gfx::palette::firmware::FIRMWARE_COLORS
		.iter()
		.step_by(2)
		.take(mode.colors_available())
		.map(|fc| fc.color)
		.collect()
}

/// Generates a quantized image with busy, pseudo random content.
///
/// `seed` shifts the pattern, so two seeds give two different frames of the same size.
pub fn generate_noise_image(width: u32, height: u32, palette: &Palette, seed: u32) -> RgbaImage {
	let len = palette.len() as u32;
	RgbaImage::from_fn(width, height, |x, y| {
		// xorshift style mixing
		let mut v = x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B) ^ seed;
		v ^= v >> 13;
		v = v.wrapping_mul(0xC2B2_AE35);
		v ^= v >> 16;
		palette[(v % len) as u8].into()
	})
}

/// Generates a tiled image: a small set of `tile` sized blocks repeated over the grid.
pub fn generate_tiled_image(width: u32, height: u32, tile: u32, palette: &Palette) -> RgbaImage {
	let len = palette.len() as u32;
	RgbaImage::from_fn(width, height, |x, y| {
		let block = (x / tile + 3 * (y / tile)) % 5;
		let ink = (block + (x % tile) * (y % tile) / tile) % len;
		palette[ink as u8].into()
	})
}

/// Moves a square sprite across a background, one frame per position.
pub fn generate_animation(
	width: u32,
	height: u32,
	frames: u32,
	palette: &Palette,
) -> Vec<RgbaImage> {
	let background: Color = palette[0];
	let sprite: Color = palette[palette.len() as u8 - 1];
	(0..frames)
		.map(|f| {
			let offset = f * 2;
			RgbaImage::from_fn(width, height, |x, y| {
				let inside = x >= offset && x < offset + 16 && y >= offset / 2 && y < offset / 2 + 16;
				if inside { sprite.into() } else { background.into() }
			})
		})
		.collect()
}
