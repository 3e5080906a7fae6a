//! End to end conversions through the public `cpcpix-rs` API.

mod codec;
mod delta;
mod formats;
mod sprites;
mod tiles;

use cpcpix_rs::cpcpix_types::gfx::palette::firmware::FIRMWARE_COLORS;
use cpcpix_rs::prelude::*;
use image::RgbaImage;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

pub(crate) const MODES: [Mode; 3] = [Mode::Mode0, Mode::Mode1, Mode::Mode2];

pub(crate) fn rng(seed: u64) -> SmallRng {
	SmallRng::seed_from_u64(seed)
}

/// A palette of distinct firmware colors filling the mode.
pub(crate) fn firmware_palette(rng: &mut SmallRng, mode: Mode) -> Palette {
	let mut colors: Vec<Color> = FIRMWARE_COLORS.iter().map(|fc| fc.color).collect();
	colors.shuffle(rng);
	colors.into_iter().take(mode.colors_available()).collect()
}

/// Random image using only `palette` colors.
pub(crate) fn noise_image(rng: &mut SmallRng, palette: &Palette, width: u32, height: u32) -> RgbaImage {
	let inks = palette.len() as u8;
	RgbaImage::from_fn(width, height, |_, _| palette[rng.random_range(0..inks)].into())
}
