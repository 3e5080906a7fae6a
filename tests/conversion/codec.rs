use cpcpix_rs::prelude::*;
use image::{Rgba, RgbaImage};

use crate::{MODES, firmware_palette, noise_image, rng};

fn layouts() -> [Layout; 3] {
	[Layout::Sprite, Layout::Screen(ScreenLayout::standard()), Layout::Screen(ScreenLayout::overscan())]
}

#[test_log::test]
fn test_round_trip_every_mode_and_layout() {
	let mut rng = rng(0xC9C);
	for mode in MODES {
		let palette = firmware_palette(&mut rng, mode);
		let image = noise_image(&mut rng, &palette, 32, 24);
		for layout in layouts() {
			let frame = encode(&image, &palette, mode, layout).unwrap();
			assert_eq!(frame.len(), layout.buffer_len(frame.size(), mode));
			assert_eq!(decode(&frame, &palette).unwrap(), image, "{mode} {layout:?}");

			let raw = PackedFrame::from_raw(frame.as_bytes().to_vec(), mode, frame.size(), layout).unwrap();
			assert_eq!(raw, frame);
		}
	}
}

#[test_log::test]
fn test_full_screen_round_trip() {
	let mut rng = rng(7);
	let palette = firmware_palette(&mut rng, Mode::Mode1);
	let image = noise_image(&mut rng, &palette, 320, 200);
	let frame = encode(&image, &palette, Mode::Mode1, Layout::Screen(ScreenLayout::standard())).unwrap();
	assert_eq!(frame.len(), 0x4000);
	assert_eq!(decode(&frame, &palette).unwrap(), image);
}

#[test_log::test]
fn test_all_zero_mode2() {
	let palette = Palette::from_colors(vec![Color::rgb(0, 0, 0), Color::rgb(0xFF, 0xFF, 0xFF)]);
	let image = RgbaImage::from_pixel(16, 4, Rgba([0, 0, 0, 0xFF]));
	let frame = encode(&image, &palette, Mode::Mode2, Layout::Sprite).unwrap();
	assert_eq!(frame.as_bytes(), &[0u8; 8]);
}

#[test_log::test]
fn test_narrow_mode2_image_is_rejected() {
	let palette = Palette::from_colors(vec![Color::rgb(0, 0, 0)]);
	let image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0xFF]));
	assert!(matches!(
		encode(&image, &palette, Mode::Mode2, Layout::Sprite),
		Err(GfxError::InvalidDimensions {
			..
		})
	));
}

#[test_log::test]
fn test_screen_to_sprite_matches_sprite_encoding() {
	let mut rng = rng(99);
	let palette = firmware_palette(&mut rng, Mode::Mode0);
	let image = noise_image(&mut rng, &palette, 24, 18);
	let screen = encode(&image, &palette, Mode::Mode0, Layout::Screen(ScreenLayout::overscan())).unwrap();
	let sprite = encode(&image, &palette, Mode::Mode0, Layout::Sprite).unwrap();
	assert_eq!(screen.to_sprite().unwrap(), sprite);
}

#[test_log::test]
fn test_screen_addresses_are_invertible() {
	for layout in [ScreenLayout::standard(), ScreenLayout::overscan()] {
		for (column, line) in [(0, 0), (1, 7), (0x4F, 8), (12, 199)] {
			let address = layout.address(column, line).unwrap();
			let position = layout.coordinates(address, layout.base_address()).unwrap();
			assert_eq!((position.column, position.line), (column, line));
		}
	}
	let standard = ScreenLayout::standard();
	assert_eq!(standard.address(0, 1).unwrap(), 0xC800);
	assert_eq!(standard.address(0, 8).unwrap(), 0xC050);
}
