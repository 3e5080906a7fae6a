use cpcpix_rs::cpcpix_types::gfx::{pixel, sprite::allowed_masks};
use cpcpix_rs::prelude::*;
use image::imageops;

use crate::{firmware_palette, noise_image, rng};

#[test_log::test]
fn test_board_sprites_match_their_cells() {
	let mut rng = rng(0xB0A);
	let palette = firmware_palette(&mut rng, Mode::Mode1);
	let board = noise_image(&mut rng, &palette, 32, 8);

	let sprites = encode_board(&board, &palette, 4, 2, Mode::Mode1).unwrap();
	assert_eq!(sprites.len(), 8);
	for (i, sprite) in sprites.iter().enumerate() {
		let (column, row) = (i as u32 / 2, i as u32 % 2);
		let cell = imageops::crop_imm(&board, column * 8, row * 4, 8, 4).to_image();
		assert_eq!(decode(sprite, &palette).unwrap(), cell, "sprite {i}");
	}
}

#[test_log::test]
fn test_ink_swap_follows_the_palette() {
	let mut rng = rng(0x51);
	let palette = firmware_palette(&mut rng, Mode::Mode0);
	let image = noise_image(&mut rng, &palette, 32, 8);
	let frame = encode(&image, &palette, Mode::Mode0, Layout::Sprite).unwrap();

	let config = ConvertConfig::from_json(r#"{ "ink_swap": "0=15,15=0" }"#).unwrap();
	let swapped = config.finish_frame(frame.clone()).unwrap();
	assert_ne!(swapped, frame);

	// the same colors come back once inks 0 and 15 trade places in the palette
	let mut colors = palette.colors().to_vec();
	colors.swap(0, 15);
	assert_eq!(decode(&swapped, &Palette::from_colors(colors)).unwrap(), image);
	assert_eq!(config.ink_swap.apply(&swapped).unwrap(), frame);
}

#[test_log::test]
fn test_masks_keep_one_pixel() {
	let mut rng = rng(0x3A5);
	for mode in [Mode::Mode0, Mode::Mode1] {
		let palette = firmware_palette(&mut rng, mode);
		let image = noise_image(&mut rng, &palette, 16, 2);
		let frame = encode(&image, &palette, mode, Layout::Sprite).unwrap();

		for (pixel_index, &value) in allowed_masks(mode).iter().enumerate() {
			let masked = SpriteMask::new(value, MaskOp::And).apply(&frame).unwrap();
			for (&before, &after) in frame.as_bytes().iter().zip(masked.as_bytes()) {
				let before = pixel::unpack(mode, before);
				let after = pixel::unpack(mode, after);
				for i in 0..after.len() {
					let expected = if i == pixel_index { before[i] } else { 0 };
					assert_eq!(after[i], expected, "{mode} mask #{value:02X}");
				}
			}
		}
	}
	let mode2 = PackedFrame::from_raw(vec![0xFF], Mode::Mode2, Size::new(8, 1), Layout::Sprite).unwrap();
	assert!(SpriteMask::new(0x88, MaskOp::Or).apply(&mode2).is_err());
}

#[test_log::test]
fn test_hardware_sprite_file() {
	let mut rng = rng(0x5B2);
	let palette = firmware_palette(&mut rng, Mode::Mode0);
	let board = noise_image(&mut rng, &palette, 48, 16);

	let file = SprFile::split_board(&board, &palette, 3, 1).unwrap();
	let bytes = file.to_file("board.spr", &Compression::None).unwrap();
	let header = AmsdosHeader::from_bytes(&bytes).unwrap();
	assert_eq!(header.filename(), "BOARD.SPR");
	assert_eq!(header.load_address, 0x4000);
	assert_eq!(header.length, 3 * 256);

	let loaded = SprFile::from_bytes(&bytes).unwrap();
	assert_eq!(loaded, file);
	for (i, image) in loaded.images(&palette).iter().enumerate() {
		let cell = imageops::crop_imm(&board, i as u32 * 16, 0, 16, 16).to_image();
		assert_eq!(image, &cell);
	}
}
