//! Unit tests for the delta engine

use std::collections::HashSet;

use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::*;
use crate::gfx::{Color, Layout, Mode, Palette, ScreenLayout, Size, frame, frame::PackedFrame};

fn sprite(data: Vec<u8>, width: u32, height: u32, mode: Mode) -> PackedFrame {
	PackedFrame::from_raw(data, mode, Size::new(width, height), Layout::Sprite).unwrap()
}

fn four_colors() -> Palette {
	Palette::from_colors(vec![
		Color::rgb(0, 0, 0),
		Color::rgb(0xFF, 0, 0),
		Color::rgb(0, 0xFF, 0),
		Color::rgb(0xFF, 0xFF, 0xFF),
	])
}

fn random_image(rng: &mut SmallRng, palette: &Palette, width: u32, height: u32) -> RgbaImage {
	RgbaImage::from_fn(width, height, |_, _| {
		palette[rng.random_range(0..palette.len() as u8)].into()
	})
}

/// Writes a sprite-placed delta into a buffer.
fn apply(buffer: &mut [u8], delta: &DeltaCollection) {
	for item in delta {
		for &address in item.addresses() {
			buffer[address as usize] = item.byte();
		}
	}
}

#[test]
fn test_identical_frames_have_empty_delta() {
	let frame = sprite(vec![0x12, 0x34, 0x56, 0x78], 16, 2, Mode::Mode2);
	let delta = diff(&frame, &frame.clone(), Placement::Sprite).unwrap();
	assert!(delta.is_empty());
	assert_eq!(delta.marshal().unwrap(), vec![0x00, 0x00]);
}

#[test]
fn test_size_mismatch() {
	let a = sprite(vec![0; 4], 16, 2, Mode::Mode2);
	let b = sprite(vec![0; 6], 16, 3, Mode::Mode2);
	assert!(matches!(
		diff(&a, &b, Placement::Sprite),
		Err(GfxError::SizeMismatch {
			expected: 4,
			actual: 6
		})
	));
}

#[test]
fn test_items_bucket_by_new_byte_in_first_seen_order() {
	let previous = sprite(vec![0, 0, 0, 0], 16, 2, Mode::Mode2);
	let next = sprite(vec![0xFF, 0x0F, 0xFF, 0x00], 16, 2, Mode::Mode2);
	let delta = diff(&previous, &next, Placement::Sprite).unwrap();

	assert_eq!(delta.len(), 2);
	assert_eq!(delta.items()[0].byte(), 0xFF);
	assert_eq!(delta.items()[0].addresses(), &[0, 2]);
	assert_eq!(delta.items()[1].byte(), 0x0F);
	assert_eq!(delta.items()[1].addresses(), &[1]);
	assert_eq!(delta.changed_bytes(), 3);
}

#[test]
fn test_marshal_layout() {
	let mut delta = DeltaCollection::new();
	delta.add(0xFF, 0x0000);
	delta.add(0x0F, 0xC001);
	delta.add(0xFF, 0x0002);

	assert_eq!(delta.marshal().unwrap(), vec![
		0x02, 0x00, // records
		0xFF, 0x02, 0x00, 0x00, 0x02, 0x00, // #FF at 0000, 0002
		0x0F, 0x01, 0x01, 0xC0, // #0F at C001
	]);
}

#[test]
fn test_unmarshal_restores_collection() {
	let mut delta = DeltaCollection::new();
	delta.add(0x11, 0x8000);
	delta.add(0x22, 0xFFFF);
	delta.add(0x11, 0x0001);
	let parsed = DeltaCollection::unmarshal(&delta.marshal().unwrap()).unwrap();
	assert_eq!(parsed, delta);
}

#[test]
fn test_large_items_split_into_records() {
	let mut delta = DeltaCollection::new();
	for address in 0..300u16 {
		delta.add(0x07, address);
	}
	assert_eq!(delta.len(), 1);
	assert_eq!(delta.record_count(), 2);

	let data = delta.marshal().unwrap();
	assert_eq!(data.len(), 2 + (2 + 255 * 2) + (2 + 45 * 2));
	assert_eq!(&data[..4], &[0x02, 0x00, 0x07, 0xFF]);
	assert_eq!(&data[2 + 2 + 255 * 2..2 + 2 + 255 * 2 + 2], &[0x07, 45]);

	let parsed = DeltaCollection::unmarshal(&data).unwrap();
	assert_eq!(parsed, delta);
}

#[test]
fn test_unmarshal_truncated() {
	assert!(matches!(
		DeltaCollection::unmarshal(&[0x01]),
		Err(GfxError::InsufficientData {
			expected: 2,
			actual: 1
		})
	));
	assert!(matches!(
		DeltaCollection::unmarshal(&[0x01, 0x00, 0xAA, 0x02, 0x00, 0xC0]),
		Err(GfxError::InsufficientData {
			expected: 8,
			actual: 6
		})
	));
}

#[test]
fn test_screen_placement_uses_start_address() {
	let previous = sprite(vec![0, 0], 8, 2, Mode::Mode2);
	let next = sprite(vec![0, 1], 8, 2, Mode::Mode2);
	// Column 0, line 8
	let delta = diff(&previous, &next, Placement::screen(0xC050)).unwrap();
	assert_eq!(delta.items()[0].addresses(), &[0xC850]);
}

#[test_log::test]
fn test_start_before_screen_falls_back_to_origin() {
	let previous = sprite(vec![0, 0], 8, 2, Mode::Mode2);
	let next = sprite(vec![0, 1], 8, 2, Mode::Mode2);
	let delta = diff(&previous, &next, Placement::screen(0x4000)).unwrap();
	assert_eq!(delta.items()[0].addresses(), &[0xC800]);
}

#[test_log::test]
fn test_bytes_past_the_line_wrap_instead_of_failing() {
	// 16 bytes wide, drawn from column 72 of an 80 byte line
	let previous = sprite(vec![0; 16], 128, 1, Mode::Mode2);
	let mut data = vec![0; 16];
	data[7] = 0x01;
	data[15] = 0xFF;
	let next = sprite(data, 128, 1, Mode::Mode2);

	let delta = diff(&previous, &next, Placement::screen(0xC048)).unwrap();
	assert_eq!(delta.len(), 2);
	assert_eq!(delta.items()[0].addresses(), &[0xC04F]);
	// Column 87 continues into the next character row
	assert_eq!(delta.items()[1].addresses(), &[0xC057]);

	let previous_image = RgbaImage::from_pixel(128, 1, Rgba([0, 0, 0, 0xFF]));
	let mut next_image = previous_image.clone();
	next_image.put_pixel(127, 0, Rgba([0xFF, 0, 0, 0xFF]));
	let from_images = diff_images(
		&previous_image,
		&four_colors(),
		&next_image,
		&four_colors(),
		Mode::Mode1,
		Placement::screen(0xC048),
	)
	.unwrap();
	// 32 bytes wide in mode 1, the last one lands at column 103
	assert_eq!(from_images.items()[0].addresses(), &[0xC048 + 31]);
}

#[test]
fn test_overscan_placement() {
	let previous = sprite(vec![0], 8, 1, Mode::Mode2);
	let next = sprite(vec![0xAA], 8, 1, Mode::Mode2);
	let placement = Placement::Screen {
		start: 0x8000,
		layout: ScreenLayout::overscan(),
	};
	let delta = diff(&previous, &next, placement).unwrap();
	assert_eq!(delta.items()[0].addresses(), &[0x8000]);
}

#[test]
fn test_palette_change_produces_delta() {
	let a = Color::rgb(0, 0, 0);
	let b = Color::rgb(0xFF, 0xFF, 0xFF);
	let image = RgbaImage::from_pixel(8, 1, Rgba([0, 0, 0, 255]));
	let delta = diff_images(
		&image,
		&Palette::from_colors(vec![a, b]),
		&image,
		&Palette::from_colors(vec![b, a]),
		Mode::Mode2,
		Placement::Sprite,
	)
	.unwrap();
	assert_eq!(delta.len(), 1);
	assert_eq!(delta.items()[0].byte(), 0xFF);
	assert_eq!(delta.items()[0].addresses(), &[0]);
}

#[test]
fn test_diff_images_size_mismatch() {
	let palette = four_colors();
	let result = diff_images(
		&RgbaImage::new(8, 2),
		&palette,
		&RgbaImage::new(8, 3),
		&palette,
		Mode::Mode1,
		Placement::Sprite,
	);
	assert!(matches!(
		result,
		Err(GfxError::SizeMismatch {
			..
		})
	));
}

#[test_log::test]
fn test_delta_covers_exactly_the_changed_bytes() {
	let mut rng = SmallRng::seed_from_u64(0x6128);
	let palette = four_colors();
	for _ in 0..8 {
		let previous = random_image(&mut rng, &palette, 32, 16);
		let next = random_image(&mut rng, &palette, 32, 16);
		let delta =
			diff_images(&previous, &palette, &next, &palette, Mode::Mode1, Placement::Sprite).unwrap();

		let a = frame::encode(&previous, &palette, Mode::Mode1, Layout::Sprite).unwrap();
		let b = frame::encode(&next, &palette, Mode::Mode1, Layout::Sprite).unwrap();
		let changed: HashSet<u16> = (0..a.len())
			.filter(|&i| a.as_bytes()[i] != b.as_bytes()[i])
			.map(|i| i as u16)
			.collect();

		let mut seen = HashSet::new();
		for item in &delta {
			for &address in item.addresses() {
				assert!(seen.insert(address), "address {address} listed twice");
				assert_eq!(b.as_bytes()[address as usize], item.byte());
			}
		}
		assert_eq!(seen, changed);

		// Packed and image diffs agree
		assert_eq!(diff(&a, &b, Placement::Sprite).unwrap(), delta);
	}
}

#[test]
fn test_diff_is_deterministic() {
	let mut rng = SmallRng::seed_from_u64(7);
	let palette = four_colors();
	let previous = random_image(&mut rng, &palette, 16, 16);
	let next = random_image(&mut rng, &palette, 16, 16);
	let run = || {
		diff_images(&previous, &palette, &next, &palette, Mode::Mode1, Placement::screen(0xC000))
			.unwrap()
			.marshal()
			.unwrap()
	};
	assert_eq!(run(), run());
}

#[test]
fn test_delta_chain_loops_back() {
	let frames = [
		sprite(vec![0, 0, 0, 0], 8, 4, Mode::Mode2),
		sprite(vec![1, 0, 0, 2], 8, 4, Mode::Mode2),
		sprite(vec![1, 3, 3, 2], 8, 4, Mode::Mode2),
	];
	let refs: Vec<&PackedFrame> = frames.iter().collect();
	let deltas = delta_chain(&refs, Placement::Sprite).unwrap();
	assert_eq!(deltas.len(), 3);

	let mut buffer = frames[0].as_bytes().to_vec();
	for (i, delta) in deltas.iter().enumerate() {
		apply(&mut buffer, delta);
		assert_eq!(buffer, frames[(i + 1) % 3].as_bytes());
	}
}

#[test]
fn test_delta_chain_needs_two_frames() {
	let frame = sprite(vec![0], 8, 1, Mode::Mode2);
	assert!(matches!(delta_chain(&[&frame], Placement::Sprite), Err(GfxError::NotEnoughFrames(1))));
}

#[test]
fn test_decimate() {
	let frames: Vec<usize> = (0..45).collect();
	let kept: Vec<usize> = decimate(&frames, DEFAULT_MAX_FRAMES).into_iter().copied().collect();
	assert_eq!(kept.len(), 22);
	assert_eq!(kept[0], 0);
	assert_eq!(kept[1], 2);
	assert_eq!(kept[21], 42);

	assert_eq!(decimate(&frames[..5], DEFAULT_MAX_FRAMES).len(), 5);
	assert_eq!(decimate(&frames, 0).len(), 45);
}

#[test_log::test]
fn test_animation_from_images() {
	let mut rng = SmallRng::seed_from_u64(99);
	let palette = four_colors();
	let frames: Vec<(RgbaImage, Palette)> =
		(0..3).map(|_| (random_image(&mut rng, &palette, 16, 4), palette.clone())).collect();
	let animation = DeltaAnimation::from_images(&frames, Mode::Mode1, Placement::Sprite, 0).unwrap();

	assert_eq!(animation.frame_count(), 3);
	assert_eq!(animation.palette(), &palette);
	let mut buffer = animation.reference().as_bytes().to_vec();
	for delta in animation.deltas() {
		apply(&mut buffer, delta);
	}
	assert_eq!(buffer, animation.reference().as_bytes());
	assert_eq!(animation.marshal().unwrap().len(), 3);
}

#[test]
fn test_animation_from_frames_decimates() {
	let frames: Vec<PackedFrame> = (0..10u8).map(|i| sprite(vec![i], 8, 1, Mode::Mode2)).collect();
	let animation =
		DeltaAnimation::from_frames(&frames, Palette::new(), Placement::Sprite, 5).unwrap();
	assert_eq!(animation.frame_count(), 5);
	assert_eq!(animation.deltas()[0].items()[0].byte(), 2);
	assert_eq!(animation.deltas()[4].items()[0].byte(), 0);
}
