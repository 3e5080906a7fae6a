use cpcpix_rs::prelude::*;
use image::RgbaImage;
use rand::Rng;

use crate::{MODES, firmware_palette, noise_image, rng};

/// Writes every delta byte into `memory`.
fn apply(memory: &mut [u8], delta: &DeltaCollection) {
	for item in delta {
		for &address in item.addresses() {
			memory[address as usize] = item.byte();
		}
	}
}

/// Repaints a few random pixels.
fn mutate(rng: &mut rand::rngs::SmallRng, image: &RgbaImage, palette: &Palette) -> RgbaImage {
	let mut next = image.clone();
	for _ in 0..rng.random_range(1..40) {
		let x = rng.random_range(0..image.width());
		let y = rng.random_range(0..image.height());
		next.put_pixel(x, y, palette[rng.random_range(0..palette.len() as u8)].into());
	}
	next
}

#[test_log::test]
fn test_identical_frames_have_no_delta() {
	let mut rng = rng(1);
	let palette = firmware_palette(&mut rng, Mode::Mode0);
	let image = noise_image(&mut rng, &palette, 16, 8);
	let frame = encode(&image, &palette, Mode::Mode0, Layout::Sprite).unwrap();
	let delta = diff(&frame, &frame.clone(), Placement::Sprite).unwrap();
	assert!(delta.is_empty());
	assert_eq!(delta.marshal().unwrap(), vec![0x00, 0x00]);
}

#[test_log::test]
fn test_sprite_delta_rebuilds_next_frame() {
	let mut rng = rng(0xDE17A);
	for mode in MODES {
		let palette = firmware_palette(&mut rng, mode);
		let first = noise_image(&mut rng, &palette, 32, 16);
		let second = mutate(&mut rng, &first, &palette);

		let previous = encode(&first, &palette, mode, Layout::Sprite).unwrap();
		let next = encode(&second, &palette, mode, Layout::Sprite).unwrap();
		let delta = diff(&previous, &next, Placement::Sprite).unwrap();
		let changed = previous.as_bytes().iter().zip(next.as_bytes()).filter(|(a, b)| a != b).count();
		assert_eq!(delta.changed_bytes(), changed);

		let wire = DeltaCollection::unmarshal(&delta.marshal().unwrap()).unwrap();
		assert_eq!(wire, delta);

		let mut memory = previous.as_bytes().to_vec();
		apply(&mut memory, &wire);
		assert_eq!(memory, next.as_bytes());
	}
}

#[test_log::test]
fn test_screen_delta_rebuilds_video_memory() {
	let mut rng = rng(0x5C4EE);
	let palette = firmware_palette(&mut rng, Mode::Mode1);
	let first = noise_image(&mut rng, &palette, 64, 40);
	let second = mutate(&mut rng, &first, &palette);
	let layout = Layout::Screen(ScreenLayout::standard());

	let previous = encode(&first, &palette, Mode::Mode1, layout).unwrap();
	let next = encode(&second, &palette, Mode::Mode1, layout).unwrap();
	let delta = diff(&previous, &next, Placement::screen(0xC000)).unwrap();

	let mut memory = vec![0u8; 0x10000];
	memory[0xC000..].copy_from_slice(previous.as_bytes());
	apply(&mut memory, &delta);
	assert_eq!(&memory[0xC000..], next.as_bytes());
}

#[test_log::test]
fn test_images_and_frames_agree() {
	let mut rng = rng(12);
	let palette = firmware_palette(&mut rng, Mode::Mode2);
	let first = noise_image(&mut rng, &palette, 16, 16);
	let second = mutate(&mut rng, &first, &palette);
	let placement = Placement::screen(0xC0A0);

	let from_images = diff_images(&first, &palette, &second, &palette, Mode::Mode2, placement).unwrap();
	let previous = encode(&first, &palette, Mode::Mode2, Layout::Sprite).unwrap();
	let next = encode(&second, &palette, Mode::Mode2, Layout::Sprite).unwrap();
	assert_eq!(diff(&previous, &next, placement).unwrap(), from_images);
}

#[test_log::test]
fn test_animation_loops_back_to_first_frame() {
	let mut rng = rng(3);
	let palette = firmware_palette(&mut rng, Mode::Mode0);
	let mut images = vec![noise_image(&mut rng, &palette, 16, 8)];
	for _ in 0..4 {
		let next = mutate(&mut rng, images.last().unwrap(), &palette);
		images.push(next);
	}
	let frames: Vec<PackedFrame> = images
		.iter()
		.map(|image| encode(image, &palette, Mode::Mode0, Layout::Sprite).unwrap())
		.collect();

	let animation = DeltaAnimation::from_frames(&frames, palette.clone(), Placement::Sprite, 0).unwrap();
	assert_eq!(animation.frame_count(), 5);
	assert_eq!(animation.reference(), &frames[0]);

	let mut memory = frames[0].as_bytes().to_vec();
	for (i, delta) in animation.deltas().iter().enumerate() {
		apply(&mut memory, delta);
		assert_eq!(memory, frames[(i + 1) % frames.len()].as_bytes());
	}
	assert_eq!(animation.marshal().unwrap().len(), 5);
}

#[test_log::test]
fn test_single_frame_is_not_an_animation() {
	let frame = PackedFrame::from_raw(vec![0; 4], Mode::Mode2, Size::new(8, 4), Layout::Sprite).unwrap();
	assert!(matches!(
		DeltaAnimation::from_frames(&[frame], Palette::new(), Placement::Sprite, 0),
		Err(GfxError::NotEnoughFrames(1))
	));
}
