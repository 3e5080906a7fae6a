use cpcpix_rs::cpcpix_types::gfx::export::{amsdos, delta_animation_source};
use cpcpix_rs::prelude::*;

use crate::{firmware_palette, noise_image, rng};

#[test_log::test]
fn test_screen_file_with_ocp_palette() {
	let mut rng = rng(0x5C2);
	let palette = firmware_palette(&mut rng, Mode::Mode0);
	let image = noise_image(&mut rng, &palette, 160, 200);
	let config = ConvertConfig::default();
	let frame = encode(&image, &palette, config.mode, config.layout()).unwrap();

	let packed = config.compression.compress(frame.as_bytes()).unwrap();
	let file = amsdos::wrap("logo.scr", &packed, 0xC000, 0xC000);
	let header = AmsdosHeader::from_bytes(&file).unwrap();
	assert_eq!(header.filename(), "LOGO.SCR");
	assert_eq!(header.length, 0x4000);
	let pal_file = OcpPalette::from_palette(&palette, Mode::Mode0).unwrap().to_bytes();
	let ocp = OcpPalette::from_bytes(&pal_file).unwrap();

	let loaded = PackedFrame::from_raw(
		amsdos::strip(&file).to_vec(),
		ocp.mode(),
		Size::new(160, 200),
		config.layout(),
	)
	.unwrap();
	assert_eq!(decode(&loaded, &ocp.palette()).unwrap(), image);
}

#[test_log::test]
fn test_json_export_carries_the_frame() {
	let mut rng = rng(8);
	let palette = firmware_palette(&mut rng, Mode::Mode1);
	let image = noise_image(&mut rng, &palette, 16, 4);
	let frame = encode(&image, &palette, Mode::Mode1, Layout::Sprite).unwrap();

	let export = JsonExport::new("frame", 16, 4, frame.as_bytes(), &palette).unwrap();
	let parsed = JsonExport::from_json(&export.to_json().unwrap()).unwrap();
	assert_eq!(parsed.screen_bytes(), frame.as_bytes());
	assert_eq!(parsed.palette.len(), 4);
	assert!(parsed.hardware_palette.iter().all(|h| h.starts_with("0x")));
}

#[test_log::test]
fn test_configured_animation_source() {
	let config = ConvertConfig::from_json(r#"{ "mode": 2, "start_address": 49312, "max_frames": 2 }"#).unwrap();
	let mut rng = rng(17);
	let palette = firmware_palette(&mut rng, config.mode);
	let frames: Vec<_> =
		(0..4).map(|_| (noise_image(&mut rng, &palette, 16, 8), palette.clone())).collect();

	let animation =
		DeltaAnimation::from_images(&frames, config.mode, config.placement(), config.max_frames).unwrap();
	assert_eq!(animation.frame_count(), 2);

	let source = delta_animation_source(&animation, &config.asm).unwrap();
	for label in ["sprite:", "delta00:", "delta01:", "table_delta:", "palette:"] {
		assert!(source.contains(label), "missing {label}");
	}
	assert!(source.contains("start_address equ #c0a0"));
}
