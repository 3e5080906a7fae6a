//! Benchmark suite for frame packing, deltas and tile analysis
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use std::hint::black_box;

use cpcpix_benches::{generate_animation, generate_noise_image, generate_tiled_image, mode_palette};
use cpcpix_types::gfx::{
	AnalyzeBoard, Layout, Mode, Placement, ScreenLayout, Size,
	delta::{diff, diff_images},
	frame::{decode, encode},
	pixel,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Benchmark full screen encoding in every mode
fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("frame_encode");

	for mode in Mode::ALL {
		let width = 160 * mode.pixels_per_byte() / 2;
		let palette = mode_palette(mode);
		let image = generate_noise_image(width, 200, &palette, 1);
		group.throughput(Throughput::Elements(u64::from(width) * 200));

		group.bench_with_input(BenchmarkId::new("sprite", mode), &image, |b, image| {
			b.iter(|| black_box(encode(black_box(image), &palette, mode, Layout::Sprite)));
		});
		let screen = Layout::Screen(ScreenLayout::standard());
		group.bench_with_input(BenchmarkId::new("screen", mode), &image, |b, image| {
			b.iter(|| black_box(encode(black_box(image), &palette, mode, screen)));
		});
	}

	group.finish();
}

/// Benchmark screen decoding
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("frame_decode");

	let palette = mode_palette(Mode::Mode0);
	let image = generate_noise_image(160, 200, &palette, 2);
	let Ok(frame) = encode(&image, &palette, Mode::Mode0, Layout::Screen(ScreenLayout::standard()))
	else {
		eprintln!("Warning: Could not encode the benchmark frame");
		return;
	};

	group.throughput(Throughput::Bytes(frame.len() as u64));
	group.bench_function("mode0_screen", |b| {
		b.iter(|| black_box(decode(black_box(&frame), &palette)));
	});

	group.finish();
}

/// Benchmark byte packing alone
fn bench_pixel_packing(c: &mut Criterion) {
	let mut group = c.benchmark_group("pixel_pack");

	let inks: Vec<u8> = (0..16_000u32).map(|i| (i % 16) as u8).collect();
	group.throughput(Throughput::Elements(inks.len() as u64));
	group.bench_function("pack_mode0", |b| {
		b.iter(|| {
			let packed: Vec<u8> = inks.chunks_exact(2).map(|p| pixel::pack_mode0(p[0], p[1])).collect();
			black_box(packed)
		});
	});
	group.bench_function("unpack_mode0", |b| {
		b.iter(|| {
			let total: u32 = (0..=255u8)
				.map(|byte| {
					let (l, r) = pixel::unpack_mode0(black_box(byte));
					u32::from(l) + u32::from(r)
				})
				.sum();
			black_box(total)
		});
	});

	group.finish();
}

/// Benchmark frame deltas, packed and from images
fn bench_delta(c: &mut Criterion) {
	let mut group = c.benchmark_group("delta");

	let palette = mode_palette(Mode::Mode1);
	let frames = generate_animation(128, 64, 2, &palette);
	let packed: Vec<_> = frames
		.iter()
		.filter_map(|f| encode(f, &palette, Mode::Mode1, Layout::Sprite).ok())
		.collect();
	if packed.len() != 2 {
		eprintln!("Warning: Could not encode the benchmark animation");
		return;
	}

	group.bench_function("diff_packed", |b| {
		b.iter(|| black_box(diff(&packed[0], &packed[1], Placement::screen(0xC000))));
	});
	group.bench_function("diff_images", |b| {
		b.iter(|| {
			black_box(diff_images(
				&frames[0],
				&palette,
				&frames[1],
				&palette,
				Mode::Mode1,
				Placement::Sprite,
			))
		});
	});

	group.finish();
}

/// Benchmark tile analysis
fn bench_tiles(c: &mut Criterion) {
	let mut group = c.benchmark_group("tiles");

	let palette = mode_palette(Mode::Mode0);
	let image = generate_tiled_image(320, 200, 8, &palette);
	for edge in [4u32, 8, 16] {
		group.bench_with_input(BenchmarkId::new("analyze", edge), &edge, |b, &edge| {
			b.iter(|| black_box(AnalyzeBoard::analyze(&image, Size::new(edge, edge))));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_pixel_packing, bench_delta, bench_tiles);
criterion_main!(benches);
