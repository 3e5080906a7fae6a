use cpcpix_rs::cpcpix_types::gfx::tile::constants::MAX_TILES;
use cpcpix_rs::prelude::*;
use image::{Rgba, RgbaImage};

use crate::{firmware_palette, noise_image, rng};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 0xFF]);
const RED: Rgba<u8> = Rgba([0xFF, 0, 0, 0xFF]);

#[test_log::test]
fn test_one_unique_tile_among_fifteen() {
	let mut image = RgbaImage::from_pixel(8, 8, BLACK);
	image.put_pixel(6, 6, RED);

	let board = AnalyzeBoard::analyze(&image, Size::new(2, 2)).unwrap();
	let sorted = board.sort().unwrap();
	assert_eq!(sorted.len(), 2);
	assert_eq!(sorted.tiles()[0].occurrences, 15);
	assert_eq!(sorted.tiles()[1].occurrences, 1);

	let map = TileMap::new(&board, &sorted).unwrap();
	assert_eq!(map.get(3, 3), Some(1));
	assert_eq!(map.cells().iter().filter(|&&index| index == 0).count(), 15);
}

#[test_log::test]
fn test_every_cell_resolves_to_its_tile() {
	let mut rng = rng(21);
	let palette = firmware_palette(&mut rng, Mode::Mode1);
	let image = noise_image(&mut rng, &palette, 16, 16);
	let board = AnalyzeBoard::analyze(&image, Size::new(4, 4)).unwrap();
	let sorted = board.sort().unwrap();

	let total: usize = sorted.tiles().iter().map(|t| t.occurrences).sum();
	assert_eq!(total, 16);
	for row in 0..board.rows() {
		for column in 0..board.columns() {
			let tile = board.cell(column, row).unwrap();
			let index = tile_index(tile, &sorted).unwrap();
			assert_eq!(&sorted.tiles()[index].tile, tile);
		}
	}
	assert_eq!(board.render(), image);
}

#[test_log::test]
fn test_too_many_tiles_can_be_truncated() {
	let mut rng = rng(4);
	let palette = firmware_palette(&mut rng, Mode::Mode0);
	let image = noise_image(&mut rng, &palette, 128, 64);
	let board = AnalyzeBoard::analyze(&image, Size::new(4, 2)).unwrap();
	assert!(board.len() > MAX_TILES);

	let err = board.sort().unwrap_err();
	assert!(err.is_recoverable());

	let mut ranked = board.ranked();
	ranked.truncate(MAX_TILES);
	assert_eq!(ranked.len(), MAX_TILES);
	let map = TileMap::new(&board, &ranked).unwrap();
	assert!(map.cells().iter().all(|&index| usize::from(index) < MAX_TILES));
}

#[test_log::test]
fn test_reduce_merges_near_tiles() {
	let near = Rgba([0x08, 0, 0, 0xFF]);
	let mut image = RgbaImage::from_pixel(8, 4, BLACK);
	image.put_pixel(4, 0, near);
	let board = AnalyzeBoard::analyze(&image, Size::new(4, 4)).unwrap();
	assert_eq!(board.len(), 2);

	let reduced = board.reduce_tiles_number(10.0);
	assert_eq!(reduced.len(), 1);
	assert_eq!(reduced.tiles()[0].occurrences, 2);
	assert_eq!(board.reduce_tiles_number(0.1).len(), 2);
}

#[test_log::test]
fn test_imp_catcher_layout() {
	let palette = Palette::from_colors(vec![Color::rgb(0, 0, 0), Color::rgb(0xFF, 0, 0)]);
	let mut image = RgbaImage::from_pixel(8, 2, BLACK);
	image.put_pixel(4, 0, RED);
	let board = AnalyzeBoard::analyze(&image, Size::new(4, 2)).unwrap();
	let sorted = board.sort().unwrap();

	let imp = imp_catcher(&sorted, &palette, Mode::Mode1).unwrap();
	// two tiles of one byte by two lines, then the footer
	assert_eq!(imp.len(), 4 + 3);
	assert_eq!(&imp[4..], &[1, 2, 2]);
}
