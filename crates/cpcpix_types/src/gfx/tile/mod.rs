//! Tile analysis.
//!
//! [`AnalyzeBoard::analyze`] cuts a quantized image into a grid of equally sized tiles and
//! deduplicates them by exact pixel content. The board keeps, for every unique tile, its
//! pixels and number of occurrences, and for every grid cell the unique tile it shows.
//!
//! [`AnalyzeBoard::sort`] ranks unique tiles by descending occurrence. The rank is the tile
//! index written in tile maps, so it must fit in one byte.

mod map;


use std::{collections::HashMap, fmt};

use image::{RgbaImage, imageops};

use crate::gfx::{Color, GfxError, Mode, Size};

pub use map::{TileMap, imp_catcher};

/// Tile constants.
pub mod constants {
	/// Highest number of tiles a one byte index can address
	pub const MAX_TILES: usize = 255;

	/// Smallest tile edge scanned by [`super::choose_tile_size`]
	pub const MIN_AUTO_SIZE: u32 = 8;

	/// Largest tile edge scanned by [`super::choose_tile_size`]
	pub const MAX_AUTO_SIZE: u32 = 32;
}

/// Pixel content of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tile {
	size: Size,
	pixels: Vec<Color>,
}

impl Tile {
	/// Copies a tile out of an image.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InvalidDimensions`] if the rectangle does not lie inside the image.
	pub fn extract(image: &RgbaImage, x: u32, y: u32, size: Size) -> Result<Self, GfxError> {
		let right = x.checked_add(size.width);
		let bottom = y.checked_add(size.height);
		if !matches!((right, bottom), (Some(r), Some(b)) if r <= image.width() && b <= image.height())
		{
			return Err(GfxError::invalid_dimensions(
				size.width,
				size.height,
				"tile rectangle is outside the image",
			));
		}

		let mut pixels = Vec::with_capacity(size.pixel_count());
		for ty in 0..size.height {
			for tx in 0..size.width {
				pixels.push(Color::from(*image.get_pixel(x + tx, y + ty)));
			}
		}
		Ok(Self {
			size,
			pixels,
		})
	}

	/// Returns the tile dimensions.
	#[inline]
	pub fn size(&self) -> Size {
		self.size
	}

	/// Returns the pixels in raster order.
	#[inline]
	pub fn pixels(&self) -> &[Color] {
		&self.pixels
	}

	/// Returns the tile as an image.
	pub fn to_image(&self) -> RgbaImage {
		RgbaImage::from_fn(self.size.width, self.size.height, |x, y| {
			self.pixels[(y * self.size.width + x) as usize].into()
		})
	}

	/// Mean per-pixel Euclidean RGB distance to another tile.
	///
	/// Tiles of different sizes are infinitely far apart.
	pub fn distance(&self, other: &Tile) -> f64 {
		if self.size != other.size || self.pixels.is_empty() {
			return f64::INFINITY;
		}
		let total: f64 = self.pixels.iter().zip(&other.pixels).map(|(a, b)| a.distance(b)).sum();
		total / self.pixels.len() as f64
	}
}

/// A unique tile and its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTile {
	/// Tile content
	pub tile: Tile,
	/// Number of grid cells showing this tile
	pub occurrences: usize,
}

/// Unique tiles of an image and the grid that references them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeBoard {
	tile_size: Size,
	columns: u32,
	rows: u32,
	tiles: Vec<BoardTile>,
	cells: Vec<usize>,
}

/// Tiles ranked by descending occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedTiles {
	tiles: Vec<BoardTile>,
	lookup: HashMap<Tile, usize>,
}

impl AnalyzeBoard {
	/// Cuts `image` into `tile_size` tiles and deduplicates them.
	///
	/// Unique tiles are registered in raster scan order. Pixels right of or below the last
	/// whole tile are ignored with a warning.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InvalidDimensions`] for an empty tile size or an image smaller
	/// than one tile.
	pub fn analyze(image: &RgbaImage, tile_size: Size) -> Result<Self, GfxError> {
		if tile_size.width == 0 || tile_size.height == 0 {
			return Err(GfxError::invalid_dimensions(
				tile_size.width,
				tile_size.height,
				"empty tile size",
			));
		}
		let columns = image.width() / tile_size.width;
		let rows = image.height() / tile_size.height;
		if columns == 0 || rows == 0 {
			return Err(GfxError::invalid_dimensions(
				image.width(),
				image.height(),
				"image is smaller than one tile",
			));
		}
		if image.width() % tile_size.width != 0 || image.height() % tile_size.height != 0 {
			log::warn!(
				"image {}x{} is not a multiple of tile size {tile_size}, trailing pixels ignored",
				image.width(),
				image.height()
			);
		}

		let mut tiles: Vec<BoardTile> = Vec::new();
		let mut known: HashMap<Tile, usize> = HashMap::new();
		let mut cells = Vec::with_capacity((columns * rows) as usize);
		for row in 0..rows {
			for column in 0..columns {
				let tile =
					Tile::extract(image, column * tile_size.width, row * tile_size.height, tile_size)?;
				let index = match known.get(&tile) {
					Some(&index) => {
						tiles[index].occurrences += 1;
						index
					}
					None => {
						known.insert(tile.clone(), tiles.len());
						tiles.push(BoardTile {
							tile,
							occurrences: 1,
						});
						tiles.len() - 1
					}
				};
				cells.push(index);
			}
		}
		log::debug!("analyzed {columns}x{rows} cells of {tile_size}: {} unique tiles", tiles.len());

		Ok(Self {
			tile_size,
			columns,
			rows,
			tiles,
			cells,
		})
	}

	/// Returns the tile dimensions.
	#[inline]
	pub fn tile_size(&self) -> Size {
		self.tile_size
	}

	/// Returns the number of grid columns.
	#[inline]
	pub fn columns(&self) -> u32 {
		self.columns
	}

	/// Returns the number of grid rows.
	#[inline]
	pub fn rows(&self) -> u32 {
		self.rows
	}

	/// Returns the unique tiles in first-seen order.
	#[inline]
	pub fn tiles(&self) -> &[BoardTile] {
		&self.tiles
	}

	/// Returns the number of unique tiles.
	#[inline]
	pub fn len(&self) -> usize {
		self.tiles.len()
	}

	/// Returns `true` if the board holds no tile.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.tiles.is_empty()
	}

	/// Returns the tile shown by a grid cell.
	pub fn cell(&self, column: u32, row: u32) -> Option<&Tile> {
		if column >= self.columns || row >= self.rows {
			return None;
		}
		let index = self.cells[(row * self.columns + column) as usize];
		self.tiles.get(index).map(|t| &t.tile)
	}

	/// Returns the grid cells in raster order.
	pub fn cells(&self) -> impl Iterator<Item = &Tile> {
		self.cells.iter().map(|&index| &self.tiles[index].tile)
	}

	/// Ranks the unique tiles by descending occurrence, ties in first-seen order.
	///
	/// # Errors
	///
	/// Returns [`GfxError::CapacityExceeded`] if more than 255 tiles would need an index.
	/// Use [`AnalyzeBoard::ranked`] to get the full ranking anyway and truncate it.
	pub fn sort(&self) -> Result<SortedTiles, GfxError> {
		if self.tiles.len() > constants::MAX_TILES {
			return Err(GfxError::CapacityExceeded {
				count: self.tiles.len(),
				max: constants::MAX_TILES,
			});
		}
		Ok(self.ranked())
	}

	/// Same as [`AnalyzeBoard::sort`] without the capacity check.
	pub fn ranked(&self) -> SortedTiles {
		let mut tiles = self.tiles.clone();
		// sort_by is stable
		tiles.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
		SortedTiles::new(tiles)
	}

	/// Merges near-duplicate tiles.
	///
	/// Tiles are visited by descending occurrence. A tile whose [`Tile::distance`] to an
	/// already kept tile is at most `threshold` is replaced by that tile in every cell, and
	/// its occurrences are added to it. Kept tiles stay in first-seen order, so a threshold
	/// that merges nothing returns the same board. With `0.0` only tiles of identical RGB
	/// content merge.
	pub fn reduce_tiles_number(&self, threshold: f64) -> AnalyzeBoard {
		let mut order: Vec<usize> = (0..self.tiles.len()).collect();
		order.sort_by(|&a, &b| self.tiles[b].occurrences.cmp(&self.tiles[a].occurrences));

		// (first-seen index, merged tile)
		let mut kept: Vec<(usize, BoardTile)> = Vec::new();
		// old tile index -> position in kept
		let mut owner = vec![0usize; self.tiles.len()];
		for old in order {
			let candidate = &self.tiles[old];
			match kept.iter().position(|(_, k)| k.tile.distance(&candidate.tile) <= threshold) {
				Some(index) => {
					kept[index].1.occurrences += candidate.occurrences;
					owner[old] = index;
				}
				None => {
					owner[old] = kept.len();
					kept.push((old, candidate.clone()));
				}
			}
		}

		// Cells follow their representative once kept tiles are back in first-seen order
		let representative: Vec<usize> = owner.iter().map(|&index| kept[index].0).collect();
		kept.sort_by_key(|(first_seen, _)| *first_seen);
		let remap: Vec<usize> = representative
			.iter()
			.map(|r| kept.partition_point(|(first_seen, _)| first_seen < r))
			.collect();
		let kept: Vec<BoardTile> = kept.into_iter().map(|(_, tile)| tile).collect();
		log::info!(
			"reduced tiles from {} to {} with threshold {threshold}",
			self.tiles.len(),
			kept.len()
		);

		AnalyzeBoard {
			tile_size: self.tile_size,
			columns: self.columns,
			rows: self.rows,
			tiles: kept,
			cells: self.cells.iter().map(|&old| remap[old]).collect(),
		}
	}

	/// Rebuilds the image covered by the grid.
	pub fn render(&self) -> RgbaImage {
		let mut image =
			RgbaImage::new(self.columns * self.tile_size.width, self.rows * self.tile_size.height);
		for (i, &index) in self.cells.iter().enumerate() {
			let column = i as u32 % self.columns;
			let row = i as u32 / self.columns;
			let tile = self.tiles[index].tile.to_image();
			imageops::replace(
				&mut image,
				&tile,
				i64::from(column * self.tile_size.width),
				i64::from(row * self.tile_size.height),
			);
		}
		image
	}

	/// Returns the tile map as text: one line per row, comma separated sorted indices.
	///
	/// # Errors
	///
	/// Same as [`AnalyzeBoard::sort`].
	pub fn to_csv(&self) -> Result<String, GfxError> {
		let sorted = self.sort()?;
		let mut out = String::new();
		for row in 0..self.rows {
			let line: Result<Vec<String>, GfxError> = (0..self.columns)
				.map(|column| {
					let index = self.cells[(row * self.columns + column) as usize];
					sorted.index_of(&self.tiles[index].tile).map(|i| i.to_string())
				})
				.collect();
			out.push_str(&line?.join(","));
			out.push('\n');
		}
		Ok(out)
	}

	/// Returns the packed size in bytes of the whole tile catalog.
	pub fn packed_len(&self, mode: Mode) -> usize {
		self.tile_size.packed_len(mode) * self.tiles.len()
	}
}

impl fmt::Display for AnalyzeBoard {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Board: {}x{} cells of {}, {} unique tiles",
			self.columns,
			self.rows,
			self.tile_size,
			self.tiles.len()
		)
	}
}

impl SortedTiles {
	fn new(tiles: Vec<BoardTile>) -> Self {
		let lookup = tiles.iter().enumerate().map(|(i, t)| (t.tile.clone(), i)).collect();
		Self {
			tiles,
			lookup,
		}
	}

	/// Returns the tiles, most frequent first.
	#[inline]
	pub fn tiles(&self) -> &[BoardTile] {
		&self.tiles
	}

	/// Returns the number of tiles.
	#[inline]
	pub fn len(&self) -> usize {
		self.tiles.len()
	}

	/// Returns `true` if there is no tile.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.tiles.is_empty()
	}

	/// Keeps only the `max` most frequent tiles.
	pub fn truncate(&mut self, max: usize) {
		if self.tiles.len() > max {
			log::warn!("keeping {max} of {} tiles", self.tiles.len());
			self.tiles.truncate(max);
			self.lookup.retain(|_, index| *index < max);
		}
	}

	/// Returns the rank of a tile.
	///
	/// # Errors
	///
	/// Returns [`GfxError::TileNotFound`] if the tile is not in the catalog.
	pub fn index_of(&self, tile: &Tile) -> Result<usize, GfxError> {
		self.lookup.get(tile).copied().ok_or(GfxError::TileNotFound {
			width: tile.size.width,
			height: tile.size.height,
		})
	}

	/// Returns the rank of the closest tile, by [`Tile::distance`].
	pub fn nearest(&self, tile: &Tile) -> Option<usize> {
		if let Some(&index) = self.lookup.get(tile) {
			return Some(index);
		}
		self.tiles
			.iter()
			.enumerate()
			.map(|(i, t)| (i, t.tile.distance(tile)))
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}
}

/// Returns the rank of `tile` in `sorted`.
///
/// # Errors
///
/// Returns [`GfxError::TileNotFound`] when the tile was not produced by the same analysis.
pub fn tile_index(tile: &Tile, sorted: &SortedTiles) -> Result<usize, GfxError> {
	sorted.index_of(tile)
}

/// What [`choose_tile_size`] minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum TileCriteria {
	/// Fewest unique tiles
	#[default]
	Count,
	/// Smallest packed tile catalog
	Size,
}

/// Analyzes square tile sizes from 8 pixels to 32 pixels and returns the best board.
///
/// Sizes grow by the mode's tile step (8, 4 or 2 pixels). The first board reaching the
/// minimum wins.
///
/// # Errors
///
/// Returns [`GfxError::InvalidDimensions`] if the image is smaller than the smallest tile.
pub fn choose_tile_size(
	image: &RgbaImage,
	mode: Mode,
	criteria: TileCriteria,
) -> Result<AnalyzeBoard, GfxError> {
	let mut best: Option<(usize, AnalyzeBoard)> = None;
	let mut edge = constants::MIN_AUTO_SIZE;
	while edge <= constants::MAX_AUTO_SIZE {
		let size = Size::new(edge, edge);
		edge += mode.tile_step();
		if size.validate(mode).is_err() || image.width() < size.width || image.height() < size.height
		{
			continue;
		}
		let board = AnalyzeBoard::analyze(image, size)?;
		let score = match criteria {
			TileCriteria::Count => board.len(),
			TileCriteria::Size => board.packed_len(mode),
		};
		log::debug!("tile size {size}: {} tiles, score {score}", board.len());
		if best.as_ref().is_none_or(|(best_score, _)| score < *best_score) {
			best = Some((score, board));
		}
	}

	best.map(|(_, board)| board).ok_or_else(|| {
		GfxError::invalid_dimensions(
			image.width(),
			image.height(),
			"image is smaller than the smallest tile",
		)
	})
}
