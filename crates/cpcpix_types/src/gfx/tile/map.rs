//! Tile maps and tile catalog exports.

use crate::gfx::{GfxError, Layout, Mode, Palette, frame};

use super::{AnalyzeBoard, SortedTiles, constants::MAX_TILES};

/// Size of the buffer written by [`TileMap::til_bytes`].
pub const TIL_BUFFER_SIZE: usize = 0x4000;

/// One byte tile index per grid cell, in raster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
	columns: u32,
	rows: u32,
	cells: Vec<u8>,
}

impl TileMap {
	/// Maps every cell of `board` to its rank in `sorted`.
	///
	/// Cells whose tile is missing from `sorted` (because the catalog was truncated) use the
	/// nearest remaining tile; their number is logged as a warning.
	///
	/// # Errors
	///
	/// Returns [`GfxError::CapacityExceeded`] if `sorted` holds more than 255 tiles and
	/// [`GfxError::TileNotFound`] if `sorted` is empty.
	pub fn new(board: &AnalyzeBoard, sorted: &SortedTiles) -> Result<Self, GfxError> {
		if sorted.len() > MAX_TILES {
			return Err(GfxError::CapacityExceeded {
				count: sorted.len(),
				max: MAX_TILES,
			});
		}

		let mut substituted = 0usize;
		let mut cells = Vec::with_capacity((board.columns() * board.rows()) as usize);
		for tile in board.cells() {
			let index = match sorted.index_of(tile) {
				Ok(index) => index,
				Err(err) => {
					substituted += 1;
					sorted.nearest(tile).ok_or(err)?
				}
			};
			// checked against the catalog length above
			cells.push(index as u8);
		}
		if substituted > 0 {
			log::warn!("{substituted} cells use the nearest tile of the truncated catalog");
		}

		Ok(Self {
			columns: board.columns(),
			rows: board.rows(),
			cells,
		})
	}

	/// Returns the number of columns.
	#[inline]
	pub fn columns(&self) -> u32 {
		self.columns
	}

	/// Returns the number of rows.
	#[inline]
	pub fn rows(&self) -> u32 {
		self.rows
	}

	/// Returns the cells in raster order.
	#[inline]
	pub fn cells(&self) -> &[u8] {
		&self.cells
	}

	/// Returns the index of a cell.
	pub fn get(&self, column: u32, row: u32) -> Option<u8> {
		if column >= self.columns || row >= self.rows {
			return None;
		}
		self.cells.get((row * self.columns + column) as usize).copied()
	}

	/// Returns the map as text: one line per row, comma separated indices.
	pub fn to_csv(&self) -> String {
		let mut out = String::new();
		for row in self.cells.chunks(self.columns.max(1) as usize) {
			let line: Vec<String> = row.iter().map(u8::to_string).collect();
			out.push_str(&line.join(","));
			out.push('\n');
		}
		out
	}

	/// Returns the cells padded with zeros to a 16 KiB buffer.
	///
	/// # Errors
	///
	/// Returns [`GfxError::SizeMismatch`] if the map has more cells than the buffer.
	pub fn til_bytes(&self) -> Result<Vec<u8>, GfxError> {
		if self.cells.len() > TIL_BUFFER_SIZE {
			return Err(GfxError::SizeMismatch {
				expected: TIL_BUFFER_SIZE,
				actual: self.cells.len(),
			});
		}
		let mut data = self.cells.clone();
		data.resize(TIL_BUFFER_SIZE, 0);
		Ok(data)
	}
}

/// Packs a tile catalog for the Imp-Catcher sprite editor.
///
/// Tiles are packed as sprites in catalog order, followed by a three byte footer: tile
/// width in bytes, tile height in lines, number of tiles.
///
/// # Errors
///
/// Returns [`GfxError::CapacityExceeded`] for more than 255 tiles,
/// [`GfxError::InvalidDimensions`] if a tile dimension does not fit a byte, and any
/// [`frame::encode`] error.
pub fn imp_catcher(tiles: &SortedTiles, palette: &Palette, mode: Mode) -> Result<Vec<u8>, GfxError> {
	let count = u8::try_from(tiles.len()).map_err(|_| GfxError::CapacityExceeded {
		count: tiles.len(),
		max: usize::from(u8::MAX),
	})?;

	let mut data = Vec::new();
	let mut footer = [0u8, 0, count];
	for (i, board_tile) in tiles.tiles().iter().enumerate() {
		let packed = frame::encode(&board_tile.tile.to_image(), palette, mode, Layout::Sprite)?;
		if i == 0 {
			let size = packed.size();
			let too_large = || GfxError::invalid_dimensions(size.width, size.height, "tile too large");
			footer[0] = u8::try_from(size.mode_width(mode)).map_err(|_| too_large())?;
			footer[1] = u8::try_from(size.height).map_err(|_| too_large())?;
		}
		data.extend_from_slice(packed.as_bytes());
	}
	data.extend_from_slice(&footer);
	Ok(data)
}
