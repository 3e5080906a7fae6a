//! Byte-level deltas between packed frames.
//!
//! A [`DeltaCollection`] lists, for each new byte value, every hardware address where the
//! byte changes. Playback routines walk the list and poke the byte at each address, so a
//! whole frame transition costs one store per changed byte.
//!
//! # Marshaled layout
//!
//! ```text
//! Offset  Size      Field
//! ------  --------  --------------------------------------
//! 0x00    2         record count (little endian)
//! 0x02    variable  records
//!
//! Record:
//! 0x00    1         byte value
//! 0x01    1         address count (n)
//! 0x02    2 * n     addresses (little endian)
//! ```
//!
//! An item with more than 255 addresses is split into consecutive records carrying the same
//! byte value. Addresses are unsigned 16-bit values and wrap at `0x10000`.

mod animation;
mod engine;

#[cfg(test)]
mod tests;

use std::fmt;

pub use animation::{DEFAULT_MAX_FRAMES, DeltaAnimation, decimate, delta_chain};
pub use engine::{Placement, diff, diff_images};

use crate::gfx::GfxError;

/// Delta constants.
pub mod constants {
	/// Maximum number of addresses in one marshaled record
	pub const MAX_RECORD_ADDRESSES: usize = 255;

	/// Size of the record count prefix
	pub const HEADER_SIZE: usize = 2;
}

/// One changed byte value and the addresses it must be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaItem {
	byte: u8,
	addresses: Vec<u16>,
}

impl DeltaItem {
	/// Creates an item with a single address.
	pub fn new(byte: u8, address: u16) -> Self {
		Self {
			byte,
			addresses: vec![address],
		}
	}

	/// Returns the byte value written by this item.
	#[inline]
	pub fn byte(&self) -> u8 {
		self.byte
	}

	/// Returns the target addresses, in discovery order.
	#[inline]
	pub fn addresses(&self) -> &[u16] {
		&self.addresses
	}

	/// Returns the number of target addresses.
	#[inline]
	pub fn occurrences(&self) -> usize {
		self.addresses.len()
	}
}

impl fmt::Display for DeltaItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "byte #{:02X} x{}", self.byte, self.addresses.len())
	}
}

/// Ordered delta items of one frame transition.
///
/// Items are kept in first-seen order of their byte value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeltaCollection {
	items: Vec<DeltaItem>,
}

impl DeltaCollection {
	/// Creates an empty collection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records that `byte` must be written at `address`.
	///
	/// The address is appended to the item of the same byte value, or a new item is
	/// created at the end of the collection.
	pub fn add(&mut self, byte: u8, address: u16) {
		match self.items.iter_mut().find(|item| item.byte == byte) {
			Some(item) => item.addresses.push(address),
			None => self.items.push(DeltaItem::new(byte, address)),
		}
	}

	/// Returns the items in first-seen order.
	#[inline]
	pub fn items(&self) -> &[DeltaItem] {
		&self.items
	}

	/// Returns the number of distinct byte values.
	#[inline]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns `true` if no byte changes.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns the total number of changed bytes.
	pub fn changed_bytes(&self) -> usize {
		self.items.iter().map(DeltaItem::occurrences).sum()
	}

	/// Returns the number of records written by [`DeltaCollection::marshal`].
	pub fn record_count(&self) -> usize {
		self.items
			.iter()
			.map(|item| item.addresses.len().div_ceil(constants::MAX_RECORD_ADDRESSES))
			.sum()
	}

	/// Serializes the collection (see the module documentation for the layout).
	///
	/// # Errors
	///
	/// Returns [`GfxError::CapacityExceeded`] if more than 65535 records are needed.
	pub fn marshal(&self) -> Result<Vec<u8>, GfxError> {
		let records = self.record_count();
		let count = u16::try_from(records).map_err(|_| GfxError::CapacityExceeded {
			count: records,
			max: u16::MAX as usize,
		})?;

		let mut data = Vec::with_capacity(constants::HEADER_SIZE + records * 2 + self.changed_bytes() * 2);
		data.extend_from_slice(&count.to_le_bytes());
		for item in &self.items {
			for chunk in item.addresses.chunks(constants::MAX_RECORD_ADDRESSES) {
				data.push(item.byte);
				// chunks are at most 255 long
				data.push(chunk.len() as u8);
				for address in chunk {
					data.extend_from_slice(&address.to_le_bytes());
				}
			}
		}
		Ok(data)
	}

	/// Parses a marshaled collection.
	///
	/// Records sharing a byte value are merged back into one item. Trailing bytes after the
	/// last record are ignored.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InsufficientData`] if the data ends inside a record.
	pub fn unmarshal(data: &[u8]) -> Result<Self, GfxError> {
		let truncated = |expected: usize| GfxError::InsufficientData {
			expected,
			actual: data.len(),
		};
		if data.len() < constants::HEADER_SIZE {
			return Err(truncated(constants::HEADER_SIZE));
		}

		let records = u16::from_le_bytes([data[0], data[1]]);
		let mut collection = Self::new();
		let mut cursor = constants::HEADER_SIZE;
		for _ in 0..records {
			if cursor + 2 > data.len() {
				return Err(truncated(cursor + 2));
			}
			let byte = data[cursor];
			let count = data[cursor + 1] as usize;
			cursor += 2;

			let end = cursor + count * 2;
			if end > data.len() {
				return Err(truncated(end));
			}
			for address in data[cursor..end].chunks_exact(2) {
				collection.add(byte, u16::from_le_bytes([address[0], address[1]]));
			}
			cursor = end;
		}
		Ok(collection)
	}
}

impl fmt::Display for DeltaCollection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Delta: {} items, {} changed bytes", self.items.len(), self.changed_bytes())
	}
}

impl<'a> IntoIterator for &'a DeltaCollection {
	type Item = &'a DeltaItem;
	type IntoIter = std::slice::Iter<'a, DeltaItem>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}
