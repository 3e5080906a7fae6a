//! AMSDOS file headers.
//!
//! # Header Structure (128 bytes)
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ------------------------------------------
//! 0x00    1     user number
//! 0x01    8     file name, space padded
//! 0x09    3     extension, space padded
//! 0x12    1     file type (0 basic, 1 protected, 2 binary)
//! 0x15    2     load address
//! 0x17    1     first block flag
//! 0x18    2     logical length
//! 0x1A    2     entry address
//! 0x40    3     real length
//! 0x43    2     checksum: sum of bytes 0x00-0x42
//! ```
//!
//! Multi-byte fields are little endian. Unused bytes are zero.

use crate::gfx::GfxError;

/// AMSDOS header constants.
pub mod constants {
	/// Header size
	pub const HEADER_SIZE: usize = 128;

	/// File name length
	pub const NAME_LEN: usize = 8;

	/// Extension length
	pub const EXTENSION_LEN: usize = 3;

	/// Number of bytes covered by the checksum
	pub const CHECKSUM_SPAN: usize = 0x43;

	/// Binary file type
	pub const TYPE_BINARY: u8 = 2;
}

/// A 128-byte AMSDOS header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmsdosHeader {
	/// User number
	pub user: u8,
	/// File name, at most 8 characters
	pub name: String,
	/// Extension, at most 3 characters
	pub extension: String,
	/// File type
	pub file_type: u8,
	/// Load address
	pub load_address: u16,
	/// Entry address
	pub exec_address: u16,
	/// Payload length
	pub length: u32,
}

impl AmsdosHeader {
	/// Creates a binary file header.
	///
	/// `filename` is split at its last dot; both parts are upper-cased and truncated to the
	/// 8.3 format.
	pub fn new(filename: &str, load_address: u16, exec_address: u16, length: u32) -> Self {
		let (name, extension) = filename.rsplit_once('.').unwrap_or((filename, ""));
		Self {
			user: 0,
			name: name.to_ascii_uppercase().chars().take(constants::NAME_LEN).collect(),
			extension: extension.to_ascii_uppercase().chars().take(constants::EXTENSION_LEN).collect(),
			file_type: constants::TYPE_BINARY,
			load_address,
			exec_address,
			length,
		}
	}

	/// Serializes the header and computes its checksum.
	pub fn to_bytes(&self) -> [u8; constants::HEADER_SIZE] {
		let mut data = [0u8; constants::HEADER_SIZE];
		data[0] = self.user;
		write_padded(&mut data[0x01..0x09], &self.name);
		write_padded(&mut data[0x09..0x0C], &self.extension);
		data[0x12] = self.file_type;
		data[0x15..0x17].copy_from_slice(&self.load_address.to_le_bytes());
		data[0x17] = 0xFF;
		// logical length is a 16-bit field
		data[0x18..0x1A].copy_from_slice(&((self.length & 0xFFFF) as u16).to_le_bytes());
		data[0x1A..0x1C].copy_from_slice(&self.exec_address.to_le_bytes());
		data[0x40..0x43].copy_from_slice(&self.length.to_le_bytes()[..3]);
		let sum = checksum(&data);
		data[0x43..0x45].copy_from_slice(&sum.to_le_bytes());
		data
	}

	/// Parses a header.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InsufficientData`] for fewer than 128 bytes and
	/// [`GfxError::InvalidChecksum`] when the stored checksum is wrong.
	pub fn from_bytes(data: &[u8]) -> Result<Self, GfxError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(GfxError::InsufficientData {
				expected: constants::HEADER_SIZE,
				actual: data.len(),
			});
		}
		let stored = u16::from_le_bytes([data[0x43], data[0x44]]);
		let computed = checksum(data);
		if stored != computed {
			return Err(GfxError::InvalidChecksum {
				stored,
				computed,
			});
		}

		Ok(Self {
			user: data[0],
			name: read_padded(&data[0x01..0x09]),
			extension: read_padded(&data[0x09..0x0C]),
			file_type: data[0x12],
			load_address: u16::from_le_bytes([data[0x15], data[0x16]]),
			exec_address: u16::from_le_bytes([data[0x1A], data[0x1B]]),
			length: u32::from_le_bytes([data[0x40], data[0x41], data[0x42], 0]),
		})
	}

	/// Returns the file name in `NAME.EXT` form.
	pub fn filename(&self) -> String {
		if self.extension.is_empty() {
			self.name.clone()
		} else {
			format!("{}.{}", self.name, self.extension)
		}
	}
}

/// Prepends a binary file header to `data`.
pub fn wrap(filename: &str, data: &[u8], load_address: u16, exec_address: u16) -> Vec<u8> {
	let header = AmsdosHeader::new(filename, load_address, exec_address, data.len() as u32);
	let mut out = Vec::with_capacity(constants::HEADER_SIZE + data.len());
	out.extend_from_slice(&header.to_bytes());
	out.extend_from_slice(data);
	out
}

/// Removes a valid AMSDOS header, if any.
///
/// Data without a valid header is returned unchanged.
pub fn strip(data: &[u8]) -> &[u8] {
	match AmsdosHeader::from_bytes(data) {
		Ok(_) => &data[constants::HEADER_SIZE..],
		Err(_) => data,
	}
}

fn checksum(data: &[u8]) -> u16 {
	data[..constants::CHECKSUM_SPAN]
		.iter()
		.fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

fn write_padded(dest: &mut [u8], value: &str) {
	dest.fill(b' ');
	for (d, b) in dest.iter_mut().zip(value.bytes()) {
		*d = b;
	}
}

fn read_padded(src: &[u8]) -> String {
	String::from_utf8_lossy(src).trim_end().to_string()
}
