//! Byte stream compression service.
//!
//! Packers are selected by name. Only the `none` passthrough is built in; real packers
//! plug in through the [`Compressor`] trait.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::gfx::GfxError;

/// Compresses a byte stream.
pub trait Compressor {
	/// Returns the compressed form of `data`.
	///
	/// # Errors
	///
	/// Implementations report packer failures as [`GfxError`].
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>, GfxError>;
}

/// Known compression identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Compression {
	/// Data is stored as is
	#[default]
	None,
}

impl Compression {
	/// Returns the identifier used in configuration files.
	pub fn id(&self) -> &'static str {
		match self {
			Compression::None => "none",
		}
	}
}

impl Compressor for Compression {
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>, GfxError> {
		match self {
			Compression::None => Ok(data.to_vec()),
		}
	}
}

impl FromStr for Compression {
	type Err = GfxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"" | "none" => Ok(Compression::None),
			_ => Err(GfxError::UnsupportedCompression(s.to_string())),
		}
	}
}

impl TryFrom<String> for Compression {
	type Error = GfxError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<Compression> for String {
	fn from(value: Compression) -> Self {
		value.id().to_string()
	}
}

impl fmt::Display for Compression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.id())
	}
}

/// Compresses `data` with the packer named `id`.
///
/// # Errors
///
/// Returns [`GfxError::UnsupportedCompression`] for unknown identifiers.
pub fn compress(data: &[u8], id: &str) -> Result<Vec<u8>, GfxError> {
	id.parse::<Compression>()?.compress(data)
}
