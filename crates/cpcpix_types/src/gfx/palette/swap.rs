//! Ink swapping.
//!
//! An [`InkSwap`] renumbers inks in packed data without touching the palette, for routines
//! that expect a given color in a given ink. Tables are written `from=to` pairs separated by
//! commas; unlisted inks keep their number:
//!
//! ```
//! use cpcpix_types::gfx::palette::InkSwap;
//!
//! let swap: InkSwap = "0=3,1=0".parse().unwrap();
//! assert_eq!(swap.swap(0), 3);
//! assert_eq!(swap.swap(2), 2);
//! ```

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::gfx::{GfxError, PackedFrame, pixel};

/// Ink renumbering table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InkSwap(BTreeMap<u8, u8>);

impl InkSwap {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Maps `from` to `to`, replacing an earlier mapping of `from`.
	pub fn insert(&mut self, from: u8, to: u8) {
		self.0.insert(from, to);
	}

	/// Returns the new number of `ink`.
	#[inline]
	pub fn swap(&self, ink: u8) -> u8 {
		self.0.get(&ink).copied().unwrap_or(ink)
	}

	/// Returns `true` if no ink is renumbered.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns a copy of `frame` with every pixel renumbered.
	///
	/// Only bytes holding pixels are rewritten; screen bytes outside the image stay as
	/// they are.
	///
	/// # Errors
	///
	/// Returns [`GfxError::InvalidInkSwap`] if a target ink does not exist in the frame's
	/// mode.
	pub fn apply(&self, frame: &PackedFrame) -> Result<PackedFrame, GfxError> {
		let mode = frame.mode();
		let size = frame.size();
		let inks = mode.colors_available();
		if let Some((from, to)) = self.0.iter().find(|(_, to)| usize::from(**to) >= inks) {
			return Err(GfxError::InvalidInkSwap(format!("{from}={to}: {mode} has {inks} inks")));
		}
		if self.is_empty() {
			return Ok(frame.clone());
		}

		let mut data = frame.as_bytes().to_vec();
		for line in 0..size.height {
			for column in 0..size.mode_width(mode) {
				let offset = frame.layout().offset(size, mode, column, line)?;
				let inks = pixel::unpack(mode, data[offset])
					.as_slice()
					.iter()
					.map(|&ink| self.swap(ink))
					.collect::<Vec<_>>();
				data[offset] = pixel::pack(mode, &inks);
			}
		}
		log::debug!("swapped inks {self} in {size} {mode} frame");
		PackedFrame::from_raw(data, mode, size, frame.layout())
	}
}

impl FromStr for InkSwap {
	type Err = GfxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut swap = Self::new();
		for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
			let invalid = || GfxError::InvalidInkSwap(item.to_string());
			let (from, to) = item.split_once('=').ok_or_else(invalid)?;
			let from = from.trim().parse().map_err(|_| invalid())?;
			let to = to.trim().parse().map_err(|_| invalid())?;
			swap.insert(from, to);
		}
		Ok(swap)
	}
}

impl TryFrom<String> for InkSwap {
	type Error = GfxError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<InkSwap> for String {
	fn from(value: InkSwap) -> Self {
		value.to_string()
	}
}

impl fmt::Display for InkSwap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let pairs = self.0.iter().map(|(from, to)| format!("{from}={to}")).collect::<Vec<_>>();
		f.write_str(&pairs.join(","))
	}
}
