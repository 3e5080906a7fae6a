//! Assembly source emitters.
//!
//! Every emitter takes an [`AsmFormat`] describing the assembler dialect, so the same data
//! can be written for Maxam (`db`/`dw`), Winape, or assemblers that want `BYTE`/`WORD`.

use serde::{Deserialize, Serialize};

use crate::gfx::{
	GfxError, Palette, ScreenLayout,
	delta::{DeltaAnimation, Placement},
	frame::PackedFrame,
};

/// Assembler dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsmFormat {
	/// Directive emitting bytes
	pub byte_token: String,
	/// Directive emitting 16-bit words
	pub word_token: String,
	/// Line terminator
	pub eol: String,
	/// Values per directive line
	pub values_per_line: usize,
}

impl Default for AsmFormat {
	fn default() -> Self {
		Self {
			byte_token: "db".to_string(),
			word_token: "dw".to_string(),
			eol: "\n".to_string(),
			values_per_line: 8,
		}
	}
}

impl AsmFormat {
	/// Writes `values` as lines of `token` directives.
	fn lines<I>(&self, token: &str, values: I) -> String
	where
		I: IntoIterator<Item = String>,
	{
		let per_line = self.values_per_line.max(1);
		let mut out = String::new();
		let mut column = 0;
		for value in values {
			if column == 0 {
				out.push_str(token);
				out.push(' ');
			} else {
				out.push_str(", ");
			}
			out.push_str(&value);
			column += 1;
			if column == per_line {
				out.push_str(&self.eol);
				column = 0;
			}
		}
		if column != 0 {
			out.push_str(&self.eol);
		}
		out
	}

	/// Formats bytes as `db #xx, #xx, ...` lines.
	pub fn format_bytes(&self, data: &[u8]) -> String {
		self.lines(&self.byte_token, data.iter().map(|b| format!("#{b:02x}")))
	}

	/// Formats 16-bit values as `dw #xxxx, ...` lines.
	pub fn format_words(&self, data: &[u16]) -> String {
		self.lines(&self.word_token, data.iter().map(|w| format!("#{w:04x}")))
	}

	/// Formats a table of labels as `dw label, ...` lines.
	pub fn format_labels<S: AsRef<str>>(&self, labels: &[S]) -> String {
		self.lines(&self.word_token, labels.iter().map(|l| l.as_ref().to_string()))
	}

	/// Formats the firmware color numbers of a palette, two decimal digits each.
	///
	/// # Errors
	///
	/// Returns [`GfxError::ColorNotFound`] for colors outside the firmware palette.
	pub fn format_firmware_palette(&self, palette: &Palette) -> Result<String, GfxError> {
		let numbers = palette.firmware_numbers()?;
		Ok(self.lines(&self.byte_token, numbers.iter().map(|n| format!("{n:02}"))))
	}

	/// Formats the gate array values of a palette.
	///
	/// # Errors
	///
	/// Returns [`GfxError::ColorNotFound`] for colors outside the firmware palette.
	pub fn format_hardware_palette(&self, palette: &Palette) -> Result<String, GfxError> {
		Ok(self.format_bytes(&palette.hardware_values()?))
	}

	/// Formats a frame column by column: all lines of byte column 0, then column 1, ...
	///
	/// # Errors
	///
	/// Returns [`GfxError::CoordinatesOutOfRange`] if the buffer is inconsistent with its
	/// geometry.
	pub fn format_by_column(&self, frame: &PackedFrame) -> Result<String, GfxError> {
		let size = frame.size();
		let mut data = Vec::with_capacity(frame.size().packed_len(frame.mode()));
		for column in 0..size.mode_width(frame.mode()) {
			for line in 0..size.height {
				data.push(frame.byte_at(column, line)?);
			}
		}
		Ok(self.format_bytes(&data))
	}
}

/// Writes the data section of a delta animation.
///
/// The section holds the sprite dimensions and start address as equates, the reference
/// frame (`sprite`), one block per marshaled delta (`delta00`, `delta01`, ...), the
/// `table_delta` word table pointing at every block, and the hardware palette.
///
/// # Errors
///
/// Returns [`GfxError::ColorNotFound`] if the palette has non firmware colors and
/// [`GfxError::CapacityExceeded`] if a delta cannot be marshaled.
pub fn delta_animation_source(animation: &DeltaAnimation, format: &AsmFormat) -> Result<String, GfxError> {
	let eol = &format.eol;
	let reference = animation.reference();
	let size = reference.size();
	let mode = reference.mode();
	let (start, line_width) = match animation.placement() {
		Placement::Sprite => (0, 0),
		Placement::Screen {
			start,
			layout,
		} => (start, layout.line_width),
	};
	let char_large = ScreenLayout::standard().base_address().wrapping_add(line_width);

	let mut out = String::new();
	out.push_str(&format!("; {mode} {size} delta animation{eol}"));
	out.push_str(&format!("nbdelta equ {}{eol}", animation.frame_count()));
	out.push_str(&format!("nbcolors equ {}{eol}", animation.palette().len()));
	out.push_str(&format!("height equ {}{eol}", size.height));
	out.push_str(&format!("width equ {}{eol}", size.mode_width(mode)));
	out.push_str(&format!("start_address equ #{start:04x}{eol}"));
	out.push_str(&format!("char_large equ #{char_large:04x}{eol}{eol}"));

	out.push_str(&format!("sprite:{eol}"));
	out.push_str(&format.format_bytes(reference.to_sprite()?.as_bytes()));

	let mut labels = Vec::with_capacity(animation.deltas().len());
	for (i, delta) in animation.deltas().iter().enumerate() {
		let label = format!("delta{i:02}");
		out.push_str(&format!("{label}:{eol}"));
		out.push_str(&format.format_bytes(&delta.marshal()?));
		labels.push(label);
	}

	out.push_str(&format!("table_delta:{eol}"));
	out.push_str(&format.format_labels(&labels));
	out.push_str(&format!("palette:{eol}"));
	out.push_str(&format.format_hardware_palette(animation.palette())?);
	Ok(out)
}
