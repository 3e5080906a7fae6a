//! Cyclic delta animations.
//!
//! An animation is stored as its first frame plus one delta per transition. The last delta
//! brings the last frame back to the first one, so playback can loop forever.

use image::RgbaImage;

use crate::gfx::{
	GfxError, Layout, Mode, Palette,
	frame::{self, PackedFrame},
};

use super::{DeltaCollection, Placement, diff, diff_images};

/// Default number of frames kept by [`decimate`].
pub const DEFAULT_MAX_FRAMES: usize = 22;

/// Keeps at most `max_frames` evenly spaced items.
///
/// With `n > max_frames` items, every `n / max_frames`-th item is kept, starting with the
/// first one. A `max_frames` of zero keeps everything.
pub fn decimate<T>(frames: &[T], max_frames: usize) -> Vec<&T> {
	if max_frames == 0 || frames.len() <= max_frames {
		return frames.iter().collect();
	}
	let stride = frames.len() / max_frames;
	log::info!("keeping {max_frames} of {} frames (one every {stride})", frames.len());
	frames.iter().step_by(stride).take(max_frames).collect()
}

/// Computes the delta of every transition, wrapping from the last frame to the first.
///
/// # Errors
///
/// Returns [`GfxError::NotEnoughFrames`] with fewer than two frames; any [`diff`] error is
/// propagated.
pub fn delta_chain(
	frames: &[&PackedFrame],
	placement: Placement,
) -> Result<Vec<DeltaCollection>, GfxError> {
	if frames.len() < 2 {
		return Err(GfxError::NotEnoughFrames(frames.len()));
	}
	let mut deltas = Vec::with_capacity(frames.len());
	for (i, current) in frames.iter().enumerate() {
		let next = frames[(i + 1) % frames.len()];
		let delta = diff(current, next, placement)?;
		log::debug!("frame {i} -> {}: {delta}", (i + 1) % frames.len());
		deltas.push(delta);
	}
	Ok(deltas)
}

/// A reference frame followed by the deltas of a looping animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaAnimation {
	reference: PackedFrame,
	palette: Palette,
	placement: Placement,
	deltas: Vec<DeltaCollection>,
}

impl DeltaAnimation {
	/// Builds an animation from packed frames sharing one palette.
	///
	/// # Arguments
	///
	/// * `frames` - Frames in playback order
	/// * `palette` - Palette of every frame
	/// * `placement` - Addressing of the delta bytes
	/// * `max_frames` - Decimation limit, `0` to keep every frame
	///
	/// # Errors
	///
	/// See [`delta_chain`].
	pub fn from_frames(
		frames: &[PackedFrame],
		palette: Palette,
		placement: Placement,
		max_frames: usize,
	) -> Result<Self, GfxError> {
		let frames = decimate(frames, max_frames);
		let deltas = delta_chain(&frames, placement)?;
		Ok(Self {
			reference: frames[0].clone(),
			palette,
			placement,
			deltas,
		})
	}

	/// Builds an animation from quantized images, each with its own palette.
	///
	/// The reference frame is the first image packed as a sprite with its palette.
	///
	/// # Errors
	///
	/// Returns [`GfxError::NotEnoughFrames`] with fewer than two frames; encoding and
	/// [`diff_images`] errors are propagated.
	pub fn from_images(
		frames: &[(RgbaImage, Palette)],
		mode: Mode,
		placement: Placement,
		max_frames: usize,
	) -> Result<Self, GfxError> {
		let frames = decimate(frames, max_frames);
		if frames.len() < 2 {
			return Err(GfxError::NotEnoughFrames(frames.len()));
		}

		let (first_image, first_palette) = frames[0];
		let reference = frame::encode(first_image, first_palette, mode, Layout::Sprite)?;
		let mut deltas = Vec::with_capacity(frames.len());
		for (i, (image, palette)) in frames.iter().enumerate() {
			let (next_image, next_palette) = frames[(i + 1) % frames.len()];
			deltas.push(diff_images(image, palette, next_image, next_palette, mode, placement)?);
		}

		Ok(Self {
			reference,
			palette: first_palette.clone(),
			placement,
			deltas,
		})
	}

	/// Returns the first frame.
	#[inline]
	pub fn reference(&self) -> &PackedFrame {
		&self.reference
	}

	/// Returns the palette of the reference frame.
	#[inline]
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Returns the delta addressing.
	#[inline]
	pub fn placement(&self) -> Placement {
		self.placement
	}

	/// Returns one delta per transition, the last one looping back to the reference.
	#[inline]
	pub fn deltas(&self) -> &[DeltaCollection] {
		&self.deltas
	}

	/// Returns the number of frames played.
	#[inline]
	pub fn frame_count(&self) -> usize {
		self.deltas.len()
	}

	/// Marshals every delta.
	///
	/// # Errors
	///
	/// See [`DeltaCollection::marshal`].
	pub fn marshal(&self) -> Result<Vec<Vec<u8>>, GfxError> {
		self.deltas.iter().map(DeltaCollection::marshal).collect()
	}
}
