//! This crate provides the graphics core of the `cpcpix-rs` project: conversion of quantized
//! images to Amstrad CPC screen memory and back, frame deltas for animations, tile maps,
//! sprite boards and CPC+ hardware sprites.
//!
//! # Modes
//!
//! - **Mode 0**: 160x200, 16 inks, 2 pixels per byte
//! - **Mode 1**: 320x200, 4 inks, 4 pixels per byte
//! - **Mode 2**: 640x200, 2 inks, 8 pixels per byte
//!
//! Colour quantization happens before this crate: every image handed to it must only use
//! the colors of its palette.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```
//! use cpcpix_types::prelude::*;
//!
//! let palette = Palette::from_colors(vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)]);
//! let image = image::RgbaImage::from_pixel(16, 8, image::Rgba([255, 255, 255, 255]));
//!
//! let screen = encode(&image, &palette, Mode::Mode2, Layout::Screen(ScreenLayout::standard()))
//! 	.unwrap();
//! assert_eq!(screen.len(), 0x4000);
//! assert_eq!(decode(&screen, &palette).unwrap(), image);
//! ```
//!
//! Or use explicit paths:
//!
//! ```
//! use cpcpix_types::gfx::{delta::DeltaCollection, pixel};
//!
//! assert_eq!(pixel::pack_mode0(15, 0), 0xAA);
//! assert!(DeltaCollection::new().is_empty());
//! ```

pub mod gfx;

/// `use cpcpix_types::prelude::*;` to import commonly used items.
pub mod prelude;
