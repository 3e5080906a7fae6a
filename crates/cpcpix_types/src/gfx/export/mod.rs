//! Output formats for packed data.
//!
//! - [`asm`]: assembly source
//! - [`amsdos`]: AMSDOS file headers
//! - [`compress`]: byte stream packers
//! - [`json`]: JSON frame description

pub mod amsdos;
pub mod asm;
pub mod compress;
pub mod json;

pub use amsdos::AmsdosHeader;
pub use asm::{AsmFormat, delta_animation_source};
pub use compress::{Compression, Compressor};
pub use json::JsonExport;
