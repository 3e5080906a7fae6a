//! Prelude module for `cpcpix_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use cpcpix_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let layout = ScreenLayout::overscan();
//! assert_eq!(layout.buffer_len(), 0x8000);
//!
//! // Work with deltas
//! let mut delta = DeltaCollection::new();
//! delta.add(0xFF, 0xC000);
//! assert_eq!(delta.marshal().unwrap(), vec![0x01, 0x00, 0xFF, 0x01, 0x00, 0xC0]);
//! ```

// Re-export everything from cpcpix_types::prelude
#[doc(inline)]
pub use cpcpix_types::prelude::*;

// Re-export the entire cpcpix_types module for advanced usage
#[doc(inline)]
pub use cpcpix_types;
