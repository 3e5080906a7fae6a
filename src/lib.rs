#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `cpcpix-rs` converts quantized images into Amstrad CPC screen and sprite data, computes
//! frame deltas for looping animations and builds deduplicated tile maps.
//!
pub use cpcpix_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use cpcpix_dylib;
