//! Forces dynamic linking of `cpcpix_internal` to speed up incremental builds during development.

#[allow(unused_imports)]
use cpcpix_internal;
