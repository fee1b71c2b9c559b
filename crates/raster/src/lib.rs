//! Software pixel buffers for the stackworld renderer.
//!
//! # Invariants
//! - Pixel storage is row-major, `width * height` entries, no padding.
//! - All resampling is nearest-neighbor; nothing here smooths pixels.

mod image;
mod transform;

pub use image::Image;
