//! Rendering: camera state, world-to-screen projection, sprite drawing.
//!
//! # Invariants
//! - Drawing reads the camera and view caches; it never mutates either.
//! - Screen space is camera-relative: the camera position maps to the canvas center.
//! - Offscreen and zero-sized sprites are skipped, never reported as errors.

mod camera;
mod projection;
mod sprite;

pub use camera::{Camera, CameraError};
pub use projection::{ScreenRect, canvas_center, project};
pub use sprite::{DrawOutcome, ScreenSprite, StackedSprite};
