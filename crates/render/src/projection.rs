use glam::DVec2;

use crate::Camera;

/// Center of a `width × height` canvas, in whole pixels.
pub fn canvas_center((width, height): (u32, u32)) -> DVec2 {
    DVec2::new((width / 2) as f64, (height / 2) as f64)
}

/// Map a world position to canvas coordinates.
///
/// The offset from the camera is scaled by the zoom and rotated by the
/// negated camera rotation, then placed relative to the canvas center.
pub fn project(world: DVec2, camera: &Camera, canvas: (u32, u32)) -> DVec2 {
    let offset = (world - camera.position()) * camera.zoom();
    let rotated = DVec2::from_angle(-camera.rotation().to_radians()).rotate(offset);
    canvas_center(canvas) + rotated
}

/// Axis-aligned screen rectangle; `right` and `bottom` are exclusive.
///
/// Held in `i64` with saturating edges so objects projected arbitrarily far
/// from the canvas still produce a rectangle that tests as offscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl ScreenRect {
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            right: left.saturating_add(width),
            bottom: top.saturating_add(height),
        }
    }

    /// Rectangle of a `width × height` image whose point `anchor` (relative
    /// to its top-left corner) lands on the screen position `at`.
    pub fn anchored(at: DVec2, anchor: (i32, i32), width: i32, height: i32) -> Self {
        // float to int casts saturate, NaN becomes 0
        let (x, y) = (at.x.floor() as i64, at.y.floor() as i64);
        Self::new(
            x.saturating_sub(anchor.0 as i64),
            y.saturating_sub(anchor.1 as i64),
            width as i64,
            height as i64,
        )
    }

    /// Whether the rectangle lies entirely outside a `width × height` canvas.
    pub fn is_offscreen(&self, (width, height): (u32, u32)) -> bool {
        self.right <= 0
            || self.bottom <= 0
            || self.left >= width as i64
            || self.top >= height as i64
    }

    /// Top-left corner narrowed for blitting. Exact for any rectangle that
    /// overlaps a canvas, since such a corner lies within one image size of it.
    pub fn origin(&self) -> (i32, i32) {
        let narrow = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        (narrow(self.left), narrow(self.top))
    }
}
