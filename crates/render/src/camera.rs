use glam::DVec2;
use stackworld_common::{normalize_angle, shortest_arc};

/// Errors from camera configuration.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("camera closeness factor must be between 0.0 and 1.0 (got {0})")]
    InvalidCloseness(f64),
}

/// 2D camera: position, rotation and zoom used to place sprites on the canvas.
///
/// Game logic steers it with [`target_location`](Self::target_location) and
/// [`target_rotation`](Self::target_rotation), which close a fixed fraction
/// (the closeness) of the remaining gap on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: DVec2,
    rotation: f64,
    zoom: f64,
    closeness: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
            closeness: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interpolation factor used by the targeting methods.
    ///
    /// 0.0 never moves, 1.0 snaps straight to the target.
    pub fn set_closeness(&mut self, closeness: f64) -> Result<(), CameraError> {
        if !(0.0..=1.0).contains(&closeness) {
            return Err(CameraError::InvalidCloseness(closeness));
        }
        self.closeness = closeness;
        Ok(())
    }

    /// Move toward `(x, y)` by the closeness factor.
    pub fn target_location(&mut self, x: f64, y: f64) {
        self.position += (DVec2::new(x, y) - self.position) * self.closeness;
    }

    /// Rotate toward `rotation` degrees by the closeness factor, along the shorter arc.
    pub fn target_rotation(&mut self, rotation: f64) {
        let diff = shortest_arc(self.rotation, rotation);
        self.rotation = normalize_angle(self.rotation + diff * self.closeness);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Multiply the zoom factor.
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom *= factor;
    }

    /// Set position, rotation and zoom directly.
    pub fn reset_to(&mut self, x: f64, y: f64, rotation: f64, zoom: f64) {
        self.position = DVec2::new(x, y);
        self.rotation = normalize_angle(rotation);
        self.zoom = zoom;
    }

    /// Position in world coordinates.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Rotation in degrees, within `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn closeness(&self) -> f64 {
        self.closeness
    }
}
