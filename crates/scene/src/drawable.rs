use glam::DVec2;
use stackworld_input::KeyInput;
use stackworld_raster::Image;
use stackworld_render::{Camera, DrawOutcome, ScreenSprite, StackedSprite};

use crate::SceneError;

/// What a drawable gets to see and touch during its per-tick update.
pub struct UpdateContext<'a> {
    /// The scene camera; logic may retarget or reset it.
    pub camera: &'a mut Camera,
    /// Key state for this tick.
    pub input: &'a dyn KeyInput,
    /// Number of the tick being run, starting at 1.
    pub tick: u64,
}

/// Anything the scene can update and draw.
///
/// World objects report a depth (their projected screen-Y) and are drawn in
/// painter's order; objects without a depth are screen-space overlays.
pub trait Drawable {
    /// Per-tick logic hook.
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Composite onto the canvas.
    fn render(&self, canvas: &mut Image, camera: &Camera) -> Result<DrawOutcome, SceneError>;

    /// Projected screen-Y used for depth ordering, or `None` for overlays.
    fn depth(&self, camera: &Camera, canvas: (u32, u32)) -> Option<f64>;

    /// World position for world objects, screen position for overlays.
    fn position(&self) -> DVec2;

    /// Rotation in degrees.
    fn rotation(&self) -> f64 {
        0.0
    }
}

impl Drawable for StackedSprite {
    fn render(&self, canvas: &mut Image, camera: &Camera) -> Result<DrawOutcome, SceneError> {
        Ok(self.draw(canvas, camera)?)
    }

    fn depth(&self, camera: &Camera, canvas: (u32, u32)) -> Option<f64> {
        Some(self.screen_position(camera, canvas).y)
    }

    fn position(&self) -> DVec2 {
        StackedSprite::position(self)
    }

    fn rotation(&self) -> f64 {
        StackedSprite::rotation(self)
    }
}

impl Drawable for ScreenSprite {
    fn render(&self, canvas: &mut Image, _camera: &Camera) -> Result<DrawOutcome, SceneError> {
        Ok(self.draw(canvas))
    }

    fn depth(&self, _camera: &Camera, _canvas: (u32, u32)) -> Option<f64> {
        None
    }

    fn position(&self) -> DVec2 {
        ScreenSprite::position(self)
    }
}
